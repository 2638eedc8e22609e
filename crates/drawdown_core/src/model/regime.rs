use std::borrow::Cow;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Simulation horizon in years. Randomized schedules always cover exactly
/// this span; the canonical schedule overshoots it, which is fine since
/// lookup never reads past the horizon.
pub const HORIZON_YEARS: usize = 30;

/// Return-distribution parameters in effect for one span of years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeParams {
    pub equity_mean: f64,
    pub equity_std: f64,
    pub bond_mean: f64,
    pub bond_std: f64,
}

/// A contiguous span of years with fixed return-distribution parameters for
/// equities and bonds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeBlock {
    /// Span length in years.
    pub duration: usize,
    pub params: RegimeParams,
    /// Descriptive name for display purposes; not used in computation.
    pub label: Cow<'static, str>,
}

const fn block(
    duration: usize,
    equity_mean: f64,
    equity_std: f64,
    bond_mean: f64,
    bond_std: f64,
    label: &'static str,
) -> RegimeBlock {
    RegimeBlock {
        duration,
        params: RegimeParams {
            equity_mean,
            equity_std,
            bond_mean,
            bond_std,
        },
        label: Cow::Borrowed(label),
    }
}

/// The canonical market narrative: six historical regimes followed by a
/// terminal stable-growth block. The terminal block doubles as the filler
/// when a randomized schedule comes up short of the horizon.
pub(crate) const CANONICAL_BLOCKS: [RegimeBlock; 7] = [
    block(3, -0.02, 0.25, 0.01, 0.08, "2008-2010 Financial Crisis"),
    block(3, 0.10, 0.18, 0.03, 0.05, "2011-2013 Bull Market Recovery"),
    block(2, 0.01, 0.20, 0.02, 0.06, "2014-2015 European Debt Crisis"),
    block(5, 0.09, 0.16, 0.04, 0.05, "2016-2020 Continued Bull Market"),
    block(2, -0.05, 0.30, 0.00, 0.10, "2021-2022 COVID-19"),
    block(3, 0.06, 0.18, 0.01, 0.08, "2023-2025 Post-Pandemic Recovery"),
    block(30, 0.07, 0.14, 0.03, 0.05, "2026+ Stable Growth"),
];

/// Ordered sequence of regime blocks covering the simulation horizon.
///
/// A schedule is built once per session, immutable thereafter, and shared
/// read-only across every simulated path. Construction guarantees at least
/// one block, so lookup can always clamp to the final block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeSchedule {
    blocks: Vec<RegimeBlock>,
}

impl RegimeSchedule {
    /// Build a schedule from custom blocks, enforcing the block invariants
    /// (positive duration, finite means, non-negative finite deviations).
    pub fn new(blocks: Vec<RegimeBlock>) -> Result<Self, EngineError> {
        if blocks.is_empty() {
            return Err(EngineError::EmptySchedule);
        }
        for b in &blocks {
            validate_block(b)?;
        }
        Ok(Self { blocks })
    }

    /// Construction path for blocks already known to satisfy the invariants.
    pub(crate) fn from_validated(blocks: Vec<RegimeBlock>) -> Self {
        Self { blocks }
    }

    /// The fixed canonical schedule, blocks in their nominal order.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            blocks: CANONICAL_BLOCKS.to_vec(),
        }
    }

    #[must_use]
    pub fn blocks(&self) -> &[RegimeBlock] {
        &self.blocks
    }

    /// Total number of years the blocks cover.
    #[must_use]
    pub fn total_years(&self) -> usize {
        self.blocks.iter().map(|b| b.duration).sum()
    }

    /// Return-distribution parameters in effect for `year` (0-indexed).
    ///
    /// Walks the blocks accumulating durations and returns the first block
    /// whose span covers `year`. A year past the schedule's total span
    /// clamps to the last block; a correctly built schedule never needs
    /// this within the horizon, but a short custom schedule degrades
    /// gracefully instead of failing.
    #[must_use]
    pub fn params_at(&self, year: usize) -> RegimeParams {
        let mut elapsed = 0;
        for b in &self.blocks {
            if year < elapsed + b.duration {
                return b.params;
            }
            elapsed += b.duration;
        }
        self.blocks[self.blocks.len() - 1].params
    }
}

fn validate_block(b: &RegimeBlock) -> Result<(), EngineError> {
    let fail = |reason| EngineError::InvalidRegimeBlock {
        label: b.label.to_string(),
        reason,
    };
    if b.duration == 0 {
        return Err(fail("duration must be positive"));
    }
    if !b.params.equity_mean.is_finite() || !b.params.bond_mean.is_finite() {
        return Err(fail("return means must be finite"));
    }
    if !(b.params.equity_std >= 0.0 && b.params.equity_std.is_finite()) {
        return Err(fail("equity deviation must be non-negative and finite"));
    }
    if !(b.params.bond_std >= 0.0 && b.params.bond_std.is_finite()) {
        return Err(fail("bond deviation must be non-negative and finite"));
    }
    Ok(())
}

/// Build the regime schedule for a simulation session.
///
/// Canonical mode (`randomize == false`) returns the fixed block list
/// unchanged. Randomized mode permutes every block except the terminal
/// stable-growth block with a seeded Fisher-Yates shuffle, then normalizes
/// coverage to exactly [`HORIZON_YEARS`]:
///
/// - if the permuted blocks already reach the horizon, blocks are kept
///   greedily in shuffled order, skipping any block that would overshoot,
///   and the terminal block is dropped entirely;
/// - otherwise the terminal block is appended with its duration cut to the
///   remaining years, return parameters unchanged.
///
/// The same seed always yields the same schedule. Sessions that look the
/// schedule up repeatedly should go through
/// [`ScheduleCache`](crate::cache::ScheduleCache) instead of rebuilding.
#[must_use]
pub fn build_schedule(randomize: bool, seed: u64) -> RegimeSchedule {
    if !randomize {
        return RegimeSchedule::canonical();
    }
    let last = CANONICAL_BLOCKS.len() - 1;
    randomized_schedule(&CANONICAL_BLOCKS[..last], &CANONICAL_BLOCKS[last], seed)
}

/// Randomized construction over an arbitrary block set: `body` is shuffled,
/// `terminal` fills any shortfall. Kept separate from [`build_schedule`] so
/// the truncation branch is reachable with custom durations.
pub(crate) fn randomized_schedule(
    body: &[RegimeBlock],
    terminal: &RegimeBlock,
    seed: u64,
) -> RegimeSchedule {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut shuffled = body.to_vec();
    fisher_yates(&mut shuffled, &mut rng);

    let total: usize = shuffled.iter().map(|b| b.duration).sum();
    if total >= HORIZON_YEARS {
        // Keep blocks in shuffled order whenever they still fit. Later
        // blocks may fill what an earlier oversized block could not, but
        // nothing back-fills a gap once every remaining block is too large.
        let mut kept = Vec::with_capacity(shuffled.len());
        let mut covered = 0;
        for b in shuffled {
            if covered + b.duration <= HORIZON_YEARS {
                covered += b.duration;
                kept.push(b);
            }
        }
        if kept.is_empty() {
            // Every block alone overshoots the horizon: degrade to a
            // horizon-length terminal rather than an empty schedule.
            let mut filler = terminal.clone();
            filler.duration = HORIZON_YEARS;
            kept.push(filler);
        }
        RegimeSchedule::from_validated(kept)
    } else {
        let mut kept = shuffled;
        let mut filler = terminal.clone();
        filler.duration = HORIZON_YEARS - total;
        kept.push(filler);
        RegimeSchedule::from_validated(kept)
    }
}

/// Seeded Fisher-Yates permutation, written out explicitly so the same seed
/// reproduces the same ordering independent of `rand`'s shuffle internals.
fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
