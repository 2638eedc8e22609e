//! Path simulation and Monte Carlo batch aggregation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::EngineError;
use crate::irr::withdrawal_stream_irr;
use crate::model::{
    EndingAssetStats, PathOutcome, RegimeSchedule, RunSummary, SimulationParams,
};
use crate::parallel::par_map;
use crate::stats;

/// Base seed for single-scenario runs. Grid sweeps use
/// [`GRID_BASE_SEED`](crate::sweep::GRID_BASE_SEED) instead so their results
/// do not depend on whether a single run came first.
pub const DEFAULT_BASE_SEED: u64 = 42;

/// Simulate one stochastic trajectory.
///
/// The path's random stream derives from `base_seed + path_id`: every
/// `(base_seed, path_id)` pair is individually reproducible and distinct
/// pairs are statistically independent, which lets a grid sweep reuse
/// `path_id in [0, n)` across every cell.
///
/// Each year draws independent normal returns for the equity and bond
/// sub-balances from the regime in effect, compounds them, subtracts the
/// fixed withdrawal, and rebalances to the target split. A non-positive
/// post-withdrawal balance depletes the path; otherwise the year's
/// percentage change is recorded and feeds the IRR reconstruction if the
/// path later depletes.
pub fn simulate_path(
    params: &SimulationParams,
    path_id: u64,
    base_seed: u64,
    schedule: &RegimeSchedule,
) -> Result<PathOutcome, EngineError> {
    params.validate()?;
    run_path(params, path_id, base_seed, schedule)
}

/// Path body shared with [`run_batch`], which validates once per batch.
fn run_path(
    params: &SimulationParams,
    path_id: u64,
    base_seed: u64,
    schedule: &RegimeSchedule,
) -> Result<PathOutcome, EngineError> {
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(path_id));

    let annual_withdrawal = params.initial_asset * params.withdrawal_rate;
    let mut equity = params.initial_asset * params.equity_ratio;
    let mut bond = params.initial_asset * (1.0 - params.equity_ratio);

    let mut previous_total: Option<f64> = None;
    // Year-over-year changes completed so far. Only the count matters: the
    // IRR stream carries one withdrawal per completed change.
    let mut completed_changes = 0usize;

    for year in 0..params.years {
        let regime = schedule.params_at(year);
        let equity_return =
            draw_return(&mut rng, "equity", regime.equity_mean, regime.equity_std)?;
        let bond_return = draw_return(&mut rng, "bond", regime.bond_mean, regime.bond_std)?;

        equity *= 1.0 + equity_return;
        bond *= 1.0 + bond_return;
        let total = equity + bond - annual_withdrawal;

        if total <= 0.0 {
            return Ok(PathOutcome::Depleted {
                bankruptcy_year: year + 1,
                internal_rate_of_return: withdrawal_stream_irr(
                    params.initial_asset,
                    annual_withdrawal,
                    completed_changes,
                ),
            });
        }

        if previous_total.is_some() {
            completed_changes += 1;
        }
        previous_total = Some(total);

        // Rebalance to the target split for next year's compounding.
        equity = total * params.equity_ratio;
        bond = total * (1.0 - params.equity_ratio);
    }

    let ending_asset = equity + bond;
    let annualized_return =
        (ending_asset / params.initial_asset).powf(1.0 / params.years as f64) - 1.0;
    Ok(PathOutcome::Survived {
        ending_asset,
        annualized_return,
    })
}

fn draw_return<R: Rng + ?Sized>(
    rng: &mut R,
    asset: &'static str,
    mean: f64,
    std_dev: f64,
) -> Result<f64, EngineError> {
    Normal::new(mean, std_dev)
        .map(|d| d.sample(rng))
        .map_err(|_| EngineError::InvalidDistributionParameters {
            asset,
            mean,
            std_dev,
        })
}

/// Run `n_paths` independent trajectories for one parameter combination and
/// aggregate them into a [`RunSummary`].
///
/// Paths are evaluated in parallel when the `parallel` feature is enabled.
/// The reduction is a pure multiset fold, so evaluation order never changes
/// the summary.
pub fn run_batch(
    params: &SimulationParams,
    n_paths: usize,
    base_seed: u64,
    schedule: &RegimeSchedule,
) -> Result<RunSummary, EngineError> {
    params.validate()?;
    if n_paths == 0 {
        return Err(EngineError::InvalidParameter {
            name: "n_paths",
            value: 0.0,
            reason: "at least one path is required",
        });
    }

    let path_ids: Vec<u64> = (0..n_paths as u64).collect();
    let outcomes = par_map(path_ids, |path_id| {
        run_path(params, path_id, base_seed, schedule)
    });
    let outcomes: Vec<PathOutcome> = outcomes.into_iter().collect::<Result<_, _>>()?;
    Ok(summarize(&outcomes))
}

/// Reduce a batch of path outcomes to summary statistics.
///
/// Order-independent: any permutation of `outcomes` produces an identical
/// summary, which is what makes concurrent path evaluation safe.
#[must_use]
pub fn summarize(outcomes: &[PathOutcome]) -> RunSummary {
    let mut ending_assets = Vec::new();
    let mut annualized_returns = Vec::new();
    let mut bankruptcy_years = Vec::new();
    let mut depletion_irrs = Vec::new();

    for outcome in outcomes {
        match outcome {
            PathOutcome::Survived {
                ending_asset,
                annualized_return,
            } => {
                ending_assets.push(*ending_asset);
                annualized_returns.push(*annualized_return);
            }
            PathOutcome::Depleted {
                bankruptcy_year,
                internal_rate_of_return,
            } => {
                bankruptcy_years.push(*bankruptcy_year as f64);
                if let Some(irr) = internal_rate_of_return {
                    depletion_irrs.push(*irr);
                }
            }
        }
    }

    let paths = outcomes.len();
    let successes = annualized_returns.len();
    let failures = bankruptcy_years.len();
    // Canonical ordering makes every downstream fold permutation-invariant,
    // including the floating-point mean.
    annualized_returns.sort_unstable_by(f64::total_cmp);
    depletion_irrs.sort_unstable_by(f64::total_cmp);
    bankruptcy_years.sort_unstable_by(f64::total_cmp);

    RunSummary {
        paths,
        successes,
        failures,
        success_rate: if paths == 0 {
            0.0
        } else {
            successes as f64 / paths as f64
        },
        ending_assets: ending_asset_quartiles(&ending_assets),
        mean_bankruptcy_year: stats::mean(&bankruptcy_years),
        median_bankruptcy_year: stats::median(&bankruptcy_years),
        annualized_returns,
        depletion_irrs,
    }
}

fn ending_asset_quartiles(ending_assets: &[f64]) -> Option<EndingAssetStats> {
    Some(EndingAssetStats {
        median: stats::percentile(ending_assets, 50.0)?,
        lower_quartile: stats::percentile(ending_assets, 25.0)?,
        upper_quartile: stats::percentile(ending_assets, 75.0)?,
    })
}
