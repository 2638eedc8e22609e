//! Withdrawal-rate x equity-ratio response surface.
//!
//! The sweep evaluates one Monte Carlo batch per point of a 2-D grid. Cells
//! share no mutable state, so the whole sweep is a parallel map followed by
//! a pivot into display tables.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{GridCell, GridMetric, RegimeSchedule, SimulationParams};
use crate::parallel::par_map;
use crate::simulation::run_batch;

/// Base seed for grid sweeps, deliberately distinct from
/// [`DEFAULT_BASE_SEED`](crate::simulation::DEFAULT_BASE_SEED) so grid
/// results are reproducible regardless of what ran before. Every cell uses
/// the same seed: with common random draws per `path_id`, differences
/// between cells reflect parameters rather than sampling noise.
pub const GRID_BASE_SEED: u64 = 100;

/// The two ordered axes of a grid sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Row axis.
    pub withdrawal_rates: Vec<f64>,
    /// Column axis.
    pub equity_ratios: Vec<f64>,
}

impl GridSpec {
    /// The standard dashboard sweep: withdrawal rates 2.0% to 5.5% by half
    /// a point, equity ratios 0% to 90% by ten points.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            withdrawal_rates: (0..8).map(|i| 0.02 + 0.005 * i as f64).collect(),
            equity_ratios: (0..10).map(|i| 0.1 * i as f64).collect(),
        }
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard()
    }
}

/// Evaluate a batch at every (withdrawal rate, equity ratio) pair on the
/// grid. `base` supplies the initial asset and horizon; its rate and ratio
/// are overridden per cell.
///
/// Returns exactly one tagged cell per pair, in row-major order over the
/// spec's axes. Cells are fully independent and evaluated in parallel when
/// the `parallel` feature is enabled; callers should look results up by the
/// coordinate tag, not by position.
pub fn run_grid(
    spec: &GridSpec,
    base: &SimulationParams,
    n_paths: usize,
    schedule: &RegimeSchedule,
) -> Result<Vec<GridCell>, EngineError> {
    let pairs: Vec<(f64, f64)> = spec
        .withdrawal_rates
        .iter()
        .flat_map(|&wr| spec.equity_ratios.iter().map(move |&er| (wr, er)))
        .collect();

    let cells = par_map(pairs, |(withdrawal_rate, equity_ratio)| {
        let params = SimulationParams {
            withdrawal_rate,
            equity_ratio,
            ..*base
        };
        run_batch(&params, n_paths, GRID_BASE_SEED, schedule).map(|summary| GridCell {
            withdrawal_rate,
            equity_ratio,
            summary,
        })
    });
    cells.into_iter().collect()
}

/// One grid metric pivoted into a dense 2-D table: withdrawal rates down
/// the rows, equity ratios across the columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridTable {
    pub metric: GridMetric,
    pub withdrawal_rates: Vec<f64>,
    pub equity_ratios: Vec<f64>,
    /// `values[row][col]`; `None` where the metric's population was empty.
    pub values: Vec<Vec<Option<f64>>>,
}

/// Pivot sweep cells into a heatmap-ready table for one metric.
///
/// Axes are recovered from the cells' coordinate tags and sorted ascending,
/// so any cell ordering pivots to the same table.
#[must_use]
pub fn pivot_grid(cells: &[GridCell], metric: GridMetric) -> GridTable {
    let withdrawal_rates = sorted_unique(cells.iter().map(|c| c.withdrawal_rate));
    let equity_ratios = sorted_unique(cells.iter().map(|c| c.equity_ratio));

    let mut values = vec![vec![None; equity_ratios.len()]; withdrawal_rates.len()];
    for cell in cells {
        let row = position(&withdrawal_rates, cell.withdrawal_rate);
        let col = position(&equity_ratios, cell.equity_ratio);
        if let (Some(row), Some(col)) = (row, col) {
            values[row][col] = cell.summary.metric(metric);
        }
    }

    GridTable {
        metric,
        withdrawal_rates,
        equity_ratios,
        values,
    }
}

fn sorted_unique(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.collect();
    out.sort_unstable_by(f64::total_cmp);
    // Coordinates are exact copies of the axis values, so bitwise dedup is
    // enough.
    out.dedup_by(|a, b| a.total_cmp(b).is_eq());
    out
}

fn position(axis: &[f64], value: f64) -> Option<usize> {
    axis.iter().position(|v| v.total_cmp(&value).is_eq())
}
