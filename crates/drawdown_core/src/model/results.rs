//! Simulation outputs: per-path outcomes, batch summaries, and grid cells.

use serde::{Deserialize, Serialize};

/// Outcome of one simulated trajectory.
///
/// A path either survives the full horizon or depletes partway through. The
/// two cases carry disjoint payloads, so "exactly one of annualized return /
/// bankruptcy year" holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum PathOutcome {
    /// The portfolio lasted the full horizon.
    Survived {
        /// Portfolio value after the final year.
        ending_asset: f64,
        /// Realized annualized return, `(final / initial)^(1/years) - 1`.
        annualized_return: f64,
    },
    /// The portfolio hit zero before the horizon ended.
    Depleted {
        /// 1-indexed year in which the post-withdrawal balance first went
        /// non-positive.
        bankruptcy_year: usize,
        /// Internal rate of return reconstructed from the realized
        /// withdrawal stream. `None` when no full year completed or the
        /// root-finder found no real rate; both are reportable outcomes,
        /// not errors.
        internal_rate_of_return: Option<f64>,
    },
}

impl PathOutcome {
    /// Final portfolio value; zero for depleted paths.
    #[must_use]
    pub fn ending_asset(&self) -> f64 {
        match self {
            PathOutcome::Survived { ending_asset, .. } => *ending_asset,
            PathOutcome::Depleted { .. } => 0.0,
        }
    }

    #[must_use]
    pub fn bankruptcy_year(&self) -> Option<usize> {
        match self {
            PathOutcome::Survived { .. } => None,
            PathOutcome::Depleted {
                bankruptcy_year, ..
            } => Some(*bankruptcy_year),
        }
    }

    #[must_use]
    pub fn annualized_return(&self) -> Option<f64> {
        match self {
            PathOutcome::Survived {
                annualized_return, ..
            } => Some(*annualized_return),
            PathOutcome::Depleted { .. } => None,
        }
    }

    #[must_use]
    pub fn internal_rate_of_return(&self) -> Option<f64> {
        match self {
            PathOutcome::Survived { .. } => None,
            PathOutcome::Depleted {
                internal_rate_of_return,
                ..
            } => *internal_rate_of_return,
        }
    }

    #[must_use]
    pub fn survived(&self) -> bool {
        matches!(self, PathOutcome::Survived { .. })
    }
}

/// Quartile spread of ending assets among surviving paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndingAssetStats {
    pub median: f64,
    /// 25th percentile.
    pub lower_quartile: f64,
    /// 75th percentile.
    pub upper_quartile: f64,
}

/// Aggregate over one batch of paths for a single
/// (withdrawal rate, equity ratio) combination.
///
/// The two vectors are sorted ascending so the aggregation is a pure
/// multiset reduction: any evaluation order of the underlying paths yields
/// an identical summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of paths simulated.
    pub paths: usize,
    /// Paths that survived the full horizon.
    pub successes: usize,
    /// Paths that depleted before the horizon ended.
    pub failures: usize,
    pub success_rate: f64,
    /// Ending-asset quartiles among survivors; `None` when every path
    /// depleted.
    pub ending_assets: Option<EndingAssetStats>,
    /// Mean 1-indexed bankruptcy year among depleted paths.
    pub mean_bankruptcy_year: Option<f64>,
    /// Median 1-indexed bankruptcy year among depleted paths.
    pub median_bankruptcy_year: Option<f64>,
    /// Survivors' annualized returns, histogram-ready.
    pub annualized_returns: Vec<f64>,
    /// Depleted paths' reconstructed IRRs; paths whose IRR is undefined are
    /// omitted.
    pub depletion_irrs: Vec<f64>,
}

impl RunSummary {
    /// Extract a single heatmap metric; `None` when the metric's underlying
    /// population (survivors or failures) is empty.
    #[must_use]
    pub fn metric(&self, metric: GridMetric) -> Option<f64> {
        match metric {
            GridMetric::SuccessRate => Some(self.success_rate),
            GridMetric::TopQuartileEndingAsset => {
                self.ending_assets.map(|s| s.upper_quartile)
            }
            GridMetric::BottomQuartileEndingAsset => {
                self.ending_assets.map(|s| s.lower_quartile)
            }
            GridMetric::MedianBankruptcyYear => self.median_bankruptcy_year,
        }
    }
}

/// A run summary tagged with its grid coordinates. Callers look cells up by
/// the tag, never by completion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub withdrawal_rate: f64,
    pub equity_ratio: f64,
    pub summary: RunSummary,
}

/// Heatmap-ready metrics derivable from a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridMetric {
    SuccessRate,
    TopQuartileEndingAsset,
    BottomQuartileEndingAsset,
    MedianBankruptcyYear,
}

impl GridMetric {
    /// Display label for table and chart titles.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::SuccessRate => "Success Rate",
            Self::TopQuartileEndingAsset => "Top 25% Median Ending Asset",
            Self::BottomQuartileEndingAsset => "Bottom 25% Median Ending Asset",
            Self::MedianBankruptcyYear => "Median Bankruptcy Year",
        }
    }
}
