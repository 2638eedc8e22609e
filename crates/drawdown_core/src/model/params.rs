use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::regime::HORIZON_YEARS;

/// Inputs for one simulated trajectory, shared by every path in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Starting portfolio value.
    pub initial_asset: f64,
    /// Fraction of the initial balance withdrawn every year.
    ///
    /// The nominal withdrawal amount is locked in at year 0 as
    /// `initial_asset * withdrawal_rate`. It is never recomputed against the
    /// current balance and never inflation-adjusted, unlike "4% rule"
    /// variants that re-anchor the withdrawal annually.
    pub withdrawal_rate: f64,
    /// Horizon in years.
    pub years: usize,
    /// Fraction of the portfolio held in equities, rebalanced back to this
    /// ratio every year; the remainder is held in bonds.
    pub equity_ratio: f64,
}

impl SimulationParams {
    /// Parameters over the standard 30-year horizon.
    #[must_use]
    pub fn new(initial_asset: f64, withdrawal_rate: f64, equity_ratio: f64) -> Self {
        Self {
            initial_asset,
            withdrawal_rate,
            years: HORIZON_YEARS,
            equity_ratio,
        }
    }

    /// Reject parameter combinations outside the engine's domain before any
    /// numeric work happens. The presentation layer constrains its sliders
    /// more tightly; this is the engine's own boundary.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.initial_asset.is_finite() && self.initial_asset > 0.0) {
            return Err(EngineError::InvalidParameter {
                name: "initial_asset",
                value: self.initial_asset,
                reason: "must be positive and finite",
            });
        }
        if !(self.withdrawal_rate.is_finite() && self.withdrawal_rate >= 0.0) {
            return Err(EngineError::InvalidParameter {
                name: "withdrawal_rate",
                value: self.withdrawal_rate,
                reason: "must be non-negative and finite",
            });
        }
        if self.years == 0 {
            return Err(EngineError::InvalidParameter {
                name: "years",
                value: 0.0,
                reason: "horizon must be at least one year",
            });
        }
        if !(self.equity_ratio.is_finite() && (0.0..=1.0).contains(&self.equity_ratio)) {
            return Err(EngineError::InvalidParameter {
                name: "equity_ratio",
                value: self.equity_ratio,
                reason: "must lie in [0, 1]",
            });
        }
        Ok(())
    }
}

impl Default for SimulationParams {
    /// The dashboard's default scenario: 1000 starting units, 4% withdrawal,
    /// 70/30 equity/bond split, 30 years.
    fn default() -> Self {
        Self::new(1000.0, 0.04, 0.7)
    }
}
