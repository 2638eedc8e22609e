//! Retirement withdrawal Monte Carlo engine
//!
//! This crate estimates the probability that a portfolio survives a fixed
//! withdrawal schedule over a multi-decade horizon under stochastic market
//! returns, and characterizes the distribution of outcomes: terminal
//! wealth, time to depletion, and the implied rate of return of failed
//! paths. It supports:
//! - A piecewise market-regime schedule, in canonical order or in a
//!   seeded-random order normalized to the 30-year horizon
//! - Per-path evolution of equity/bond sub-balances with yearly rebalancing
//!   to a fixed equity ratio
//! - Depletion detection with retroactive IRR reconstruction from the
//!   realized withdrawal stream
//! - Batch aggregation into summary statistics and a withdrawal-rate x
//!   equity-ratio grid sweep for response-surface tables
//!
//! The withdrawal amount is fixed in nominal terms at
//! `initial_asset * withdrawal_rate` for the whole horizon. It is never
//! recomputed against the current balance and never inflation-adjusted;
//! this is deliberate and differs from "4% rule" variants that re-anchor
//! the withdrawal every year.
//!
//! # Quick start
//!
//! ```ignore
//! use drawdown_core::{DEFAULT_BASE_SEED, SimulationParams, build_schedule, run_batch};
//!
//! let schedule = build_schedule(false, DEFAULT_BASE_SEED);
//! let summary = run_batch(&SimulationParams::default(), 1000, DEFAULT_BASE_SEED, &schedule)?;
//! println!("success rate: {:.1}%", summary.success_rate * 100.0);
//! ```
//!
//! The engine is pure computation over in-memory parameters: no I/O, no
//! shared mutable state, no cooperative suspension. Paths and grid cells
//! are data-parallel and run on a worker pool when the default `parallel`
//! feature is enabled.

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod cache;
pub mod error;
pub mod irr;
pub mod simulation;
pub mod stats;
pub mod sweep;

mod parallel;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use cache::ScheduleCache;
pub use error::EngineError;
pub use model::{
    EndingAssetStats, GridCell, GridMetric, HORIZON_YEARS, PathOutcome, RegimeBlock,
    RegimeParams, RegimeSchedule, RunSummary, SimulationParams, build_schedule,
};
pub use simulation::{DEFAULT_BASE_SEED, run_batch, simulate_path, summarize};
pub use sweep::{GRID_BASE_SEED, GridSpec, GridTable, pivot_grid, run_grid};
