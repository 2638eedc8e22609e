//! Integration tests for the withdrawal simulation engine
//!
//! Tests are organized by topic:
//! - `schedule` - Regime schedule construction and lookup
//! - `paths` - Single-path simulation semantics
//! - `batch` - Monte Carlo batch aggregation
//! - `grid` - Grid sweep and pivoting

mod schedule;
