//! Memoized schedule construction.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::model::{RegimeSchedule, build_schedule};

/// Memoizes [`build_schedule`] per `(randomize, seed)` key.
///
/// Schedules are deterministic in their key and shared read-only across
/// every path, so a session builds each at most once and hands out cheap
/// `Arc` clones on repeated lookups. The cache is owned by the caller;
/// nothing here is global.
#[derive(Debug, Default)]
pub struct ScheduleCache {
    entries: FxHashMap<(bool, u64), Arc<RegimeSchedule>>,
}

impl ScheduleCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the schedule for `(randomize, seed)`, building it on first use.
    pub fn get_or_build(&mut self, randomize: bool, seed: u64) -> Arc<RegimeSchedule> {
        Arc::clone(
            self.entries
                .entry((randomize, seed))
                .or_insert_with(|| Arc::new(build_schedule(randomize, seed))),
        )
    }

    /// Number of distinct schedules built so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
