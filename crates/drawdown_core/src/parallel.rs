//! Parallel map over independent work items.
//!
//! Paths within a batch and cells within a sweep share no mutable state, so
//! both reduce to mapping a pure function over a list of inputs. This map
//! is the one place the crate touches a concurrency primitive; the engine
//! proper stays single-threaded by construction, and builds without the
//! `parallel` feature fall back to a plain sequential map.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Map `op` over `items`. Output order matches input order in both builds,
/// so callers never observe scheduling.
pub(crate) fn par_map<T, U, F>(items: Vec<T>, op: F) -> Vec<U>
where
    T: Send,
    U: Send,
    F: Fn(T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    let mapped = items.into_par_iter().map(op).collect();
    #[cfg(not(feature = "parallel"))]
    let mapped = items.into_iter().map(op).collect();
    mapped
}
