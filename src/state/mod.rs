//! State module for tracking crawl progress
//!
//! This module provides the concurrency-safe bookkeeping of a crawl.
//!
//! # Components
//!
//! - `UrlRegistry`: found/fetched/skipped tables; guarantees at-most-once fetch
//! - `ExternalClassifier`: site membership plus external hosts and links
//! - `ResultStore`: page records for post-crawl reporting

mod external;
mod registry;
mod results;

// Re-export main types
pub use external::ExternalClassifier;
pub use registry::{SkipReason, UrlRegistry};
pub use results::{PageRecord, ResponseInfo, ResultStore};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a table, recovering the data if a holder panicked
///
/// Every critical section is a single map operation, so a poisoned table
/// is still consistent.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
