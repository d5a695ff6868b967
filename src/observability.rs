//! Observability hooks for persistence traffic.
//!
//! Implement [`StoreMetrics`] to feed load/save/recovery events into a
//! monitoring system:
//!
//! ```ignore
//! use storefront_state::observability::StoreMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl StoreMetrics for PrometheusMetrics {
//!     fn record_corrupt(&self, _key: &str, _reason: &str) {
//!         // counter!("storefront_corrupt_collections").inc();
//!     }
//!     // ... override the other hooks as needed
//! }
//!
//! // let manager = CollectionManager::builder(catalog, backend)
//! //     .with_metrics(Box::new(PrometheusMetrics))
//! //     .build()?;
//! ```
//!
//! Every hook has a default body that logs at `debug` level, so an empty
//! `impl StoreMetrics for X {}` already traces store traffic.
//! [`NoOpMetrics`] overrides them all to do nothing. Recovery from corrupt
//! or unreadable data is logged at `warn` by the store itself, whatever
//! metrics are installed.

use std::time::Duration;

/// Trait for collection store metrics collection.
pub trait StoreMetrics: Send + Sync {
    /// Record a collection restored from storage.
    fn record_load(&self, key: &str, entries: usize) {
        debug!("Store LOAD: {} -> {} entries", key, entries);
    }

    /// Record a collection written to storage.
    fn record_save(&self, key: &str, bytes: usize, duration: Duration) {
        debug!("Store SAVE: {} ({} bytes) took {:?}", key, bytes, duration);
    }

    /// Record stored data discarded as unreadable.
    fn record_corrupt(&self, key: &str, reason: &str) {
        debug!("Store CORRUPT: {} reset to empty: {}", key, reason);
    }

    /// Record a mutation rejected by a collection rule.
    fn record_rejected(&self, key: &str) {
        debug!("Store REJECTED: {}", key);
    }

    /// Record an error.
    fn record_error(&self, key: &str, error: &str) {
        debug!("Store ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl StoreMetrics for NoOpMetrics {
    fn record_load(&self, _key: &str, _entries: usize) {}
    fn record_save(&self, _key: &str, _bytes: usize, _duration: Duration) {}
    fn record_corrupt(&self, _key: &str, _reason: &str) {}
    fn record_rejected(&self, _key: &str) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

/// Metrics that only log, using the trait's default bodies.
#[derive(Clone, Default)]
pub struct LogMetrics;

impl StoreMetrics for LogMetrics {}
