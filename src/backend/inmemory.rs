//! In-memory byte store (default, thread-safe).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! Stands in for browser local storage in tests and native hosts that
//! do not need durability across process restarts.

use super::StorageBackend;
use crate::error::Result;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Thread-safe in-memory byte store.
///
/// Cloning shares the underlying map, so a test can keep a handle and
/// inspect what the manager wrote.
///
/// # Example
///
/// ```
/// use storefront_state::backend::{InMemoryBackend, StorageBackend};
///
/// # fn main() -> storefront_state::Result<()> {
/// let backend = InMemoryBackend::new();
/// backend.set("cart", b"[]".to_vec())?;
/// assert_eq!(backend.get("cart")?, Some(b"[]".to_vec()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, Vec<u8>>>,
    writes: Arc<AtomicU64>,
}

impl InMemoryBackend {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get the current number of keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Number of successful `set` calls since creation.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Get memory statistics.
    pub fn stats(&self) -> StoreStats {
        let total_bytes: usize = self.store.iter().map(|entry| entry.value().len()).sum();

        StoreStats {
            total_entries: self.store.len(),
            total_bytes,
            writes: self.write_count(),
        }
    }

    /// Print store statistics to debug log.
    pub fn log_stats(&self) {
        let stats = self.stats();
        debug!(
            "Store Stats: {} entries, {} bytes, {} writes",
            stats.total_entries, stats.total_bytes, stats.writes
        );
    }
}

impl StorageBackend for InMemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.store.get(key) {
            Some(entry) => {
                debug!("✓ InMemory GET {} -> HIT", key);
                Ok(Some(entry.value().clone()))
            }
            None => {
                debug!("✓ InMemory GET {} -> MISS", key);
                Ok(None)
            }
        }
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let len = value.len();
        self.store.insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::Relaxed);
        debug!("✓ InMemory SET {} ({} bytes)", key, len);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.store.remove(key);
        debug!("✓ InMemory DELETE {}", key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.store.contains_key(key))
    }

    fn clear_all(&self) -> Result<()> {
        self.store.clear();
        warn!("⚠ InMemory CLEAR_ALL executed - all collections dropped!");
        Ok(())
    }
}

/// Byte store statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreStats {
    pub total_entries: usize,
    pub total_bytes: usize,
    pub writes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inmemory_backend_set_get() {
        let backend = InMemoryBackend::new();

        backend
            .set("cart", b"[1]".to_vec())
            .expect("Failed to set");

        let result = backend.get("cart").expect("Failed to get");
        assert_eq!(result, Some(b"[1]".to_vec()));
    }

    #[test]
    fn test_inmemory_backend_miss() {
        let backend = InMemoryBackend::new();

        let result = backend.get("wishlist").expect("Failed to get");
        assert_eq!(result, None);
    }

    #[test]
    fn test_inmemory_backend_overwrite() {
        let backend = InMemoryBackend::new();

        backend.set("cart", b"old".to_vec()).expect("Failed to set");
        backend.set("cart", b"new".to_vec()).expect("Failed to set");

        assert_eq!(backend.get("cart").unwrap(), Some(b"new".to_vec()));
        assert_eq!(backend.len(), 1);
        assert_eq!(backend.write_count(), 2);
    }

    #[test]
    fn test_inmemory_backend_delete() {
        let backend = InMemoryBackend::new();

        backend.set("compare", b"[]".to_vec()).expect("Failed to set");
        assert!(backend.exists("compare").expect("Failed to check exists"));

        backend.delete("compare").expect("Failed to delete");
        assert!(!backend.exists("compare").expect("Failed to check exists"));
    }

    #[test]
    fn test_inmemory_backend_clear_all() {
        let backend = InMemoryBackend::new();

        backend.set("cart", b"[]".to_vec()).expect("Failed to set");
        backend.set("wishlist", b"[]".to_vec()).expect("Failed to set");
        assert_eq!(backend.len(), 2);

        backend.clear_all().expect("Failed to clear");

        assert!(backend.is_empty());
    }

    #[test]
    fn test_inmemory_backend_stats() {
        let backend = InMemoryBackend::new();

        backend.set("cart", b"[1,2]".to_vec()).expect("Failed to set");
        backend.set("wishlist", b"[]".to_vec()).expect("Failed to set");

        let stats = backend.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.total_bytes, 7);
        assert_eq!(stats.writes, 2);
    }

    #[test]
    fn test_inmemory_backend_clone_shares_store() {
        let backend1 = InMemoryBackend::new();
        backend1.set("cart", b"[]".to_vec()).expect("Failed to set");

        let backend2 = backend1.clone();

        assert_eq!(backend2.get("cart").unwrap(), Some(b"[]".to_vec()));
        assert_eq!(backend2.write_count(), 1);
    }

    #[test]
    fn test_inmemory_backend_thread_safe() {
        let backend = InMemoryBackend::new();
        let mut handles = vec![];

        for i in 0..10 {
            let b = backend.clone();
            handles.push(std::thread::spawn(move || {
                let key = format!("key_{}", i);
                b.set(&key, vec![i as u8]).expect("Failed to set");
            }));
        }

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(backend.len(), 10);
        assert_eq!(backend.write_count(), 10);
    }
}
