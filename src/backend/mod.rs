//! Key/value byte stores backing the persisted collections.

use crate::error::Result;

#[cfg(feature = "file")]
pub mod file;
pub mod inmemory;

#[cfg(feature = "file")]
pub use file::FileBackend;
pub use inmemory::InMemoryBackend;

/// Trait for byte store implementations.
///
/// Abstracts the browser-local store (or whatever plays its part), allowing
/// swappable backends. Implementations: InMemory (default), File.
///
/// All methods use `&self`; implementations use interior mutability so a
/// backend handle can be cloned and shared. A single `set` must replace
/// the whole value for its key or leave the old one in place.
pub trait StorageBackend: Send + Sync {
    /// Retrieve the value stored under `key`.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value found
    /// - `Ok(None)` - Nothing stored under this key
    ///
    /// # Errors
    /// Returns `Err` if the store cannot be read
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    /// Returns `Err` if the store cannot be written
    fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove the value stored under `key`.
    ///
    /// # Errors
    /// Returns `Err` if the store cannot be written
    fn delete(&self, key: &str) -> Result<()>;

    /// Check if key exists (optional optimization).
    ///
    /// # Errors
    /// Returns `Err` if the store cannot be read
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Health check - verify the store is accessible.
    ///
    /// # Errors
    /// Returns `Err` if the store is not accessible
    fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Optional: Remove every key (use with caution).
    ///
    /// # Errors
    /// Returns `Err` if operation is not implemented or fails
    fn clear_all(&self) -> Result<()> {
        Err(crate::error::Error::NotImplemented(
            "clear_all not implemented for this backend".to_string(),
        ))
    }
}

impl<B: StorageBackend + ?Sized> StorageBackend for std::sync::Arc<B> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key)
    }

    fn health_check(&self) -> Result<bool> {
        (**self).health_check()
    }

    fn clear_all(&self) -> Result<()> {
        (**self).clear_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_backend_exists_default() {
        let backend = InMemoryBackend::new();
        backend
            .set("cart", b"[]".to_vec())
            .expect("Failed to set key");
        assert!(backend.exists("cart").expect("Failed to check exists"));
        assert!(!backend
            .exists("compare")
            .expect("Failed to check exists"));
    }

    #[test]
    fn test_arc_backend_forwards() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.set("wishlist", b"[]".to_vec()).expect("Failed to set");

        let shared: Arc<dyn StorageBackend> = backend.clone();
        assert_eq!(
            shared.get("wishlist").expect("Failed to get"),
            Some(b"[]".to_vec())
        );
    }
}
