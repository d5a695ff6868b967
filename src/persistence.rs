//! Persisting collections to a byte store.
//!
//! Each collection is stored as one JSON array under its own key, the same
//! layout a browser page writes with `localStorage.setItem("cart", ...)`:
//!
//! ```text
//! cart     -> [{"id":2,"name":"…","price":8990,…,"quantity":2,"selectedSize":"36"}]
//! wishlist -> [{"id":5,"name":"…","price":3490,"oldPrice":4990,…}]
//! compare  -> []
//! ```
//!
//! There is no envelope and no schema version. Instead, loading is
//! fail-open: absent data, bytes that do not parse, a value that is not an
//! array, or entries that break a collection rule all come back as an
//! empty collection. Broken local state must never take the page down.
//!
//! # Example
//!
//! ```rust
//! use storefront_state::persistence::{decode_collection, encode_collection};
//!
//! # fn main() -> storefront_state::Result<()> {
//! let bytes = encode_collection(&[1u32, 2, 3])?;
//! assert_eq!(bytes, b"[1,2,3]");
//!
//! let back: Vec<u32> = decode_collection(&bytes)?;
//! assert_eq!(back, vec![1, 2, 3]);
//! # Ok(())
//! # }
//! ```

use crate::backend::StorageBackend;
use crate::collection::{Collection, CollectionEntry};
use crate::error::{Error, Result};
use crate::key::{CollectionKind, StorageKeyBuilder};
use crate::observability::{NoOpMetrics, StoreMetrics};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;

/// Serialize a full collection for storage.
///
/// # Errors
///
/// Returns `Error::SerializationError` if JSON encoding fails.
pub fn encode_collection<T: Serialize>(entries: &[T]) -> Result<Vec<u8>> {
    serde_json::to_vec(entries).map_err(|e| {
        error!("Collection serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Strictly decode stored collection bytes.
///
/// # Errors
///
/// Returns `Error::DeserializationError` if the bytes are not JSON, are
/// not an array, or an element does not match the entry shape.
pub fn decode_collection<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    serde_json::from_slice(bytes).map_err(|e| Error::DeserializationError(e.to_string()))
}

/// Reads and writes whole collections against a [`StorageBackend`].
pub struct CollectionStore<B: StorageBackend> {
    backend: B,
    prefix: Option<String>,
    metrics: Box<dyn StoreMetrics>,
}

impl<B: StorageBackend> CollectionStore<B> {
    pub fn new(backend: B) -> Self {
        CollectionStore {
            backend,
            prefix: None,
            metrics: Box::new(NoOpMetrics),
        }
    }

    /// Namespace every key as `"{prefix}:{collection}"`.
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn StoreMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn metrics(&self) -> &dyn StoreMetrics {
        self.metrics.as_ref()
    }

    /// Storage key for a collection under this store's prefix.
    pub fn key(&self, kind: CollectionKind) -> String {
        StorageKeyBuilder::build(self.prefix.as_deref(), kind)
    }

    /// Restore a collection, falling back to empty on any problem.
    ///
    /// Never fails. Backend read errors and corrupt data are logged at
    /// `warn` level and reported to metrics, then yield an empty collection.
    pub fn load<T: CollectionEntry>(&self, kind: CollectionKind) -> Collection<T> {
        let key = self.key(kind);

        let bytes = match self.backend.get(&key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("No stored {} under {}, starting empty", kind, key);
                self.metrics.record_load(&key, 0);
                return Collection::new(kind);
            }
            Err(e) => {
                warn!("Could not read {}, starting empty: {}", key, e);
                self.metrics.record_error(&key, &e.to_string());
                return Collection::new(kind);
            }
        };

        let restored = decode_collection::<T>(&bytes)
            .and_then(|entries| Collection::from_entries(kind, entries));

        match restored {
            Ok(collection) => {
                self.metrics.record_load(&key, collection.len());
                collection
            }
            Err(e) => {
                warn!("Stored {} discarded, starting empty: {}", key, e);
                self.metrics.record_corrupt(&key, &e.to_string());
                Collection::new(kind)
            }
        }
    }

    /// Write a full collection, replacing whatever was stored.
    ///
    /// # Errors
    ///
    /// Returns `Error::SerializationError` or `Error::BackendError`.
    pub fn save<T: CollectionEntry>(&self, collection: &Collection<T>) -> Result<()> {
        let key = self.key(collection.kind());
        let timer = Instant::now();

        let bytes = encode_collection(collection.entries())?;
        let len = bytes.len();
        if let Err(e) = self.backend.set(&key, bytes) {
            self.metrics.record_error(&key, &e.to_string());
            return Err(e);
        }

        self.metrics.record_save(&key, len, timer.elapsed());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::catalog::{CatalogProvider, InMemoryCatalog};
    use crate::product::{CartLine, Product, ProductId};

    fn product(id: u32) -> Product {
        InMemoryCatalog::seeded()
            .find_by_id(ProductId(id))
            .expect("seeded product")
    }

    #[test]
    fn test_load_missing_is_empty() {
        let store = CollectionStore::new(InMemoryBackend::new());
        let cart: Collection<CartLine> = store.load(CollectionKind::Cart);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_load_garbage_is_empty() {
        let backend = InMemoryBackend::new();
        backend.set("wishlist", b"{not json".to_vec()).unwrap();

        let store = CollectionStore::new(backend);
        let wishlist: Collection<Product> = store.load(CollectionKind::Wishlist);
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_load_non_array_is_empty() {
        let backend = InMemoryBackend::new();
        backend.set("compare", br#"{"id":1}"#.to_vec()).unwrap();
        backend.set("wishlist", b"null".to_vec()).unwrap();

        let store = CollectionStore::new(backend);
        let compare: Collection<Product> = store.load(CollectionKind::Compare);
        let wishlist: Collection<Product> = store.load(CollectionKind::Wishlist);
        assert!(compare.is_empty());
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_load_rule_violation_is_empty() {
        let mut line = CartLine::new(product(2)).unwrap();
        line.quantity = 0;
        let backend = InMemoryBackend::new();
        backend
            .set("cart", encode_collection(&[line]).unwrap())
            .unwrap();

        let store = CollectionStore::new(backend);
        let cart: Collection<CartLine> = store.load(CollectionKind::Cart);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_order() {
        let store = CollectionStore::new(InMemoryBackend::new());
        let mut wishlist = Collection::new(CollectionKind::Wishlist);
        for id in [5, 1, 7] {
            wishlist.push(product(id));
        }

        store.save(&wishlist).expect("Failed to save");
        let restored: Collection<Product> = store.load(CollectionKind::Wishlist);

        assert_eq!(restored, wishlist);
    }

    #[test]
    fn test_prefixed_keys() {
        let backend = InMemoryBackend::new();
        let store = CollectionStore::new(backend.clone()).with_prefix(Some("eu".to_string()));

        store
            .save(&Collection::<Product>::new(CollectionKind::Compare))
            .unwrap();

        assert!(backend.exists("eu:compare").unwrap());
        assert!(!backend.exists("compare").unwrap());
    }

    #[test]
    fn test_decode_is_strict() {
        let result: Result<Vec<Product>> = decode_collection(b"[{\"id\":1}]");
        assert!(matches!(result, Err(Error::DeserializationError(_))));
    }
}
