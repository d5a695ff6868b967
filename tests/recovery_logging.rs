//! Fail-open recovery must leave a `warn` trace even with metrics disabled.
//!
//! Runs as its own test binary so it can install a capturing logger.

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use storefront_state::backend::{InMemoryBackend, StorageBackend};
use storefront_state::catalog::{CatalogProvider, InMemoryCatalog};
use storefront_state::persistence::encode_collection;
use storefront_state::{CollectionManager, Error, Product, StoreConfig};

struct CaptureLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

fn install() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

fn warned_about(key: &str) -> bool {
    let records = LOGGER.records.lock().unwrap_or_else(|e| e.into_inner());
    records
        .iter()
        .any(|(level, msg)| *level == Level::Warn && msg.contains(key))
}

/// Backend whose reads always fail.
struct UnreadableBackend;

impl StorageBackend for UnreadableBackend {
    fn get(&self, _key: &str) -> storefront_state::Result<Option<Vec<u8>>> {
        Err(Error::BackendError("storage disabled".to_string()))
    }

    fn set(&self, _key: &str, _value: Vec<u8>) -> storefront_state::Result<()> {
        Ok(())
    }

    fn delete(&self, _key: &str) -> storefront_state::Result<()> {
        Ok(())
    }
}

#[test]
fn test_corrupt_data_warns_without_metrics() {
    install();
    let backend = InMemoryBackend::new();
    backend.set("corrupt:cart", b"{not json".to_vec()).unwrap();

    let store = CollectionManager::builder(InMemoryCatalog::seeded(), backend)
        .with_config(StoreConfig::default().with_key_prefix("corrupt"))
        .build()
        .unwrap();

    assert!(store.cart().is_empty());
    assert!(warned_about("corrupt:cart"));
}

#[test]
fn test_unreadable_store_warns() {
    install();
    let store = CollectionManager::builder(InMemoryCatalog::seeded(), UnreadableBackend)
        .with_config(StoreConfig::default().with_key_prefix("unreadable"))
        .build()
        .unwrap();

    assert_eq!(store.wishlist_count(), 0);
    assert!(warned_about("unreadable:wishlist"));
}

#[test]
fn test_oversized_compare_warns_through_default_constructor() {
    install();
    let backend = InMemoryBackend::new();
    let five: Vec<Product> = InMemoryCatalog::seeded().list_all()[..5].to_vec();
    backend
        .set("compare", encode_collection(&five).unwrap())
        .unwrap();

    let store = CollectionManager::new(InMemoryCatalog::seeded(), backend);

    assert_eq!(store.compare_count(), 0);
    assert!(warned_about("compare limit"));
}
