//! # storefront-state
//!
//! Client-side state for a fashion storefront: the shopper's cart, wishlist
//! and compare collections, restored from a local byte store on startup and
//! written through on every change.
//!
//! ## Features
//!
//! - **Three collections:** cart lines with quantity and size, a wishlist,
//!   and a compare set capped at four products
//! - **Fail-open restore:** missing or corrupt stored data starts empty
//!   instead of failing
//! - **Browser-compatible layout:** one JSON array per key (`cart`,
//!   `wishlist`, `compare`), readable by the web page that shares the store
//! - **Pluggable storage:** in-memory and file backends, or implement
//!   [`StorageBackend`]
//! - **Presentation sync:** subscribe a [`CollectionFeed`] to receive badge
//!   counts and toast notices after every change
//!
//! ## Quick Start
//!
//! ```
//! use storefront_state::{
//!     backend::InMemoryBackend,
//!     catalog::InMemoryCatalog,
//!     feed::RecordingFeed,
//!     product::ProductId,
//!     CollectionManager,
//! };
//!
//! # fn main() -> storefront_state::Result<()> {
//! let feed = RecordingFeed::new();
//! let mut store = CollectionManager::builder(InMemoryCatalog::seeded(), InMemoryBackend::new())
//!     .with_feed(Box::new(feed.clone()))
//!     .build()?;
//!
//! store.add_to_cart(ProductId(1));
//! store.toggle_wishlist(ProductId(5));
//! store.toggle_compare(ProductId(3))?;
//!
//! assert_eq!(store.counts().cart, 1);
//! assert_eq!(feed.notices().last().map(|n| n.message.as_str()), Some("📈 Added to comparison"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Keeping state across restarts
//!
//! ```no_run
//! use storefront_state::{backend::FileBackend, catalog::InMemoryCatalog, CollectionManager};
//!
//! # fn main() -> storefront_state::Result<()> {
//! let backend = FileBackend::open("/var/lib/storefront")?;
//! let store = CollectionManager::new(InMemoryCatalog::seeded(), backend);
//! println!("{} items in cart", store.cart_count());
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod catalog;
pub mod collection;
pub mod error;
pub mod feed;
pub mod key;
pub mod manager;
pub mod observability;
pub mod outcome;
pub mod persistence;
pub mod product;
pub mod storefront;

// Re-exports for convenience
pub use backend::StorageBackend;
pub use catalog::CatalogProvider;
pub use collection::{Collection, CollectionEntry};
pub use error::{Error, Result};
pub use feed::{CollectionFeed, Notice};
pub use key::CollectionKind;
pub use manager::{CollectionManager, ManagerBuilder, StoreConfig, COMPARE_LIMIT};
pub use outcome::{Change, Mutation};
pub use product::{CartLine, Product, ProductId};
pub use storefront::{Action, Storefront};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
