//! Collection manager - owns the cart, wishlist and compare collections.
//!
//! Every mutation follows the same path: resolve the product through the
//! catalog, apply the collection rule, write the whole collection through
//! to storage, recompute the count, then tell every subscribed feed.
//! Calls that end up changing nothing skip the write and the feeds.

use crate::backend::StorageBackend;
use crate::catalog::CatalogProvider;
use crate::collection::{Collection, CollectionEntry};
use crate::error::{Error, Result};
use crate::feed::{CollectionFeed, CountUpdate, Notice};
use crate::key::CollectionKind;
use crate::observability::{NoOpMetrics, StoreMetrics};
use crate::outcome::{Change, Mutation};
use crate::persistence::CollectionStore;
use crate::product::{CartLine, Product, ProductId};

/// Default maximum number of products in the compare collection.
pub const COMPARE_LIMIT: usize = 4;

/// Store-wide configuration.
///
/// # Example
///
/// ```
/// use storefront_state::manager::StoreConfig;
///
/// let config = StoreConfig::default().with_key_prefix("shop-eu");
/// assert_eq!(config.compare_limit, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Namespace for storage keys (`"{prefix}:cart"`).
    ///
    /// `None` keeps the bare `cart` / `wishlist` / `compare` keys the
    /// browser page uses.
    pub key_prefix: Option<String>,

    /// Maximum number of products in the compare collection. Must be ≥ 1.
    pub compare_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            key_prefix: None,
            compare_limit: COMPARE_LIMIT,
        }
    }
}

impl StoreConfig {
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_compare_limit(mut self, limit: usize) -> Self {
        self.compare_limit = limit;
        self
    }

    /// # Errors
    ///
    /// Returns `Error::ConfigError` for a zero compare limit or a prefix
    /// containing `:`.
    pub fn validate(&self) -> Result<()> {
        if self.compare_limit == 0 {
            return Err(Error::ConfigError(
                "compare_limit must be at least 1".to_string(),
            ));
        }
        if let Some(prefix) = &self.key_prefix {
            if prefix.contains(':') {
                return Err(Error::ConfigError(format!(
                    "key prefix {:?} must not contain ':'",
                    prefix
                )));
            }
        }
        Ok(())
    }
}

/// Current badge values for all three collections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    /// Total quantity across cart lines.
    pub cart: usize,
    pub wishlist: usize,
    pub compare: usize,
}

/// Builder for [`CollectionManager`].
pub struct ManagerBuilder<C: CatalogProvider, B: StorageBackend> {
    catalog: C,
    backend: B,
    config: StoreConfig,
    metrics: Box<dyn StoreMetrics>,
    feeds: Vec<Box<dyn CollectionFeed>>,
}

impl<C: CatalogProvider, B: StorageBackend> ManagerBuilder<C, B> {
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn StoreMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Subscribe a feed before the collections are loaded.
    pub fn with_feed(mut self, feed: Box<dyn CollectionFeed>) -> Self {
        self.feeds.push(feed);
        self
    }

    /// Load the three collections and build the manager.
    ///
    /// Loading itself never fails (see [`CollectionStore::load`]); every
    /// subscribed feed receives the restored counts.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the configuration is invalid.
    pub fn build(self) -> Result<CollectionManager<C, B>> {
        self.config.validate()?;

        let store = CollectionStore::new(self.backend)
            .with_prefix(self.config.key_prefix.clone())
            .with_metrics(self.metrics);

        let mut manager = CollectionManager::restore(self.catalog, store, self.config);

        for feed in self.feeds {
            manager.subscribe(feed);
        }

        info!(
            "✓ Collections restored: cart={} wishlist={} compare={}",
            manager.cart_count(),
            manager.wishlist_count(),
            manager.compare_count()
        );
        Ok(manager)
    }
}

/// Owner of the shopper's cart, wishlist and compare collections.
///
/// The manager is a single-writer value: mutators take `&mut self` and run
/// to completion, including the storage write, before returning.
///
/// # Example
///
/// ```
/// use storefront_state::backend::InMemoryBackend;
/// use storefront_state::catalog::InMemoryCatalog;
/// use storefront_state::manager::CollectionManager;
/// use storefront_state::product::ProductId;
///
/// let mut store = CollectionManager::new(InMemoryCatalog::seeded(), InMemoryBackend::new());
///
/// store.add_to_cart(ProductId(2));
/// store.add_to_cart(ProductId(2));
/// assert_eq!(store.cart_count(), 2);
/// assert_eq!(store.cart().len(), 1);
/// ```
pub struct CollectionManager<C: CatalogProvider, B: StorageBackend> {
    catalog: C,
    store: CollectionStore<B>,
    config: StoreConfig,
    cart: Collection<CartLine>,
    wishlist: Collection<Product>,
    compare: Collection<Product>,
    feeds: Vec<Box<dyn CollectionFeed>>,
}

impl<C: CatalogProvider, B: StorageBackend> CollectionManager<C, B> {
    /// Build a manager with default configuration and no metrics.
    pub fn new(catalog: C, backend: B) -> Self {
        Self::restore(catalog, CollectionStore::new(backend), StoreConfig::default())
    }

    /// Load all three collections through `store`.
    ///
    /// A stored compare set longer than the configured limit counts as
    /// corrupt and starts empty.
    fn restore(catalog: C, store: CollectionStore<B>, config: StoreConfig) -> Self {
        let cart = store.load(CollectionKind::Cart);
        let wishlist = store.load(CollectionKind::Wishlist);
        let mut compare: Collection<Product> = store.load(CollectionKind::Compare);

        if compare.len() > config.compare_limit {
            let key = store.key(CollectionKind::Compare);
            let reason = format!(
                "{} entries exceed compare limit {}",
                compare.len(),
                config.compare_limit
            );
            warn!("Stored {} discarded, starting empty: {}", key, reason);
            store.metrics().record_corrupt(&key, &reason);
            compare = Collection::new(CollectionKind::Compare);
        }

        CollectionManager {
            catalog,
            store,
            config,
            cart,
            wishlist,
            compare,
            feeds: Vec::new(),
        }
    }

    /// Start a builder for custom config, metrics or feeds.
    pub fn builder(catalog: C, backend: B) -> ManagerBuilder<C, B> {
        ManagerBuilder {
            catalog,
            backend,
            config: StoreConfig::default(),
            metrics: Box::new(NoOpMetrics),
            feeds: Vec::new(),
        }
    }

    /// Subscribe a feed; it immediately receives all three current counts.
    pub fn subscribe(&mut self, mut feed: Box<dyn CollectionFeed>) {
        for kind in CollectionKind::ALL {
            feed.on_count(CountUpdate {
                collection: kind,
                count: self.count(kind),
            });
        }
        self.feeds.push(feed);
    }

    // ------------------------------------------------------------------
    // Cart
    // ------------------------------------------------------------------

    /// Add one unit of a product to the cart.
    ///
    /// A product already in the cart gets its quantity bumped; otherwise a
    /// new line with quantity 1 and the product's first size is appended.
    /// Unknown ids are ignored.
    pub fn add_to_cart(&mut self, id: ProductId) -> Mutation {
        let Some(product) = self.resolve(id, "add_to_cart") else {
            return self.unchanged(CollectionKind::Cart, id);
        };

        let change = match self.cart.get_mut(id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                Change::Incremented
            }
            None => match CartLine::new(product) {
                Some(line) => {
                    self.cart.push(line);
                    Change::Added
                }
                None => {
                    warn!("add_to_cart: product {} has no sizes, ignoring", id);
                    return self.unchanged(CollectionKind::Cart, id);
                }
            },
        };

        self.commit(
            CollectionKind::Cart,
            id,
            change,
            Notice::success("🛒 Item added to cart"),
        )
    }

    /// Drop a product's line from the cart. No-op when absent.
    pub fn remove_from_cart(&mut self, id: ProductId) -> Mutation {
        if self.cart.remove(id).is_none() {
            return self.unchanged(CollectionKind::Cart, id);
        }

        self.commit(
            CollectionKind::Cart,
            id,
            Change::Removed,
            Notice::success("🗑 Item removed from cart"),
        )
    }

    /// Change the selected size of an existing cart line.
    ///
    /// Returns an `Unchanged` mutation when the product is not in the cart
    /// or the size is already selected.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSize` if the product does not come in `size`.
    pub fn select_size(&mut self, id: ProductId, size: &str) -> Result<Mutation> {
        let Some(line) = self.cart.get_mut(id) else {
            return Ok(self.unchanged(CollectionKind::Cart, id));
        };

        if !line.product.offers_size(size) {
            return Err(Error::UnknownSize {
                product: id,
                size: size.to_string(),
            });
        }
        if line.selected_size == size {
            return Ok(self.unchanged(CollectionKind::Cart, id));
        }
        line.selected_size = size.to_string();

        Ok(self.commit(
            CollectionKind::Cart,
            id,
            Change::Updated,
            Notice::success(format!("📏 Size changed to {}", size)),
        ))
    }

    // ------------------------------------------------------------------
    // Wishlist / compare
    // ------------------------------------------------------------------

    /// Remove the product from the wishlist if present, else add it.
    ///
    /// Adding an unknown id is ignored.
    pub fn toggle_wishlist(&mut self, id: ProductId) -> Mutation {
        if self.wishlist.remove(id).is_some() {
            return self.commit(
                CollectionKind::Wishlist,
                id,
                Change::Removed,
                Notice::success("💔 Removed from wishlist"),
            );
        }

        match self.resolve(id, "toggle_wishlist") {
            Some(product) => {
                self.wishlist.push(product);
                self.commit(
                    CollectionKind::Wishlist,
                    id,
                    Change::Added,
                    Notice::success("❤️ Added to wishlist"),
                )
            }
            None => self.unchanged(CollectionKind::Wishlist, id),
        }
    }

    /// Remove the product from the compare set if present, else add it.
    ///
    /// Removal is always allowed. Adding is refused once the set holds
    /// `compare_limit` products; the feeds get an error notice and the set
    /// is left as is. Adding an unknown id is ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::CompareLimitReached` when the compare set is full.
    pub fn toggle_compare(&mut self, id: ProductId) -> Result<Mutation> {
        if self.compare.remove(id).is_some() {
            return Ok(self.commit(
                CollectionKind::Compare,
                id,
                Change::Removed,
                Notice::success("📊 Removed from comparison"),
            ));
        }

        let limit = self.config.compare_limit;
        if self.compare.len() >= limit {
            let key = self.store.key(CollectionKind::Compare);
            self.store.metrics().record_rejected(&key);
            let notice = Notice::compare_limit(limit);
            for feed in self.feeds.iter_mut() {
                feed.on_notice(&notice);
            }
            return Err(Error::CompareLimitReached { limit });
        }

        match self.resolve(id, "toggle_compare") {
            Some(product) => {
                self.compare.push(product);
                Ok(self.commit(
                    CollectionKind::Compare,
                    id,
                    Change::Added,
                    Notice::success("📈 Added to comparison"),
                ))
            }
            None => Ok(self.unchanged(CollectionKind::Compare, id)),
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Total quantity across all cart lines.
    pub fn cart_count(&self) -> usize {
        self.cart
            .entries()
            .iter()
            .map(|line| line.quantity as usize)
            .sum()
    }

    pub fn wishlist_count(&self) -> usize {
        self.wishlist.len()
    }

    pub fn compare_count(&self) -> usize {
        self.compare.len()
    }

    pub fn count(&self, kind: CollectionKind) -> usize {
        match kind {
            CollectionKind::Cart => self.cart_count(),
            CollectionKind::Wishlist => self.wishlist_count(),
            CollectionKind::Compare => self.compare_count(),
        }
    }

    pub fn counts(&self) -> Counts {
        Counts {
            cart: self.cart_count(),
            wishlist: self.wishlist_count(),
            compare: self.compare_count(),
        }
    }

    /// Sum of cart line subtotals in minor units.
    pub fn cart_total(&self) -> u64 {
        self.cart.entries().iter().map(CartLine::subtotal).sum()
    }

    pub fn cart(&self) -> &[CartLine] {
        self.cart.entries()
    }

    pub fn wishlist(&self) -> &[Product] {
        self.wishlist.entries()
    }

    pub fn compare(&self) -> &[Product] {
        self.compare.entries()
    }

    pub fn contains(&self, kind: CollectionKind, id: ProductId) -> bool {
        match kind {
            CollectionKind::Cart => self.cart.contains(id),
            CollectionKind::Wishlist => self.wishlist.contains(id),
            CollectionKind::Compare => self.compare.contains(id),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        self.store.backend()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Look up a product that may be stored.
    ///
    /// Products failing validation would make the whole collection unreadable
    /// on the next restore, so they are treated like unknown ids.
    fn resolve(&self, id: ProductId, op: &str) -> Option<Product> {
        let Some(product) = self.catalog.find_by_id(id) else {
            debug!("{}: unknown product {}, ignoring", op, id);
            return None;
        };
        match product.validate() {
            Ok(()) => Some(product),
            Err(e) => {
                warn!("{}: catalog product {} is invalid, ignoring: {}", op, id, e);
                None
            }
        }
    }

    fn unchanged(&self, kind: CollectionKind, id: ProductId) -> Mutation {
        Mutation::unchanged(kind, id, self.count(kind))
    }

    /// Persist, recount and notify after a change to `kind`.
    fn commit(
        &mut self,
        kind: CollectionKind,
        id: ProductId,
        change: Change,
        notice: Notice,
    ) -> Mutation {
        if let Err(e) = self.persist(kind) {
            warn!(
                "Could not persist {} after {} of {}: {} (keeping in-memory state)",
                kind, change, id, e
            );
        }

        let count = self.count(kind);
        debug!("» {} {} {} -> count {}", kind, change, id, count);

        let update = CountUpdate {
            collection: kind,
            count,
        };
        for feed in self.feeds.iter_mut() {
            feed.on_count(update);
            feed.on_notice(&notice);
        }

        Mutation {
            collection: kind,
            product: id,
            change,
            count,
            notice: Some(notice),
        }
    }

    fn persist(&self, kind: CollectionKind) -> Result<()> {
        match kind {
            CollectionKind::Cart => self.store.save(&self.cart),
            CollectionKind::Wishlist => self.store.save(&self.wishlist),
            CollectionKind::Compare => self.store.save(&self.compare),
        }
    }
}

impl<C: CatalogProvider, B: StorageBackend> std::fmt::Debug for CollectionManager<C, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionManager")
            .field("config", &self.config)
            .field("counts", &self.counts())
            .field("feeds", &self.feeds.len())
            .finish()
    }
}

/// Restore a single collection outside a manager, e.g. for a cart page
/// that only needs to read.
pub fn load_collection<T: CollectionEntry, B: StorageBackend>(
    backend: B,
    config: &StoreConfig,
    kind: CollectionKind,
) -> Collection<T> {
    CollectionStore::new(backend)
        .with_prefix(config.key_prefix.clone())
        .load(kind)
}
