//! UI-facing action layer.
//!
//! Wraps a [`CollectionManager`] so page handlers can stay thin: a button
//! click becomes an [`Action`], and [`Storefront::dispatch`] returns the
//! toast to show. The product grid is rendered from [`ProductCard`]s.

use crate::backend::StorageBackend;
use crate::catalog::{CatalogProvider, NEW_ARRIVALS};
use crate::error::{Error, Result};
use crate::feed::Notice;
use crate::key::CollectionKind;
use crate::manager::CollectionManager;
use crate::product::{Product, ProductId};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A shopper action on a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    AddToCart(ProductId),
    RemoveFromCart(ProductId),
    ToggleWishlist(ProductId),
    ToggleCompare(ProductId),
}

impl Action {
    pub fn product(&self) -> ProductId {
        match *self {
            Action::AddToCart(id)
            | Action::RemoveFromCart(id)
            | Action::ToggleWishlist(id)
            | Action::ToggleCompare(id) => id,
        }
    }

    pub fn collection(&self) -> CollectionKind {
        match self {
            Action::AddToCart(_) | Action::RemoveFromCart(_) => CollectionKind::Cart,
            Action::ToggleWishlist(_) => CollectionKind::Wishlist,
            Action::ToggleCompare(_) => CollectionKind::Compare,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Action::AddToCart(_) => "add-to-cart",
            Action::RemoveFromCart(_) => "remove-from-cart",
            Action::ToggleWishlist(_) => "wishlist",
            Action::ToggleCompare(_) => "compare",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.verb(), self.product())
    }
}

/// Parses the `data-action` form used by the page, e.g. `"wishlist:5"`.
impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (verb, id) = s
            .split_once(':')
            .ok_or_else(|| Error::Other(format!("malformed action {:?}", s)))?;
        let id = id
            .trim()
            .parse::<u32>()
            .map(ProductId)
            .map_err(|_| Error::Other(format!("invalid product id in action {:?}", s)))?;

        match verb.trim().to_ascii_lowercase().as_str() {
            "add-to-cart" | "cart" => Ok(Action::AddToCart(id)),
            "remove-from-cart" => Ok(Action::RemoveFromCart(id)),
            "wishlist" => Ok(Action::ToggleWishlist(id)),
            "compare" => Ok(Action::ToggleCompare(id)),
            other => Err(Error::Other(format!("unknown action {:?}", other))),
        }
    }
}

/// A product as the grid shows it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub product: Product,
    /// Percentage off the old price, 0 when not discounted.
    pub discount_percent: u8,
    pub badge_labels: Vec<&'static str>,
    pub in_wishlist: bool,
    pub in_compare: bool,
}

/// Page-level facade over a [`CollectionManager`].
///
/// # Example
///
/// ```
/// use storefront_state::backend::InMemoryBackend;
/// use storefront_state::catalog::InMemoryCatalog;
/// use storefront_state::storefront::{Action, Storefront};
///
/// let mut page = Storefront::open(InMemoryCatalog::seeded(), InMemoryBackend::new());
///
/// let notice = page.dispatch("wishlist:5".parse().unwrap()).unwrap();
/// assert_eq!(notice.message, "❤️ Added to wishlist");
/// assert!(page.new_arrivals(8)[4].in_wishlist);
/// ```
#[derive(Debug)]
pub struct Storefront<C: CatalogProvider, B: StorageBackend> {
    manager: CollectionManager<C, B>,
}

impl<C: CatalogProvider, B: StorageBackend> Storefront<C, B> {
    pub fn new(manager: CollectionManager<C, B>) -> Self {
        Storefront { manager }
    }

    /// Restore collections from `backend` with default configuration.
    pub fn open(catalog: C, backend: B) -> Self {
        Self::new(CollectionManager::new(catalog, backend))
    }

    /// Run an action and return the toast to show, if any.
    ///
    /// Returns `None` when nothing changed (unknown product, or removing
    /// something not in the cart). A full compare set yields an error
    /// notice rather than an `Err`.
    pub fn dispatch(&mut self, action: Action) -> Option<Notice> {
        debug!("dispatch {}", action);

        let result = match action {
            Action::AddToCart(id) => Ok(self.manager.add_to_cart(id)),
            Action::RemoveFromCart(id) => Ok(self.manager.remove_from_cart(id)),
            Action::ToggleWishlist(id) => Ok(self.manager.toggle_wishlist(id)),
            Action::ToggleCompare(id) => self.manager.toggle_compare(id),
        };

        match result {
            Ok(mutation) => mutation.notice,
            Err(Error::CompareLimitReached { limit }) => Some(Notice::compare_limit(limit)),
            Err(e) => Some(Notice::error(e.to_string())),
        }
    }

    /// The first `limit` catalog products, decorated for the grid.
    pub fn new_arrivals(&self, limit: usize) -> Vec<ProductCard> {
        self.manager
            .catalog()
            .new_arrivals(limit)
            .iter()
            .map(|p| self.card(p))
            .collect()
    }

    /// The default grid.
    pub fn home_grid(&self) -> Vec<ProductCard> {
        self.new_arrivals(NEW_ARRIVALS)
    }

    pub fn card(&self, product: &Product) -> ProductCard {
        ProductCard {
            product: product.clone(),
            discount_percent: product.discount_percent(),
            badge_labels: product.badges.iter().map(|b| b.label()).collect(),
            in_wishlist: self.manager.contains(CollectionKind::Wishlist, product.id),
            in_compare: self.manager.contains(CollectionKind::Compare, product.id),
        }
    }

    pub fn manager(&self) -> &CollectionManager<C, B> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut CollectionManager<C, B> {
        &mut self.manager
    }

    pub fn into_manager(self) -> CollectionManager<C, B> {
        self.manager
    }
}
