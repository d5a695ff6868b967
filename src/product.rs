//! Product records and cart lines.
//!
//! Field names serialize in camelCase (`oldPrice`, `selectedSize`) so the
//! persisted collections keep the same shape a browser page stores in
//! `localStorage`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        ProductId(id)
    }
}

/// Merchandising tag shown on a product card.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    New,
    Sale,
    Hit,
}

impl Badge {
    /// Text shown on the card badge.
    pub fn label(&self) -> &'static str {
        match self {
            Badge::New => "New",
            Badge::Sale => "Sale",
            Badge::Hit => "Hit",
        }
    }
}

/// Immutable catalog entry.
///
/// Prices are in minor currency units. `old_price` is only present for
/// discounted items and is then strictly greater than `price`. The first
/// size is the default size for new cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<u64>,
    pub image: String,
    #[serde(default)]
    pub badges: Vec<Badge>,
    pub sizes: Vec<String>,
}

impl Product {
    /// Size preselected when the product first lands in the cart.
    pub fn default_size(&self) -> Option<&str> {
        self.sizes.first().map(String::as_str)
    }

    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    pub fn is_discounted(&self) -> bool {
        self.old_price.is_some_and(|old| old > self.price)
    }

    /// Rounded discount against the old price, 0 when not discounted.
    ///
    /// 3990 against 5990 gives 33.
    pub fn discount_percent(&self) -> u8 {
        match self.old_price {
            Some(old) if old > self.price => {
                let ratio = self.price as f64 / old as f64;
                ((1.0 - ratio) * 100.0).round() as u8
            }
            _ => 0,
        }
    }

    /// Check the catalog invariants for this record.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` when the id or price is zero, the
    /// old price does not exceed the price, there are no sizes, or a
    /// badge is listed twice.
    pub fn validate(&self) -> Result<()> {
        if self.id.0 == 0 {
            return Err(Error::ValidationError("product id must be positive".into()));
        }
        if self.price == 0 {
            return Err(Error::ValidationError(format!(
                "product {} has a zero price",
                self.id
            )));
        }
        if let Some(old) = self.old_price {
            if old <= self.price {
                return Err(Error::ValidationError(format!(
                    "product {} old price {} does not exceed price {}",
                    self.id, old, self.price
                )));
            }
        }
        if self.sizes.is_empty() {
            return Err(Error::ValidationError(format!(
                "product {} has no sizes",
                self.id
            )));
        }
        for (i, badge) in self.badges.iter().enumerate() {
            if self.badges[..i].contains(badge) {
                return Err(Error::ValidationError(format!(
                    "product {} lists badge {:?} twice",
                    self.id, badge
                )));
            }
        }
        Ok(())
    }
}

/// One cart row: a product copy plus quantity and chosen size.
///
/// There is never more than one line per product id; adding the same
/// product again bumps `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
    pub selected_size: String,
}

impl CartLine {
    /// New line with quantity 1 and the product's default size.
    ///
    /// Returns `None` for a product without sizes.
    pub fn new(product: Product) -> Option<Self> {
        let selected_size = product.default_size()?.to_string();
        Some(CartLine {
            product,
            quantity: 1,
            selected_size,
        })
    }

    /// Line total in minor units.
    pub fn subtotal(&self) -> u64 {
        self.product.price.saturating_mul(u64::from(self.quantity))
    }
}
