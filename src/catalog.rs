//! Catalog provider trait and the in-memory catalog.
//!
//! The `CatalogProvider` trait decouples the collection manager from where
//! product records come from. The store only ever needs two things from a
//! catalog: the full ordered list (to render a page) and a lookup by id (to
//! turn a clicked id into a full record).
//!
//! # Unknown ids
//!
//! `find_by_id` returns `None` for an id the catalog does not know. That is
//! not an error: the manager treats it as a stale id and does nothing.
//!
//! ```
//! use storefront_state::catalog::{CatalogProvider, InMemoryCatalog};
//! use storefront_state::product::ProductId;
//!
//! let catalog = InMemoryCatalog::seeded();
//! assert!(catalog.find_by_id(ProductId(1)).is_some());
//! assert!(catalog.find_by_id(ProductId(9999)).is_none());
//! ```

use crate::error::{Error, Result};
use crate::product::{Badge, Product, ProductId};

/// Number of products shown in the "new arrivals" grid.
pub const NEW_ARRIVALS: usize = 8;

/// Trait for read-only product sources.
///
/// Implementations must return the same order on every call and must not
/// fail on unknown ids.
pub trait CatalogProvider {
    /// All products, in display order.
    fn list_all(&self) -> &[Product];

    /// Look a product up by id.
    ///
    /// Default implementation scans `list_all()`.
    fn find_by_id(&self, id: ProductId) -> Option<Product> {
        self.list_all().iter().find(|p| p.id == id).cloned()
    }

    /// The first `limit` products, for the new arrivals grid.
    fn new_arrivals(&self, limit: usize) -> &[Product] {
        let all = self.list_all();
        &all[..limit.min(all.len())]
    }

    /// Number of products in the catalog.
    fn count(&self) -> usize {
        self.list_all().len()
    }
}

impl<C: CatalogProvider + ?Sized> CatalogProvider for &C {
    fn list_all(&self) -> &[Product] {
        (**self).list_all()
    }

    fn find_by_id(&self, id: ProductId) -> Option<Product> {
        (**self).find_by_id(id)
    }
}

// ============================================================================
// In-Memory Catalog
// ============================================================================

/// Fixed product list held in memory.
///
/// Use [`InMemoryCatalog::seeded`] for the storefront's own products or
/// [`InMemoryCatalog::new`] to control exactly what a test sees.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    /// Create a catalog from the given products, in the given order.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` if any product fails
    /// [`Product::validate`] or two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self> {
        for (i, product) in products.iter().enumerate() {
            product.validate()?;
            if products[..i].iter().any(|p| p.id == product.id) {
                return Err(Error::ValidationError(format!(
                    "duplicate product id {} in catalog",
                    product.id
                )));
            }
        }
        debug!("✓ Catalog loaded with {} products", products.len());
        Ok(InMemoryCatalog { products })
    }

    /// The storefront's built-in fashion catalog.
    ///
    /// Goes through the same checks as [`InMemoryCatalog::new`]; a seed list
    /// that fails them is logged and yields an empty catalog.
    pub fn seeded() -> Self {
        match Self::new(seed_products()) {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("Built-in catalog rejected: {}", e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn list_all(&self) -> &[Product] {
        &self.products
    }
}

#[allow(clippy::too_many_arguments)]
fn seed_product(
    id: u32,
    name: &str,
    brand: &str,
    price: u64,
    old_price: Option<u64>,
    image: &str,
    badge: Badge,
    sizes: &[&str],
) -> Product {
    Product {
        id: ProductId(id),
        name: name.to_string(),
        brand: brand.to_string(),
        price,
        old_price,
        image: image.to_string(),
        badges: vec![badge],
        sizes: sizes.iter().map(|s| s.to_string()).collect(),
    }
}

#[rustfmt::skip]
fn seed_products() -> Vec<Product> {
    vec![
        seed_product(1, "Floral print midi dress", "Zara", 3990, Some(5990), "png/1.jpg", Badge::New, &["XS", "S", "M", "L"]),
        seed_product(2, "White leather sneakers", "Nike", 8990, None, "png/2.jpg", Badge::Hit, &["36", "37", "38", "39", "40"]),
        seed_product(3, "High-waist skinny jeans", "Levi's", 4590, Some(5990), "png/3.1.jpg", Badge::Sale, &["25", "26", "27", "28", "29"]),
        seed_product(4, "Black leather jacket", "Massimo Dutti", 12990, None, "png/4.1.jpg", Badge::New, &["XS", "S", "M", "L", "XL"]),
        seed_product(5, "Beige silk blouse", "Mango", 3490, Some(4990), "png/5.jpg", Badge::Sale, &["XS", "S", "M", "L"]),
        seed_product(6, "Crossbody bag", "Michael Kors", 15990, None, "png/6.jpg", Badge::New, &["ONE SIZE"]),
        seed_product(7, "Heeled pumps", "Steve Madden", 6990, None, "png/7.jpg", Badge::Hit, &["35", "36", "37", "38"]),
        seed_product(8, "Oversized sweater", "COS", 5990, Some(7990), "png/8.jpg", Badge::Sale, &["S", "M", "L", "XL"]),
    ]
}
