//! Ordered, id-unique collections of entries.

use crate::error::{Error, Result};
use crate::key::CollectionKind;
use crate::product::{CartLine, Product, ProductId};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Trait for anything stored in a shopper collection.
///
/// # Example
///
/// ```
/// use storefront_state::collection::CollectionEntry;
/// use storefront_state::product::ProductId;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Serialize, Deserialize)]
/// struct Saved {
///     id: ProductId,
/// }
///
/// impl CollectionEntry for Saved {
///     fn product_id(&self) -> ProductId {
///         self.id
///     }
/// }
/// ```
pub trait CollectionEntry: Serialize + DeserializeOwned + Clone {
    /// The catalog product this entry refers to.
    fn product_id(&self) -> ProductId;

    /// Optional: Validate entry after it was read back from storage.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl CollectionEntry for Product {
    fn product_id(&self) -> ProductId {
        self.id
    }

    fn validate(&self) -> Result<()> {
        Product::validate(self)
    }
}

impl CollectionEntry for CartLine {
    fn product_id(&self) -> ProductId {
        self.product.id
    }

    fn validate(&self) -> Result<()> {
        self.product.validate()?;
        if self.quantity == 0 {
            return Err(Error::ValidationError(format!(
                "cart line {} has zero quantity",
                self.product.id
            )));
        }
        if !self.product.offers_size(&self.selected_size) {
            return Err(Error::ValidationError(format!(
                "cart line {} selects unknown size {}",
                self.product.id, self.selected_size
            )));
        }
        Ok(())
    }
}

/// A named collection in first-insertion order.
///
/// Holds at most one entry per product id. Removing an entry keeps the
/// order of the rest; re-adding appends at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    kind: CollectionKind,
    entries: Vec<T>,
}

impl<T: CollectionEntry> Collection<T> {
    pub fn new(kind: CollectionKind) -> Self {
        Collection {
            kind,
            entries: Vec::new(),
        }
    }

    /// Build from restored entries, checking every entry and id uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` on the first invalid entry or
    /// repeated product id.
    pub fn from_entries(kind: CollectionKind, entries: Vec<T>) -> Result<Self> {
        for (i, entry) in entries.iter().enumerate() {
            entry.validate()?;
            let id = entry.product_id();
            if entries[..i].iter().any(|e| e.product_id() == id) {
                return Err(Error::ValidationError(format!(
                    "{} holds product {} twice",
                    kind, id
                )));
            }
        }
        Ok(Collection { kind, entries })
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, id: ProductId) -> Option<usize> {
        self.entries.iter().position(|e| e.product_id() == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.position(id).is_some()
    }

    pub fn get_mut(&mut self, id: ProductId) -> Option<&mut T> {
        self.entries.iter_mut().find(|e| e.product_id() == id)
    }

    /// Append an entry whose id is not yet present.
    ///
    /// Returns `false` and drops the entry when the id is already held.
    pub fn push(&mut self, entry: T) -> bool {
        if self.contains(entry.product_id()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Remove the entry for `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: ProductId) -> Option<T> {
        let index = self.position(id)?;
        Some(self.entries.remove(index))
    }
}
