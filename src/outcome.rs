//! Mutation results returned by the collection manager.
//!
//! Every mutating call returns a [`Mutation`] describing what happened, so
//! a UI layer can react without subscribing to anything:
//!
//! | Change        | Meaning                                   | Persisted | Notified |
//! |---------------|-------------------------------------------|-----------|----------|
//! | `Added`       | New entry appended                        | yes       | yes      |
//! | `Incremented` | Existing cart line quantity bumped        | yes       | yes      |
//! | `Updated`     | Existing cart line size changed           | yes       | yes      |
//! | `Removed`     | Entry dropped                             | yes       | yes      |
//! | `Unchanged`   | Unknown id or nothing to do               | no        | no       |

use crate::feed::Notice;
use crate::key::CollectionKind;
use crate::product::ProductId;
use std::fmt;

/// What a mutation did to its collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    Added,
    Incremented,
    Updated,
    Removed,
    Unchanged,
}

impl Change {
    /// True when the collection was modified.
    pub fn is_change(&self) -> bool {
        !matches!(self, Change::Unchanged)
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Added => write!(f, "Added"),
            Change::Incremented => write!(f, "Incremented"),
            Change::Updated => write!(f, "Updated"),
            Change::Removed => write!(f, "Removed"),
            Change::Unchanged => write!(f, "Unchanged"),
        }
    }
}

/// Result of one mutating call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mutation {
    pub collection: CollectionKind,
    pub product: ProductId,
    pub change: Change,
    /// Collection count after the call (cart: total quantity).
    pub count: usize,
    /// Shopper-facing message, `None` when nothing changed.
    pub notice: Option<Notice>,
}

impl Mutation {
    pub(crate) fn unchanged(collection: CollectionKind, product: ProductId, count: usize) -> Self {
        Mutation {
            collection,
            product,
            change: Change::Unchanged,
            count,
            notice: None,
        }
    }

    pub fn is_change(&self) -> bool {
        self.change.is_change()
    }
}
