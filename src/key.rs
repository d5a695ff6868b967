//! Collection names and storage key management.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three shopper collections.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Cart,
    Wishlist,
    Compare,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 3] = [
        CollectionKind::Cart,
        CollectionKind::Wishlist,
        CollectionKind::Compare,
    ];

    /// Collection name, also the unprefixed storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Cart => "cart",
            CollectionKind::Wishlist => "wishlist",
            CollectionKind::Compare => "compare",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cart" => Ok(CollectionKind::Cart),
            "wishlist" => Ok(CollectionKind::Wishlist),
            "compare" => Ok(CollectionKind::Compare),
            other => Err(Error::Other(format!("unknown collection: {}", other))),
        }
    }
}

/// Builder for storage keys.
pub struct StorageKeyBuilder;

impl StorageKeyBuilder {
    /// Storage key for a collection.
    ///
    /// Without a prefix the key is the bare collection name (`cart`),
    /// which is what the browser page itself writes.
    pub fn build(prefix: Option<&str>, kind: CollectionKind) -> String {
        match prefix {
            Some(p) if !p.is_empty() => format!("{}:{}", p, kind),
            _ => kind.as_str().to_string(),
        }
    }

    /// Split a storage key back into prefix and collection.
    pub fn parse(key: &str) -> Option<(Option<&str>, CollectionKind)> {
        match key.rsplit_once(':') {
            Some((prefix, name)) => Some((Some(prefix), name.parse().ok()?)),
            None => Some((None, key.parse().ok()?)),
        }
    }
}
