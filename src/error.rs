//! Error types for the collection store.

use crate::product::ProductId;
use std::fmt;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the collection store.
///
/// Only a handful of these ever reach a shopper. Unknown product ids are
/// not errors at all (the operation is a no-op), and unreadable persisted
/// state is recovered as an empty collection before it gets here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Serialization failed when encoding a collection for storage.
    SerializationError(String),

    /// Deserialization failed when decoding stored collection bytes.
    ///
    /// Returned by the strict decoder only. `CollectionStore::load`
    /// turns this into an empty collection.
    DeserializationError(String),

    /// Storage backend error (filesystem, unavailable store, etc).
    ///
    /// **Recovery:** the in-memory collection stays authoritative; the
    /// next successful write persists it again.
    BackendError(String),

    /// A product or collection entry violates a data-model invariant.
    ///
    /// Raised when:
    /// - a catalog product has no sizes, a zero price or a bad old price
    /// - a stored cart line has quantity 0 or a size the product lacks
    /// - a stored collection holds the same product twice
    ValidationError(String),

    /// The compare collection already holds `limit` products.
    ///
    /// This is the one rejection shoppers see under normal use. The
    /// collection is left untouched.
    CompareLimitReached {
        /// Configured maximum compare size
        limit: usize,
    },

    /// Requested size is not offered by the product.
    UnknownSize {
        /// Product the size was requested for
        product: ProductId,
        /// The rejected size label
        size: String,
    },

    /// Invalid `StoreConfig`.
    ConfigError(String),

    /// Optional backend operation not supported.
    NotImplemented(String),

    /// Generic error with custom message.
    Other(String),
}

impl Error {
    /// True for the capacity rejection raised by the compare toggle.
    pub fn is_compare_limit(&self) -> bool {
        matches!(self, Error::CompareLimitReached { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Error::CompareLimitReached { limit } => {
                write!(f, "Compare limit reached: at most {} products", limit)
            }
            Error::UnknownSize { product, size } => {
                write!(f, "Size {} is not available for product {}", size, product)
            }
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::BackendError(e.to_string())
        } else if e.is_syntax() || e.is_data() || e.is_eof() {
            Error::DeserializationError(e.to_string())
        } else {
            Error::SerializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::BackendError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}
