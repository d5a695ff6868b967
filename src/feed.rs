//! Feed trait for pushing collection changes to the presentation layer.
//!
//! A feed is whatever keeps the page's badges and toasts in sync: after
//! every state-changing mutation the manager first calls
//! [`CollectionFeed::on_count`] with the collection's new count, then
//! [`CollectionFeed::on_notice`] with the message to show. A rejected
//! compare toggle only produces an error notice. No-ops produce nothing.

use crate::key::CollectionKind;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Severity of a shopper-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Shopper-facing message, rendered by the UI as a toast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Error shown when the compare set is already full.
    pub fn compare_limit(limit: usize) -> Self {
        Notice::error(format!("❌ You can compare at most {} products", limit))
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// New badge value for one collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountUpdate {
    pub collection: CollectionKind,
    pub count: usize,
}

/// Trait for consumers of collection changes.
///
/// # Example
///
/// ```
/// use storefront_state::feed::{CollectionFeed, CountUpdate, Notice};
///
/// struct BadgeFeed {
///     cart_badge: usize,
/// }
///
/// impl CollectionFeed for BadgeFeed {
///     fn on_count(&mut self, update: CountUpdate) {
///         if update.collection.as_str() == "cart" {
///             self.cart_badge = update.count;
///         }
///     }
///
///     fn on_notice(&mut self, _notice: &Notice) {}
/// }
/// ```
pub trait CollectionFeed: Send {
    /// Called after a collection changed, with its new count.
    fn on_count(&mut self, update: CountUpdate);

    /// Called with the message to show the shopper.
    fn on_notice(&mut self, notice: &Notice);
}

// ============================================================================
// Recording Feed
// ============================================================================

/// One event seen by a [`RecordingFeed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedEvent {
    Count(CountUpdate),
    Notice(Notice),
}

/// Feed that keeps every event, in order.
///
/// Clones share the same buffer, so a handle can be kept after a clone is
/// handed to the manager.
#[derive(Clone, Default)]
pub struct RecordingFeed {
    events: Arc<Mutex<Vec<FeedEvent>>>,
}

impl RecordingFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<FeedEvent> {
        self.lock().clone()
    }

    /// Only the notices, in order.
    pub fn notices(&self) -> Vec<Notice> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                FeedEvent::Notice(n) => Some(n.clone()),
                FeedEvent::Count(_) => None,
            })
            .collect()
    }

    /// Last count pushed for `collection`, if any.
    pub fn last_count(&self, collection: CollectionKind) -> Option<usize> {
        self.lock().iter().rev().find_map(|e| match e {
            FeedEvent::Count(u) if u.collection == collection => Some(u.count),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<FeedEvent>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CollectionFeed for RecordingFeed {
    fn on_count(&mut self, update: CountUpdate) {
        self.lock().push(FeedEvent::Count(update));
    }

    fn on_notice(&mut self, notice: &Notice) {
        self.lock().push(FeedEvent::Notice(notice.clone()));
    }
}
