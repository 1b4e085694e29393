// ── Latest-status store ──
//
// Single-writer storage for the most recently fetched status document.
// The monitor replaces the document wholesale on every successful poll;
// readers take cheap `Arc` snapshots and may subscribe to changes via
// `watch` channels. A failed poll keeps the previous document but flips
// availability to false, so stale values are never mistaken for live ones.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use spyder_api::StatusDocument;

/// Shared snapshot of the latest status document plus availability.
pub struct StatusStore {
    snapshot: watch::Sender<Option<Arc<StatusDocument>>>,
    available: watch::Sender<bool>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl StatusStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(None);
        let (available, _) = watch::channel(false);
        let (last_refresh, _) = watch::channel(None);

        Self {
            snapshot,
            available,
            last_refresh,
        }
    }

    // ── Writer side (monitor only) ───────────────────────────────────

    /// Replace the current document and mark the store available.
    pub(crate) fn publish(&self, doc: StatusDocument) {
        self.snapshot.send_modify(|snap| *snap = Some(Arc::new(doc)));
        self.available.send_modify(|a| *a = true);
        self.last_refresh.send_modify(|t| *t = Some(Utc::now()));
    }

    /// Record a failed poll. The previous document is retained.
    pub(crate) fn mark_unavailable(&self) {
        self.available.send_modify(|a| *a = false);
    }

    // ── Reader side ──────────────────────────────────────────────────

    /// The most recently published document (cheap `Arc` clone).
    pub fn snapshot(&self) -> Option<Arc<StatusDocument>> {
        self.snapshot.borrow().clone()
    }

    /// Whether the last poll succeeded.
    pub fn is_available(&self) -> bool {
        *self.available.borrow()
    }

    /// When the last successful refresh happened, if ever.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// How long ago the last successful refresh occurred.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<StatusDocument>>> {
        self.snapshot.subscribe()
    }

    pub fn subscribe_availability(&self) -> watch::Receiver<bool> {
        self.available.subscribe()
    }
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::new()
    }
}
