// ── Fetch port ──
//
// The polling monitor in spyder-core drives fetches through this trait
// instead of a concrete client, so tests (and future transports) can
// supply their own source of status documents.

use std::future::Future;
use std::sync::Arc;

use crate::error::Error;
use crate::model::StatusDocument;

/// A source of fresh status documents.
///
/// One `fetch` call is one attempt; implementations must not retry
/// internally — the caller's next scheduled poll is the retry.
pub trait StatusSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<StatusDocument, Error>> + Send;
}

impl<S: StatusSource> StatusSource for Arc<S> {
    async fn fetch(&self) -> Result<StatusDocument, Error> {
        (**self).fetch().await
    }
}

impl StatusSource for crate::client::SpyderClient {
    async fn fetch(&self) -> Result<StatusDocument, Error> {
        self.fetch_status().await
    }
}
