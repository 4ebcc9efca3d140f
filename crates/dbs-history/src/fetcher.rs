use std::future::Future;

use dbs_api_types::{ExecutionKey, LogMessage};
use futures::future::{FutureExt, LocalBoxFuture};

use crate::error::FetchError;

/// Result of one log fetch.
pub type FetchResult = Result<Vec<LogMessage>, FetchError>;

/// Retrieves the ordered log messages of one execution.
///
/// The returned future owns everything it needs (`'static`) so the caller can
/// spawn it independently of the fetcher's lifetime. It is never aborted; a
/// superseded fetch simply has its result ignored.
pub trait LogFetcher {
    fn fetch_log_messages(&self, key: &ExecutionKey) -> LocalBoxFuture<'static, FetchResult>;
}

impl<F, Fut> LogFetcher for F
where
    F: Fn(&ExecutionKey) -> Fut,
    Fut: Future<Output = FetchResult> + 'static,
{
    fn fetch_log_messages(&self, key: &ExecutionKey) -> LocalBoxFuture<'static, FetchResult> {
        self(key).boxed_local()
    }
}
