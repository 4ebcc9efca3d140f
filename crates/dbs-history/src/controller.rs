use std::rc::Rc;

use dbs_api_types::{ExecutionKey, LogMessage};
use futures::future::{FutureExt, LocalBoxFuture};
use tracing::{debug, trace};

use crate::cycle::CycleToken;
use crate::fetcher::LogFetcher;

/// What the log section currently knows: whether a fetch is in flight and
/// the messages of the last completed one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSnapshot {
    pub loading: bool,
    pub messages: Vec<LogMessage>,
}

impl LogSnapshot {
    pub fn loading() -> Self {
        Self {
            loading: true,
            messages: Vec::new(),
        }
    }

    pub fn loaded(messages: Vec<LogMessage>) -> Self {
        Self {
            loading: false,
            messages,
        }
    }
}

/// Drives one fetch cycle per [`ExecutionKey`] and publishes snapshots to a
/// sink.
///
/// The controller never spawns anything itself. [`set_key`](Self::set_key)
/// hands back the cycle future and the host decides how to run it
/// (`spawn_local` in the browser, a local executor in tests). Each cycle
/// carries a [`CycleToken`]; a completion whose token was retired by a newer
/// key or by [`unmount`](Self::unmount) is dropped without touching the sink.
pub struct LogCycleController {
    fetcher: Rc<dyn LogFetcher>,
    sink: Rc<dyn Fn(LogSnapshot)>,
    key: Option<ExecutionKey>,
    cycle: Option<CycleToken>,
    mounted: bool,
}

impl LogCycleController {
    pub fn new(fetcher: Rc<dyn LogFetcher>, sink: impl Fn(LogSnapshot) + 'static) -> Self {
        Self {
            fetcher,
            sink: Rc::new(sink),
            key: None,
            cycle: None,
            mounted: true,
        }
    }

    /// Point the controller at `key`.
    ///
    /// Returns the cycle future to spawn when a fetch was started, `None`
    /// when the key is unchanged, incomplete, or the controller is unmounted.
    pub fn set_key(&mut self, key: ExecutionKey) -> Option<LocalBoxFuture<'static, ()>> {
        if !self.mounted {
            trace!("ignoring execution key change after unmount");
            return None;
        }
        if self.key.as_ref() == Some(&key) {
            return None;
        }

        self.retire_cycle();
        self.key = Some(key.clone());

        if !key.is_complete() {
            debug!(
                task_name = %key.task_name,
                task_instance = %key.task_instance,
                execution_time = %key.execution_time,
                "execution key incomplete, not fetching logs"
            );
            (self.sink)(LogSnapshot::default());
            return None;
        }

        let token = CycleToken::new();
        self.cycle = Some(token.clone());
        debug!(
            task_name = %key.task_name,
            task_instance = %key.task_instance,
            execution_time = %key.execution_time,
            "starting log fetch cycle"
        );
        (self.sink)(LogSnapshot::loading());

        let fetch = self.fetcher.fetch_log_messages(&key);
        let sink = Rc::clone(&self.sink);
        let cycle = async move {
            let outcome = fetch.await;
            if !token.is_live() {
                trace!("discarding log fetch result of a retired cycle");
                return;
            }
            // A failed fetch shows the same as an empty one and is not reported.
            let messages = outcome.unwrap_or_default();
            token.retire();
            sink(LogSnapshot::loaded(messages));
        };
        Some(cycle.boxed_local())
    }

    /// Tear down: the in-flight cycle (if any) may no longer publish and
    /// further key changes are ignored.
    pub fn unmount(&mut self) {
        if self.mounted {
            debug!("log view unmounted");
        }
        self.retire_cycle();
        self.mounted = false;
    }

    pub fn key(&self) -> Option<&ExecutionKey> {
        self.key.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// True while a fetch is in flight and its result would still be applied.
    pub fn has_live_cycle(&self) -> bool {
        self.cycle.as_ref().is_some_and(CycleToken::is_live)
    }

    fn retire_cycle(&mut self) {
        if let Some(token) = self.cycle.take() {
            if token.is_live() {
                debug!("superseding in-flight log fetch cycle");
            }
            token.retire();
        }
    }
}

impl Drop for LogCycleController {
    fn drop(&mut self) {
        self.retire_cycle();
    }
}
