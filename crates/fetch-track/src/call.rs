//! Tracked call handle and its read views.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::watch;
use tracing::debug;

use crate::error::CallError;
use crate::options::TrackOptions;

/// State of one tracked call.
#[derive(Debug, Clone)]
pub enum CallState<T> {
    /// The fetch has not settled yet.
    Pending,
    /// The fetch resolved with a value.
    Resolved(T),
    /// The fetch failed.
    Failed(CallError),
}

impl<T> CallState<T> {
    /// True until the call settles.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<T>> + Send + Sync>;

/// Handle to one asynchronous remote call.
///
/// Spawning a call initiates the fetch immediately on the runtime; the
/// handle observes its state through a watch channel. Reads reflect the
/// state at the moment of read, not a snapshot taken at spawn time.
pub struct TrackedCall<T> {
    fetcher: Fetcher<T>,
    options: TrackOptions,
    generation: Arc<AtomicU64>,
    tx: Arc<watch::Sender<CallState<T>>>,
    rx: watch::Receiver<CallState<T>>,
}

impl<T> Clone for TrackedCall<T> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            options: self.options,
            generation: Arc::clone(&self.generation),
            tx: Arc::clone(&self.tx),
            rx: self.rx.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> TrackedCall<T> {
    /// Spawn a fetch and return the handle tracking it.
    ///
    /// The spawn itself never awaits, so two calls spawned back to back
    /// are initiated independently with no ordering between them.
    pub fn spawn<F, Fut>(fetcher: F, options: TrackOptions) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let fetcher: Fetcher<T> = Arc::new(move || fetcher().boxed());
        let (tx, rx) = watch::channel(CallState::Pending);
        let call = Self {
            fetcher,
            options,
            generation: Arc::new(AtomicU64::new(0)),
            tx: Arc::new(tx),
            rx,
        };
        call.spawn_fetch();
        call
    }

    /// Options this call was spawned with.
    pub fn options(&self) -> TrackOptions {
        self.options
    }

    /// Current value, if the call has resolved.
    pub fn data(&self) -> Option<T> {
        match &*self.rx.borrow() {
            CallState::Resolved(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// True until the call settles.
    pub fn pending(&self) -> bool {
        self.rx.borrow().is_pending()
    }

    /// Error from the last run, if it failed.
    pub fn error(&self) -> Option<CallError> {
        match &*self.rx.borrow() {
            CallState::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Split into value and pending-flag read handles.
    pub fn parts(&self) -> (DataRef<T>, PendingRef<T>) {
        (
            DataRef {
                rx: self.rx.clone(),
            },
            PendingRef {
                rx: self.rx.clone(),
            },
        )
    }

    /// Wait until the call settles, returning the value or the error.
    pub async fn settled(&self) -> Result<T, CallError> {
        let mut rx = self.rx.clone();
        loop {
            let state = rx.borrow_and_update().clone();
            match state {
                CallState::Resolved(value) => return Ok(value),
                CallState::Failed(err) => return Err(err),
                CallState::Pending => {
                    if rx.changed().await.is_err() {
                        return Err(CallError::Aborted);
                    }
                }
            }
        }
    }

    /// Wait for the call's readiness contract.
    ///
    /// Blocking options (`server` or non-`lazy`) wait for the call to
    /// settle; lazy options return immediately.
    pub async fn ready(&self) -> Result<(), CallError> {
        if self.options.blocks_readiness() {
            self.settled().await?;
        }
        Ok(())
    }

    /// Re-run the fetch. State returns to pending until the new run settles.
    pub fn refresh(&self) {
        debug!("refreshing tracked call");
        let _ = self.tx.send(CallState::Pending);
        self.spawn_fetch();
    }

    fn spawn_fetch(&self) {
        let run = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let fetcher = Arc::clone(&self.fetcher);
        let tx = Arc::clone(&self.tx);
        let generation = Arc::clone(&self.generation);
        tokio::spawn(async move {
            let state = match fetcher().await {
                Ok(value) => CallState::Resolved(value),
                Err(err) => CallState::Failed(CallError::Remote(err.to_string())),
            };
            // A superseded run must not overwrite the newer run's result.
            if generation.load(Ordering::SeqCst) == run {
                let _ = tx.send(state);
            } else {
                debug!(run, "dropping result from superseded run");
            }
        });
    }
}

/// Read handle for a tracked call's resolved value.
pub struct DataRef<T> {
    rx: watch::Receiver<CallState<T>>,
}

impl<T> Clone for DataRef<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T: Clone> DataRef<T> {
    /// Current value, if the call has resolved.
    pub fn get(&self) -> Option<T> {
        match &*self.rx.borrow() {
            CallState::Resolved(value) => Some(value.clone()),
            _ => None,
        }
    }
}

/// Read handle for a tracked call's pending flag.
pub struct PendingRef<T> {
    rx: watch::Receiver<CallState<T>>,
}

impl<T> Clone for PendingRef<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T> PendingRef<T> {
    /// True until the call settles.
    pub fn get(&self) -> bool {
        self.rx.borrow().is_pending()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_call_resolves_with_value() {
        let call = TrackedCall::spawn(|| async { Ok(7u32) }, TrackOptions::default());
        assert_eq!(call.settled().await.unwrap(), 7);
        assert!(!call.pending());
        assert_eq!(call.data(), Some(7));
        assert!(call.error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_pending_until_latency_elapses() {
        let call = TrackedCall::spawn(
            || async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok(1u32)
            },
            TrackOptions::default(),
        );
        assert!(call.pending());
        assert_eq!(call.data(), None);

        call.settled().await.unwrap();
        assert!(!call.pending());
        assert_eq!(call.data(), Some(1));
    }

    #[tokio::test]
    async fn test_failed_call_surfaces_error() {
        let call: TrackedCall<u32> = TrackedCall::spawn(
            || async { Err(anyhow::anyhow!("upstream rejected")) },
            TrackOptions::default(),
        );
        let err = call.settled().await.unwrap_err();
        assert!(matches!(err, CallError::Remote(_)));
        assert!(!call.pending());
        assert_eq!(call.data(), None);
        assert!(call.error().is_some());
    }

    #[tokio::test]
    async fn test_ready_blocks_only_for_eager_options() {
        let eager = TrackedCall::spawn(|| async { Ok(5u32) }, TrackOptions::eager());
        eager.ready().await.unwrap();
        assert_eq!(eager.data(), Some(5));

        let lazy = TrackedCall::spawn(
            || async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(5u32)
            },
            TrackOptions::default(),
        );
        lazy.ready().await.unwrap();
        assert!(lazy.pending());
    }

    #[tokio::test]
    async fn test_parts_track_live_state() {
        let call = TrackedCall::spawn(|| async { Ok(3u32) }, TrackOptions::default());
        let (data, pending) = call.parts();
        assert!(pending.get());
        assert_eq!(data.get(), None);

        call.settled().await.unwrap();
        assert!(!pending.get());
        assert_eq!(data.get(), Some(3));
    }

    #[tokio::test]
    async fn test_refresh_reruns_fetch() {
        let runs = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&runs);
        let call = TrackedCall::spawn(
            move || {
                let runs = Arc::clone(&counter);
                async move { Ok(runs.fetch_add(1, Ordering::SeqCst) + 1) }
            },
            TrackOptions::default(),
        );
        assert_eq!(call.settled().await.unwrap(), 1);

        call.refresh();
        assert!(call.pending());
        assert_eq!(call.settled().await.unwrap(), 2);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_run_does_not_overwrite() {
        let runs = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&runs);
        let call = TrackedCall::spawn(
            move || {
                let runs = Arc::clone(&counter);
                async move {
                    let run = runs.fetch_add(1, Ordering::SeqCst) + 1;
                    // First run is slow, the refreshed run is fast.
                    let delay = if run == 1 { 100 } else { 10 };
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    Ok(run)
                }
            },
            TrackOptions::default(),
        );
        call.refresh();
        assert_eq!(call.settled().await.unwrap(), 2);

        // Let the first run finish; its result must be dropped.
        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert_eq!(call.data(), Some(2));
    }
}
