//! Periodic refresh of a remote resource
//!
//! A [`Poller`] fires a fetch on every tick without waiting for the previous
//! one, so requests may overlap. Each fetch carries a generation number and is
//! published only if it is newer than what is already on display. Stopping or
//! dropping the poller cancels the timer and suppresses late responses.

use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// One published fetch result
#[derive(Debug)]
pub struct Snapshot<T> {
    pub generation: u64,
    pub fetched_at: DateTime<Utc>,
    pub data: T,
}

pub type SnapshotReceiver<T> = watch::Receiver<Option<Arc<Snapshot<T>>>>;

/// Repeating fetch task with a teardown hook
pub struct Poller<T> {
    name: String,
    cancel: CancellationToken,
    rx: SnapshotReceiver<T>,
    task: Option<JoinHandle<()>>,
}

impl<T: Send + Sync + 'static> Poller<T> {
    /// Start polling; the first fetch fires immediately
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut, E>(name: impl Into<String>, interval: Duration, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let name = name.into();
        let cancel = CancellationToken::new();
        let (tx, rx) = watch::channel(None);
        let tx = Arc::new(tx);

        let task = tokio::spawn(run_loop(
            name.clone(),
            interval,
            fetch,
            tx,
            cancel.clone(),
        ));

        Self {
            name,
            cancel,
            rx,
            task: Some(task),
        }
    }

    /// Latest published snapshot, if any
    pub fn latest(&self) -> Option<Arc<Snapshot<T>>> {
        self.rx.borrow().clone()
    }

    /// Independent receiver for a view that renders this resource
    pub fn subscribe(&self) -> SnapshotReceiver<T> {
        self.rx.clone()
    }

    /// Wait for the next published snapshot; `None` once the poller is gone
    pub async fn changed(&mut self) -> Option<Arc<Snapshot<T>>> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel the timer and any in-flight fetch, then wait for the task to end
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Poller '{}' task ended abnormally: {}", self.name, e);
            }
        }
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_loop<T, F, Fut, E>(
    name: String,
    interval: Duration,
    fetch: F,
    tx: Arc<watch::Sender<Option<Arc<Snapshot<T>>>>>,
    cancel: CancellationToken,
) where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut in_flight = JoinSet::new();
    let mut generation = 0u64;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                generation += 1;
                debug!("Poller '{}' firing generation {}", name, generation);

                let request = fetch();
                let tx = tx.clone();
                let cancel = cancel.clone();
                let name = name.clone();
                let gen = generation;

                in_flight.spawn(async move {
                    let result = tokio::select! {
                        _ = cancel.cancelled() => return,
                        result = request => result,
                    };
                    match result {
                        Ok(data) => publish(&name, &tx, &cancel, gen, data),
                        Err(e) => warn!("Poller '{}' generation {} failed: {}", name, gen, e),
                    }
                });
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }

    in_flight.shutdown().await;
    debug!("Poller '{}' stopped after {} generations", name, generation);
}

/// Publish unless cancelled or a newer generation is already shown
fn publish<T>(
    name: &str,
    tx: &watch::Sender<Option<Arc<Snapshot<T>>>>,
    cancel: &CancellationToken,
    generation: u64,
    data: T,
) {
    let mut data = Some(data);
    let published = tx.send_if_modified(|current| {
        if cancel.is_cancelled() {
            return false;
        }
        if current.as_ref().is_some_and(|s| s.generation >= generation) {
            return false;
        }
        match data.take() {
            Some(data) => {
                *current = Some(Arc::new(Snapshot {
                    generation,
                    fetched_at: Utc::now(),
                    data,
                }));
                true
            }
            None => false,
        }
    });

    if !published {
        debug!(
            "Poller '{}' dropped generation {} (stale or cancelled)",
            name, generation
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_publishes_snapshots() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut poller = Poller::spawn("count", Duration::from_millis(10), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<_, String>(n) }
        });

        let first = poller.changed().await.unwrap();
        assert!(first.generation >= 1);
        assert_eq!(first.data as u64, first.generation - 1);

        let next = poller.changed().await.unwrap();
        assert!(next.generation > first.generation);

        poller.stop().await;
        assert!(calls.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_slow_stale_response_does_not_overwrite() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let poller = Poller::spawn("stale", Duration::from_millis(20), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    // First request resolves long after later ones
                    tokio::time::sleep(Duration::from_millis(150)).await;
                    Ok::<_, String>("slow")
                } else {
                    Ok("fast")
                }
            }
        });

        tokio::time::sleep(Duration::from_millis(250)).await;
        let latest = poller.latest().unwrap();
        assert_eq!(latest.data, "fast");
        assert!(latest.generation > 1);

        poller.stop().await;
    }

    #[tokio::test]
    async fn test_stop_suppresses_in_flight_response() {
        let poller = Poller::spawn("teardown", Duration::from_secs(30), || async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, String>(42)
        });
        let view = poller.subscribe();

        tokio::time::sleep(Duration::from_millis(20)).await;
        poller.stop().await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(view.borrow().is_none());
    }

    #[tokio::test]
    async fn test_drop_cancels() {
        let poller = Poller::spawn("drop", Duration::from_secs(30), || async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, String>(1)
        });
        let view = poller.subscribe();
        drop(poller);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(view.borrow().is_none());
    }

    #[tokio::test]
    async fn test_error_keeps_last_good_snapshot() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut poller = Poller::spawn("errors", Duration::from_millis(10), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Ok("good")
                } else {
                    Err("backend down")
                }
            }
        });

        let first = poller.changed().await.unwrap();
        assert_eq!(first.data, "good");

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(calls.load(Ordering::SeqCst) > 1);
        let latest = poller.latest().unwrap();
        assert_eq!(latest.data, "good");
        assert_eq!(latest.generation, 1);

        poller.stop().await;
    }
}
