//! Periodic background pull.
//!
//! The first pull happens immediately, then once per interval. Each pull
//! fetches products and orders outside the store lock and only takes the lock
//! to apply a successful snapshot. Failed pulls leave local state untouched.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::remote::RemoteClient;
use crate::store::Store;

/// A store shared between the caller and the background pull.
pub type SharedStore = Arc<Mutex<Store>>;

/// Handle to the running pull task.
#[derive(Debug)]
pub struct BackgroundSync {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl BackgroundSync {
    /// Start pulling into `store` every `period`.
    #[must_use]
    pub fn spawn(store: SharedStore, remote: RemoteClient, period: Duration) -> Self {
        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run(store, remote, period, shutdown_rx));
        info!(period_secs = period.as_secs(), "background sync started");
        Self { shutdown, handle }
    }

    /// Stop the task and wait for it to finish.
    ///
    /// A pull already in flight is allowed to complete.
    pub async fn stop(self) {
        // The task may already have exited
        let _ = self.shutdown.send(());
        if let Err(e) = self.handle.await {
            warn!(error = %e, "background sync task failed");
        }
    }
}

async fn run(
    store: SharedStore,
    remote: RemoteClient,
    period: Duration,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut unauthorized = remote.unauthorized();

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("background sync shutting down");
                break;
            }

            _ = interval.tick() => {
                pull(&store, &remote).await;
            }

            result = unauthorized.recv() => {
                match result {
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        warn!("remote API rejected the session token; pulls continue unauthenticated");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("unauthorized channel closed");
                        break;
                    }
                }
            }
        }
    }
}

async fn pull(store: &SharedStore, remote: &RemoteClient) {
    match remote.fetch_snapshot().await {
        Ok(snapshot) => store.lock().await.apply_snapshot(snapshot),
        Err(e) => warn!(error = %e, "background pull failed, keeping cached state"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;
    use crate::cache::MemoryCache;

    #[tokio::test]
    async fn test_failed_pulls_keep_local_state() {
        let cache = Arc::new(MemoryCache::new());
        // Nothing listens on port 9; every pull fails
        let remote =
            RemoteClient::new(&Url::parse("http://127.0.0.1:9/api").unwrap(), cache.clone())
                .unwrap();
        let store: SharedStore = Arc::new(Mutex::new(Store::open(cache, None).unwrap()));

        let sync = BackgroundSync::spawn(store.clone(), remote, Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;
        sync.stop().await;

        assert_eq!(store.lock().await.products().len(), 5);
    }
}
