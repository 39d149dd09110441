//! Remote pulls.

use std::sync::Arc;

use tokio::sync::Mutex;
use uhsin_store::{BackgroundSync, SharedStore};

use super::{CommandError, Context};

/// Pull products and orders once.
pub async fn pull(context: &Context) -> Result<(), CommandError> {
    let remote = context.remote()?;
    let snapshot = remote.fetch_snapshot().await?;
    let (products, orders) = (snapshot.products.len(), snapshot.orders.len());

    let mut store = context.open_store()?;
    store.apply_snapshot(snapshot);
    store.close()?;

    println!("Pulled {products} product(s) and {orders} order(s)");
    Ok(())
}

/// Pull at the configured interval until Ctrl-C.
pub async fn watch(context: &Context) -> Result<(), CommandError> {
    let remote = context.remote()?.clone();
    let store: SharedStore = Arc::new(Mutex::new(context.open_store()?));

    let sync = BackgroundSync::spawn(store.clone(), remote, context.config.sync_interval);
    tracing::info!(
        "Watching {} every {}s, press Ctrl-C to stop",
        context.config.api_base_url,
        context.config.sync_interval.as_secs()
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
    }
    sync.stop().await;

    store.lock().await.persist()?;
    tracing::info!("Stopped watching");
    Ok(())
}
