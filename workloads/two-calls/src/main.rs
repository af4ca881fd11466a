//! Demo runner for the three fetch patterns.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use two_calls::{
    fetch_pair_eager_first, fetch_pair_sequential, fetch_pair_with_handles, SimulatedSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let source = Arc::new(SimulatedSource);

    info!("parallel fetch, first call eager");
    let pair = fetch_pair_eager_first(&source).await?;
    info!(
        data1 = ?pair.data1.get(),
        pending2 = pair.pending2.get(),
        "first call ready"
    );

    info!("parallel fetch with raw handles");
    let handles = fetch_pair_with_handles(&source);
    let first = handles.call1.settled().await?;
    info!(?first, pending2 = handles.pending2.get(), "first handle settled");
    let second = handles.call2.settled().await?;
    info!(?second, "second handle settled");

    let pair = fetch_pair_sequential(&source).await?;
    info!(
        data1 = ?pair.data1.get(),
        data2 = ?pair.data2.get(),
        "sequential fetch finished"
    );

    Ok(())
}
