//! Slotwatch - signup slot availability service for the Team Open dashboard
//!
//! Fetches the registered team count from the registration backend on demand
//! and exposes the remaining signup slots to overlay and dashboard views.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod state;
pub mod tracker;

pub use config::{load_config, Config};
pub use error::{Result, SlotwatchError};
pub use tracker::SlotTracker;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::io::ReqwestHttpClient;

/// Run the slotwatch service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let timeout = Duration::from_secs(config.backend.request_timeout_seconds);
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new(timeout)?);

    let tracker = Arc::new(SlotTracker::new(
        &config.backend.base_url,
        config.event.capacity,
        http,
    ));
    let cancel = CancellationToken::new();

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    // Warm the cache so the first overlay poll already has a value
    tracker.refresh(false).await;

    if !config.dashboard.enabled {
        tracing::info!("Dashboard disabled, idling until shutdown");
        cancel.cancelled().await;
        return Ok(());
    }

    let router = dashboard::build_router(Arc::clone(&tracker));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.dashboard.port));
    tracing::info!("Dashboard listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::info!("Slotwatch stopped");
    Ok(())
}
