//! HTTP layer
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  router   routes, CORS, tracing, static files │
//! └───────────────┬───────────────────────────────┘
//!                 │
//! ┌───────────────▼───────────────────────────────┐
//! │  handlers  request normalization (dto)        │
//! │            RiskClassifier, ExpertStore calls  │
//! └───────────────┬───────────────────────────────┘
//!                 │
//! ┌───────────────▼───────────────────────────────┐
//! │  AppState  Arc<dyn ExpertStore> + classifier  │
//! └───────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;

use tokio::net::TcpListener;
use tracing::info;

/// Bind the configured address and serve until Ctrl-C
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let addr = state.config.http.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        addr = %listener.local_addr()?,
        strategy = %state.classifier.strategy(),
        "diabscreen listening"
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
