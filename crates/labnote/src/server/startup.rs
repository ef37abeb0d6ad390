//! Server startup and configuration

use anyhow::{Context, Result};
use axum::serve;
use bentley::activity::ActivityLog;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::server::routing::create_router;
use crate::server::state::AppState;
use crate::snapshot::SnapshotStore;

/// Start the form server and run until Ctrl-C
#[cfg(not(tarpaulin_include))] // Skip coverage - server lifecycle
pub async fn start_server(config: ServerConfig) -> Result<()> {
  let activity = ActivityLog::open(&config.logs_path)
    .with_context(|| format!("Failed to open activity log {}", config.logs_path.display()))?;

  let store = SnapshotStore::new(&config.snapshot_root);
  activity
    .info(&format!("Snapshots are stored in {}", store.root().display()), "labnote-server")
    .await;

  let app = create_router(AppState::new(store, activity.clone()))
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

  let listener =
    TcpListener::bind(config.bind).await.with_context(|| format!("Failed to bind {}", config.bind))?;
  activity.info(&format!("Research note form listening on http://{}", config.bind), "labnote-server").await;

  match serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
    Ok(()) => {
      activity.info("Server shutdown gracefully", "labnote-server").await;
      Ok(())
    }
    Err(e) => {
      activity.error(&format!("Server error: {e}"), "labnote-server").await;
      Err(e.into())
    }
  }
}

#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
}
