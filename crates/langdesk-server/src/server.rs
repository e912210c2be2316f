use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::DeskConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// The dashboard HTTP server.
pub struct DeskServer {
    state: Arc<AppState>,
}

impl DeskServer {
    /// Open every configured project and prepare the server.
    pub fn new(config: DeskConfig) -> Self {
        Self::with_state(AppState::from_config(config))
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.state.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Bind `bind_addr`, moving to the next port while the current one is
    /// in use, at most `port_attempts` times.
    pub async fn bind(&self) -> ServerResult<TcpListener> {
        let base = self.config().bind_addr;
        let attempts = self.config().port_attempts.max(1);
        let mut last_err = None;

        for offset in 0..attempts {
            let Some(port) = base.port().checked_add(offset) else {
                break;
            };
            let addr = SocketAddr::new(base.ip(), port);
            match TcpListener::bind(addr).await {
                Ok(listener) => return Ok(listener),
                Err(e) if e.kind() == ErrorKind::AddrInUse => {
                    warn!(%addr, "port in use, trying the next one");
                    last_err = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(match last_err {
            Some(e) => ServerError::Io(e),
            None => ServerError::Config(format!("no usable port from {base}")),
        })
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = self.bind().await?;
        let local = listener.local_addr()?;
        info!(
            "langdesk listening on http://{local} ({} projects)",
            self.state.project_names().len()
        );
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}
