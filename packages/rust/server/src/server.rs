use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use sitetriage_core::Scanner;
use sitetriage_shared::{Result, TriageError};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::routes::{AppState, create_routes};

/// A bound, not yet serving, SiteTriage HTTP server.
pub struct TriageServer {
    listener: TcpListener,
    app: Router,
}

impl TriageServer {
    /// Bind `addr` (port `0` picks a free port) and build the router.
    pub async fn bind(addr: &str, scanner: Scanner) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| TriageError::Network(format!("failed to bind {addr}: {e}")))?;

        let app = create_routes(AppState::new(scanner)).layer(TraceLayer::new_for_http());

        Ok(Self { listener, app })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| TriageError::Network(format!("listener has no address: {e}")))
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves; in-flight requests are drained.
    pub async fn run_until(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        if let Ok(addr) = self.listener.local_addr() {
            info!(%addr, "sitetriage server listening");
        }

        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| TriageError::Network(format!("server error: {e}")))
    }
}

/// Resolve on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("received shutdown signal");
}
