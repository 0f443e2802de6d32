//! HTTP serving
//!
//! Routing and middleware live in the submodules; this file owns the
//! listener. Binding is a separate step from serving so callers (tests in
//! particular) can bind port 0 and read back the address the OS picked
//! before the first request arrives.

pub mod middleware;
pub mod router;

pub use router::{build_router, AppState, HealthResponse, LoginResponse};

use std::future::Future;
use std::net::{IpAddr, SocketAddr};

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::store::CredentialStore;

/// A bound, not-yet-serving HTTP endpoint
pub struct Server {
    listener: TcpListener,
}

impl Server {
    /// Bind the configured host and port without accepting connections yet
    ///
    /// The host must be a literal IP address; a name that does not parse is
    /// rejected before any bind attempt.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let ip: IpAddr = config
            .host
            .parse()
            .map_err(|_| ServerError::BadHost(config.host.clone()))?;
        let addr = SocketAddr::new(ip, config.port);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self { listener })
    }

    /// The address actually bound
    ///
    /// Differs from the configured one when the configured port is 0.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve the application until `shutdown` resolves
    ///
    /// In-flight requests are drained before this returns.
    pub async fn serve<S: CredentialStore + 'static>(
        self,
        state: AppState<S>,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let app = build_router(state)
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .layer(tower_http::compression::CompressionLayer::new());

        tracing::info!(addr = %self.listener.local_addr()?, "Accepting connections");

        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Listener closed");
        Ok(())
    }
}

/// Listener lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configured host is not a literal IP address
    #[error("invalid listen host {0:?}")]
    BadHost(String),

    /// The configured address could not be bound
    #[error("could not bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while serving
    #[error("server I/O failure: {0}")]
    Io(#[from] std::io::Error),
}
