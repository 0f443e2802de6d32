//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use auth_gate::auth::TokenService;
use auth_gate::server::AppState;
use auth_gate::store::{CredentialStore, MemoryStore};

/// Signing secret shared by all integration test servers
pub const TEST_SECRET: &str = "integration-test-secret";

/// Default token lifetime for test servers (24 hours in milliseconds)
pub const TEST_TTL_MS: i64 = 86_400_000;

/// Create a test application state with a pre-registered "alice" account
pub async fn create_test_state() -> AppState<MemoryStore> {
    create_test_state_with_ttl(TEST_TTL_MS).await
}

/// Create a test application state with a custom token lifetime
pub async fn create_test_state_with_ttl(ttl_ms: i64) -> AppState<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store
        .register("alice", "wonderland")
        .await
        .expect("Failed to seed test account");

    AppState {
        store,
        tokens: Arc::new(TokenService::new(TEST_SECRET, ttl_ms)),
    }
}

/// Run a test server in the background and return the address
/// The server will be shut down when the returned shutdown sender is dropped or sent
pub async fn run_test_server(
    state: AppState<MemoryStore>,
) -> (std::net::SocketAddr, tokio::sync::oneshot::Sender<()>) {
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local address");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let app = auth_gate::server::build_router(state)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Server error");
    });

    // Give the server a moment to start (100ms is sufficient for slow CI systems)
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    (addr, shutdown_tx)
}
