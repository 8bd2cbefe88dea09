//! Mock Travis API server.
//!
//! Provides an axum-based HTTP server that simulates the Travis v3 API.

use std::sync::Arc;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::Fixtures;
use super::handlers;
use super::state::MockState;

/// A mock Travis API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a realistic API implementation, `@pagination` blocks included.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns
    /// immediately. Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Fixtures::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `TravisClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Repository routes
            .route("/repos", get(handlers::list_repositories))
            .route("/repo/:repository", get(handlers::get_repository))
            // Build routes
            .route("/repo/:repository/builds", get(handlers::list_builds))
            .route("/build/:id", get(handlers::get_build))
            .route("/build/:id/cancel", post(handlers::cancel_build))
            .route("/build/:id/restart", post(handlers::restart_build))
            // Job routes
            .route("/build/:id/jobs", get(handlers::list_jobs))
            .route("/job/:id", get(handlers::get_job))
            .route("/job/:id/log", get(handlers::get_log))
            // Env var routes
            .route("/repo/:repository/env_vars", get(handlers::list_env_vars))
            .route("/repo/:repository/env_vars", post(handlers::create_env_var))
            .route(
                "/repo/:repository/env_var/:id",
                patch(handlers::update_env_var),
            )
            .route(
                "/repo/:repository/env_var/:id",
                delete(handlers::delete_env_var),
            )
            // User / owner / lint
            .route("/user", get(handlers::get_user))
            .route("/owner/:login/active", get(handlers::get_active))
            .route("/lint", post(handlers::lint))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
