//! Mock Travis v3 API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Travis
//! API for integration and end-to-end testing. Unlike wiremock which mocks
//! at the HTTP level per-test, this server maintains state across requests
//! and renders the v3 hypermedia envelopes (`@href` links, `@pagination`
//! blocks), enabling realistic follow/paginate workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use travisapi::mock_server::MockServer;
//! use travisapi::TravisClient;
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = TravisClient::new(server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let repos = client.repositories().await.unwrap();
//!     assert!(repos.is_success());
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::Fixtures;
pub use server::MockServer;
pub use state::MockState;
