//! Travis CI v3 API client library.
//!
//! A Rust library for interacting with the Travis CI v3 REST API. Instead
//! of typed models per resource, responses are wrapped in a navigable
//! [`Document`] that mirrors the API's hypermedia shape: nested containers
//! re-wrap transparently, `@href` links resolve with [`Document::follow`],
//! and paginated collections chain through [`ApiResponse::pager`].
//!
//! # Quick Start
//!
//! ```no_run
//! use travisapi::TravisClient;
//!
//! #[tokio::main]
//! async fn main() -> travisapi::Result<()> {
//!     // Create client from environment variables
//!     let client = TravisClient::from_env()?;
//!     client.set_repository("rust-lang/rust")?;
//!
//!     // First page of builds
//!     let builds = client.builds().await?;
//!     for build in builds.get("builds").into_document().unwrap().items() {
//!         println!("#{:?} {:?}", build.get("number"), build.get("state"));
//!     }
//!
//!     // Follow the first build's link to the full resource
//!     let first = builds.get("builds").follow_entry(0).await?;
//!     println!("started at {:?}", first.get("started_at"));
//!
//!     // Next page, if any
//!     if builds.pager().has_next() {
//!         let next = builds.pager().next().await?;
//!         println!("{} more builds", next.get("builds").into_document().unwrap().len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`TravisClient`] — the request context: base URL (validated against
//!   the known Travis hosts), current repository, and the mutable
//!   query-option and header stores attached to every request.
//! - [`ApiResponse`] — one HTTP response: transport metadata plus the
//!   parsed, navigable body. Status 200/201/202 is [`Outcome::Success`];
//!   anything else is [`Outcome::RequestError`] but stays fully navigable.
//! - [`Document`] / [`Item`] — the navigation core over untyped JSON.
//! - [`Pager`] — first/next/last traversal over `@pagination` links.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `TRAVIS_API_URL` (optional) - Base URL (defaults to `https://api.travis-ci.com`)
//! - `TRAVIS_TOKEN` (optional) - Access token sent as `Authorization: token <t>`

mod client;
mod document;
mod endpoints;
mod error;
mod pagination;
mod response;
mod store;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{ScopedOptions, TravisClient, COM_URL, ORG_URL};
pub use document::{Document, Item, Segment};
pub use error::{Result, TravisError};
pub use pagination::Pager;
pub use response::{ApiResponse, Outcome};
pub use store::Store;
