//! Error types for Travis API operations.

use thiserror::Error;

/// Errors that can occur during Travis API operations.
#[derive(Debug, Error)]
pub enum TravisError {
    /// The base URL's host is not a known Travis CI endpoint.
    #[error("Invalid API endpoint '{0}': not a known Travis CI host")]
    InvalidEndpoint(String),

    /// Invalid repository identifier.
    #[error("Invalid repository '{0}': expected a numeric id or an 'owner/name' slug")]
    InvalidRepository(String),

    /// A repository-scoped endpoint was called with no repository selected.
    #[error("No repository selected: call set_repository first")]
    MissingRepository,

    /// An object key requested via `fetch` does not exist.
    #[error("Key '{key}' not found")]
    KeyNotFound { key: String },

    /// A list index requested via `fetch` is out of range.
    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// `follow` was called on a node that carries no `@href` link.
    #[error("Entity is not followable: no '@href' field present")]
    NotFollowable,

    /// `follow` was called on a list-shaped node without an element index.
    #[error("An index is required to follow an entry of a list")]
    IndexRequired,

    /// The requested pagination slot is absent.
    #[error("Response is not paginated or has no '{slot}' page")]
    NoSuchPage { slot: &'static str },

    /// A response body could not be parsed as JSON.
    #[error("Failed to parse response body (status {status}): {source}; body: {body:?}")]
    InvalidBody {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// A stored header cannot be rendered as a valid HTTP header.
    #[error("Invalid header '{0}'")]
    InvalidHeader(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for Travis operations.
pub type Result<T> = core::result::Result<T, TravisError>;
