//! Travis API client.
//!
//! Low-level HTTP client that holds the request context (base URL,
//! repository, query options, headers) and issues raw requests. Endpoint
//! methods live in `endpoints.rs`; response navigation in `document.rs`.

use std::env;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::Value;
use url::{Host, Url};

use crate::error::{Result, TravisError};
use crate::response::ApiResponse;
use crate::store::Store;

/// Endpoint for repositories hosted on travis-ci.com.
pub const COM_URL: &str = "https://api.travis-ci.com";
/// Endpoint for open-source repositories on travis-ci.org.
pub const ORG_URL: &str = "https://api.travis-ci.org";

/// Hosts accepted as API endpoints, besides loopback addresses.
const KNOWN_HOSTS: [&str; 4] = [
    "api.travis-ci.com",
    "api.travis-ci.org",
    "api-staging.travis-ci.com",
    "api-staging.travis-ci.org",
];

const USER_AGENT: &str = concat!("travisapi/", env!("CARGO_PKG_VERSION"));

/// Protocol version marker sent with every request.
const API_VERSION: &str = "3";

/// Default page-size limit applied to every context.
const DEFAULT_LIMIT: &str = "25";

/// Low-level Travis API client.
///
/// Holds the base endpoint URL, the current repository (if any), and the
/// mutable query-option and header stores that are attached to every
/// request issued through it.
///
/// This struct is cheaply cloneable; clones share the same underlying
/// connection pool AND the same option/header stores, so a mutation through
/// one clone affects requests issued through any other. Do not mutate the
/// stores from multiple threads without external coordination.
///
/// # Example
///
/// ```no_run
/// use travisapi::TravisClient;
///
/// # fn example() -> travisapi::Result<()> {
/// // Create from environment variables
/// let client = TravisClient::from_env()?;
///
/// // Or configure manually
/// let client = TravisClient::org()?;
/// client.authenticate("your-api-token");
/// client.set_repository("rust-lang/rust")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TravisClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: Url,
    repository: RwLock<Option<String>>,
    options: RwLock<Store>,
    headers: RwLock<Store>,
}

impl std::fmt::Debug for TravisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Headers are redacted: they may carry the auth token.
        f.debug_struct("TravisClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("repository", &self.current_repository())
            .finish_non_exhaustive()
    }
}

impl TravisClient {
    /// Create a client from environment variables.
    ///
    /// Uses `TRAVIS_API_URL` for the base URL (defaults to the
    /// travis-ci.com endpoint) and optionally `TRAVIS_TOKEN` for
    /// authentication.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is invalid.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("TRAVIS_API_URL").unwrap_or_else(|_| COM_URL.to_string());
        let client = Self::new(&base_url)?;
        if let Ok(token) = env::var("TRAVIS_TOKEN") {
            client.authenticate(&token);
        }
        Ok(client)
    }

    /// Create a client for the travis-ci.com endpoint.
    pub fn com() -> Result<Self> {
        Self::new(COM_URL)
    }

    /// Create a client for the travis-ci.org endpoint.
    pub fn org() -> Result<Self> {
        Self::new(ORG_URL)
    }

    /// Create a new client for the given base URL.
    ///
    /// The host must be a known Travis CI API host or a loopback address
    /// (loopback is accepted so tests can point at a local mock server).
    /// The context starts with the default headers (`Content-Type`,
    /// `Accept`, `Travis-API-Version`) and the default `limit=25` query
    /// option.
    ///
    /// # Errors
    ///
    /// `TravisError::Url` if the URL does not parse,
    /// `TravisError::InvalidEndpoint` if the host is not allowed.
    pub fn new(base_url: &str) -> Result<Self> {
        // Ensure base URL ends with / so joins behave uniformly
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;
        validate_endpoint(&base_url)?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(TravisError::Http)?;

        let headers: Store = [
            ("Content-Type", "application/json"),
            ("Accept", "application/json"),
            ("Travis-API-Version", API_VERSION),
        ]
        .into_iter()
        .collect();

        let options: Store = [("limit", DEFAULT_LIMIT)].into_iter().collect();

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                repository: RwLock::new(None),
                options: RwLock::new(options),
                headers: RwLock::new(headers),
            }),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Attach a static access token to all subsequent requests.
    pub fn authenticate(&self, token: &str) {
        self.headers_write().set("Authorization", format!("token {token}"));
    }

    /// Select the repository that repo-scoped endpoints operate on.
    ///
    /// Accepts either a numeric id (`"123"`) or an `owner/name` slug with
    /// exactly one separator and non-empty segments.
    ///
    /// # Errors
    ///
    /// `TravisError::InvalidRepository` for anything else; no request is
    /// attempted.
    pub fn set_repository(&self, repository: &str) -> Result<()> {
        validate_repository(repository)?;
        *self.repository_write() = Some(repository.to_string());
        Ok(())
    }

    /// Clear the current repository selection.
    pub fn clear_repository(&self) {
        *self.repository_write() = None;
    }

    /// The currently selected repository, if any.
    pub fn current_repository(&self) -> Option<String> {
        self.repository_read().clone()
    }

    /// The current repository rendered as a URL path segment:
    /// numeric ids pass through, slugs are percent-encoded.
    pub(crate) fn repository_segment(&self) -> Result<String> {
        match self.current_repository() {
            Some(repo) => Ok(encode_repository(&repo)),
            None => Err(TravisError::MissingRepository),
        }
    }

    /// Snapshot of the current query options.
    pub fn options(&self) -> Store {
        self.options_read().clone()
    }

    /// Mutate the query options in place.
    ///
    /// The change affects every subsequent request issued through this
    /// context (and all its clones).
    pub fn with_options(&self, mutate: impl FnOnce(&mut Store)) {
        mutate(&mut self.options_write());
    }

    /// Snapshot of the current headers.
    pub fn headers(&self) -> Store {
        self.headers_read().clone()
    }

    /// Mutate the headers in place.
    pub fn with_headers(&self, mutate: impl FnOnce(&mut Store)) {
        mutate(&mut self.headers_write());
    }

    /// Snapshot the query options for a temporary override.
    ///
    /// The returned guard restores the snapshot when dropped, on every exit
    /// path (`?`, early return, panic), so one request can run with
    /// different options without polluting the context:
    ///
    /// ```no_run
    /// # async fn example(client: &travisapi::TravisClient) -> travisapi::Result<()> {
    /// let _restore = client.scoped_options();
    /// client.with_options(|options| {
    ///     options.remove("limit");
    /// });
    /// client.delete("/repo/1/env_var/abc").await?;
    /// // options restored here
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// Not reentrancy-safe: overlapping guards on the same context restore
    /// in drop order, last one wins.
    pub fn scoped_options(&self) -> ScopedOptions {
        ScopedOptions {
            client: self.clone(),
            saved: Some(self.options()),
        }
    }

    /// Make a GET request.
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send_request(Method::GET, path, Payload::None).await
    }

    /// Make a bodyless POST request (state-change actions).
    pub async fn post(&self, path: &str) -> Result<ApiResponse> {
        self.send_request(Method::POST, path, Payload::None).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.send_request(Method::POST, path, Payload::Json(body)).await
    }

    /// Make a POST request with a pre-serialized raw body.
    pub async fn post_raw(&self, path: &str, body: String) -> Result<ApiResponse> {
        self.send_request(Method::POST, path, Payload::Raw(body)).await
    }

    /// Make a PATCH request with a JSON body.
    pub async fn patch_json(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.send_request(Method::PATCH, path, Payload::Json(body)).await
    }

    /// Make a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send_request(Method::DELETE, path, Payload::None).await
    }

    /// Issue one request and wrap the response.
    ///
    /// Connection-level failures propagate as `TravisError::Http`; a non-2xx
    /// status is NOT an error here — it comes back as a navigable
    /// RequestError response.
    #[tracing::instrument(skip(self, payload), fields(base = %self.inner.base_url))]
    async fn send_request(
        &self,
        method: Method,
        path: &str,
        payload: Payload<'_>,
    ) -> Result<ApiResponse> {
        let url = self.resolve(path)?;
        let headers = self.header_map()?;

        let mut builder = self.inner.http.request(method, url).headers(headers);
        builder = match payload {
            Payload::None => builder,
            Payload::Json(body) => builder.json(body),
            Payload::Raw(body) => builder.body(body),
        };

        let response = builder.send().await.map_err(TravisError::Http)?;
        ApiResponse::from_http(self.clone(), response).await
    }

    /// Resolve a path or href against the base URL and merge in the query
    /// options.
    ///
    /// Parameters the path/href already carries win; the store's pairs are
    /// appended for keys not present, in store order. Pagination hrefs keep
    /// their `offset` this way while still carrying the context's `limit`.
    fn resolve(&self, path: &str) -> Result<Url> {
        let mut url = self.inner.base_url.join(path)?;

        let existing: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        let to_append: Vec<(String, String)> = self
            .options_read()
            .iter()
            .filter(|(k, _)| !existing.iter().any(|e| e == k))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        if !to_append.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &to_append {
                pairs.append_pair(k, v);
            }
        }

        Ok(url)
    }

    /// Render the header store into a reqwest header map.
    fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (key, value) in self.headers_read().iter() {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| TravisError::InvalidHeader(key.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| TravisError::InvalidHeader(key.to_string()))?;
            map.insert(name, value);
        }
        Ok(map)
    }

    fn options_read(&self) -> RwLockReadGuard<'_, Store> {
        self.inner.options.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn options_write(&self) -> RwLockWriteGuard<'_, Store> {
        self.inner.options.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn headers_read(&self) -> RwLockReadGuard<'_, Store> {
        self.inner.headers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn headers_write(&self) -> RwLockWriteGuard<'_, Store> {
        self.inner.headers.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn repository_read(&self) -> RwLockReadGuard<'_, Option<String>> {
        self.inner.repository.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn repository_write(&self) -> RwLockWriteGuard<'_, Option<String>> {
        self.inner.repository.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Request body variants.
enum Payload<'a> {
    None,
    Json(&'a Value),
    Raw(String),
}

/// Guard restoring a snapshotted option store on drop.
///
/// See [`TravisClient::scoped_options`].
#[must_use = "dropping the guard immediately restores the options"]
pub struct ScopedOptions {
    client: TravisClient,
    saved: Option<Store>,
}

impl Drop for ScopedOptions {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            *self.client.options_write() = saved;
        }
    }
}

fn validate_endpoint(url: &Url) -> Result<()> {
    let allowed = match url.host() {
        Some(Host::Domain(domain)) => {
            domain == "localhost" || KNOWN_HOSTS.contains(&domain)
        }
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(TravisError::InvalidEndpoint(url.to_string()))
    }
}

pub(crate) fn validate_repository(repository: &str) -> Result<()> {
    if !repository.is_empty() && repository.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(());
    }
    let mut segments = repository.split('/');
    let valid = matches!(
        (segments.next(), segments.next(), segments.next()),
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
    );
    if valid {
        Ok(())
    } else {
        Err(TravisError::InvalidRepository(repository.to_string()))
    }
}

/// Percent-encode a repository identifier for use in a path.
pub(crate) fn encode_repository(repository: &str) -> String {
    if repository.bytes().all(|b| b.is_ascii_digit()) {
        repository.to_string()
    } else {
        urlencoding::encode(repository).into_owned()
    }
}
