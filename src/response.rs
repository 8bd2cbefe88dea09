//! Response wrapper binding transport metadata to a navigable document.

use std::fmt;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use crate::client::TravisClient;
use crate::document::{Document, Item, Segment};
use crate::error::{Result, TravisError};
use crate::pagination::Pager;

/// Status codes the Travis v3 API uses for successful operations.
const SUCCESS_STATUSES: [u16; 3] = [200, 201, 202];

/// Whether a response is a success or an application-level error.
///
/// Chosen once from the status code at construction and never re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Status 200, 201 or 202.
    Success,
    /// Any other status. The body is still parsed and navigable, so the
    /// structured error payload can be inspected without error handling.
    RequestError,
}

/// One HTTP response from the Travis API, parsed and navigable.
///
/// Keeps the raw transport view (status, headers, final URL, body text)
/// alongside the parsed-JSON view; the two never conflict because the
/// metadata is read straight from the transport response. All [`Document`]
/// navigation is forwarded, so common access patterns need no explicit
/// unwrapping:
///
/// ```no_run
/// # async fn example() -> travisapi::Result<()> {
/// let client = travisapi::TravisClient::from_env()?;
/// let repos = client.repositories().await?;
/// for repo in repos.get("repositories").into_document().unwrap().items() {
///     println!("{:?}", repo.get("slug"));
/// }
/// # Ok(())
/// # }
/// ```
pub struct ApiResponse {
    client: TravisClient,
    outcome: Outcome,
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    body: String,
    document: Document,
}

impl ApiResponse {
    /// Consume a transport response into an `ApiResponse`.
    ///
    /// # Errors
    ///
    /// `TravisError::Http` if the body cannot be read;
    /// `TravisError::InvalidBody` if it is not valid JSON — a malformed
    /// body is fatal, never silently treated as empty.
    pub(crate) async fn from_http(
        client: TravisClient,
        response: reqwest::Response,
    ) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = response.text().await.map_err(TravisError::Http)?;
        Self::from_parts(client, status, headers, url, body)
    }

    pub(crate) fn from_parts(
        client: TravisClient,
        status: StatusCode,
        headers: HeaderMap,
        url: Url,
        body: String,
    ) -> Result<Self> {
        let value: Value =
            serde_json::from_str(&body).map_err(|source| TravisError::InvalidBody {
                status: status.as_u16(),
                body: body.clone(),
                source,
            })?;

        let outcome = if SUCCESS_STATUSES.contains(&status.as_u16()) {
            Outcome::Success
        } else {
            Outcome::RequestError
        };

        let document = Document::new(client.clone(), value);

        Ok(Self {
            client,
            outcome,
            status,
            headers,
            url,
            body,
            document,
        })
    }

    /// The fixed success/error discriminant.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Returns true for status 200, 201 or 202.
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    /// Returns true for any other status.
    pub fn is_error(&self) -> bool {
        self.outcome == Outcome::RequestError
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers, as received.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The final URL the response came from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The raw body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The navigable view over the parsed body.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Pagination helper bound to this response.
    pub fn pager(&self) -> Pager {
        Pager::new(self.client.clone(), self.document.clone())
    }

    // Navigation, forwarded to the document.

    /// See [`Document::get`].
    pub fn get(&self, segment: impl Into<Segment>) -> Item {
        self.document.get(segment)
    }

    /// See [`Document::fetch`].
    pub fn fetch(&self, segment: impl Into<Segment>) -> Result<Item> {
        self.document.fetch(segment)
    }

    /// See [`Document::fetch_or`].
    pub fn fetch_or(&self, segment: impl Into<Segment>, default: impl FnOnce() -> Value) -> Item {
        self.document.fetch_or(segment, default)
    }

    /// See [`Document::dig`].
    pub fn dig<I>(&self, path: I) -> Item
    where
        I: IntoIterator,
        I::Item: Into<Segment>,
    {
        self.document.dig(path)
    }

    /// See [`Document::first`].
    pub fn first(&self) -> Item {
        self.document.first()
    }

    /// See [`Document::last`].
    pub fn last(&self) -> Item {
        self.document.last()
    }

    /// See [`Document::entries`].
    pub fn entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.document.entries()
    }

    /// See [`Document::items`].
    pub fn items(&self) -> Vec<Document> {
        self.document.items()
    }

    /// See [`Document::keys`].
    pub fn keys(&self) -> Vec<&str> {
        self.document.keys()
    }

    /// See [`Document::values`].
    pub fn values(&self) -> Vec<&Value> {
        self.document.values()
    }

    /// See [`Document::len`].
    pub fn len(&self) -> usize {
        self.document.len()
    }

    /// See [`Document::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// See [`Document::contains_key`].
    pub fn contains_key(&self, key: &str) -> bool {
        self.document.contains_key(key)
    }

    /// Follow the top-level document's `@href` link.
    pub async fn follow(&self) -> Result<ApiResponse> {
        self.document.follow().await
    }

    /// Select an element of a list-shaped body and follow its link.
    pub async fn follow_entry(&self, index: i64) -> Result<ApiResponse> {
        self.document.follow_entry(index).await
    }
}

impl fmt::Debug for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiResponse")
            .field("outcome", &self.outcome)
            .field("status", &self.status)
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: &str) -> Result<ApiResponse> {
        let client = TravisClient::new("https://api.travis-ci.org").unwrap();
        ApiResponse::from_parts(
            client,
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            Url::parse("https://api.travis-ci.org/repos").unwrap(),
            body.to_string(),
        )
    }

    #[test]
    fn test_success_statuses() {
        for status in [200, 201, 202] {
            let resp = response(status, "{}").unwrap();
            assert!(resp.is_success(), "status {status} should be a success");
            assert!(!resp.is_error());
        }
    }

    #[test]
    fn test_error_statuses() {
        for status in [204, 301, 400, 404, 500] {
            let resp = response(status, "{}").unwrap();
            assert_eq!(resp.outcome(), Outcome::RequestError);
            assert!(resp.is_error());
        }
    }

    #[test]
    fn test_forwards_values_and_lazy_default() {
        let resp = response(200, r#"{"id":1,"slug":"rust-lang/rust"}"#).unwrap();

        let values = resp.values();
        assert_eq!(values.len(), 2);
        assert!(values.contains(&&json!("rust-lang/rust")));

        assert_eq!(resp.fetch_or("slug", || json!("fallback")), json!("rust-lang/rust"));
        assert_eq!(resp.fetch_or("missing", || json!("fallback")), json!("fallback"));
    }

    #[test]
    fn test_error_response_is_navigable() {
        let resp = response(404, r#"{"error_message":"not found"}"#).unwrap();

        assert!(resp.is_error());
        assert_eq!(resp.get("error_message"), json!("not found"));
        assert_eq!(resp.status().as_u16(), 404);
    }

    #[test]
    fn test_malformed_body_is_fatal_with_context() {
        match response(200, "not json") {
            Err(TravisError::InvalidBody { status, body, .. }) => {
                assert_eq!(status, 200);
                assert_eq!(body, "not json");
            }
            other => panic!("expected InvalidBody, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_body_is_malformed() {
        assert!(matches!(
            response(200, ""),
            Err(TravisError::InvalidBody { .. })
        ));
    }

    #[test]
    fn test_navigation_round_trips_parsed_body() {
        let body = r#"{"id":42,"owner":{"login":"x"},"tags":[1,2]}"#;
        let resp = response(200, body).unwrap();
        let direct: Value = serde_json::from_str(body).unwrap();

        assert_eq!(resp.get("id"), direct["id"]);
        assert_eq!(resp.get("owner"), direct["owner"]);
        assert_eq!(resp.dig(["owner", "login"]), direct["owner"]["login"]);
        assert_eq!(resp.get("tags").get(1), direct["tags"][1]);
        assert_eq!(resp.body(), body);
    }

    #[test]
    fn test_metadata_alongside_parsed_view() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", "abc".parse().unwrap());
        let client = TravisClient::new("https://api.travis-ci.org").unwrap();
        let resp = ApiResponse::from_parts(
            client,
            StatusCode::OK,
            headers,
            Url::parse("https://api.travis-ci.org/repos?limit=25").unwrap(),
            r#"{"ok":true}"#.to_string(),
        )
        .unwrap();

        assert_eq!(resp.headers()["x-request-id"], "abc");
        assert_eq!(resp.url().query(), Some("limit=25"));
        assert_eq!(resp.get("ok"), json!(true));
    }
}
