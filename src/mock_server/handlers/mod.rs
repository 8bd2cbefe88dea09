//! HTTP request handlers for the mock server.

pub mod builds;
pub mod env_vars;
pub mod jobs;
pub mod misc;
pub mod repositories;

pub use builds::*;
pub use env_vars::*;
pub use jobs::*;
pub use misc::*;
pub use repositories::*;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

/// Pagination query parameters accepted by collection endpoints.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl PageQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(25).max(1)
    }

    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}

/// Render a v3 collection envelope with its `@pagination` block.
///
/// `path` is the collection's canonical href, `key` the member name the
/// page items live under. Edge slots (`next` on the last page) are null.
pub(crate) fn collection(
    path: &str,
    key: &str,
    all: Vec<Value>,
    limit: usize,
    offset: usize,
) -> Value {
    let total = all.len();
    let page: Vec<Value> = all.into_iter().skip(offset).take(limit).collect();
    let is_first = offset == 0;
    let is_last = offset + limit >= total;

    let slot = |o: usize| json!({ "@href": format!("{path}?limit={limit}&offset={o}") });
    let next = if is_last { Value::Null } else { slot(offset + limit) };
    let last_offset = if total == 0 {
        0
    } else {
        ((total - 1) / limit) * limit
    };

    json!({
        "@type": key,
        "@href": path,
        "@representation": "standard",
        key: page,
        "@pagination": {
            "limit": limit,
            "offset": offset,
            "count": total,
            "is_first": is_first,
            "is_last": is_last,
            "first": slot(0),
            "next": next,
            "last": slot(last_offset)
        }
    })
}

/// A v3-style not-found error response.
pub(crate) fn not_found(resource: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "@type": "error",
            "error_type": "not_found",
            "error_message": format!("{resource} not found (or insufficient access)"),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_middle_page_links() {
        let all: Vec<Value> = (0..30).map(|i| json!({"id": i})).collect();
        let envelope = collection("/repos", "repositories", all, 10, 10);

        assert_eq!(envelope["repositories"].as_array().unwrap().len(), 10);
        assert_eq!(envelope["repositories"][0]["id"], 10);
        let pagination = &envelope["@pagination"];
        assert_eq!(pagination["first"]["@href"], "/repos?limit=10&offset=0");
        assert_eq!(pagination["next"]["@href"], "/repos?limit=10&offset=20");
        assert_eq!(pagination["last"]["@href"], "/repos?limit=10&offset=20");
        assert_eq!(pagination["is_first"], false);
        assert_eq!(pagination["is_last"], false);
    }

    #[test]
    fn test_collection_last_page_has_null_next() {
        let all: Vec<Value> = (0..5).map(|i| json!({"id": i})).collect();
        let envelope = collection("/repos", "repositories", all, 25, 0);

        assert!(envelope["@pagination"]["next"].is_null());
        assert_eq!(envelope["@pagination"]["is_last"], true);
    }

    #[test]
    fn test_collection_empty() {
        let envelope = collection("/repos", "repositories", vec![], 25, 0);
        assert_eq!(envelope["@pagination"]["count"], 0);
        assert_eq!(envelope["repositories"].as_array().unwrap().len(), 0);
    }
}
