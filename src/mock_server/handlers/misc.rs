//! User, owner and lint endpoint handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

/// GET /user
pub async fn get_user() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "@type": "user",
            "@href": "/user",
            "id": 1,
            "login": "tester",
            "name": "Test User"
        })),
    )
}

/// GET /owner/{login}/active
pub async fn get_active(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(login): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;
    let prefix = format!("{login}/");

    // Active = builds in flight on any of the owner's repositories.
    let repo_ids: Vec<u64> = state
        .repositories
        .iter()
        .filter(|r| {
            r["slug"]
                .as_str()
                .map(|s| s.starts_with(&prefix))
                .unwrap_or(false)
        })
        .filter_map(|r| r["id"].as_u64())
        .collect();

    let active: Vec<_> = state
        .builds
        .iter()
        .filter(|b| {
            repo_ids.contains(&b["repository_id"].as_u64().unwrap_or(0))
                && matches!(b["state"].as_str(), Some("created") | Some("started"))
        })
        .cloned()
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "@type": "active",
            "@href": format!("/owner/{login}/active"),
            "builds": active
        })),
    )
}

/// POST /lint
pub async fn lint(body: String) -> impl IntoResponse {
    let warnings = if body.trim().is_empty() {
        vec![json!({
            "key": [],
            "message": "empty configuration"
        })]
    } else {
        vec![]
    };

    (
        StatusCode::OK,
        Json(json!({
            "@type": "lint",
            "warnings": warnings
        })),
    )
}
