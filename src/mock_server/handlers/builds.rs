//! Build endpoint handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tokio::sync::RwLock;

use super::{collection, not_found, PageQuery};
use crate::mock_server::state::MockState;

/// GET /repo/{repository}/builds
pub async fn list_builds(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(repository): Path<String>,
    Query(page): Query<PageQuery>,
) -> impl IntoResponse {
    let decoded = urlencoding::decode(&repository)
        .map(|s| s.into_owned())
        .unwrap_or(repository);

    let state = state.read().await;
    let Some(repo) = state.find_repository(&decoded) else {
        return not_found("repository");
    };
    let repo_id = repo["id"].as_u64().unwrap_or(0);

    let envelope = collection(
        &format!("/repo/{repo_id}/builds"),
        "builds",
        state.builds_for_repository(repo_id),
        page.limit(),
        page.offset(),
    );
    (StatusCode::OK, Json(envelope)).into_response()
}

/// GET /build/{id}
pub async fn get_build(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let state = state.read().await;
    match state.find_build(id) {
        Some(build) => (StatusCode::OK, Json(build.clone())).into_response(),
        None => not_found("build"),
    }
}

/// POST /build/{id}/cancel
pub async fn cancel_build(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if !state.set_build_state(id, "canceled") {
        return not_found("build");
    }
    state_change_response(id, "cancel")
}

/// POST /build/{id}/restart
pub async fn restart_build(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if !state.set_build_state(id, "created") {
        return not_found("build");
    }
    state_change_response(id, "restart")
}

fn state_change_response(id: u64, change: &str) -> axum::response::Response {
    (
        StatusCode::ACCEPTED,
        Json(json!({
            "@type": "pending",
            "build": { "@href": format!("/build/{id}") },
            "state_change": change
        })),
    )
        .into_response()
}
