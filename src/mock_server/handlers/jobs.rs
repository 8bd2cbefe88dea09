//! Job and log endpoint handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tokio::sync::RwLock;

use super::not_found;
use crate::mock_server::state::MockState;

/// GET /build/{id}/jobs
pub async fn list_jobs(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(build_id): Path<u64>,
) -> impl IntoResponse {
    let state = state.read().await;
    if state.find_build(build_id).is_none() {
        return not_found("build");
    }

    // Job collections are not paginated in v3.
    let envelope = json!({
        "@type": "jobs",
        "@href": format!("/build/{build_id}/jobs"),
        "jobs": state.jobs_for_build(build_id)
    });
    (StatusCode::OK, Json(envelope)).into_response()
}

/// GET /job/{id}
pub async fn get_job(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let state = state.read().await;
    match state.find_job(id) {
        Some(job) => (StatusCode::OK, Json(job.clone())).into_response(),
        None => not_found("job"),
    }
}

/// GET /job/{id}/log
pub async fn get_log(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let state = state.read().await;
    match state.logs.get(&id) {
        Some(content) => (
            StatusCode::OK,
            Json(json!({
                "@type": "log",
                "@href": format!("/job/{id}/log"),
                "id": id,
                "content": content
            })),
        )
            .into_response(),
        None => not_found("log"),
    }
}
