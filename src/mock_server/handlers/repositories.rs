//! Repository endpoint handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tokio::sync::RwLock;

use super::{collection, not_found, PageQuery};
use crate::mock_server::state::MockState;

/// GET /repos
pub async fn list_repositories(
    State(state): State<Arc<RwLock<MockState>>>,
    Query(page): Query<PageQuery>,
) -> impl IntoResponse {
    let state = state.read().await;
    let envelope = collection(
        "/repos",
        "repositories",
        state.repositories.clone(),
        page.limit(),
        page.offset(),
    );
    (StatusCode::OK, Json(envelope))
}

/// GET /repo/{repository}
pub async fn get_repository(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(repository): Path<String>,
) -> impl IntoResponse {
    // The slug arrives percent-encoded in the path
    let decoded = urlencoding::decode(&repository)
        .map(|s| s.into_owned())
        .unwrap_or(repository);

    let state = state.read().await;
    match state.find_repository(&decoded) {
        Some(repo) => (StatusCode::OK, Json(repo.clone())).into_response(),
        None => not_found("repository"),
    }
}
