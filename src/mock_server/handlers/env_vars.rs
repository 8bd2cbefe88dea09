//! Environment variable endpoint handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use super::not_found;
use crate::mock_server::state::MockState;
use crate::mock_server::Fixtures;

fn resolve_repo_id(state: &MockState, repository: &str) -> Option<u64> {
    let decoded = urlencoding::decode(repository)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| repository.to_string());
    state.find_repository(&decoded)?["id"].as_u64()
}

/// GET /repo/{repository}/env_vars
pub async fn list_env_vars(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(repository): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;
    let Some(repo_id) = resolve_repo_id(&state, &repository) else {
        return not_found("repository");
    };

    let envelope = json!({
        "@type": "env_vars",
        "@href": format!("/repo/{repo_id}/env_vars"),
        "env_vars": state.env_vars_for(repo_id)
    });
    (StatusCode::OK, Json(envelope)).into_response()
}

/// POST /repo/{repository}/env_vars
pub async fn create_env_var(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(repository): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    let Some(repo_id) = resolve_repo_id(&state, &repository) else {
        return not_found("repository");
    };

    let name = body["env_var.name"].as_str().unwrap_or_default().to_string();
    let value = body["env_var.value"].as_str().map(str::to_string);
    let public = body["env_var.public"].as_bool().unwrap_or(false);

    state.next_env_var_id += 1;
    let id = format!("ev-{}", state.next_env_var_id);
    let env_var = Fixtures::env_var(&id, &name, value.as_deref(), public);

    state
        .env_vars
        .entry(repo_id)
        .or_default()
        .push(env_var.clone());

    (StatusCode::CREATED, Json(env_var)).into_response()
}

/// PATCH /repo/{repository}/env_var/{id}
pub async fn update_env_var(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((repository, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    let Some(repo_id) = resolve_repo_id(&state, &repository) else {
        return not_found("repository");
    };

    let value = body["env_var.value"].clone();
    let Some(vars) = state.env_vars.get_mut(&repo_id) else {
        return not_found("env_var");
    };
    match vars.iter_mut().find(|v| v["id"] == id.as_str()) {
        Some(env_var) => {
            env_var["value"] = value;
            (StatusCode::OK, Json(env_var.clone())).into_response()
        }
        None => not_found("env_var"),
    }
}

/// DELETE /repo/{repository}/env_var/{id}
pub async fn delete_env_var(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((repository, id)): Path<(String, String)>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    let Some(repo_id) = resolve_repo_id(&state, &repository) else {
        return not_found("repository");
    };

    match state.remove_env_var(repo_id, &id) {
        Some(env_var) => (StatusCode::OK, Json(env_var)).into_response(),
        None => not_found("env_var"),
    }
}
