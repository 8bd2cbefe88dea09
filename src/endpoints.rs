//! Endpoint facade: one method per Travis v3 resource or action.
//!
//! Thin plumbing over the transport in `client.rs`: each method composes a
//! path (percent-encoding user-supplied segments), lets the request layer
//! attach the context's query options, and returns the navigable response.
//! Repo-scoped methods operate on the repository selected with
//! [`TravisClient::set_repository`].

use serde_json::{json, Value};

use crate::client::{encode_repository, validate_repository, TravisClient};
use crate::error::Result;
use crate::response::ApiResponse;

impl TravisClient {
    /// List repositories for the authenticated user (`GET /repos`).
    pub async fn repositories(&self) -> Result<ApiResponse> {
        self.get("/repos").await
    }

    /// Fetch one repository by id or slug (`GET /repo/{repository}`).
    ///
    /// Validates the identifier before any request is attempted.
    pub async fn repository(&self, repository: &str) -> Result<ApiResponse> {
        validate_repository(repository)?;
        let segment = encode_repository(repository);
        self.get(&format!("/repo/{segment}")).await
    }

    /// List builds of the current repository (`GET /repo/{repository}/builds`).
    pub async fn builds(&self) -> Result<ApiResponse> {
        let segment = self.repository_segment()?;
        self.get(&format!("/repo/{segment}/builds")).await
    }

    /// Fetch one build (`GET /build/{id}`).
    pub async fn build(&self, id: u64) -> Result<ApiResponse> {
        self.get(&format!("/build/{id}")).await
    }

    /// Cancel a running build (`POST /build/{id}/cancel`).
    pub async fn cancel_build(&self, id: u64) -> Result<ApiResponse> {
        self.post(&format!("/build/{id}/cancel")).await
    }

    /// Restart a finished build (`POST /build/{id}/restart`).
    pub async fn restart_build(&self, id: u64) -> Result<ApiResponse> {
        self.post(&format!("/build/{id}/restart")).await
    }

    /// List jobs of a build (`GET /build/{id}/jobs`).
    pub async fn build_jobs(&self, build_id: u64) -> Result<ApiResponse> {
        self.get(&format!("/build/{build_id}/jobs")).await
    }

    /// Fetch one job (`GET /job/{id}`).
    pub async fn job(&self, id: u64) -> Result<ApiResponse> {
        self.get(&format!("/job/{id}")).await
    }

    /// Cancel a running job (`POST /job/{id}/cancel`).
    pub async fn cancel_job(&self, id: u64) -> Result<ApiResponse> {
        self.post(&format!("/job/{id}/cancel")).await
    }

    /// Restart a finished job (`POST /job/{id}/restart`).
    pub async fn restart_job(&self, id: u64) -> Result<ApiResponse> {
        self.post(&format!("/job/{id}/restart")).await
    }

    /// Fetch a job's log (`GET /job/{id}/log`).
    pub async fn job_log(&self, id: u64) -> Result<ApiResponse> {
        self.get(&format!("/job/{id}/log")).await
    }

    /// List branches of the current repository
    /// (`GET /repo/{repository}/branches`).
    pub async fn branches(&self) -> Result<ApiResponse> {
        let segment = self.repository_segment()?;
        self.get(&format!("/repo/{segment}/branches")).await
    }

    /// Fetch one branch by name (`GET /repo/{repository}/branch/{name}`).
    pub async fn branch(&self, name: &str) -> Result<ApiResponse> {
        let segment = self.repository_segment()?;
        let name = urlencoding::encode(name);
        self.get(&format!("/repo/{segment}/branch/{name}")).await
    }

    /// List build requests of the current repository
    /// (`GET /repo/{repository}/requests`).
    pub async fn requests(&self) -> Result<ApiResponse> {
        let segment = self.repository_segment()?;
        self.get(&format!("/repo/{segment}/requests")).await
    }

    /// Fetch one build request (`GET /repo/{repository}/request/{id}`).
    pub async fn request(&self, id: u64) -> Result<ApiResponse> {
        let segment = self.repository_segment()?;
        self.get(&format!("/repo/{segment}/request/{id}")).await
    }

    /// Trigger a build (`POST /repo/{repository}/requests`).
    ///
    /// `payload` follows the v3 request schema, e.g.
    /// `json!({"request": {"branch": "main"}})`.
    pub async fn trigger_request(&self, payload: &Value) -> Result<ApiResponse> {
        let segment = self.repository_segment()?;
        self.post_json(&format!("/repo/{segment}/requests"), payload)
            .await
    }

    /// List environment variables of the current repository
    /// (`GET /repo/{repository}/env_vars`).
    pub async fn env_vars(&self) -> Result<ApiResponse> {
        let segment = self.repository_segment()?;
        self.get(&format!("/repo/{segment}/env_vars")).await
    }

    /// Create an environment variable
    /// (`POST /repo/{repository}/env_vars`).
    pub async fn create_env_var(
        &self,
        name: &str,
        value: &str,
        public: bool,
    ) -> Result<ApiResponse> {
        let segment = self.repository_segment()?;
        let body = json!({
            "env_var.name": name,
            "env_var.value": value,
            "env_var.public": public,
        });
        self.post_json(&format!("/repo/{segment}/env_vars"), &body)
            .await
    }

    /// Update an environment variable's value
    /// (`PATCH /repo/{repository}/env_var/{id}`).
    pub async fn update_env_var(&self, id: &str, value: &str) -> Result<ApiResponse> {
        let segment = self.repository_segment()?;
        let id = urlencoding::encode(id);
        let body = json!({ "env_var.value": value });
        self.patch_json(&format!("/repo/{segment}/env_var/{id}"), &body)
            .await
    }

    /// Delete an environment variable
    /// (`DELETE /repo/{repository}/env_var/{id}`).
    ///
    /// Runs with the `limit` option temporarily dropped; the context's
    /// options are untouched afterwards.
    pub async fn delete_env_var(&self, id: &str) -> Result<ApiResponse> {
        let segment = self.repository_segment()?;
        let id = urlencoding::encode(id);
        let _restore = self.scoped_options();
        self.with_options(|options| {
            options.remove("limit");
        });
        self.delete(&format!("/repo/{segment}/env_var/{id}")).await
    }

    /// Fetch the current repository's settings
    /// (`GET /repo/{repository}/settings`).
    pub async fn settings(&self) -> Result<ApiResponse> {
        let segment = self.repository_segment()?;
        self.get(&format!("/repo/{segment}/settings")).await
    }

    /// Update one repository setting
    /// (`PATCH /repo/{repository}/setting/{name}`).
    pub async fn update_setting(&self, name: &str, value: &Value) -> Result<ApiResponse> {
        let segment = self.repository_segment()?;
        let name = urlencoding::encode(name);
        let body = json!({ "setting.value": value });
        self.patch_json(&format!("/repo/{segment}/setting/{name}"), &body)
            .await
    }

    /// List the current repository's caches
    /// (`GET /repo/{repository}/caches`).
    pub async fn caches(&self) -> Result<ApiResponse> {
        let segment = self.repository_segment()?;
        self.get(&format!("/repo/{segment}/caches")).await
    }

    /// Delete the current repository's caches
    /// (`DELETE /repo/{repository}/caches`).
    ///
    /// Runs with the `limit` option temporarily dropped, like
    /// [`delete_env_var`](Self::delete_env_var).
    pub async fn delete_caches(&self) -> Result<ApiResponse> {
        let segment = self.repository_segment()?;
        let _restore = self.scoped_options();
        self.with_options(|options| {
            options.remove("limit");
        });
        self.delete(&format!("/repo/{segment}/caches")).await
    }

    /// Fetch the authenticated user (`GET /user`).
    pub async fn user(&self) -> Result<ApiResponse> {
        self.get("/user").await
    }

    /// List an owner's active builds (`GET /owner/{login}/active`).
    pub async fn active(&self, owner: &str) -> Result<ApiResponse> {
        let owner = urlencoding::encode(owner);
        self.get(&format!("/owner/{owner}/active")).await
    }

    /// Lint a .travis.yml (`POST /lint` with the raw file content).
    pub async fn lint(&self, content: &str) -> Result<ApiResponse> {
        self.post_raw("/lint", content.to_string()).await
    }
}
