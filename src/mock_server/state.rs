//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Travis API server. The
//! entities are stored as raw JSON values, matching the untyped client.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Repositories, each carrying `id`, `slug` and `@href`.
    pub repositories: Vec<Value>,

    /// Builds, each carrying `id`, `repository_id` and `@href`.
    pub builds: Vec<Value>,

    /// Jobs, each carrying `id`, `build_id` and `@href`.
    pub jobs: Vec<Value>,

    /// Job logs indexed by job id.
    pub logs: HashMap<u64, String>,

    /// Environment variables indexed by repository id.
    pub env_vars: HashMap<u64, Vec<Value>>,

    /// Counter for generated env var ids.
    pub next_env_var_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a repository to the state.
    pub fn with_repository(mut self, repository: Value) -> Self {
        self.repositories.push(repository);
        self
    }

    /// Add a build to the state.
    pub fn with_build(mut self, build: Value) -> Self {
        self.builds.push(build);
        self
    }

    /// Add a job to the state.
    pub fn with_job(mut self, job: Value) -> Self {
        self.jobs.push(job);
        self
    }

    /// Add a log for a job.
    pub fn with_log(mut self, job_id: u64, content: &str) -> Self {
        self.logs.insert(job_id, content.to_string());
        self
    }

    /// Add an environment variable for a repository.
    pub fn with_env_var(mut self, repository_id: u64, env_var: Value) -> Self {
        self.env_vars.entry(repository_id).or_default().push(env_var);
        self
    }

    /// Find a repository by numeric id or slug.
    pub fn find_repository(&self, key: &str) -> Option<&Value> {
        if key.bytes().all(|b| b.is_ascii_digit()) {
            let id: u64 = key.parse().ok()?;
            self.repositories.iter().find(|r| r["id"] == id)
        } else {
            self.repositories.iter().find(|r| r["slug"] == key)
        }
    }

    /// All builds of a repository, newest first.
    pub fn builds_for_repository(&self, repository_id: u64) -> Vec<Value> {
        let mut builds: Vec<Value> = self
            .builds
            .iter()
            .filter(|b| b["repository_id"] == repository_id)
            .cloned()
            .collect();
        builds.sort_by_key(|b| std::cmp::Reverse(b["id"].as_u64()));
        builds
    }

    /// Find a build by id.
    pub fn find_build(&self, id: u64) -> Option<&Value> {
        self.builds.iter().find(|b| b["id"] == id)
    }

    /// Set a build's state, returning false if the build does not exist.
    pub fn set_build_state(&mut self, id: u64, state: &str) -> bool {
        match self.builds.iter_mut().find(|b| b["id"] == id) {
            Some(build) => {
                build["state"] = Value::String(state.to_string());
                true
            }
            None => false,
        }
    }

    /// All jobs of a build.
    pub fn jobs_for_build(&self, build_id: u64) -> Vec<Value> {
        self.jobs
            .iter()
            .filter(|j| j["build_id"] == build_id)
            .cloned()
            .collect()
    }

    /// Find a job by id.
    pub fn find_job(&self, id: u64) -> Option<&Value> {
        self.jobs.iter().find(|j| j["id"] == id)
    }

    /// Environment variables of a repository.
    pub fn env_vars_for(&self, repository_id: u64) -> Vec<Value> {
        self.env_vars.get(&repository_id).cloned().unwrap_or_default()
    }

    /// Remove an environment variable, returning it if it existed.
    pub fn remove_env_var(&mut self, repository_id: u64, id: &str) -> Option<Value> {
        let vars = self.env_vars.get_mut(&repository_id)?;
        let pos = vars.iter().position(|v| v["id"] == id)?;
        Some(vars.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    #[test]
    fn test_find_repository_by_id_and_slug() {
        let state = MockState::new()
            .with_repository(Fixtures::repository(1, "owner/alpha"))
            .with_repository(Fixtures::repository(2, "owner/beta"));

        assert_eq!(state.find_repository("2").unwrap()["slug"], "owner/beta");
        assert_eq!(state.find_repository("owner/alpha").unwrap()["id"], 1);
        assert!(state.find_repository("owner/missing").is_none());
    }

    #[test]
    fn test_builds_for_repository_newest_first() {
        let state = MockState::new()
            .with_build(Fixtures::build(100, 1, "1", "passed"))
            .with_build(Fixtures::build(102, 1, "3", "started"))
            .with_build(Fixtures::build(101, 1, "2", "failed"))
            .with_build(Fixtures::build(200, 2, "1", "passed"));

        let builds = state.builds_for_repository(1);
        let ids: Vec<u64> = builds.iter().map(|b| b["id"].as_u64().unwrap()).collect();
        assert_eq!(ids, vec![102, 101, 100]);
    }

    #[test]
    fn test_set_build_state() {
        let mut state = MockState::new().with_build(Fixtures::build(100, 1, "1", "started"));

        assert!(state.set_build_state(100, "canceled"));
        assert_eq!(state.find_build(100).unwrap()["state"], "canceled");
        assert!(!state.set_build_state(999, "canceled"));
    }

    #[test]
    fn test_remove_env_var() {
        let mut state =
            MockState::new().with_env_var(1, Fixtures::env_var("ev-1", "KEY", Some("v"), true));

        let removed = state.remove_env_var(1, "ev-1").unwrap();
        assert_eq!(removed["name"], "KEY");
        assert!(state.remove_env_var(1, "ev-1").is_none());
        assert!(state.env_vars_for(1).is_empty());
    }
}
