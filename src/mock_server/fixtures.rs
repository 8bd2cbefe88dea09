//! Test data fixtures for the mock server.
//!
//! Factory functions producing Travis v3-shaped JSON entities, each
//! carrying the `@type`/`@href` fields the navigation layer relies on.

use serde_json::{json, Value};

use super::state::MockState;

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    /// A repository entity.
    pub fn repository(id: u64, slug: &str) -> Value {
        let name = slug.rsplit('/').next().unwrap_or(slug);
        json!({
            "@type": "repository",
            "@href": format!("/repo/{id}"),
            "@representation": "standard",
            "id": id,
            "name": name,
            "slug": slug,
            "active": true,
            "private": false,
            "default_branch": {
                "@type": "branch",
                "name": "main"
            }
        })
    }

    /// A build entity.
    pub fn build(id: u64, repository_id: u64, number: &str, state: &str) -> Value {
        json!({
            "@type": "build",
            "@href": format!("/build/{id}"),
            "@representation": "standard",
            "id": id,
            "repository_id": repository_id,
            "number": number,
            "state": state,
            "event_type": "push",
            "duration": 81,
            "started_at": "2026-01-01T12:00:00Z",
            "finished_at": if state == "started" { Value::Null } else { json!("2026-01-01T12:01:21Z") },
            "branch": {
                "@type": "branch",
                "name": "main"
            }
        })
    }

    /// A job entity.
    pub fn job(id: u64, build_id: u64, state: &str) -> Value {
        json!({
            "@type": "job",
            "@href": format!("/job/{id}"),
            "@representation": "standard",
            "id": id,
            "build_id": build_id,
            "state": state,
            "queue": "builds.gce",
            "config": {
                "language": "rust",
                "os": "linux"
            }
        })
    }

    /// An environment variable entity.
    pub fn env_var(id: &str, name: &str, value: Option<&str>, public: bool) -> Value {
        json!({
            "@type": "env_var",
            "@href": format!("/env_var/{id}"),
            "id": id,
            "name": name,
            "value": value,
            "public": public
        })
    }

    /// The default scenario: two repositories, enough builds on the first
    /// to span two pages at the default limit of 25, a couple of jobs with
    /// a log, and one env var.
    pub fn default_state() -> MockState {
        let mut state = MockState::new()
            .with_repository(Self::repository(1, "svenfuchs/minimal"))
            .with_repository(Self::repository(2, "rust-lang/rust"));

        // Builds 100..129 on repository 1, newest (129) first in listings.
        for i in 0..30u64 {
            let state_name = if i == 29 { "started" } else { "passed" };
            state = state.with_build(Self::build(
                100 + i,
                1,
                &(i + 1).to_string(),
                state_name,
            ));
        }

        state = state
            .with_build(Self::build(200, 2, "1", "passed"))
            .with_job(Self::job(1000, 129, "started"))
            .with_job(Self::job(1001, 129, "created"))
            .with_log(1000, "$ cargo test\nrunning 12 tests\n")
            .with_env_var(1, Self::env_var("ev-1", "RUST_LOG", Some("debug"), true));

        state.next_env_var_id = 2;
        state
    }
}
