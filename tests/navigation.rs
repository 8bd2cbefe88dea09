//! Follow-link navigation against a mocked HTTP API.
//!
//! Exercises the hyperlink resolution of the document layer: `@href`
//! lookups, element selection on list-shaped nodes, and the error paths
//! that must never issue a request.

use serde_json::json;
use travisapi::{TravisClient, TravisError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TravisClient {
    TravisClient::new(&server.uri()).unwrap()
}

#[tokio::test]
async fn test_follow_entry_resolves_element_href() {
    let mock_server = MockServer::start().await;

    let listing = json!({
        "repositories": [
            {"@href": "/repo/1", "id": 1},
            {"@href": "/repo/2", "id": 2}
        ]
    });

    Mock::given(method("GET"))
        .and(path("/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&listing))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repo/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 2, "slug": "owner/second"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let repos = client.repositories().await.unwrap();

    let second = repos.get("repositories").follow_entry(1).await.unwrap();
    assert!(second.is_success());
    assert_eq!(second.get("slug").as_str(), Some("owner/second"));
}

#[tokio::test]
async fn test_first_then_follow() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "repositories": [
                {"@href": "/repo/1", "id": 1},
                {"@href": "/repo/2", "id": 2}
            ]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repo/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let repos = client.repositories().await.unwrap();

    let first = repos.get("repositories").first().follow().await.unwrap();
    assert_eq!(first.get("id").as_i64(), Some(1));
}

#[tokio::test]
async fn test_follow_carries_context_options() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repo/1"))
        .and(query_param("include", "repository.builds"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.with_options(|options| options.set("include", "repository.builds"));

    // Build a followable node by fetching it through the same context.
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "repository": {"@href": "/repo/1"}
        })))
        .mount(&mock_server)
        .await;

    let user = client.user().await.unwrap();
    let repo = user.get("repository").follow().await.unwrap();
    assert!(repo.is_success());
}

#[tokio::test]
async fn test_follow_without_href_issues_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "owner": {"login": "nobody"}
        })))
        .mount(&mock_server)
        .await;

    // Only the initial /user request may reach the server.
    let client = client_for(&mock_server);
    let user = client.user().await.unwrap();

    let err = user.get("owner").follow().await.unwrap_err();
    assert!(matches!(err, TravisError::NotFollowable));

    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_error_response_stays_navigable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repo/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "@type": "error",
            "error_message": "not found"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.repository("404").await.unwrap();

    assert!(response.is_error());
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(response.get("error_message").as_str(), Some("not found"));
}

#[tokio::test]
async fn test_malformed_body_fails_with_context() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    match client.user().await {
        Err(TravisError::InvalidBody { status, body, .. }) => {
            assert_eq!(status, 200);
            assert!(body.contains("not json"));
        }
        other => panic!("expected InvalidBody, got {other:?}"),
    }
}
