//! Wire-level checks for the endpoint facade: paths, default headers,
//! query options, input validation, and the scoped option override.

use serde_json::json;
use travisapi::{TravisClient, TravisError};
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ok_body() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"ok": true}))
}

#[tokio::test]
async fn test_default_headers_and_limit_on_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos"))
        .and(header("Travis-API-Version", "3"))
        .and(header("Accept", "application/json"))
        .and(header("Content-Type", "application/json"))
        .and(query_param("limit", "25"))
        .respond_with(ok_body())
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TravisClient::new(&mock_server.uri()).unwrap();
    client.repositories().await.unwrap();
}

#[tokio::test]
async fn test_authenticate_sends_token_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("Authorization", "token s3cret"))
        .respond_with(ok_body())
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TravisClient::new(&mock_server.uri()).unwrap();
    client.authenticate("s3cret");
    client.user().await.unwrap();
}

#[tokio::test]
async fn test_slug_is_percent_encoded_in_paths() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repo/rust-lang%2Frust/builds"))
        .respond_with(ok_body())
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TravisClient::new(&mock_server.uri()).unwrap();
    client.set_repository("rust-lang/rust").unwrap();
    client.builds().await.unwrap();
}

#[tokio::test]
async fn test_invalid_repository_fails_before_any_request() {
    let mock_server = MockServer::start().await;

    let client = TravisClient::new(&mock_server.uri()).unwrap();
    let err = client.repository("a/b/c").await.unwrap_err();
    assert!(matches!(err, TravisError::InvalidRepository(_)));

    let err = client.builds().await.unwrap_err();
    assert!(matches!(err, TravisError::MissingRepository));

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_trigger_request_posts_payload() {
    let mock_server = MockServer::start().await;

    let payload = json!({"request": {"branch": "main", "message": "api build"}});

    Mock::given(method("POST"))
        .and(path("/repo/42/requests"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"@type": "pending"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TravisClient::new(&mock_server.uri()).unwrap();
    client.set_repository("42").unwrap();
    let response = client.trigger_request(&payload).await.unwrap();
    assert!(response.is_success());
}

#[tokio::test]
async fn test_delete_env_var_drops_limit_only_for_that_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/repo/42/env_var/ev-9"))
        .and(query_param_is_missing("limit"))
        .respond_with(ok_body())
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repo/42/env_vars"))
        .and(query_param("limit", "25"))
        .respond_with(ok_body())
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TravisClient::new(&mock_server.uri()).unwrap();
    client.set_repository("42").unwrap();

    client.delete_env_var("ev-9").await.unwrap();
    // The override must not leak into subsequent requests.
    client.env_vars().await.unwrap();
}

#[tokio::test]
async fn test_lint_posts_raw_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/lint"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"warnings": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TravisClient::new(&mock_server.uri()).unwrap();
    let response = client.lint("language: rust\n").await.unwrap();
    assert!(response.get("warnings").is_document());
}

#[tokio::test]
async fn test_cancel_build_posts_without_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/build/7/cancel"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"@type": "pending"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TravisClient::new(&mock_server.uri()).unwrap();
    let response = client.cancel_build(7).await.unwrap();
    assert!(response.is_success());
    assert_eq!(response.status().as_u16(), 202);
}

#[tokio::test]
async fn test_update_setting_patches_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/repo/42/setting/build_pushes"))
        .and(body_json(json!({"setting.value": false})))
        .respond_with(ok_body())
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TravisClient::new(&mock_server.uri()).unwrap();
    client.set_repository("42").unwrap();
    client
        .update_setting("build_pushes", &json!(false))
        .await
        .unwrap();
}
