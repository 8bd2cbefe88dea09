//! Pager behavior against a mocked HTTP API.

use serde_json::json;
use travisapi::{TravisClient, TravisError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_body(offset: usize, next: Option<usize>) -> serde_json::Value {
    let next = match next {
        Some(o) => json!({"@href": format!("/builds?offset={o}")}),
        None => json!(null),
    };
    json!({
        "builds": [{"id": offset}],
        "@pagination": {
            "first": {"@href": "/builds?offset=0"},
            "next": next,
            "last": {"@href": "/builds?offset=100"}
        }
    })
}

#[tokio::test]
async fn test_next_fetches_the_linked_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/builds"))
        .and(query_param("offset", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(25, Some(50))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TravisClient::new(&mock_server.uri()).unwrap();
    let origin = client_page(&mock_server, &client, page_body(0, Some(25))).await;

    let next = origin.pager().next().await.unwrap();
    assert!(next.is_success());
    assert!(next.dig(["builds", "0", "id"]).is_absent());
    assert_eq!(next.get("builds").first().get("id").as_i64(), Some(25));
}

#[tokio::test]
async fn test_pages_chain() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/builds"))
        .and(query_param("offset", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(25, Some(50))))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/builds"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(50, None)))
        .mount(&mock_server)
        .await;

    let client = TravisClient::new(&mock_server.uri()).unwrap();
    let origin = client_page(&mock_server, &client, page_body(0, Some(25))).await;

    let second = origin.pager().next().await.unwrap();
    let third = second.pager().next().await.unwrap();

    assert_eq!(third.get("builds").first().get("id").as_i64(), Some(50));
    assert!(!third.pager().has_next());
    assert!(matches!(
        third.pager().next().await,
        Err(TravisError::NoSuchPage { slot: "next" })
    ));
}

#[tokio::test]
async fn test_first_and_last_slots() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/builds"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, Some(25))))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/builds"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(100, None)))
        .mount(&mock_server)
        .await;

    let client = TravisClient::new(&mock_server.uri()).unwrap();
    let origin = client_page(&mock_server, &client, page_body(25, Some(50))).await;

    let first = origin.pager().first().await.unwrap();
    assert_eq!(first.get("builds").first().get("id").as_i64(), Some(0));

    let last = origin.pager().last().await.unwrap();
    assert_eq!(last.get("builds").first().get("id").as_i64(), Some(100));
}

#[tokio::test]
async fn test_unpaginated_response_is_no_such_page() {
    let mock_server = MockServer::start().await;

    let client = TravisClient::new(&mock_server.uri()).unwrap();
    let origin = client_page(&mock_server, &client, json!({"id": 1})).await;

    assert!(!origin.pager().is_paginated());
    assert!(matches!(
        origin.pager().next().await,
        Err(TravisError::NoSuchPage { slot: "next" })
    ));

    // Nothing was requested for the failed navigation.
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

/// Serve `body` at /origin and fetch it through the client, so the
/// returned response is bound to the client's context.
async fn client_page(
    server: &MockServer,
    client: &TravisClient,
    body: serde_json::Value,
) -> travisapi::ApiResponse {
    Mock::given(method("GET"))
        .and(path("/origin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
    client.get("/origin").await.unwrap()
}
