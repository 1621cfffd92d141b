use std::time::Duration;

use httpmock::MockServer;
use notion_html::api::BlockKind;
use notion_html::application::content::{ChildrenQuery, ContentClient, ContentError};
use notion_html::infra::notion::{NotionClientConfig, NotionHttpClient, user_agent};
use reqwest::Url;
use serde_json::json;

fn client(server: &MockServer) -> NotionHttpClient {
    client_with_timeout(server, Duration::from_secs(5))
}

fn client_with_timeout(server: &MockServer, request_timeout: Duration) -> NotionHttpClient {
    let config = NotionClientConfig {
        base_url: Url::parse(&server.url("/v1/")).expect("mock url"),
        version: "2022-06-28".to_string(),
        token: "secret_test".to_string(),
        request_timeout,
    };
    NotionHttpClient::new(config).expect("client builds")
}

#[tokio::test]
async fn retrieve_page_sends_auth_and_version_headers() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/v1/pages/page-1")
                .header("authorization", "Bearer secret_test")
                .header("notion-version", "2022-06-28")
                .header("user-agent", user_agent());
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "object": "page",
                    "id": "page-1",
                    "properties": {
                        "title": {"id": "title", "type": "title", "title": [{"type": "text", "plain_text": "Hello"}]}
                    }
                }));
        })
        .await;

    let page = client(&server)
        .retrieve_page("page-1")
        .await
        .expect("page loads");

    mock.assert_async().await;
    assert_eq!(page.id, "page-1");
    assert_eq!(page.title()[0].plain_text, "Hello");
}

#[tokio::test]
async fn list_children_passes_page_size_and_cursor() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/v1/blocks/parent-1/children")
                .query_param("page_size", "25")
                .query_param("start_cursor", "cursor-2");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "object": "list",
                    "results": [
                        {"object": "block", "id": "b1", "type": "divider", "has_children": false, "divider": {}},
                        {"object": "block", "id": "b2", "type": "ai_block", "has_children": false, "ai_block": {}}
                    ],
                    "next_cursor": "cursor-3",
                    "has_more": true,
                    "type": "block",
                    "block": {}
                }));
        })
        .await;

    let query = ChildrenQuery {
        page_size: 25,
        start_cursor: Some("cursor-2".to_string()),
    };
    let listing = client(&server)
        .list_children("parent-1", &query)
        .await
        .expect("listing loads");

    mock.assert_async().await;
    assert_eq!(listing.results.len(), 2);
    assert_eq!(listing.results[0].kind, BlockKind::Divider);
    assert!(matches!(listing.results[1].kind, BlockKind::Unsupported { .. }));
    assert_eq!(listing.next_cursor.as_deref(), Some("cursor-3"));
    assert!(listing.has_more);
}

#[tokio::test]
async fn api_error_body_becomes_status_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/v1/pages/missing");
            then.status(404)
                .header("content-type", "application/json")
                .json_body(json!({
                    "object": "error",
                    "status": 404,
                    "code": "object_not_found",
                    "message": "Could not find page with ID: missing."
                }));
        })
        .await;

    let err = client(&server)
        .retrieve_page("missing")
        .await
        .expect_err("page is missing");

    match err {
        ContentError::Status {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 404);
            assert_eq!(code, "object_not_found");
            assert!(message.contains("missing"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_keeps_status_and_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/v1/blocks/b/children");
            then.status(502).body("upstream exploded");
        })
        .await;

    let err = client(&server)
        .list_children("b", &ChildrenQuery::default())
        .await
        .expect_err("gateway error");

    match err {
        ContentError::Status {
            status, message, ..
        } => {
            assert_eq!(status, 502);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/v1/pages/p");
            then.status(200)
                .header("content-type", "application/json")
                .body("not json");
        })
        .await;

    let err = client(&server)
        .retrieve_page("p")
        .await
        .expect_err("body is not json");

    assert!(matches!(err, ContentError::Decode(_)));
}

#[tokio::test]
async fn ids_are_validated_before_any_request() {
    let server = MockServer::start_async().await;

    let err = client(&server)
        .retrieve_page("../admin")
        .await
        .expect_err("id rejected");

    assert!(matches!(err, ContentError::InvalidRequest(_)));
}

#[tokio::test]
async fn transport_failures_keep_the_http_error_as_source() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/v1/pages/slow");
            then.status(200)
                .delay(Duration::from_secs(2))
                .header("content-type", "application/json")
                .json_body(json!({"object": "page", "id": "slow"}));
        })
        .await;

    let err = client_with_timeout(&server, Duration::from_millis(50))
        .retrieve_page("slow")
        .await
        .expect_err("request times out");

    assert!(matches!(err, ContentError::Transport(_)));
    let source = std::error::Error::source(&err).expect("transport error has a source");
    let http = source
        .downcast_ref::<reqwest::Error>()
        .expect("source is the HTTP client error");
    assert!(http.is_timeout());
}
