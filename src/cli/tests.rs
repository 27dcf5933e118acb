//! Tests for the CLI runner

use super::*;
use clap::Parser;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sources_yaml(server: &MockServer) -> String {
    format!(
        r#"
sources:
  - id: broken
    url: {uri}/v1/broken
    auth_type: basic
    target_collection: event
    mapping:
      post_title: t
  - id: good
    url: {uri}/v1/good
    object_path: items
    target_collection: event
    mapping:
      post_title: t
"#,
        uri = server.uri()
    )
}

#[tokio::test]
async fn test_sync_continues_after_failed_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"t": "Launch"}]
        })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let sources = dir.path().join("sources.yaml");
    std::fs::write(&sources, sources_yaml(&server)).unwrap();

    let cli = Cli::parse_from([
        "postsync",
        "--sources",
        sources.to_str().unwrap(),
        "sync",
    ]);
    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(err.to_string().contains("1 of 2 sources failed"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/v1/good");
}

#[tokio::test]
async fn test_sync_single_source_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let sources = dir.path().join("sources.yaml");
    std::fs::write(&sources, sources_yaml(&server)).unwrap();

    let cli = Cli::parse_from([
        "postsync",
        "--sources",
        sources.to_str().unwrap(),
        "sync",
        "--source",
        "good",
    ]);
    Runner::new(cli).run().await.unwrap();
}
