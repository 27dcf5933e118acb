//! Tests for the sync pipeline

use super::*;
use crate::mapping::{ItemError, MappingTable};
use crate::state::StateManager;
use crate::store::MemoryContentStore;
use crate::types::StringMap;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipeline(store: &MemoryContentStore) -> Pipeline {
    Pipeline::with_stores(
        Arc::new(StateManager::in_memory()),
        Arc::new(store.clone()),
    )
    .unwrap()
}

fn source(server: &MockServer, object_path: &str) -> SourceConfig {
    SourceConfig::new(
        "events",
        format!("{}/items", server.uri()),
        "event",
        MappingTable::from_pairs([("post_title", "t")]).unwrap(),
    )
    .with_object_path(object_path)
}

async fn serve(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_cycle_creates_items() {
    let server = MockServer::start().await;
    serve(&server, 200, json!({"result": {"items": [{"t": "X"}, {"t": "Y"}]}})).await;
    let store = MemoryContentStore::in_memory();

    let report = pipeline(&store)
        .run_cycle(&source(&server, "result.items"))
        .await
        .unwrap();

    assert_eq!(report.outcome, CycleOutcome::Completed);
    assert_eq!(report.items_found, 2);
    assert_eq!((report.report.created, report.report.updated), (2, 0));
    assert!(report.is_clean());
    assert_eq!(store.records_in("event").await.len(), 2);
}

#[tokio::test]
async fn test_cycle_http_error() {
    let server = MockServer::start().await;
    serve(&server, 404, json!({"error": "nope"})).await;
    let store = MemoryContentStore::in_memory();

    let report = pipeline(&store)
        .run_cycle(&source(&server, "result.items"))
        .await
        .unwrap();

    assert_eq!(report.outcome, CycleOutcome::FetchFailed);
    assert_eq!(report.items_found, 0);
    assert_eq!(report.source_errors.len(), 1);
    assert!(report.source_errors[0].starts_with("HTTP Error: 404"));
    assert!(report.report.errors.is_empty());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_cycle_no_items_at_path() {
    let server = MockServer::start().await;
    serve(&server, 200, json!({"data": []})).await;
    let store = MemoryContentStore::in_memory();

    let report = pipeline(&store)
        .run_cycle(&source(&server, "result.items"))
        .await
        .unwrap();

    assert_eq!(report.outcome, CycleOutcome::Completed);
    assert_eq!(
        report.source_errors,
        vec!["No items found at object path: result.items".to_string()]
    );
    assert!(report.report.errors.is_empty());
}

#[tokio::test]
async fn test_cycle_item_errors_are_separate() {
    let server = MockServer::start().await;
    serve(&server, 200, json!([{"t": "X"}, {"other": 1}])).await;
    let store = MemoryContentStore::in_memory();

    let report = pipeline(&store).run_cycle(&source(&server, "")).await.unwrap();

    assert_eq!(report.report.created, 1);
    assert_eq!(
        report.report.errors,
        vec![ItemError {
            item_index: 1,
            message: "Missing post title".to_string(),
        }]
    );
    assert!(report.source_errors.is_empty());
}

#[tokio::test]
async fn test_second_cycle_is_deferred() {
    let server = MockServer::start().await;
    serve(&server, 200, json!([{"t": "X"}])).await;
    let store = MemoryContentStore::in_memory();
    let pipeline = pipeline(&store);
    let source = source(&server, "");

    let first = pipeline.run_cycle(&source).await.unwrap();
    let second = pipeline.run_cycle(&source).await.unwrap();

    assert_eq!(first.report.created, 1);
    assert!(matches!(
        second.outcome,
        CycleOutcome::Deferred { seconds_remaining } if seconds_remaining > 0 && seconds_remaining <= 10
    ));
    assert_eq!(second.items_found, 0);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cycle_config_error_is_err() {
    let server = MockServer::start().await;
    let store = MemoryContentStore::in_memory();
    let source = source(&server, "").with_auth("basic", StringMap::new());

    let err = pipeline(&store).run_cycle(&source).await.unwrap_err();
    assert!(err.is_config_error());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_test_fetch_bypasses_gate_and_store() {
    let server = MockServer::start().await;
    serve(&server, 200, json!([{"t": "X"}])).await;
    let store = MemoryContentStore::in_memory();
    let pipeline = pipeline(&store);
    let source = source(&server, "");

    pipeline.run_cycle(&source).await.unwrap();
    let result = pipeline.test_fetch(&source).await.unwrap();

    assert!(result.is_success());
    assert_eq!(result.status_code(), Some(200));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_process_parse_error() {
    let store = MemoryContentStore::in_memory();
    let server = MockServer::start().await;
    let fetched = FetchResult::classify(200, "<html>".to_string());

    let report = pipeline(&store).process(&source(&server, ""), fetched).await;

    assert_eq!(report.outcome, CycleOutcome::FetchFailed);
    assert_eq!(report.source_errors, vec!["Invalid JSON response".to_string()]);
}

#[test]
fn test_cycle_report_serializes() {
    let report = CycleReport::new("s", CycleOutcome::Deferred { seconds_remaining: 4 });
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["outcome"], json!({"status": "deferred", "seconds_remaining": 4}));
    assert_eq!(value["report"]["created"], json!(0));
}
