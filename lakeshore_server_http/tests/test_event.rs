use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use lakeshore_data_lake::ParquetEncoder;
use lakeshore_object_store::{CopyWait, InMemoryObjectStoreFactory, ObjectStoreClient};
use lakeshore_pipeline::Pipeline;
use lakeshore_server_http::HttpServer;
use object_store::{ObjectStore, PutPayload, path::Path};
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestServer {
    app: Router,
    factory: Arc<InMemoryObjectStoreFactory>,
    _staging: TempDir,
}

fn test_server() -> TestServer {
    let staging = TempDir::new().expect("staging dir");
    let factory = Arc::new(InMemoryObjectStoreFactory::new());
    let store = ObjectStoreClient::new(factory.clone())
        .with_copy_wait(CopyWait::new(2, Duration::from_millis(1)));
    let pipeline = Pipeline::new(store, ParquetEncoder::new(staging.path()));

    TestServer {
        app: HttpServer::new(pipeline).into_router(),
        factory,
        _staging: staging,
    }
}

async fn post_event(app: Router, body: String) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri("/event")
        .header("content-type", "text/plain; charset=UTF-8")
        .body(Body::from(body))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");

    (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
}

fn notification(records: serde_json::Value) -> String {
    json!({
        "Type": "Notification",
        "MessageId": "22b80b92-fdea-4c2c-8f9d-bdfb0c7bf324",
        "Message": json!({ "Records": records }).to_string(),
    })
    .to_string()
}

fn created(key: &str) -> serde_json::Value {
    json!({
        "eventName": "ObjectCreated:Put",
        "s3": { "bucket": { "name": "deglon" }, "object": { "key": key } }
    })
}

#[tokio::test]
async fn test_notification_is_acknowledged() {
    let server = test_server();
    server
        .factory
        .bucket("deglon")
        .put(
            &Path::from("data/test.json"),
            PutPayload::from_static(br#"[{"a":1,"b":2}]"#),
        )
        .await
        .unwrap();

    let (status, body) = post_event(server.app, notification(json!([created("data/test.json")]))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    let store = server.factory.bucket("deglon");
    assert!(store.head(&Path::from("processed/test.parquet")).await.is_ok());
}

#[tokio::test]
async fn test_failed_records_are_still_acknowledged() {
    let server = test_server();

    let (status, body) =
        post_event(server.app, notification(json!([created("data/missing.json")]))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_subscription_confirmation_is_acknowledged() {
    let server = test_server();

    let body = json!({
        "Type": "SubscriptionConfirmation",
        "SubscribeURL": "https://sns.us-west-1.amazonaws.com/?Action=ConfirmSubscription",
    })
    .to_string();
    let (status, body) = post_event(server.app, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_malformed_envelope_is_server_error() {
    let server = test_server();

    let (status, body) = post_event(server.app, "{not json".to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Internal Server Error: Failed to decode notification envelope"));
}

#[tokio::test]
async fn test_malformed_message_is_server_error() {
    let server = test_server();

    let body = json!({ "Type": "Notification", "MessageId": "abc", "Message": "[" }).to_string();
    let (status, body) = post_event(server.app, body).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Failed to decode message of abc notification"));
}
