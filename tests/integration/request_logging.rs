//! Wire transcript and authentication headers

use rediscloud_api::services::acl::CreateUser;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer};

use crate::support::{
    accepted, builder_for, completed_with_id, ok_json, CapturingLogger, API_KEY, SECRET_KEY,
};

async fn mount_user_creation(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/acl/users"))
        .and(header("x-api-key", API_KEY))
        .and(header("x-api-secret-key", SECRET_KEY))
        .and(header_exists("user-agent"))
        .respond_with(accepted("T1"))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/T1"))
        .respond_with(ok_json(completed_with_id("T1", 12)))
        .mount(server)
        .await;
}

fn user() -> CreateUser {
    CreateUser {
        name: "bob".to_string(),
        role: "readers".to_string(),
        password: "pass".to_string(),
    }
}

#[tokio::test]
async fn test_password_is_redacted_in_transcript() {
    let server = MockServer::start().await;
    mount_user_creation(&server).await;

    let logger = Arc::new(CapturingLogger::default());
    let client = builder_for(&server)
        .log_requests(true)
        .wire_logger(logger.clone())
        .build()
        .unwrap();

    let id = client.acl().create_user(&user()).await.unwrap();
    assert_eq!(id, 12);

    let records = logger.records();
    // request + response for the POST and for the single poll
    assert_eq!(records.len(), 4);

    let request = &records[0];
    assert!(request.starts_with("POST /v1/acl/users HTTP/1.1\r\n"));
    assert!(request.contains("\"password\": \"REDACTED\""));
    assert!(!request.contains("\"pass\""));

    for record in &records {
        assert!(!record.contains(API_KEY), "api key leaked: {record}");
        assert!(!record.contains(SECRET_KEY), "secret leaked: {record}");
    }
}

#[tokio::test]
async fn test_response_passwords_are_redacted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/subscriptions/1/databases/2"))
        .respond_with(ok_json(json!({
            "databaseId": 2,
            "security": {"password": "hunter2", "enableTls": true}
        })))
        .mount(&server)
        .await;

    let logger = Arc::new(CapturingLogger::default());
    let client = builder_for(&server)
        .log_requests(true)
        .wire_logger(logger.clone())
        .build()
        .unwrap();

    let db = client.databases().get(1, 2).await.unwrap();
    // the caller still sees the real value
    assert_eq!(
        db.security.unwrap().password.as_deref(),
        Some("hunter2")
    );

    let records = logger.records();
    assert_eq!(records.len(), 2);
    assert!(records[1].starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(records[1].contains("\"password\": \"REDACTED\""));
    assert!(!records[1].contains("hunter2"));
}

#[tokio::test]
async fn test_logging_disabled_by_default() {
    let server = MockServer::start().await;
    mount_user_creation(&server).await;

    let logger = Arc::new(CapturingLogger::default());
    let client = builder_for(&server)
        .wire_logger(logger.clone())
        .build()
        .unwrap();

    client.acl().create_user(&user()).await.unwrap();

    assert!(logger.records().is_empty());
}

#[tokio::test]
async fn test_user_agent_header_is_sent() {
    let server = MockServer::start().await;

    let client = builder_for(&server)
        .additional_user_agent("integration-suite")
        .build()
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/tasks"))
        .and(header("user-agent", client.user_agent()))
        .respond_with(ok_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = client.tasks().list().await.unwrap();
    assert!(tasks.is_empty());
}
