//! End-to-end mutations driven through the task poller

use rediscloud_api::services::acl::RedisRuleRequest;
use rediscloud_api::services::cloud_accounts::CreateCloudAccount;
use rediscloud_api::{Error, Resource, TaskPayloadError};
use serde_json::json;
use std::error::Error as _;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::{
    accepted, client_for, completed_with_id, ok_json, sequence, task, API_KEY, SECRET_KEY,
};

fn cloud_account() -> CreateCloudAccount {
    CreateCloudAccount {
        access_key_id: "AKIA".to_string(),
        access_secret_key: "secret".to_string(),
        console_username: "ops".to_string(),
        console_password: "console".to_string(),
        name: "x".to_string(),
        provider: Some("AWS".to_string()),
        sign_in_login_url: "https://signin.aws.amazon.com".to_string(),
    }
}

#[tokio::test]
async fn test_mutation_happy_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/cloud-accounts"))
        .and(header("x-api-key", API_KEY))
        .and(header("x-api-secret-key", SECRET_KEY))
        .and(header("accept", "application/json"))
        .and(body_partial_json(json!({"name": "x", "provider": "AWS"})))
        .respond_with(accepted("T1"))
        .expect(1)
        .mount(&server)
        .await;

    // Exactly one poll: no further calls once the task has completed
    Mock::given(method("GET"))
        .and(path("/v1/tasks/T1"))
        .and(header("x-api-key", API_KEY))
        .respond_with(ok_json(completed_with_id("T1", 1234)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = client.cloud_accounts().create(&cloud_account()).await.unwrap();

    assert_eq!(id, 1234);
}

#[tokio::test]
async fn test_delayed_task_birth_is_absorbed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/cloud-accounts"))
        .respond_with(accepted("T1"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/T1"))
        .respond_with(sequence(vec![
            ResponseTemplate::new(404),
            ResponseTemplate::new(404),
            ResponseTemplate::new(404),
            ok_json(task("T1", "initialized")),
            ok_json(task("T1", "processing-in-progress")),
            ok_json(completed_with_id("T1", 7457)),
        ]))
        .expect(6)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = client.cloud_accounts().create(&cloud_account()).await.unwrap();

    assert_eq!(id, 7457);
}

#[tokio::test]
async fn test_five_task_404s_are_tolerated() {
    let server = MockServer::start().await;

    let mut responses = vec![ResponseTemplate::new(404); 5];
    responses.push(ok_json(completed_with_id("T5", 5)));
    Mock::given(method("GET"))
        .and(path("/v1/tasks/T5"))
        .respond_with(sequence(responses))
        .expect(6)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = client.task_waiter().wait_for_resource_id("T5").await.unwrap();

    assert_eq!(id, 5);
}

#[tokio::test]
async fn test_sixth_task_404_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/T6"))
        .respond_with(ResponseTemplate::new(404).set_body_string("task not found"))
        .expect(6)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.task_waiter().wait("T6").await.unwrap_err();

    assert!(matches!(err, Error::TaskNotFound { polls: 6, .. }));
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("retrieve task T6"));
}

#[tokio::test]
async fn test_vanished_task_is_not_reported_as_missing_resource() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/acl/redisRules/7"))
        .respond_with(accepted("TX"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/TX"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .acl()
        .update_redis_rule(
            7,
            &RedisRuleRequest {
                name: "read-only".to_string(),
                redis_rule: "+@read ~*".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::TaskNotFound { ref task_id, .. } if task_id == "TX"));
    assert!(!err.is_not_found());
    assert!(!err.to_string().contains("redis rule 7 not found"));
}

#[tokio::test]
async fn test_other_poll_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/T7"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.task_waiter().wait("T7").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_task_payload_404_lifts_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/acl/redisRules/40004"))
        .respond_with(accepted("T2"))
        .expect(1)
        .mount(&server)
        .await;

    let mut failed = task("T2", "processing-error");
    failed["response"] = json!({
        "error": {
            "type": "ACL_REDIS_RULE_NOT_FOUND",
            "status": "404 NOT_FOUND",
            "description": "ACL redis rule not found"
        }
    });
    Mock::given(method("GET"))
        .and(path("/v1/tasks/T2"))
        .respond_with(ok_json(failed))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .acl()
        .update_redis_rule(
            40004,
            &RedisRuleRequest {
                name: "readers".to_string(),
                redis_rule: "+@read ~*".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::NotFound {
            resource: Resource::RedisRule(40004),
            ..
        }
    ));
    assert_eq!(err.to_string(), "redis rule 40004 not found");
    assert!(err.is_not_found());

    // NotFound -> Task -> TaskPayloadError
    let payload = err
        .source()
        .and_then(|task| task.source())
        .and_then(|inner| inner.downcast_ref::<TaskPayloadError>())
        .unwrap();
    assert_eq!(payload.error_type, "ACL_REDIS_RULE_NOT_FOUND");
    assert_eq!(payload.status_code(), "404");
    assert_eq!(err.task_error(), Some(payload));
}

#[tokio::test]
async fn test_task_payload_error_wins_over_status() {
    let server = MockServer::start().await;

    let mut body = task("T3", "processing-completed");
    body["response"] = json!({
        "error": {"type": "INVALID_REQUEST", "status": "400 BAD_REQUEST", "description": "bad"}
    });
    Mock::given(method("GET"))
        .and(path("/v1/tasks/T3"))
        .respond_with(ok_json(body))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.task_waiter().wait("T3").await.unwrap_err();

    assert!(matches!(err, Error::Task { .. }));
    assert!(!err.is_not_found());
    assert_eq!(err.task_error().unwrap().status_code(), "400");
}

#[tokio::test]
async fn test_unknown_terminal_status_fails() {
    let server = MockServer::start().await;

    let mut body = task("T4", "processing-error");
    body["description"] = json!("quota exceeded");
    Mock::given(method("GET"))
        .and(path("/v1/tasks/T4"))
        .respond_with(ok_json(body))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.task_waiter().wait("T4").await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "task T4 failed processing-error - quota exceeded"
    );
}

#[tokio::test]
async fn test_transport_error_names_operation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/subscriptions/9/databases"))
        .respond_with(ResponseTemplate::new(418).set_body_string("teapot"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .databases()
        .create(9, &Default::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "failed to create database: 418 - teapot");
}
