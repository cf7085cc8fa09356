//! Error taxonomy as seen by callers

use rediscloud_api::{Error, NotFoundExt, Resource, Result, TaskPayloadError};
use std::error::Error as _;

fn rule_not_found() -> Error {
    Error::Task {
        task_id: "T9".to_string(),
        error: TaskPayloadError {
            error_type: "ACL_REDIS_RULE_NOT_FOUND".to_string(),
            status: "404 NOT_FOUND".to_string(),
            description: "ACL redis rule not found".to_string(),
        },
    }
}

#[test]
fn test_task_404_lifts_and_stays_reachable() {
    let result: Result<()> = Err(rule_not_found());
    let err = result
        .or_not_found(|| Resource::RedisRule(40004))
        .unwrap_err();

    assert_eq!(err.to_string(), "redis rule 40004 not found");
    assert_eq!(
        err.task_error().map(|e| e.error_type.as_str()),
        Some("ACL_REDIS_RULE_NOT_FOUND")
    );

    let task = err.source().unwrap();
    let payload = task.source().unwrap();
    assert!(payload.downcast_ref::<TaskPayloadError>().is_some());
}

#[test]
fn test_non_404_passes_through() {
    let result: Result<()> = Err(Error::Transport {
        operation: "get subscription".to_string(),
        status: 500,
        body: "boom".to_string(),
    });
    let err = result.or_not_found(|| Resource::Subscription(1)).unwrap_err();

    assert!(matches!(err, Error::Transport { status: 500, .. }));
    assert!(!err.is_not_found());
}

#[test]
fn test_lifting_is_idempotent() {
    let result: Result<()> = Err(rule_not_found());
    let err = result
        .or_not_found(|| Resource::RedisRule(1))
        .or_not_found(|| Resource::Role(2))
        .unwrap_err();

    assert_eq!(err.to_string(), "redis rule 1 not found");
}

#[test]
fn test_annotate_keeps_classification() {
    let err = Error::Cancelled.annotate("deleting database 5");
    assert!(err.is_cancelled());
    assert_eq!(err.to_string(), "deleting database 5: operation cancelled");

    let err = Error::Transport {
        operation: "get database".to_string(),
        status: 404,
        body: String::new(),
    }
    .annotate("refreshing state");
    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
}

#[test]
fn test_active_active_resource_names() {
    let psc = Resource::PrivateServiceConnectEndpoint {
        subscription: 10,
        region: Some(2),
        endpoint: 3,
    };
    assert_eq!(psc.to_string(), "psc endpoint 3 in subscription 10 region 2");

    let link = Resource::PrivateLink {
        subscription: 10,
        region: None,
    };
    assert_eq!(link.to_string(), "private link in subscription 10");
}
