//! Task model decoding and poll policy

use chrono::{Datelike, Timelike};
use rediscloud_api::runtime::config::MAX_TASK_NOT_FOUND;
use rediscloud_api::{PollPolicy, Task, TaskStatus};
use std::time::Duration;

#[test]
fn test_task_decodes_full_response() {
    let json = r#"{
        "taskId": "8b2e1c",
        "commandType": "databaseCreateRequest",
        "status": "processing-completed",
        "description": "Request processing completed successfully",
        "timestamp": "2024-05-01T12:30:45.123Z",
        "response": {"resourceId": 51, "additionalResourceId": 7}
    }"#;
    let task: Task = serde_json::from_str(json).unwrap();

    assert_eq!(task.id, "8b2e1c");
    assert_eq!(task.status, TaskStatus::ProcessingCompleted);
    assert_eq!(task.resource_id(), Some(51));

    let ts = task.timestamp_utc().unwrap();
    assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 5, 1));
    assert_eq!((ts.hour(), ts.minute()), (12, 30));
}

#[test]
fn test_unknown_status_is_preserved() {
    let task: Task = serde_json::from_str(r#"{"taskId":"x","status":"paused"}"#).unwrap();
    assert_eq!(task.status, TaskStatus::Other("paused".to_string()));
    assert!(!task.status.is_processing());
    assert_eq!(task.status.to_string(), "paused");
}

#[test]
fn test_missing_status_defaults_to_unknown() {
    let task: Task = serde_json::from_str(r#"{"taskId":"x"}"#).unwrap();
    assert_eq!(task.status, TaskStatus::Unknown);
    assert!(task.timestamp_utc().is_none());
}

#[test]
fn test_processing_states() {
    for status in ["initialized", "received", "processing-in-progress"] {
        assert!(TaskStatus::from(status.to_string()).is_processing());
    }
    for status in ["processing-completed", "processing-error"] {
        assert!(!TaskStatus::from(status.to_string()).is_processing());
    }
}

#[test]
fn test_default_poll_policy() {
    let policy = PollPolicy::default();
    assert_eq!(policy.max_not_found, MAX_TASK_NOT_FOUND);
    assert_eq!(policy.delay(0), Duration::from_secs(1));
    assert_eq!(policy.delay(3), Duration::from_secs(8));
    assert_eq!(policy.delay(40), Duration::from_secs(30));
}
