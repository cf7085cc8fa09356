//! Shared helpers for the integration tests

#![allow(dead_code)]

use rediscloud_api::{Client, ClientBuilder, PollPolicy, WireLogger};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::{MockServer, Request, ResponseTemplate};

pub const API_KEY: &str = "test-api-key";
pub const SECRET_KEY: &str = "test-secret-key";

/// Poll policy with millisecond delays so tests against a live mock server stay fast
pub fn fast_poll() -> PollPolicy {
    PollPolicy {
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        ..PollPolicy::default()
    }
}

/// Builder pointed at the mock server's `/v1`
pub fn builder_for(server: &MockServer) -> ClientBuilder {
    Client::builder()
        .base_url(format!("{}/v1", server.uri()))
        .auth(API_KEY, SECRET_KEY)
        .poll_policy(fast_poll())
}

pub fn client_for(server: &MockServer) -> Client {
    builder_for(server).build().unwrap()
}

/// Task body with the given status
pub fn task(id: &str, status: &str) -> Value {
    json!({
        "taskId": id,
        "commandType": "testRequest",
        "status": status,
        "description": "Task request for test",
        "timestamp": "2024-03-01T10:15:30Z",
        "links": [{"href": "https://example.com", "rel": "self", "type": "GET"}]
    })
}

/// Completed task carrying a resource id
pub fn completed_with_id(id: &str, resource_id: i64) -> Value {
    let mut body = task(id, "processing-completed");
    body["response"] = json!({ "resourceId": resource_id });
    body
}

/// Completed task carrying an arbitrary resource payload
pub fn completed_with_resource(id: &str, resource: Value) -> Value {
    let mut body = task(id, "processing-completed");
    body["response"] = json!({ "resource": resource });
    body
}

pub fn ok_json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn accepted(id: &str) -> ResponseTemplate {
    ResponseTemplate::new(202).set_body_json(task(id, "received"))
}

/// Responder replaying `responses` in order and repeating the last one
pub fn sequence(
    responses: Vec<ResponseTemplate>,
) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
    let calls = Arc::new(AtomicUsize::new(0));
    move |_req: &Request| {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        responses[n.min(responses.len() - 1)].clone()
    }
}

/// Wire logger that keeps every record
#[derive(Default)]
pub struct CapturingLogger {
    pub records: Mutex<Vec<String>>,
}

impl WireLogger for CapturingLogger {
    fn log(&self, record: &str) {
        self.records.lock().unwrap().push(record.to_string());
    }
}

impl CapturingLogger {
    pub fn records(&self) -> Vec<String> {
        self.records.lock().unwrap().clone()
    }
}
