//! Tracing output of the client

use serde_json::json;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer};

use crate::support::{builder_for, ok_json, task, API_KEY};

/// In-memory sink for formatted log lines
#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Buffer {
    type Writer = Buffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn subscriber(filter: &str, buffer: &Buffer) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(buffer.clone())
        .with_ansi(false)
        .finish()
}

#[test]
fn test_env_filter_parsing() {
    assert!(EnvFilter::try_new("rediscloud_api=debug").is_ok());
    assert!(EnvFilter::try_new("warn,rediscloud_api::wire=debug").is_ok());
}

#[tokio::test]
async fn test_wire_records_reach_tracing_redacted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/acl/users"))
        .respond_with(ok_json(task("U1", "received")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/tasks/U1"))
        .respond_with(ok_json(json!({
            "taskId": "U1",
            "status": "processing-completed",
            "response": {"resourceId": 3}
        })))
        .mount(&server)
        .await;

    let buffer = Buffer::default();
    let _guard = tracing::subscriber::set_default(subscriber("rediscloud_api::wire=debug", &buffer));

    let client = builder_for(&server).log_requests(true).build().unwrap();
    let id = client
        .acl()
        .create_user(&rediscloud_api::services::acl::CreateUser {
            name: "svc".to_string(),
            role: "reader".to_string(),
            password: "hunter2-Secret".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(id, 3);
    let logs = buffer.contents();
    assert!(logs.contains("POST /v1/acl/users HTTP/1.1"));
    assert!(logs.contains("GET /v1/tasks/U1 HTTP/1.1"));
    assert!(!logs.contains("hunter2-Secret"));
    assert!(!logs.contains(API_KEY));
}

#[tokio::test]
async fn test_poll_retries_logged_at_debug() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/P1"))
        .respond_with(crate::support::sequence(vec![
            ok_json(task("P1", "processing-in-progress")),
            ok_json(task("P1", "processing-completed")),
        ]))
        .mount(&server)
        .await;

    let buffer = Buffer::default();
    let _guard = tracing::subscriber::set_default(subscriber("rediscloud_api=debug", &buffer));

    let client = builder_for(&server).build().unwrap();
    client.task_waiter().wait("P1").await.unwrap();

    let logs = buffer.contents();
    assert!(logs.contains("P1"));
    assert!(logs.contains("DEBUG"));
}
