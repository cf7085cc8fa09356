//! Cancellation of in-flight calls

use rediscloud_api::PollPolicy;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::{builder_for, client_for, ok_json, task};

#[tokio::test]
async fn test_cancel_interrupts_poll_sleep() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tasks/T1"))
        .respond_with(ok_json(task("T1", "processing-in-progress")))
        .mount(&server)
        .await;

    // long delays so only cancellation can end the wait
    let client = builder_for(&server)
        .poll_policy(PollPolicy {
            base_delay: Duration::from_secs(30),
            max_delay: Duration::from_secs(30),
            ..PollPolicy::default()
        })
        .build()
        .unwrap();

    let token = CancellationToken::new();
    let scoped = client.with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let started = Instant::now();
    let err = scoped.task_waiter().wait("T1").await.unwrap_err();
    canceller.await.unwrap();

    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_cancel_interrupts_slow_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let token = CancellationToken::new();
    let scoped = client.with_cancellation(token.clone());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let started = Instant::now();
    let err = scoped.subscriptions().list().await.unwrap_err();

    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_cancelled_token_stops_before_sending() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let client = client_for(&server).with_cancellation(token);

    let err = client.tasks().get("T1").await.unwrap_err();
    assert!(err.is_cancelled());
}

#[tokio::test]
async fn test_dropping_future_cancels_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let subscriptions = client.subscriptions();
    let result = tokio::time::timeout(Duration::from_millis(50), subscriptions.list()).await;

    assert!(result.is_err());
}
