//! Fixed-window limiter behaviour under paused time

use rediscloud_api::runtime::RateLimiter;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[tokio::test(start_paused = true)]
async fn test_thirty_requests_at_ten_per_two_seconds() {
    let limiter = RateLimiter::new(10, Duration::from_secs(2));
    let cancel = CancellationToken::new();
    let start = Instant::now();

    for _ in 0..30 {
        limiter.wait(&cancel).await.unwrap();
    }

    // three windows: the last ten are admitted at the start of the third
    assert!(start.elapsed() >= Duration::from_secs(4));
    assert!(start.elapsed() < Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_server_hint_forces_early_wait() {
    let limiter = RateLimiter::new(10, Duration::from_secs(2));
    let cancel = CancellationToken::new();
    let start = Instant::now();

    limiter.wait(&cancel).await.unwrap();
    limiter.update(0).await;
    limiter.wait(&cancel).await.unwrap();

    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_waiters_share_budget() {
    let limiter = std::sync::Arc::new(RateLimiter::new(3, Duration::from_secs(1)));
    let cancel = CancellationToken::new();
    let start = Instant::now();

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let limiter = limiter.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { limiter.wait(&cancel).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(start.elapsed(), Duration::from_secs(1));
    assert_eq!(limiter.in_window().await, 3);
}

#[test]
fn test_zero_limit_still_admits() {
    let limiter = RateLimiter::new(0, Duration::from_secs(1));
    assert_eq!(limiter.limit(), 1);
}
