//! Runtime configuration constants

use std::time::Duration;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.redislabs.com/v1";

/// Environment variable holding the API (account) key.
pub const ENV_API_KEY: &str = "REDISCLOUD_API_KEY";

/// Environment variable holding the API secret key.
pub const ENV_SECRET_KEY: &str = "REDISCLOUD_SECRET_KEY";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "REDISCLOUD_URL";

/// Requests admitted per rate-limit window.
/// Matches the documented server budget of 400 requests per minute.
pub const DEFAULT_RATE_LIMIT: u32 = 400;

/// Rate-limit window length.
pub const DEFAULT_RATE_WINDOW: Duration = Duration::from_secs(60);

/// Response header carrying the server's remaining request budget.
pub const RATE_LIMIT_REMAINING_HEADER: &str = "X-Rate-Limit-Remaining";

/// Page size for collection endpoints.
pub const PAGE_SIZE: u32 = 100;

/// Initial task poll delay in milliseconds.
pub const INITIAL_BACKOFF_MS: u64 = 1000; // 1 second

/// Maximum task poll delay in milliseconds.
pub const MAX_BACKOFF_MS: u64 = 30000; // 30 seconds

/// Consecutive `404`s on `/tasks/{id}` absorbed while the task is being created.
pub const MAX_TASK_NOT_FOUND: u32 = 5;

/// Poll attempt ceiling. Large enough that only cancellation or a terminal
/// state ends the loop in practice.
pub const MAX_POLL_ATTEMPTS: u32 = 100_000;

/// Calculate exponential backoff delay capped at [`MAX_BACKOFF_MS`]
pub fn calculate_backoff(retry_count: u32) -> Duration {
    backoff_between(
        Duration::from_millis(INITIAL_BACKOFF_MS),
        Duration::from_millis(MAX_BACKOFF_MS),
        retry_count,
    )
}

/// Exponential backoff `base * 2^retry_count`, capped at `max`.
pub fn backoff_between(base: Duration, max: Duration, retry_count: u32) -> Duration {
    let factor = 2u32.checked_pow(retry_count).unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(max)
}
