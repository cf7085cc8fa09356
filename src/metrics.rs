//! Client-side metrics
//!
//! Records through the `metrics` facade so the embedding application can
//! install whichever exporter it likes. Without a recorder every call is a
//! no-op.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Duration;

/// Total HTTP requests, labelled by method and status
pub const HTTP_REQUESTS_TOTAL: &str = "rediscloud_http_requests_total";

/// Total task polls, labelled by outcome
pub const TASK_POLLS_TOTAL: &str = "rediscloud_task_polls_total";

/// Time spent waiting on the client-side rate limiter
pub const RATE_LIMIT_WAIT_SECONDS: &str = "rediscloud_rate_limit_wait_seconds";

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(
        HTTP_REQUESTS_TOTAL,
        Unit::Count,
        "Total number of HTTP requests sent to the control-plane API"
    );
    describe_counter!(
        TASK_POLLS_TOTAL,
        Unit::Count,
        "Total number of task status polls"
    );
    describe_histogram!(
        RATE_LIMIT_WAIT_SECONDS,
        Unit::Seconds,
        "Time spent waiting for a rate limit slot"
    );
}

pub(crate) fn record_request(method: &str, status: u16) {
    counter!(HTTP_REQUESTS_TOTAL, "method" => method.to_string(), "status" => status.to_string())
        .increment(1);
}

pub(crate) fn record_task_poll(outcome: &'static str) {
    counter!(TASK_POLLS_TOTAL, "outcome" => outcome).increment(1);
}

pub(crate) fn record_rate_limit_wait(waited: Duration) {
    histogram!(RATE_LIMIT_WAIT_SECONDS).record(waited.as_secs_f64());
}
