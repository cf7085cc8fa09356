//! Fixed-window rate limiting
//!
//! Approximates the server's request budget: at most `limit` requests are
//! admitted per window, bursting is allowed, and the window rolls over on
//! fixed boundaries anchored at the first request. The server may still
//! answer `429` when the two windows drift apart; callers retry those.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::metrics;

/// Client-side fixed-window request limiter
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    state: Mutex<WindowState>,
}

#[derive(Debug, Default)]
struct WindowState {
    window_start: Option<Instant>,
    count: u32,
}

impl WindowState {
    /// Roll the window forward to the boundary containing `now`.
    ///
    /// The start advances by whole windows so boundaries stay aligned with
    /// the first request even across idle periods.
    fn roll(&mut self, now: Instant, window: Duration) -> Instant {
        let start = *self.window_start.get_or_insert(now);
        if window.is_zero() || now < start + window {
            return start;
        }

        let elapsed = now.duration_since(start).as_nanos();
        let windows = elapsed / window.as_nanos();
        let advance = window.as_nanos().saturating_mul(windows);
        let new_start = start + Duration::from_nanos(u64::try_from(advance).unwrap_or(u64::MAX));

        self.window_start = Some(new_start);
        self.count = 0;
        new_start
    }
}

impl RateLimiter {
    /// Create a limiter admitting `limit` requests per `window`
    ///
    /// A limit of zero is treated as one so callers can always make progress.
    /// A zero `window` disables limiting: every request is admitted at once.
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit: limit.max(1),
            window,
            state: Mutex::new(WindowState::default()),
        }
    }

    /// Maximum requests per window
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Window length
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait until a request slot is available
    ///
    /// Returns immediately while the current window has capacity. Otherwise
    /// sleeps, without holding the lock, until the window ends and re-checks.
    ///
    /// # Errors
    /// [`RateLimitError::Cancelled`] if `cancel` fires while sleeping.
    pub async fn wait(&self, cancel: &CancellationToken) -> Result<(), RateLimitError> {
        if self.window.is_zero() {
            return if cancel.is_cancelled() {
                Err(RateLimitError::Cancelled)
            } else {
                Ok(())
            };
        }

        let started = Instant::now();

        loop {
            if cancel.is_cancelled() {
                return Err(RateLimitError::Cancelled);
            }

            let sleep_for = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                let start = state.roll(now, self.window);

                if state.count < self.limit {
                    state.count += 1;
                    metrics::record_rate_limit_wait(started.elapsed());
                    return Ok(());
                }

                (start + self.window).saturating_duration_since(now)
            };

            debug!(
                limit = self.limit,
                sleep_ms = sleep_for.as_millis() as u64,
                "Rate limit window exhausted, waiting for next window"
            );

            tokio::select! {
                _ = sleep(sleep_for) => {}
                _ = cancel.cancelled() => return Err(RateLimitError::Cancelled),
            }
        }
    }

    /// Apply a server hint of how many requests remain in its window
    ///
    /// Sets the in-window count to `limit - remaining`. The window start is
    /// left untouched.
    pub async fn update(&self, remaining: u32) {
        let mut state = self.state.lock().await;
        state.count = self.limit.saturating_sub(remaining);
        debug!(
            remaining = remaining,
            count = state.count,
            "Rate limiter recalibrated from server hint"
        );
    }

    /// Requests admitted in the current window
    pub async fn in_window(&self) -> u32 {
        self.state.lock().await.count
    }
}

/// Rate limiter errors
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Cancelled while waiting for a slot
    #[error("cancelled while waiting for a rate limit slot")]
    Cancelled,
}
