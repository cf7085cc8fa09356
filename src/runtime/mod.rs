//! Client runtime shared by every resource service
//!
//! - [`config`] - defaults and backoff helpers
//! - [`rate_limit`] - fixed-window client-side limiter
//! - [`executor`] - signed JSON request execution
//! - [`task`] - asynchronous task polling
//! - [`pagination`] - offset/limit list iteration

pub mod config;
pub mod executor;
pub mod pagination;
pub mod rate_limit;
pub mod task;

pub use executor::Api;
pub use pagination::{ListIter, PagedResponse};
pub use rate_limit::{RateLimitError, RateLimiter};
pub use task::{PollPolicy, Task, TaskResponse, TaskStatus, TaskWaiter};
