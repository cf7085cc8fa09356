//! # Redis Cloud API Client
//!
//! An async client for the Redis Cloud control-plane API. Mutations on the
//! API are asynchronous: the server accepts a request, answers with a task
//! id, and the real work happens later. This crate hides that behind plain
//! `async fn`s that return once the task has finished.
//!
//! ## Features
//!
//! - **Task Orchestration**: mutations wait for their task with capped
//!   exponential backoff, tolerating the short window in which a fresh task
//!   still answers 404
//! - **Rate Limiting**: a client-side fixed-window limiter, recalibrated from
//!   the server's `X-Rate-Limit-Remaining` hint
//! - **Pagination**: lazy [`ListIter`] over offset/limit endpoints, also
//!   usable as a `Stream`
//! - **Typed Errors**: transport, task-payload and per-resource not-found
//!   errors that compose through `source()`
//! - **Redacted Wire Logging**: optional request/response transcripts with
//!   every `password` field masked
//! - **Cancellation**: every suspension point honours a
//!   [`CancellationToken`](tokio_util::sync::CancellationToken)
//!
//! ## Quick Start
//!
//! ```no_run
//! use rediscloud_api::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Credentials from REDISCLOUD_API_KEY / REDISCLOUD_SECRET_KEY
//! let client = Client::from_env()?;
//!
//! // List every database of subscription 5, one page at a time
//! let mut databases = client.databases().list(5);
//! while databases.next().await {
//!     if let Some(db) = databases.value() {
//!         println!("{:?} {:?}", db.database_id, db.name);
//!     }
//! }
//! if let Some(err) = databases.err() {
//!     eprintln!("listing failed: {err}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`transport`] - credential signing and redacted wire logging
//! - [`runtime`] - rate limiter, request executor, task poller and list iterator
//! - [`services`] - per-resource facades built on the runtime
//! - [`error`] - error taxonomy and not-found lifting
//! - [`metrics`] - request, poll and rate-limit metrics

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Client construction
pub mod client;

/// Error types
pub mod error;

/// Metrics recorded through the `metrics` facade
pub mod metrics;

/// Rate limiting, request execution, task polling and pagination
pub mod runtime;

/// Resource services
pub mod services;

/// HTTP transport and wire logging
pub mod transport;

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use error::{Error, NotFoundExt, Resource, Result, TaskPayloadError};
pub use runtime::{ListIter, PagedResponse, PollPolicy, Task, TaskStatus, TaskWaiter};
pub use services::Scope;
pub use transport::{Credentials, Transporter, WireLogger};
