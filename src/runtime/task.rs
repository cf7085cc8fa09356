//! Asynchronous task polling
//!
//! Mutations answer with a task id. [`TaskWaiter`] polls `GET /tasks/{id}`
//! with capped exponential backoff until the task completes or fails.
//! A freshly created task may 404 for a short while before the server
//! materialises it, so a bounded number of 404s are treated as "not yet".

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::config::{
    backoff_between, INITIAL_BACKOFF_MS, MAX_BACKOFF_MS, MAX_POLL_ATTEMPTS, MAX_TASK_NOT_FOUND,
};
use super::executor::Api;
use crate::error::{Error, Result, TaskPayloadError};
use crate::metrics;

/// Lifecycle state of a server task
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// `initialized`
    Initialized,
    /// `received`
    Received,
    /// `processing-in-progress`
    ProcessingInProgress,
    /// `processing-completed`
    ProcessingCompleted,
    /// `processing-error`
    ProcessingError,
    /// Any status this client does not know about
    #[default]
    Unknown,
    /// A status string outside the known set
    Other(String),
}

impl TaskStatus {
    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Initialized => "initialized",
            TaskStatus::Received => "received",
            TaskStatus::ProcessingInProgress => "processing-in-progress",
            TaskStatus::ProcessingCompleted => "processing-completed",
            TaskStatus::ProcessingError => "processing-error",
            TaskStatus::Unknown => "",
            TaskStatus::Other(s) => s,
        }
    }

    /// Still being worked on by the server
    pub fn is_processing(&self) -> bool {
        matches!(
            self,
            TaskStatus::Initialized | TaskStatus::Received | TaskStatus::ProcessingInProgress
        )
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "initialized" => TaskStatus::Initialized,
            "received" => TaskStatus::Received,
            "processing-in-progress" => TaskStatus::ProcessingInProgress,
            "processing-completed" => TaskStatus::ProcessingCompleted,
            "processing-error" => TaskStatus::ProcessingError,
            "" => TaskStatus::Unknown,
            _ => TaskStatus::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A server task as returned by `GET /tasks/{id}` and by every mutation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task identifier
    #[serde(rename = "taskId", default)]
    pub id: String,
    /// Command that created the task, e.g. `createDatabaseRequest`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_type: Option<String>,
    /// Current status
    #[serde(default)]
    pub status: TaskStatus,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Server timestamp, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Outcome once the task has finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<TaskResponse>,
}

impl Task {
    /// The timestamp parsed as RFC 3339, if present and well formed.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// Resource id produced by the task, if any
    pub fn resource_id(&self) -> Option<i64> {
        self.response.as_ref().and_then(|r| r.resource_id)
    }
}

/// The `response` object of a task
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    /// Id of the created or affected resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<i64>,
    /// Arbitrary payload for task-returning reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
    /// Server-declared failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TaskPayloadError>,
}

/// Backoff and tolerance settings for [`TaskWaiter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
    /// 404s tolerated before the task is declared missing
    pub max_not_found: u32,
    /// Hard ceiling on polls for one task
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_delay: Duration::from_millis(MAX_BACKOFF_MS),
            max_not_found: MAX_TASK_NOT_FOUND,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

impl PollPolicy {
    /// Delay before retry number `attempt` (zero based)
    pub fn delay(&self, attempt: u32) -> Duration {
        backoff_between(self.base_delay, self.max_delay, attempt)
    }
}

/// What a single poll observed
enum Observation {
    Pending(TaskStatus),
    Missing(Error),
    Completed(Task),
    Failed(Error),
}

enum PollState {
    Fetching { attempt: u32 },
    Sleeping { attempt: u32, delay: Duration },
}

/// Polls tasks to completion
#[derive(Clone, Debug)]
pub struct TaskWaiter {
    api: Api,
    policy: PollPolicy,
}

impl TaskWaiter {
    /// Create a waiter sharing `api`
    pub fn new(api: Api, policy: PollPolicy) -> Self {
        Self { api, policy }
    }

    /// The executor used for polling
    pub fn api(&self) -> &Api {
        &self.api
    }

    /// The active poll policy
    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Wait for the task to complete, discarding its result.
    pub async fn wait(&self, task_id: &str) -> Result<()> {
        self.wait_for_task(task_id).await.map(|_| ())
    }

    /// Wait for the task and return the id of the resource it produced.
    pub async fn wait_for_resource_id(&self, task_id: &str) -> Result<i64> {
        let task = self.wait_for_task(task_id).await?;
        task.resource_id().ok_or_else(|| Error::Decode {
            operation: format!("read resource id of task {task_id}"),
            source: serde::de::Error::missing_field("resourceId"),
        })
    }

    /// Wait for the task and decode `response.resource` into `T`.
    ///
    /// A missing resource decodes as JSON `null`.
    pub async fn wait_for_resource<T>(&self, task_id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let task = self.wait_for_task(task_id).await?;
        let resource = task
            .response
            .and_then(|r| r.resource)
            .unwrap_or(Value::Null);

        serde_json::from_value(resource).map_err(|source| Error::Decode {
            operation: format!("read resource of task {task_id}"),
            source,
        })
    }

    /// Poll until the task is `processing-completed` and return it.
    ///
    /// # Errors
    /// - [`Error::Task`] when the task carries an error payload, regardless
    ///   of its status
    /// - [`Error::TaskFailed`] for any other terminal non-success status
    /// - [`Error::TaskNotFound`], wrapping the last `404`, once more than
    ///   [`PollPolicy::max_not_found`] polls have answered 404
    /// - any other transport failure, unchanged
    /// - [`Error::Cancelled`] if cancelled while sleeping or polling
    pub async fn wait_for_task(&self, task_id: &str) -> Result<Task> {
        let path = format!("/tasks/{task_id}");
        let operation = format!("retrieve task {task_id}");
        let mut not_found = 0u32;
        let mut state = PollState::Fetching { attempt: 0 };

        loop {
            state = match state {
                PollState::Fetching { attempt } => {
                    let reason = match self.observe(task_id, &operation, &path).await {
                        Observation::Completed(task) => {
                            metrics::record_task_poll("completed");
                            debug!(task_id = %task_id, attempts = attempt + 1, "Task completed");
                            return Ok(task);
                        }
                        Observation::Failed(err) => {
                            metrics::record_task_poll("failed");
                            return Err(err);
                        }
                        Observation::Missing(err) => {
                            metrics::record_task_poll("not_found");
                            not_found += 1;
                            if not_found > self.policy.max_not_found {
                                warn!(
                                    task_id = %task_id,
                                    not_found = not_found,
                                    "Task still not found, giving up"
                                );
                                return Err(Error::TaskNotFound {
                                    task_id: task_id.to_string(),
                                    polls: not_found,
                                    source: Box::new(err),
                                });
                            }
                            "not found".to_string()
                        }
                        Observation::Pending(status) => {
                            metrics::record_task_poll("pending");
                            format!("status {status}")
                        }
                    };

                    if attempt + 1 >= self.policy.max_attempts {
                        return Err(Error::TaskFailed {
                            task_id: task_id.to_string(),
                            status: "timeout".to_string(),
                            description: format!("gave up after {} polls", attempt + 1),
                        });
                    }

                    let delay = self.policy.delay(attempt);
                    debug!(
                        task_id = %task_id,
                        attempt = attempt + 1,
                        reason = %reason,
                        delay_ms = delay.as_millis() as u64,
                        "Task not complete, retrying"
                    );
                    PollState::Sleeping { attempt, delay }
                }
                PollState::Sleeping { attempt, delay } => {
                    tokio::select! {
                        _ = sleep(delay) => {}
                        _ = self.api.cancellation().cancelled() => return Err(Error::Cancelled),
                    }
                    PollState::Fetching {
                        attempt: attempt + 1,
                    }
                }
            };
        }
    }

    async fn observe(&self, task_id: &str, operation: &str, path: &str) -> Observation {
        let task: Task = match self.api.get(operation, path).await {
            Ok(task) => task,
            Err(err @ Error::Transport { status: 404, .. }) => return Observation::Missing(err),
            Err(err) => return Observation::Failed(err),
        };

        // An error payload is authoritative whatever the status says.
        if let Some(error) = task.response.as_ref().and_then(|r| r.error.clone()) {
            return Observation::Failed(Error::Task {
                task_id: task_id.to_string(),
                error,
            });
        }

        match &task.status {
            TaskStatus::ProcessingCompleted => Observation::Completed(task),
            status if status.is_processing() => Observation::Pending(status.clone()),
            status => Observation::Failed(Error::TaskFailed {
                task_id: task_id.to_string(),
                status: status.to_string(),
                description: task.description.clone().unwrap_or_default(),
            }),
        }
    }
}
