//! Error taxonomy shared by the runtime and every resource service
//!
//! Three families of failure compose here:
//!
//! - [`Error::Transport`] - a non-2xx HTTP response, with status and raw body
//! - [`Error::Task`] - the server accepted a mutation but the task finished
//!   with a structured [`TaskPayloadError`]
//! - [`Error::NotFound`] - a named resource is missing, lifted from either of
//!   the above when the code is `404`
//!
//! Wrapping always keeps the inner error reachable through
//! [`std::error::Error::source`], so `NotFound -> Task -> TaskPayloadError`
//! is at most two steps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Boxed error produced by a pluggable lower-layer transport.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered with a status code >= 300
    #[error("failed to {operation}: {status} - {body}")]
    Transport {
        /// Human-readable operation name, e.g. "create database"
        operation: String,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The request never produced a response
    #[error("failed to {operation}: {source}")]
    Network {
        /// Human-readable operation name
        operation: String,
        /// Underlying transport failure
        #[source]
        source: BoxError,
    },

    /// The request body could not be serialised
    #[error("failed to {operation}: could not encode request: {source}")]
    Encode {
        /// Human-readable operation name
        operation: String,
        /// Underlying encoder failure
        #[source]
        source: serde_json::Error,
    },

    /// The response body was not the JSON we expected
    #[error("failed to {operation}: could not decode response: {source}")]
    Decode {
        /// Human-readable operation name
        operation: String,
        /// Underlying decoder failure
        #[source]
        source: serde_json::Error,
    },

    /// A task terminated with a server-declared error payload
    #[error("task {task_id} failed: {error}")]
    Task {
        /// Identifier of the failed task
        task_id: String,
        /// Structured error reported by the server
        #[source]
        error: TaskPayloadError,
    },

    /// The task kept answering 404 past the tolerated number of polls
    ///
    /// Never lifted to [`Error::NotFound`]: the task is missing, not the
    /// resource it was acting on.
    #[error("task {task_id} not found after {polls} polls: {source}")]
    TaskNotFound {
        /// Identifier of the missing task
        task_id: String,
        /// Polls that answered 404
        polls: u32,
        /// The last 404 response
        #[source]
        source: Box<Error>,
    },

    /// A task reached a terminal state other than success without an error payload
    #[error("task {task_id} failed {status} - {description}")]
    TaskFailed {
        /// Identifier of the failed task
        task_id: String,
        /// Terminal status string as reported by the server
        status: String,
        /// Task description, possibly empty
        description: String,
    },

    /// A named resource does not exist
    #[error("{resource} not found")]
    NotFound {
        /// The resource that was looked up
        resource: Resource,
        /// The lower-level error that reported the absence
        #[source]
        source: Box<Error>,
    },

    /// The call was cancelled before it completed
    #[error("operation cancelled")]
    Cancelled,

    /// Invalid client configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Additional context wrapped around an inner error
    #[error("{context}: {source}")]
    Context {
        /// What the caller was doing
        context: String,
        /// Wrapped error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with additional context, keeping it reachable via `source()`.
    pub fn annotate(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error, through any channel, reports a missing resource.
    ///
    /// True for [`Error::NotFound`], a `404` [`Error::Transport`], and a task
    /// payload whose status code is `404`. A task that itself went missing
    /// ([`Error::TaskNotFound`]) does not count.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Transport { status, .. } => *status == 404,
            Error::Task { error, .. } => error.status_code() == "404",
            Error::Context { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// The task payload error carried by this error, if any.
    pub fn task_error(&self) -> Option<&TaskPayloadError> {
        match self {
            Error::Task { error, .. } => Some(error),
            Error::NotFound { source, .. } | Error::Context { source, .. } => source.task_error(),
            _ => None,
        }
    }

    /// The HTTP status code of the underlying transport failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport { status, .. } => Some(*status),
            Error::NotFound { source, .. }
            | Error::Context { source, .. }
            | Error::TaskNotFound { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Whether this error came from cancellation.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Error::Cancelled => true,
            Error::Context { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}

/// Server-declared logical error embedded in a task response
///
/// `status` is free-form with a leading numeric code, e.g. `"404 NOT_FOUND"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{error_type} - {status}: {description}")]
pub struct TaskPayloadError {
    /// Stable machine code such as `ACL_ROLE_NOT_FOUND`
    #[serde(rename = "type", default)]
    pub error_type: String,
    /// Free-form status with an embedded HTTP-style code
    #[serde(default)]
    pub status: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
}

impl TaskPayloadError {
    /// Leading decimal digits of `status`, or an empty string when there are none.
    pub fn status_code(&self) -> &str {
        let end = self
            .status
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.status.len());
        &self.status[..end]
    }
}

/// Identity of a resource for not-found reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// A pro subscription
    Subscription(i64),
    /// A database inside a pro subscription
    Database {
        /// Owning subscription
        subscription: i64,
        /// Database id
        database: i64,
    },
    /// A cloud provider account
    CloudAccount(i64),
    /// An ACL user
    User(i64),
    /// An ACL role
    Role(i64),
    /// An ACL redis rule
    RedisRule(i64),
    /// A VPC peering of a subscription
    VpcPeering {
        /// Owning subscription
        subscription: i64,
        /// Peering id
        peering: i64,
    },
    /// Private Service Connect service, optionally scoped to an Active-Active region
    PrivateServiceConnect {
        /// Owning subscription
        subscription: i64,
        /// Active-Active region
        region: Option<i64>,
    },
    /// Private Service Connect endpoint
    PrivateServiceConnectEndpoint {
        /// Owning subscription
        subscription: i64,
        /// Active-Active region
        region: Option<i64>,
        /// Endpoint id
        endpoint: i64,
    },
    /// Private Link configuration
    PrivateLink {
        /// Owning subscription
        subscription: i64,
        /// Active-Active region
        region: Option<i64>,
    },
    /// Transit Gateway attachment
    TransitGatewayAttachment {
        /// Owning subscription
        subscription: i64,
        /// Active-Active region
        region: Option<i64>,
        /// Transit Gateway id
        gateway: i64,
    },
    /// A fixed (essentials) subscription
    FixedSubscription(i64),
    /// A database inside a fixed subscription
    FixedDatabase {
        /// Owning subscription
        subscription: i64,
        /// Database id
        database: i64,
    },
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn region(f: &mut fmt::Formatter<'_>, region: &Option<i64>) -> fmt::Result {
            match region {
                Some(r) => write!(f, " region {r}"),
                None => Ok(()),
            }
        }

        match self {
            Resource::Subscription(id) => write!(f, "subscription {id}"),
            Resource::Database {
                subscription,
                database,
            } => write!(f, "database {database} in subscription {subscription}"),
            Resource::CloudAccount(id) => write!(f, "cloud account {id}"),
            Resource::User(id) => write!(f, "user {id}"),
            Resource::Role(id) => write!(f, "role {id}"),
            Resource::RedisRule(id) => write!(f, "redis rule {id}"),
            Resource::VpcPeering {
                subscription,
                peering,
            } => write!(f, "vpc peering {peering} in subscription {subscription}"),
            Resource::PrivateServiceConnect {
                subscription,
                region: r,
            } => {
                write!(f, "psc in subscription {subscription}")?;
                region(f, r)
            }
            Resource::PrivateServiceConnectEndpoint {
                subscription,
                region: r,
                endpoint,
            } => {
                write!(f, "psc endpoint {endpoint} in subscription {subscription}")?;
                region(f, r)
            }
            Resource::PrivateLink {
                subscription,
                region: r,
            } => {
                write!(f, "private link in subscription {subscription}")?;
                region(f, r)
            }
            Resource::TransitGatewayAttachment {
                subscription,
                region: r,
                gateway,
            } => {
                write!(
                    f,
                    "transit gateway {gateway} attachment in subscription {subscription}"
                )?;
                region(f, r)
            }
            Resource::FixedSubscription(id) => write!(f, "fixed subscription {id}"),
            Resource::FixedDatabase {
                subscription,
                database,
            } => write!(
                f,
                "database {database} in fixed subscription {subscription}"
            ),
        }
    }
}

/// Lifts not-found failures of a call into [`Error::NotFound`] for a named resource.
pub trait NotFoundExt<T> {
    /// Replace a 404 (direct or task payload) with a typed not-found error.
    fn or_not_found(self, resource: impl FnOnce() -> Resource) -> Result<T>;
}

impl<T> NotFoundExt<T> for Result<T> {
    fn or_not_found(self, resource: impl FnOnce() -> Resource) -> Result<T> {
        self.map_err(|err| match err {
            Error::NotFound { .. } => err,
            err if err.is_not_found() => Error::NotFound {
                resource: resource(),
                source: Box::new(err),
            },
            err => err,
        })
    }
}
