//! Resource services
//!
//! Each service is a thin facade over the shared runtime: mutations post a
//! request, receive a task and hand it to the [`TaskWaiter`]; reads go
//! straight through the executor or, for a handful of endpoints, through a
//! task whose `response.resource` carries the payload.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::runtime::{Api, ListIter, PagedResponse, PollPolicy, Task, TaskWaiter};

pub mod account;
pub mod acl;
pub mod cloud_accounts;
pub mod databases;
pub mod fixed;
pub mod private_link;
pub mod private_service_connect;
pub mod subscriptions;
pub mod tasks;
pub mod transit_gateways;

/// Where a subscription-scoped resource lives
///
/// Standard and Active-Active endpoints differ only by a `/regions/{id}`
/// segment, so one method serves both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope {
    /// Owning subscription
    pub subscription: i64,
    /// Active-Active region, if any
    pub region: Option<i64>,
}

impl Scope {
    /// A standard (single region) subscription
    pub fn subscription(subscription: i64) -> Self {
        Self {
            subscription,
            region: None,
        }
    }

    /// One region of an Active-Active subscription
    pub fn region(subscription: i64, region: i64) -> Self {
        Self {
            subscription,
            region: Some(region),
        }
    }

    /// `/subscriptions/{sid}` or `/subscriptions/{sid}/regions/{rid}`
    pub fn path(&self) -> String {
        match self.region {
            Some(region) => format!("/subscriptions/{}/regions/{region}", self.subscription),
            None => format!("/subscriptions/{}", self.subscription),
        }
    }
}

impl From<i64> for Scope {
    fn from(subscription: i64) -> Self {
        Scope::subscription(subscription)
    }
}

/// Executor and poller shared by every service
#[derive(Clone, Debug)]
pub(crate) struct ServiceCore {
    api: Api,
    tasks: TaskWaiter,
}

impl ServiceCore {
    pub(crate) fn new(api: Api, policy: PollPolicy) -> Self {
        let tasks = TaskWaiter::new(api.clone(), policy);
        Self { api, tasks }
    }

    pub(crate) fn api(&self) -> &Api {
        &self.api
    }

    pub(crate) fn tasks(&self) -> &TaskWaiter {
        &self.tasks
    }

    /// POST and wait for the id of the created resource.
    pub(crate) async fn create<B>(&self, operation: &str, path: &str, body: &B) -> Result<i64>
    where
        B: Serialize + ?Sized,
    {
        let task: Task = self.api.post(operation, path, body).await?;
        debug!(task_id = %task.id, operation = %operation, "Waiting for resource creation");
        self.tasks.wait_for_resource_id(&task.id).await
    }

    /// POST and wait for the task to finish.
    pub(crate) async fn post_and_wait<B>(&self, operation: &str, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let task: Task = self.api.post(operation, path, body).await?;
        debug!(task_id = %task.id, operation = %operation, "Waiting for task");
        self.tasks.wait(&task.id).await
    }

    /// PUT and wait for the task to finish.
    pub(crate) async fn update<B>(&self, operation: &str, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let task: Task = self.api.put(operation, path, body).await?;
        debug!(task_id = %task.id, operation = %operation, "Waiting for update");
        self.tasks.wait(&task.id).await
    }

    /// DELETE and wait for the task to finish.
    pub(crate) async fn delete(&self, operation: &str, path: &str) -> Result<()> {
        let task: Task = self.api.delete(operation, path).await?;
        debug!(task_id = %task.id, operation = %operation, "Waiting for deletion");
        self.tasks.wait(&task.id).await
    }

    /// DELETE with a body and wait for the task to finish.
    pub(crate) async fn delete_with_body<B>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let task: Task = self.api.delete_with_body(operation, path, body).await?;
        debug!(task_id = %task.id, operation = %operation, "Waiting for deletion");
        self.tasks.wait(&task.id).await
    }

    /// GET an endpoint that answers with a task and decode its resource.
    pub(crate) async fn read_via_task<T>(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let task: Task = self.api.get_with_query(operation, path, query).await?;
        debug!(task_id = %task.id, operation = %operation, "Waiting for task-backed read");
        self.tasks.wait_for_resource(&task.id).await
    }

    pub(crate) fn list<P>(&self, operation: &str, path: String) -> ListIter<P>
    where
        P: PagedResponse,
    {
        ListIter::new(self.api.clone(), operation, path)
    }
}
