//! Task inspection

use super::ServiceCore;
use crate::error::Result;
use crate::runtime::Task;

/// Read-only access to server tasks
#[derive(Clone, Debug)]
pub struct TaskService {
    core: ServiceCore,
}

impl TaskService {
    pub(crate) fn new(core: ServiceCore) -> Self {
        Self { core }
    }

    /// Recent tasks of the account
    pub async fn list(&self) -> Result<Vec<Task>> {
        self.core.api().get("list tasks", "/tasks").await
    }

    /// One task by id, without waiting for it
    pub async fn get(&self, id: &str) -> Result<Task> {
        self.core
            .api()
            .get(&format!("retrieve task {id}"), &format!("/tasks/{id}"))
            .await
    }

    /// Block until the task finishes
    pub async fn wait(&self, id: &str) -> Result<Task> {
        self.core.tasks().wait_for_task(id).await
    }
}
