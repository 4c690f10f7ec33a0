//! Remote task store - the capability trait plus its Google Tasks
//! implementation

pub mod auth;
pub mod google;

pub use google::GoogleTasksClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::task::{Task, TaskList};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Task id is required for updating")]
    MissingTaskId,

    #[error("{context}: HTTP {status}: {message}")]
    Api {
        context: &'static str,
        status: u16,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RemoteError>;

/// Capability consumed by the sync engine: fetch, create, update, and
/// delete entities in a remote two-level task hierarchy.
///
/// Every call is issued sequentially and awaited to completion before
/// the next; implementations own transport concerns such as pagination,
/// timeouts, and retries.
#[async_trait]
pub trait RemoteStore {
    /// All task lists, title and id only — no tasks populated.
    async fn list_tasklists(&self) -> Result<Vec<TaskList>>;

    /// The full two-level hierarchy of one list, in the store's own
    /// order, with deleted entities excluded.
    async fn get_tasks(&self, list_id: &str) -> Result<Vec<Task>>;

    /// Create a new, empty task list.
    async fn create_tasklist(&self, title: &str) -> Result<TaskList>;

    /// Create a task, as a child of `parent_id` unless it is empty.
    /// The returned task carries the store-assigned id.
    async fn create_task(&self, list_id: &str, task: &Task, parent_id: &str) -> Result<Task>;

    /// Update an existing task's title, status, and notes. Absent notes
    /// clear the remote notes explicitly, never "leave unchanged".
    async fn update_task(&self, list_id: &str, task: &Task) -> Result<Task>;

    /// Delete a task by id.
    async fn delete_task(&self, list_id: &str, task_id: &str) -> Result<()>;
}
