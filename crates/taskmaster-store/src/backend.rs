//! The backing-store seam.
//!
//! [`TaskBackend`] is the durable side of the store: the in-memory
//! collection in [`crate::store::TaskStore`] is authoritative for reads,
//! the backend is authoritative across restarts. Implementations must be
//! usable from async callers; none of them needs interior ordering
//! guarantees beyond serial calls (mutations are issued one at a time from
//! UI event handlers).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use taskmaster_core::{Task, TaskCategory, TaskChanges, TaskStatus};

use crate::errors::Result;

/// A task record about to be persisted for the first time.
///
/// Carries no `id`: the remote backend lets the server assign one, the
/// local backend mints `task_{uuid}` itself. Serializes to the insert body
/// for the remote variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    /// Owning user.
    pub user_id: String,
    /// Non-empty title.
    pub title: String,
    /// Optional longer text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category label.
    #[serde(rename = "task_type")]
    pub category: TaskCategory,
    /// Initial status.
    pub status: TaskStatus,
    /// Due date in the reference timezone, `YYYY-MM-DD`.
    pub due_date: String,
    /// Due time in the reference timezone, `HH:MM`.
    pub due_time: String,
}

/// Durable storage for a user's task collection.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Fetch every task belonging to `user_id`, ordered by due date
    /// ascending (ties broken by due time).
    async fn fetch_all(&self, user_id: &str) -> Result<Vec<Task>>;

    /// Persist a new task and return it with its assigned id.
    async fn insert(&self, new: &NewTask) -> Result<Task>;

    /// Merge `changes` into the task with `id` and return the updated
    /// record. Fails with [`crate::StoreError::TaskNotFound`] if no task of
    /// that user matches.
    async fn update(&self, id: &str, user_id: &str, changes: &TaskChanges) -> Result<Task>;

    /// Delete the task with `id`. Returns `true` if a record was removed.
    async fn delete(&self, id: &str, user_id: &str) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_insert_body_shape() {
        let new = NewTask {
            user_id: "user_1".into(),
            title: "Call the dentist".into(),
            description: None,
            category: TaskCategory::Health,
            status: TaskStatus::Pending,
            due_date: "2025-07-01".into(),
            due_time: "09:00".into(),
        };
        let json = serde_json::to_value(&new).unwrap();
        assert_eq!(json["task_type"], "salud");
        assert_eq!(json["status"], "pendiente");
        assert!(json.get("id").is_none());
        assert!(json.get("description").is_none());
    }
}
