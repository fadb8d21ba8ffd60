//! The task store — authoritative in-memory collection plus durable backend.
//!
//! Mirrors the original screen's state handling: every mutation persists
//! through the backend first, then refreshes the in-memory list from it.
//! A failed mutation therefore never leaves the in-memory list ahead of
//! the durable copy. Operations are invoked serially from UI/CLI event
//! handlers; there is no internal concurrency control.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use taskmaster_core::{Task, TaskChanges, TaskDraft, TaskStatus, schedule};
use tracing::error;

use crate::backend::{NewTask, TaskBackend};
use crate::errors::{Result, StoreError};

/// Owns the in-memory task list for one user and keeps it in sync with the
/// backing store.
pub struct TaskStore {
    backend: Box<dyn TaskBackend>,
    user_id: String,
    zone: Tz,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Create a store for `user_id`, interpreting wall-clock input in
    /// `zone`. The list starts empty; call [`TaskStore::load`] to populate
    /// it.
    pub fn new(backend: Box<dyn TaskBackend>, user_id: impl Into<String>, zone: Tz) -> Self {
        Self {
            backend,
            user_id: user_id.into(),
            zone,
            tasks: Vec::new(),
        }
    }

    /// Fetch all tasks for the current user, ordered by due date ascending.
    ///
    /// On failure the list is left empty and the error is logged and
    /// returned.
    pub async fn load(&mut self) -> Result<()> {
        match self.backend.fetch_all(&self.user_id).await {
            Ok(tasks) => {
                self.tasks = tasks;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to load tasks");
                self.tasks.clear();
                Err(e)
            }
        }
    }

    /// Validate and persist a new task from form input, then refresh.
    ///
    /// The draft's wall-clock due date/time is encoded into the reference
    /// timezone before persistence.
    pub async fn add(&mut self, draft: TaskDraft) -> Result<Task> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(StoreError::Validation(
                "task title must not be empty".to_string(),
            ));
        }

        let (due_date, due_time) = schedule::encode(draft.due_local, self.zone);
        let new = NewTask {
            user_id: self.user_id.clone(),
            title: title.to_string(),
            description: draft.description,
            category: draft.category,
            status: TaskStatus::Pending,
            due_date,
            due_time,
        };

        let task = match self.backend.insert(&new).await {
            Ok(task) => task,
            Err(e) => {
                error!(error = %e, "failed to add task");
                return Err(e);
            }
        };
        self.load().await?;
        Ok(task)
    }

    /// Merge changed fields into the task with `id`, then refresh. The
    /// task's id is never changed.
    ///
    /// Only description, category and due date/time may be edited here.
    /// Status moves forward exclusively through [`TaskStore::complete`];
    /// changes carrying `status` or `completed_at` are rejected so a
    /// completed task can never be reopened.
    pub async fn update(&mut self, id: &str, changes: TaskChanges) -> Result<Task> {
        if changes.status.is_some() || changes.completed_at.is_some() {
            return Err(StoreError::Validation(
                "status cannot be edited; use complete()".to_string(),
            ));
        }
        let task = self.backend.update(id, &self.user_id, &changes).await?;
        self.load().await?;
        Ok(task)
    }

    /// Encode a wall-clock due date/time into [`TaskChanges`] fields using
    /// the store's timezone.
    #[must_use]
    pub fn due_changes(&self, due_local: NaiveDateTime) -> (String, String) {
        schedule::encode(due_local, self.zone)
    }

    /// Mark the task completed and stamp the completion time, then refresh.
    ///
    /// Completing an already-completed task is a no-op (status only moves
    /// forward).
    pub async fn complete(&mut self, id: &str) -> Result<Task> {
        if let Some(existing) = self.get(id) {
            if existing.status.is_complete() {
                return Ok(existing.clone());
            }
        }

        let changes = TaskChanges {
            status: Some(TaskStatus::Completed),
            completed_at: Some(
                chrono::Utc::now()
                    .format("%Y-%m-%dT%H:%M:%SZ")
                    .to_string(),
            ),
            ..Default::default()
        };
        let task = self.backend.update(id, &self.user_id, &changes).await?;
        self.load().await?;
        Ok(task)
    }

    /// Delete the task with `id`, then refresh.
    pub async fn remove(&mut self, id: &str) -> Result<()> {
        let removed = self.backend.delete(id, &self.user_id).await?;
        if !removed {
            return Err(StoreError::TaskNotFound(id.to_string()));
        }
        self.load().await?;
        Ok(())
    }

    /// The in-memory list, as of the last refresh.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks that are not completed.
    #[must_use]
    pub fn pending(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| !t.status.is_complete())
            .collect()
    }

    /// Look up a task by id in the in-memory list.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Timezone used to interpret wall-clock input.
    #[must_use]
    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// The user whose tasks this store holds.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}
