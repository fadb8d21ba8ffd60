//! Core types for the task manager.
//!
//! All serializable types use the snake_case column names of the original
//! `tasks` table so the same structs work for both the remote relational
//! API and the local serialized collection. Category and status keep their
//! original Spanish wire strings for backward compatibility with existing
//! data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule;

/// Category assigned to a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskCategory {
    /// Personal errands.
    #[default]
    #[serde(rename = "personal")]
    Personal,
    /// Work items.
    #[serde(rename = "trabajo")]
    Work,
    /// Study / coursework.
    #[serde(rename = "estudio")]
    Study,
    /// Health and fitness.
    #[serde(rename = "salud")]
    Health,
    /// Everything else.
    #[serde(rename = "otro")]
    Other,
}

impl TaskCategory {
    /// Wire string representation (matches the `tasks.task_type` column).
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Work => "trabajo",
            Self::Study => "estudio",
            Self::Health => "salud",
            Self::Other => "otro",
        }
    }

    /// All categories, in form display order.
    #[must_use]
    pub fn all() -> [Self; 5] {
        [
            Self::Personal,
            Self::Work,
            Self::Study,
            Self::Health,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = String;

    /// Accepts both the wire strings and their English aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "trabajo" | "work" => Ok(Self::Work),
            "estudio" | "study" => Ok(Self::Study),
            "salud" | "health" => Ok(Self::Health),
            "otro" | "other" => Ok(Self::Other),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// Task status in the workflow.
///
/// Transitions only move forward through the store API: a pending task can
/// be completed, a completed task is never reopened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not yet done.
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
    /// Being worked on.
    #[serde(rename = "en_progreso")]
    InProgress,
    /// Done.
    #[serde(rename = "completada")]
    Completed,
}

impl TaskStatus {
    /// Wire string representation (matches the `tasks.status` column).
    #[must_use]
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::InProgress => "en_progreso",
            Self::Completed => "completada",
        }
    }

    /// Whether this status represents a finished task.
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A user-created to-do item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique ID, assigned at creation (server-side for the remote backend,
    /// `task_{uuid}` for the local backend).
    pub id: String,
    /// Owning user; every backend query is scoped to it.
    pub user_id: String,
    /// Short non-empty summary.
    pub title: String,
    /// Optional longer text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category label.
    #[serde(rename = "task_type")]
    pub category: TaskCategory,
    /// Current status.
    pub status: TaskStatus,
    /// Due date in the reference timezone, `YYYY-MM-DD`.
    pub due_date: String,
    /// Due time in the reference timezone, `HH:MM`.
    pub due_time: String,
    /// When the task was completed (RFC 3339, UTC).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl Task {
    /// Whether the task is past due and not yet completed.
    ///
    /// Unparseable due strings are treated as not overdue rather than
    /// failing the whole list render.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        if self.status.is_complete() {
            return false;
        }
        match schedule::due_instant(&self.due_date, &self.due_time) {
            Ok(due) => due < now,
            Err(_) => false,
        }
    }
}

/// Input captured by the task form for a new task.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    /// Title; must be non-empty after trimming.
    pub title: String,
    /// Optional longer text.
    pub description: Option<String>,
    /// Category label.
    pub category: TaskCategory,
    /// Due date/time as the user's local wall-clock value.
    pub due_local: chrono::NaiveDateTime,
}

/// Partial update applied to an existing task.
///
/// Unset fields are left untouched. Serializes to exactly the fields being
/// changed, so it doubles as the PATCH body for the remote backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskChanges {
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New category.
    #[serde(rename = "task_type", skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,
    /// New due date (reference timezone).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// New due time (reference timezone).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_time: Option<String>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Completion timestamp (RFC 3339, UTC).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl TaskChanges {
    /// Whether no field is being changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
            && self.due_time.is_none()
            && self.status.is_none()
            && self.completed_at.is_none()
    }

    /// Apply the changes to a task in place, preserving its id.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(ref description) = self.description {
            task.description = Some(description.clone());
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(ref due_date) = self.due_date {
            task.due_date = due_date.clone();
        }
        if let Some(ref due_time) = self.due_time {
            task.due_time = due_time.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(ref completed_at) = self.completed_at {
            task.completed_at = Some(completed_at.clone());
        }
    }
}
