//! Local backing store — SQLite-backed key-value storage.
//!
//! The on-device variant keeps the whole task collection serialized as one
//! JSON array under a fixed per-user key in a `kv` table. Mutations are
//! read-modify-write of that single row, which matches the
//! collection-at-a-time persistence model of the original app's local
//! storage.

use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use taskmaster_core::{Task, TaskChanges};
use uuid::Uuid;

use crate::backend::{NewTask, TaskBackend};
use crate::errors::{Result, StoreError};

const KV_SCHEMA: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
";

/// SQLite-backed key-value store holding serialized task collections.
pub struct LocalStore {
    conn: Mutex<Connection>,
}

impl LocalStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(KV_SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database. Used by tests and throwaway sessions.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(KV_SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn collection_key(user_id: &str) -> String {
        format!("tasks/{user_id}")
    }

    fn read_collection(&self, user_id: &str) -> Result<Vec<Task>> {
        let conn = self.conn.lock();
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![Self::collection_key(user_id)],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_collection(&self, user_id: &str, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string(tasks)?;
        let now = chrono::Utc::now().to_rfc3339();
        let conn = self.conn.lock();
        let _ = conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![Self::collection_key(user_id), json, now],
        )?;
        Ok(())
    }
}

#[async_trait]
impl TaskBackend for LocalStore {
    async fn fetch_all(&self, user_id: &str) -> Result<Vec<Task>> {
        let mut tasks = self.read_collection(user_id)?;
        tasks.sort_by(|a, b| {
            (a.due_date.as_str(), a.due_time.as_str())
                .cmp(&(b.due_date.as_str(), b.due_time.as_str()))
        });
        Ok(tasks)
    }

    async fn insert(&self, new: &NewTask) -> Result<Task> {
        let mut tasks = self.read_collection(&new.user_id)?;
        let task = Task {
            id: format!("task_{}", Uuid::now_v7()),
            user_id: new.user_id.clone(),
            title: new.title.clone(),
            description: new.description.clone(),
            category: new.category,
            status: new.status,
            due_date: new.due_date.clone(),
            due_time: new.due_time.clone(),
            completed_at: None,
        };
        tasks.push(task.clone());
        self.write_collection(&new.user_id, &tasks)?;
        Ok(task)
    }

    async fn update(&self, id: &str, user_id: &str, changes: &TaskChanges) -> Result<Task> {
        let mut tasks = self.read_collection(user_id)?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))?;
        changes.apply_to(task);
        let updated = task.clone();
        self.write_collection(user_id, &tasks)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let mut tasks = self.read_collection(user_id)?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.write_collection(user_id, &tasks)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmaster_core::{TaskCategory, TaskStatus};

    fn draft(user: &str, title: &str, due_date: &str, due_time: &str) -> NewTask {
        NewTask {
            user_id: user.into(),
            title: title.into(),
            description: None,
            category: TaskCategory::Personal,
            status: TaskStatus::Pending,
            due_date: due_date.into(),
            due_time: due_time.into(),
        }
    }

    #[tokio::test]
    async fn insert_mints_prefixed_id() {
        let store = LocalStore::in_memory().unwrap();
        let task = store
            .insert(&draft("u1", "Buy milk", "2025-07-01", "09:00"))
            .await
            .unwrap();
        assert!(task.id.starts_with("task_"));
        assert_eq!(task.user_id, "u1");
        assert!(task.completed_at.is_none());
    }

    #[tokio::test]
    async fn fetch_all_sorts_by_due_date_then_time() {
        let store = LocalStore::in_memory().unwrap();
        let _ = store
            .insert(&draft("u1", "later", "2025-07-02", "08:00"))
            .await
            .unwrap();
        let _ = store
            .insert(&draft("u1", "earlier", "2025-07-01", "12:00"))
            .await
            .unwrap();
        let _ = store
            .insert(&draft("u1", "same day, earlier", "2025-07-02", "07:00"))
            .await
            .unwrap();

        let titles: Vec<_> = store
            .fetch_all("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["earlier", "same day, earlier", "later"]);
    }

    #[tokio::test]
    async fn collections_are_scoped_per_user() {
        let store = LocalStore::in_memory().unwrap();
        let _ = store
            .insert(&draft("u1", "mine", "2025-07-01", "09:00"))
            .await
            .unwrap();
        let _ = store
            .insert(&draft("u2", "theirs", "2025-07-01", "09:00"))
            .await
            .unwrap();

        assert_eq!(store.fetch_all("u1").await.unwrap().len(), 1);
        assert_eq!(store.fetch_all("u2").await.unwrap().len(), 1);
        assert_eq!(store.fetch_all("u3").await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn update_applies_changes_in_place() {
        let store = LocalStore::in_memory().unwrap();
        let task = store
            .insert(&draft("u1", "Buy milk", "2025-07-01", "09:00"))
            .await
            .unwrap();

        let changes = TaskChanges {
            description: Some("2 liters".into()),
            due_time: Some("18:00".into()),
            ..Default::default()
        };
        let updated = store.update(&task.id, "u1", &changes).await.unwrap();
        assert_eq!(updated.id, task.id);
        assert_eq!(updated.description.as_deref(), Some("2 liters"));
        assert_eq!(updated.due_time, "18:00");

        let reloaded = store.fetch_all("u1").await.unwrap();
        assert_eq!(reloaded[0].due_time, "18:00");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = LocalStore::in_memory().unwrap();
        let err = store
            .update("task_missing", "u1", &TaskChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::TaskNotFound(_)));
    }

    #[tokio::test]
    async fn delete_reports_whether_removed() {
        let store = LocalStore::in_memory().unwrap();
        let task = store
            .insert(&draft("u1", "Buy milk", "2025-07-01", "09:00"))
            .await
            .unwrap();

        assert!(store.delete(&task.id, "u1").await.unwrap());
        assert!(!store.delete(&task.id, "u1").await.unwrap());
        assert!(store.fetch_all("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn collection_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");

        {
            let store = LocalStore::open(&path).unwrap();
            let _ = store
                .insert(&draft("u1", "persisted", "2025-07-01", "09:00"))
                .await
                .unwrap();
        }

        let store = LocalStore::open(&path).unwrap();
        let tasks = store.fetch_all("u1").await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "persisted");
    }
}
