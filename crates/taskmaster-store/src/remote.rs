//! Remote backing store — hosted relational API over authenticated HTTPS.
//!
//! Speaks the PostgREST dialect the original app used through its hosted
//! database service: row filters as query parameters (`id=eq.{id}`),
//! `Prefer: return=representation` on writes, and the single-object
//! `Accept` header where the app used `.single()`. Every request carries
//! the public `apikey` plus the signed-in user's bearer token; row-level
//! security on the server scopes data to that user, and the client filters
//! by `user_id` as well, as the original did.

use std::time::Duration;

use async_trait::async_trait;
use taskmaster_core::{Task, TaskChanges};

use crate::auth::Session;
use crate::backend::{NewTask, TaskBackend};
use crate::errors::{Result, StoreError};

/// PostgREST media type for "exactly one row".
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Client for the hosted `tasks` table.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    base_url: String,
    anon_key: String,
    session: Session,
    client: reqwest::Client,
}

impl RemoteStore {
    /// Build a store for `base_url` (no trailing slash) using a signed-in
    /// session.
    pub fn new(base_url: &str, anon_key: &str, session: Session) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            session,
            client,
        })
    }

    fn tasks_url(&self) -> String {
        format!("{}/rest/v1/tasks", self.base_url)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.session.access_token)
    }

    async fn fail(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        StoreError::Api { status, body }
    }
}

#[async_trait]
impl TaskBackend for RemoteStore {
    async fn fetch_all(&self, user_id: &str) -> Result<Vec<Task>> {
        let response = self
            .authed(self.client.get(self.tasks_url()))
            .query(&[
                ("select", "*"),
                ("user_id", &format!("eq.{user_id}")),
                ("order", "due_date.asc,due_time.asc"),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        Ok(response.json().await?)
    }

    async fn insert(&self, new: &NewTask) -> Result<Task> {
        let response = self
            .authed(self.client.post(self.tasks_url()))
            .header("Prefer", "return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(new)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        Ok(response.json().await?)
    }

    async fn update(&self, id: &str, user_id: &str, changes: &TaskChanges) -> Result<Task> {
        let response = self
            .authed(self.client.patch(self.tasks_url()))
            .query(&[
                ("id", &format!("eq.{id}")),
                ("user_id", &format!("eq.{user_id}")),
            ])
            .header("Prefer", "return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(changes)
            .send()
            .await?;
        // The single-object Accept turns "no matching row" into 406.
        if response.status().as_u16() == 406 {
            return Err(StoreError::TaskNotFound(id.to_string()));
        }
        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        Ok(response.json().await?)
    }

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let response = self
            .authed(self.client.delete(self.tasks_url()))
            .query(&[
                ("id", &format!("eq.{id}")),
                ("user_id", &format!("eq.{user_id}")),
            ])
            .header("Prefer", "return=representation")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        let removed: Vec<Task> = response.json().await?;
        Ok(!removed.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmaster_core::{TaskCategory, TaskStatus};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session() -> Session {
        Session {
            access_token: "jwt-access".into(),
            refresh_token: "jwt-refresh".into(),
            user_id: "user_42".into(),
            expires_at: i64::MAX,
        }
    }

    fn task_row(id: &str, title: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "user_id": "user_42",
            "title": title,
            "description": null,
            "task_type": "personal",
            "status": "pendiente",
            "due_date": "2025-07-01",
            "due_time": "09:00",
            "completed_at": null
        })
    }

    #[tokio::test]
    async fn fetch_all_filters_and_orders() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/tasks"))
            .and(query_param("user_id", "eq.user_42"))
            .and(query_param("order", "due_date.asc,due_time.asc"))
            .and(header("apikey", "anon"))
            .and(header("authorization", "Bearer jwt-access"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                task_row("t1", "first"),
                task_row("t2", "second"),
            ])))
            .mount(&server)
            .await;

        let store = RemoteStore::new(&server.uri(), "anon", session()).unwrap();
        let tasks = store.fetch_all("user_42").await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "first");
    }

    #[tokio::test]
    async fn insert_returns_server_assigned_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/tasks"))
            .and(header("prefer", "return=representation"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(task_row("srv-id-1", "Buy milk")),
            )
            .mount(&server)
            .await;

        let store = RemoteStore::new(&server.uri(), "anon", session()).unwrap();
        let new = NewTask {
            user_id: "user_42".into(),
            title: "Buy milk".into(),
            description: None,
            category: TaskCategory::Personal,
            status: TaskStatus::Pending,
            due_date: "2025-07-01".into(),
            due_time: "09:00".into(),
        };
        let task = store.insert(&new).await.unwrap();
        assert_eq!(task.id, "srv-id-1");
    }

    #[tokio::test]
    async fn update_maps_missing_row_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/tasks"))
            .and(query_param("id", "eq.ghost"))
            .respond_with(ResponseTemplate::new(406))
            .mount(&server)
            .await;

        let store = RemoteStore::new(&server.uri(), "anon", session()).unwrap();
        let err = store
            .update("ghost", "user_42", &TaskChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::TaskNotFound(_)));
    }

    #[tokio::test]
    async fn update_sends_only_changed_columns() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/tasks"))
            .and(query_param("id", "eq.t1"))
            .and(query_param("user_id", "eq.user_42"))
            .and(wiremock::matchers::body_json(
                serde_json::json!({"status": "completada", "completed_at": "2025-07-01T12:00:00Z"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(task_row("t1", "Buy milk")))
            .mount(&server)
            .await;

        let store = RemoteStore::new(&server.uri(), "anon", session()).unwrap();
        let changes = TaskChanges {
            status: Some(TaskStatus::Completed),
            completed_at: Some("2025-07-01T12:00:00Z".into()),
            ..Default::default()
        };
        let task = store.update("t1", "user_42", &changes).await.unwrap();
        assert_eq!(task.id, "t1");
    }

    #[tokio::test]
    async fn delete_reports_removed_rows() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/tasks"))
            .and(query_param("id", "eq.t1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([task_row("t1", "Buy milk")])),
            )
            .mount(&server)
            .await;

        let store = RemoteStore::new(&server.uri(), "anon", session()).unwrap();
        assert!(store.delete("t1", "user_42").await.unwrap());
    }

    #[tokio::test]
    async fn server_error_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/tasks"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let store = RemoteStore::new(&server.uri(), "anon", session()).unwrap();
        let err = store.fetch_all("user_42").await.unwrap_err();
        match err {
            StoreError::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
