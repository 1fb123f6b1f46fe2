use chrono::Utc;
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api::{Page, TodoApi};
use super::error::ApiError;
use crate::core::category::{Category, NewCategory};
use crate::core::context_entry::{ContextEntry, NewContextEntry};
use crate::core::stats::ServerStats;
use crate::core::suggestion::{SuggestionRequest, SuggestionResponse};
use crate::core::task::{CreatedTask, NewTask, Task, TaskId, TaskPatch};

/// JSON-over-HTTP client for the task API.
pub struct HttpApi {
    base_url: String,
    http: Client,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder().build().map_err(ApiError::Client)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        name: &'static str,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        log::debug!("API Request: {} {}", name, path);

        let mut req = self
            .http
            .request(method, self.url(path))
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| {
            log::error!("API Error - no response for {} {}: {}", name, path, e);
            ApiError::Transport {
                method: name,
                path: path.to_string(),
                source: e,
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            log::error!("API Error - {} {} returned {}: {}", name, path, status, body);
            return Err(ApiError::Status {
                method: name,
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp)
    }

    async fn decode<T: DeserializeOwned>(
        name: &'static str,
        path: &str,
        resp: Response,
    ) -> Result<T, ApiError> {
        let bytes = resp.bytes().await.map_err(|e| ApiError::Transport {
            method: name,
            path: path.to_string(),
            source: e,
        })?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            source: e,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.send::<()>(Method::GET, "GET", path, None).await?;
        Self::decode("GET", path, resp).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let resp = self.send(Method::POST, "POST", path, Some(body)).await?;
        Self::decode("POST", path, resp).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let resp = self.send(Method::PUT, "PUT", path, Some(body)).await?;
        Self::decode("PUT", path, resp).await
    }
}

fn task_path(id: TaskId) -> String {
    format!("/tasks/{}/", id)
}

impl TodoApi for HttpApi {
    async fn list_tasks(&self) -> Result<Page<Task>, ApiError> {
        self.get("/tasks/").await
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, ApiError> {
        self.get(&task_path(id)).await
    }

    /// Create a task. When the response carries no id, the newest listed
    /// task with the same title is taken as the created one.
    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        let created: CreatedTask = self.post("/tasks/", task).await?;
        if let Some(task) = created.clone().into_task(Utc::now()) {
            return Ok(task);
        }

        log::debug!("POST /tasks/ returned no id for '{}', looking it up", created.title);
        self.list_tasks()
            .await?
            .results
            .into_iter()
            .filter(|t| created.is_listed_as(t))
            .max_by_key(|t| (t.created_at, t.id))
            .ok_or_else(|| ApiError::MissingId {
                path: "/tasks/".to_string(),
            })
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.put(&task_path(id), patch).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        self.send::<()>(Method::DELETE, "DELETE", &task_path(id), None).await?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Page<Category>, ApiError> {
        self.get("/categories/").await
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category, ApiError> {
        self.post("/categories/", category).await
    }

    async fn list_context_entries(&self) -> Result<Page<ContextEntry>, ApiError> {
        self.get("/context/").await
    }

    async fn create_context_entry(&self, entry: &NewContextEntry) -> Result<ContextEntry, ApiError> {
        self.post("/context/", entry).await
    }

    async fn suggestions(&self, request: &SuggestionRequest) -> Result<SuggestionResponse, ApiError> {
        self.post("/ai/suggestions/", request).await
    }

    async fn stats(&self) -> Result<ServerStats, ApiError> {
        self.get("/stats/").await
    }
}
