use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::core::category::{Category, NewCategory};
use crate::core::context_entry::{ContextEntry, NewContextEntry};
use crate::core::stats::ServerStats;
use crate::core::suggestion::{SuggestionRequest, SuggestionResponse};
use crate::core::task::{NewTask, Task, TaskId, TaskPatch};

/// Paginated list envelope returned by every collection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn single(results: Vec<T>) -> Self {
        Self {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        }
    }
}

/// The remote task API the store synchronizes against.
///
/// Tasks returned here are raw server copies; derived fields are filled in
/// by the store.
#[allow(async_fn_in_trait)]
pub trait TodoApi {
    async fn list_tasks(&self) -> Result<Page<Task>, ApiError>;
    async fn get_task(&self, id: TaskId) -> Result<Task, ApiError>;
    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError>;
    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError>;
    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError>;

    async fn list_categories(&self) -> Result<Page<Category>, ApiError>;
    async fn create_category(&self, category: &NewCategory) -> Result<Category, ApiError>;

    async fn list_context_entries(&self) -> Result<Page<ContextEntry>, ApiError>;
    async fn create_context_entry(&self, entry: &NewContextEntry) -> Result<ContextEntry, ApiError>;

    async fn suggestions(&self, request: &SuggestionRequest) -> Result<SuggestionResponse, ApiError>;
    async fn stats(&self) -> Result<ServerStats, ApiError>;
}
