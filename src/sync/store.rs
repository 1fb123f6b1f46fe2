use std::cell::RefCell;
use std::future::Future;
use std::path::PathBuf;

use super::api::{Page, TodoApi};
use super::error::{ApiError, SyncError};
use super::{Mutation, WritePolicy};
use crate::core::category::{Category, NewCategory};
use crate::core::context_entry::{ContextEntry, NewContextEntry};
use crate::core::filter;
use crate::core::stats::{ServerStats, Stats};
use crate::core::suggestion::{SuggestionRequest, SuggestionResponse};
use crate::core::task::{NewTask, Task, TaskId, TaskPatch};
use crate::core::ui_state::{UiState, load_ui_state, save_ui_state};

/// The three server-owned collections the store mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Tasks,
    Categories,
    ContextEntries,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Categories => "categories",
            Self::ContextEntries => "context entries",
        }
    }
}

#[derive(Debug, Default)]
struct Loading {
    tasks: bool,
    categories: bool,
    context_entries: bool,
}

impl Loading {
    fn get(&self, resource: Resource) -> bool {
        match resource {
            Resource::Tasks => self.tasks,
            Resource::Categories => self.categories,
            Resource::ContextEntries => self.context_entries,
        }
    }

    fn flag(&mut self, resource: Resource) -> &mut bool {
        match resource {
            Resource::Tasks => &mut self.tasks,
            Resource::Categories => &mut self.categories,
            Resource::ContextEntries => &mut self.context_entries,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    tasks: Vec<Task>,
    categories: Vec<Category>,
    context_entries: Vec<ContextEntry>,
    loading: Loading,
    ui: UiState,
}

/// Client-side mirror of the task API.
///
/// Owned by the application root and handed to whatever needs it. All
/// operations take `&self` so several requests can be in flight at once on a
/// single-threaded runtime; each completion is applied in the order it
/// finishes, and a slow fetch can overwrite the result of a faster, later one.
/// State is only borrowed between suspension points, never across one.
pub struct Store<A> {
    api: A,
    ui_path: Option<PathBuf>,
    state: RefCell<State>,
}

impl<A: TodoApi> Store<A> {
    /// A store whose UI slice is kept in memory only.
    pub fn new(api: A) -> Self {
        Self {
            api,
            ui_path: None,
            state: RefCell::new(State::default()),
        }
    }

    /// A store that restores and persists its UI slice at `ui_path`.
    /// Resource collections always start empty.
    pub fn with_persistence(api: A, ui_path: PathBuf) -> Self {
        let ui = load_ui_state(&ui_path);
        log::debug!("Restored UI state from {}: {:?}", ui_path.display(), ui);
        Self {
            api,
            ui_path: Some(ui_path),
            state: RefCell::new(State {
                ui,
                ..State::default()
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    // --- reads ---

    pub fn tasks(&self) -> Vec<Task> {
        self.state.borrow().tasks.clone()
    }

    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.state.borrow().tasks.iter().find(|t| t.id == id).cloned()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.borrow().categories.clone()
    }

    pub fn context_entries(&self) -> Vec<ContextEntry> {
        self.state.borrow().context_entries.clone()
    }

    pub fn is_loading(&self, resource: Resource) -> bool {
        self.state.borrow().loading.get(resource)
    }

    /// Counters recomputed from the current task collection on every call.
    pub fn stats(&self) -> Stats {
        Stats::from_tasks(&self.state.borrow().tasks)
    }

    /// Tasks passing the current filter selectors and `search`.
    pub fn visible_tasks(&self, search: &str) -> Vec<Task> {
        let state = self.state.borrow();
        state
            .tasks
            .iter()
            .filter(|t| filter::task_matches(t, &state.ui, search))
            .cloned()
            .collect()
    }

    /// Incomplete high-priority tasks, in store order.
    pub fn urgent_tasks(&self, limit: usize) -> Vec<Task> {
        self.state
            .borrow()
            .tasks
            .iter()
            .filter(|t| t.is_urgent())
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn recent_tasks(&self, limit: usize) -> Vec<Task> {
        self.state.borrow().tasks.iter().take(limit).cloned().collect()
    }

    // --- fetch ---

    async fn fetch_collection<T, F>(
        &self,
        resource: Resource,
        request: F,
        apply: impl FnOnce(&mut State, Vec<T>),
    ) -> Result<(), SyncError>
    where
        F: Future<Output = Result<Page<T>, ApiError>>,
    {
        *self.state.borrow_mut().loading.flag(resource) = true;
        let result = request.await;

        let mut state = self.state.borrow_mut();
        *state.loading.flag(resource) = false;
        match result {
            Ok(page) => {
                log::debug!("Fetched {} {}", page.results.len(), resource.as_str());
                apply(&mut *state, page.results);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to fetch {}: {}", resource.as_str(), e);
                apply(&mut *state, Vec::new());
                Err(e.into())
            }
        }
    }

    /// Replace the task collection with the server's first page.
    /// On failure the collection is emptied and the error returned.
    pub async fn fetch_tasks(&self) -> Result<(), SyncError> {
        self.fetch_collection(Resource::Tasks, self.api.list_tasks(), |state, tasks| {
            state.tasks = tasks.into_iter().map(Task::derive).collect();
        })
        .await
    }

    pub async fn fetch_categories(&self) -> Result<(), SyncError> {
        self.fetch_collection(Resource::Categories, self.api.list_categories(), |state, categories| {
            state.categories = categories;
        })
        .await
    }

    pub async fn fetch_context_entries(&self) -> Result<(), SyncError> {
        self.fetch_collection(
            Resource::ContextEntries,
            self.api.list_context_entries(),
            |state, entries| {
                state.context_entries = entries;
            },
        )
        .await
    }

    /// Fetch all three collections concurrently. Every fetch runs to
    /// completion; the first error, if any, is returned.
    pub async fn fetch_all(&self) -> Result<(), SyncError> {
        let (tasks, categories, context) = tokio::join!(
            self.fetch_tasks(),
            self.fetch_categories(),
            self.fetch_context_entries()
        );
        tasks.and(categories).and(context)
    }

    /// Refresh a single task from the server, inserting it at the front if
    /// it is not held locally.
    pub async fn fetch_task(&self, id: TaskId) -> Result<Task, SyncError> {
        let remote = self.api.get_task(id).await.map_err(|e| {
            log::error!("Failed to fetch task {}: {}", id, e);
            e
        })?;

        let mut state = self.state.borrow_mut();
        match state.tasks.iter_mut().find(|t| t.id == id) {
            Some(local) => {
                local.merge_canonical(&remote);
                Ok(local.clone())
            }
            None => {
                let task = remote.derive();
                state.tasks.insert(0, task.clone());
                Ok(task)
            }
        }
    }

    // --- writes ---

    /// Failure path shared by every mutation. `merge` only runs for
    /// mutations whose policy is [`WritePolicy::MergeOnFailure`].
    fn on_write_failure(
        &self,
        mutation: Mutation,
        target: &str,
        err: ApiError,
        merge: impl FnOnce(&mut State),
    ) -> SyncError {
        log::error!("Failed to {} {}: {}", mutation.as_str(), target, err);
        match mutation.policy() {
            WritePolicy::Pessimistic => {}
            WritePolicy::MergeOnFailure => merge(&mut *self.state.borrow_mut()),
        }
        err.into()
    }

    // --- tasks ---

    /// Create a task and put the server's copy at the front of the list.
    /// Nothing is inserted unless the server accepts it.
    pub async fn create_task(&self, payload: NewTask) -> Result<Task, SyncError> {
        payload.validate().map_err(SyncError::Invalid)?;
        let payload = NewTask {
            enhance_with_ai: true,
            ..payload
        };

        let created = self
            .api
            .create_task(&payload)
            .await
            .map_err(|e| self.on_write_failure(Mutation::Create, "task", e, |_| {}))?;

        let task = created.derive();
        self.state.borrow_mut().tasks.insert(0, task.clone());
        log::info!("Created task {} ({})", task.id, task.title);
        Ok(task)
    }

    /// Send a partial update and merge the server's copy into the local entry.
    ///
    /// If the request fails the patch is still applied locally before the
    /// error is returned, so the local entry may disagree with the server
    /// until the next full fetch.
    pub async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<Task, SyncError> {
        match self.api.update_task(id, &patch).await {
            Ok(remote) => {
                let mut state = self.state.borrow_mut();
                let task = match state.tasks.iter_mut().find(|t| t.id == id) {
                    Some(local) => {
                        local.merge_canonical(&remote);
                        local.clone()
                    }
                    None => remote.derive(),
                };
                Ok(task)
            }
            Err(e) => Err(self.on_write_failure(Mutation::Update, &format!("task {}", id), e, |state| {
                if let Some(local) = state.tasks.iter_mut().find(|t| t.id == id) {
                    local.apply_patch(&patch);
                }
            })),
        }
    }

    /// Remove a task locally once the server has deleted it.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), SyncError> {
        self.api
            .delete_task(id)
            .await
            .map_err(|e| self.on_write_failure(Mutation::Delete, &format!("task {}", id), e, |_| {}))?;
        self.state.borrow_mut().tasks.retain(|t| t.id != id);
        log::info!("Deleted task {}", id);
        Ok(())
    }

    /// Flip a task between done and pending. Unknown ids are ignored.
    ///
    /// Failures are logged and not reported to the caller; the local entry
    /// still shows the flipped status (see [`Store::update_task`]).
    pub async fn toggle_task(&self, id: TaskId) {
        let Some(status) = self.task(id).map(|t| t.status.toggled()) else {
            log::debug!("Toggle ignored for unknown task {}", id);
            return;
        };
        if let Err(e) = self.update_task(id, TaskPatch::status(status)).await {
            log::error!("Failed to toggle task {}: {}", id, e);
        }
    }

    // --- categories & context ---

    pub async fn create_category(&self, payload: NewCategory) -> Result<Category, SyncError> {
        payload.validate().map_err(SyncError::Invalid)?;
        let category = self
            .api
            .create_category(&payload)
            .await
            .map_err(|e| self.on_write_failure(Mutation::Create, "category", e, |_| {}))?;
        self.state.borrow_mut().categories.insert(0, category.clone());
        Ok(category)
    }

    pub async fn create_context_entry(&self, payload: NewContextEntry) -> Result<ContextEntry, SyncError> {
        payload.validate().map_err(SyncError::Invalid)?;
        let entry = self
            .api
            .create_context_entry(&payload)
            .await
            .map_err(|e| self.on_write_failure(Mutation::Create, "context entry", e, |_| {}))?;
        self.state.borrow_mut().context_entries.insert(0, entry.clone());
        Ok(entry)
    }

    // --- passthrough ---

    pub async fn suggestions(&self, request: &SuggestionRequest) -> Result<SuggestionResponse, SyncError> {
        self.api.suggestions(request).await.map_err(|e| {
            log::error!("Failed to get AI suggestions: {}", e);
            e.into()
        })
    }

    pub async fn server_stats(&self) -> Result<ServerStats, SyncError> {
        self.api.stats().await.map_err(|e| {
            log::error!("Failed to fetch server stats: {}", e);
            e.into()
        })
    }

    // --- UI slice ---

    pub fn ui_state(&self) -> UiState {
        self.state.borrow().ui.clone()
    }

    fn update_ui(&self, f: impl FnOnce(&mut UiState)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            f(&mut state.ui);
            state.ui.clone()
        };
        if let Some(ref path) = self.ui_path {
            save_ui_state(path, &snapshot);
        }
    }

    pub fn set_status_filter(&self, filter: impl Into<String>) {
        let filter = filter.into();
        self.update_ui(|ui| ui.status_filter = filter);
    }

    pub fn set_category_filter(&self, filter: impl Into<String>) {
        let filter = filter.into();
        self.update_ui(|ui| ui.category_filter = filter);
    }

    pub fn set_priority_filter(&self, filter: impl Into<String>) {
        let filter = filter.into();
        self.update_ui(|ui| ui.priority_filter = filter);
    }

    pub fn set_sidebar_open(&self, open: bool) {
        self.update_ui(|ui| ui.sidebar_open = open);
    }
}
