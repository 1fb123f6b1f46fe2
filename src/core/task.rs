use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TaskId = i64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(alias = "Completed")]
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "in progress" | "in_progress" | "in-progress" => Some(Self::InProgress),
            "done" | "completed" => Some(Self::Done),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Status a completion toggle moves to. In-progress tasks toggle to done.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Done => Self::Pending,
            Self::Pending | Self::InProgress => Self::Done,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    #[default]
    Low,
    Medium,
    High,
}

impl PriorityTier {
    pub fn from_score(score: i32) -> Self {
        if score > 7 {
            Self::High
        } else if score > 4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// A task as held by the store.
///
/// `completed`, `priority` and `due_date` are never sent to or read from the
/// server. They only change through [`Task::derive`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default, skip_serializing)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub priority_score: i32,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    completed: bool,
    #[serde(skip)]
    priority: PriorityTier,
    #[serde(skip)]
    due_date: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            description: String::new(),
            category: None,
            category_name: None,
            priority_score: 5,
            deadline: None,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
            completed: false,
            priority: PriorityTier::Low,
            due_date: None,
        }
        .derive()
    }

    /// Recompute every derived field from the authoritative ones.
    pub fn derive(mut self) -> Self {
        self.completed = self.status.is_done();
        self.priority = PriorityTier::from_score(self.priority_score);
        self.due_date = self.deadline;
        self
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn priority(&self) -> PriorityTier {
        self.priority
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn is_urgent(&self) -> bool {
        self.priority == PriorityTier::High && !self.completed
    }

    /// Overwrite this task with the server's copy, keeping the local
    /// category name when the server omitted it.
    pub fn merge_canonical(&mut self, canonical: &Task) {
        let category_name = canonical
            .category_name
            .clone()
            .or_else(|| self.category_name.take());
        *self = Task {
            category_name,
            ..canonical.clone()
        }
        .derive();
    }

    /// Apply a partial update locally, without server confirmation.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(score) = patch.priority_score {
            self.priority_score = score;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = Some(deadline);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        *self = self.clone().derive();
    }
}

/// Body returned by `POST /tasks/`.
///
/// The backend answers a create with its write serializer, which echoes the
/// submitted fields and may leave out `id` and the timestamps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedTask {
    #[serde(default)]
    pub id: Option<TaskId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub priority_score: i32,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CreatedTask {
    /// Build the full task, stamping missing timestamps with `now`.
    /// Returns `None` when the server did not report an id.
    pub fn into_task(self, now: DateTime<Utc>) -> Option<Task> {
        let id = self.id?;
        let created_at = self.created_at.unwrap_or(now);
        Some(
            Task {
                id,
                title: self.title,
                description: self.description,
                category: self.category,
                category_name: self.category_name,
                priority_score: self.priority_score,
                deadline: self.deadline,
                status: self.status,
                created_at,
                updated_at: self.updated_at.unwrap_or(created_at),
                completed: false,
                priority: PriorityTier::Low,
                due_date: None,
            }
            .derive(),
        )
    }

    /// Whether `task` is a listed copy of this freshly created one.
    /// AI enhancement may rewrite the description, so only the title counts.
    pub fn is_listed_as(&self, task: &Task) -> bool {
        task.title == self.title
    }
}

/// Partial task update. Only the fields that are set go over the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Payload for creating a task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    pub priority_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub enhance_with_ai: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: None,
            priority_score: 5,
            deadline: None,
            status: TaskStatus::Pending,
            enhance_with_ai: true,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("task title must not be empty".to_string());
        }
        if !(1..=10).contains(&self.priority_score) {
            return Err(format!(
                "priority score {} is outside 1..=10",
                self.priority_score
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_score(score: i32) -> Task {
        let mut t = Task::new(1, "Write report");
        t.priority_score = score;
        t.derive()
    }

    #[test]
    fn priority_tier_boundaries() {
        assert_eq!(with_score(4).priority(), PriorityTier::Low);
        assert_eq!(with_score(5).priority(), PriorityTier::Medium);
        assert_eq!(with_score(7).priority(), PriorityTier::Medium);
        assert_eq!(with_score(8).priority(), PriorityTier::High);
        assert_eq!(with_score(10).priority(), PriorityTier::High);
        assert_eq!(with_score(1).priority(), PriorityTier::Low);
    }

    #[test]
    fn completed_follows_status() {
        let mut t = Task::new(1, "Ship it");
        assert!(!t.completed());
        t.apply_patch(&TaskPatch::status(TaskStatus::Done));
        assert!(t.completed());
        t.apply_patch(&TaskPatch::status(TaskStatus::InProgress));
        assert!(!t.completed());
    }

    #[test]
    fn deserializes_server_task_with_completed_alias() {
        let json = r#"{
            "id": 12,
            "title": "Call plumber",
            "description": "",
            "category": 3,
            "category_name": "Home",
            "priority_score": 9,
            "deadline": "2025-07-01T10:00:00Z",
            "status": "Completed",
            "created_at": "2025-06-01T08:00:00.123456Z",
            "updated_at": "2025-06-02T08:00:00+02:00"
        }"#;
        let t: Task = serde_json::from_str(json).unwrap();
        let t = t.derive();
        assert_eq!(t.status, TaskStatus::Done);
        assert!(t.completed());
        assert_eq!(t.priority(), PriorityTier::High);
        assert_eq!(t.due_date(), t.deadline);
        assert_eq!(t.category_name.as_deref(), Some("Home"));
    }

    #[test]
    fn in_progress_round_trips_with_space() {
        let s = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(s, "\"In Progress\"");
        assert_eq!(TaskStatus::from_name("in progress"), Some(TaskStatus::InProgress));
    }

    #[test]
    fn toggle_never_targets_in_progress() {
        assert_eq!(TaskStatus::Done.toggled(), TaskStatus::Pending);
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Done);
        assert_eq!(TaskStatus::InProgress.toggled(), TaskStatus::Done);
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = TaskPatch::status(TaskStatus::Done);
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"status":"Done"}"#);
    }

    #[test]
    fn merge_canonical_keeps_category_name_when_missing() {
        let mut local = Task::new(4, "Old");
        local.category_name = Some("Work".to_string());
        let mut remote = Task::new(4, "New");
        remote.status = TaskStatus::Done;

        local.merge_canonical(&remote);
        assert_eq!(local.title, "New");
        assert_eq!(local.category_name.as_deref(), Some("Work"));
        assert!(local.completed());
    }

    #[test]
    fn create_response_without_server_fields() {
        let json = r#"{
            "title": "x",
            "description": "",
            "category": null,
            "priority_score": 5,
            "deadline": null,
            "status": "Pending"
        }"#;
        let created: CreatedTask = serde_json::from_str(json).unwrap();
        assert_eq!(created.id, None);
        assert!(created.clone().into_task(Utc::now()).is_none());
        assert!(created.is_listed_as(&Task::new(31, "x")));
        assert!(!created.is_listed_as(&Task::new(32, "y")));
    }

    #[test]
    fn missing_status_reads_as_pending() {
        let json = r#"{"id": 3, "title": "Tidy desk", "created_at": "2025-06-01T08:00:00Z", "updated_at": "2025-06-01T08:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }

    #[test]
    fn create_response_with_id_fills_timestamps() {
        let json = r#"{"id": 17, "title": "Plan trip", "priority_score": 9, "status": "Pending"}"#;
        let now = Utc::now();
        let task = serde_json::from_str::<CreatedTask>(json)
            .unwrap()
            .into_task(now)
            .unwrap();
        assert_eq!(task.id, 17);
        assert_eq!(task.created_at, now);
        assert_eq!(task.updated_at, now);
        assert_eq!(task.priority(), PriorityTier::High);
    }

    #[test]
    fn new_task_validation() {
        assert!(NewTask::new("Plan trip").validate().is_ok());
        assert!(NewTask::new("  ").validate().is_err());
        let mut t = NewTask::new("Plan trip");
        t.priority_score = 11;
        assert!(t.validate().is_err());
        t.priority_score = 0;
        assert!(t.validate().is_err());
    }
}
