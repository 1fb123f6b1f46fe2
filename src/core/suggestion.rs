use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Prioritization,
    Categorization,
    Deadline,
    Enhancement,
}

/// Request body for `POST /ai/suggestions/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionRequest {
    pub task_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub suggestion_type: SuggestionKind,
}

impl SuggestionRequest {
    pub fn new(task_description: impl Into<String>, suggestion_type: SuggestionKind) -> Self {
        Self {
            task_description: task_description.into(),
            context: None,
            suggestion_type,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    #[serde(default)]
    pub enhanced_description: Option<String>,
    #[serde(default)]
    pub suggested_category: Option<String>,
    #[serde(default)]
    pub suggested_deadline: Option<String>,
    #[serde(default)]
    pub suggested_priority: Option<i32>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}
