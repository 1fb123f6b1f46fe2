use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    WhatsApp,
    Email,
    Notes,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WhatsApp => "WhatsApp",
            Self::Email => "Email",
            Self::Notes => "Notes",
        }
    }
}

/// A task the backend proposes after analysing a context entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedTask {
    pub title: String,
    #[serde(default)]
    pub priority_score: Option<i32>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_verbs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_themes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_references: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency_indicators: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_tasks: Option<Vec<SuggestedTask>>,
    /// Keys this client does not know about, kept as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Backend analysis of a context entry. Opaque to the store.
///
/// Variants are tried in order; anything that is neither a well-formed
/// insight object nor a string is kept verbatim as `Raw`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessedInsights {
    Structured(InsightDetails),
    Text(String),
    Raw(serde_json::Value),
}

impl ProcessedInsights {
    pub fn details(&self) -> Option<&InsightDetails> {
        match self {
            Self::Structured(d) => Some(d),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub id: i64,
    pub content: String,
    pub source_type: SourceType,
    #[serde(default)]
    pub processed_insights: Option<ProcessedInsights>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewContextEntry {
    pub content: String,
    pub source_type: SourceType,
}

impl NewContextEntry {
    pub fn new(content: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            content: content.into(),
            source_type,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.content.trim().is_empty() {
            return Err("context content must not be empty".to_string());
        }
        Ok(())
    }
}
