use serde::{Deserialize, Serialize};

/// Reference data: the store creates categories but never edits or removes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub usage_count: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            color: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("category name must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default_when_absent() {
        let c: Category = serde_json::from_str(r#"{"id": 2, "name": "Work", "usage_count": 14}"#).unwrap();
        assert_eq!(c.usage_count, 14);
        assert_eq!(c.color, None);
        assert_eq!(c.description, None);
    }

    #[test]
    fn payload_skips_unset_fields() {
        let json = serde_json::to_string(&NewCategory::new("Errands")).unwrap();
        assert_eq!(json, r#"{"name":"Errands"}"#);
        assert!(NewCategory::new(" ").validate().is_err());
    }
}
