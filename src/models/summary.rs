use crate::models::Todo;
use serde::{Deserialize, Deserializer, Serialize};

/// `null` titles read as empty.
fn lenient_title<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(d).map(Option::unwrap_or_default)
}

/// A todo as sent by the client for summarization. Every field is lenient:
/// the formatter decides what to do with missing or malformed values.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTodo {
    #[serde(default, deserialize_with = "lenient_title")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, alias = "due_date")]
    pub due_date: Option<serde_json::Value>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl SummaryTodo {
    pub fn is_pending(&self) -> bool {
        !self.completed.unwrap_or(false)
    }
}

impl From<&Todo> for SummaryTodo {
    fn from(todo: &Todo) -> Self {
        SummaryTodo {
            title: todo.title.clone(),
            description: Some(todo.description.clone()),
            priority: Some(todo.priority.as_str().to_string()),
            due_date: todo
                .due_date
                .map(|d| serde_json::Value::String(d.to_rfc3339())),
            completed: Some(todo.completed),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct SendSummaryRequest {
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Result of a successful delivery.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_response: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_or_missing_title_reads_as_empty() {
        let todos: Vec<SummaryTodo> = serde_json::from_value(serde_json::json!([
            {"title": null, "priority": "high"},
            {"completed": false},
            {"title": "Pay rent", "due_date": "2024-02-01"}
        ]))
        .unwrap();

        assert_eq!(todos[0].title, "");
        assert_eq!(todos[0].priority.as_deref(), Some("high"));
        assert_eq!(todos[1].title, "");
        assert!(todos[1].is_pending());
        assert_eq!(todos[2].title, "Pay rent");
        assert!(todos[2].due_date.is_some());
    }
}
