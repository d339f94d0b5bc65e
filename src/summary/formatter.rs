//! Turns pending todos into the prompt handed to the generation service.

use crate::models::todo::parse_due_date;
use crate::models::SummaryTodo;
use chrono::Datelike;

pub const NO_PENDING_MESSAGE: &str = "You have no pending tasks. Great job!";

const INSTRUCTIONS: &str = "Please summarize the following pending to-do items in a concise,
organized way. Each item is marked with its priority level (LOW, MEDIUM, or HIGH)
and may include a due date.

1. Group related items together
2. Respect the priority levels that are already assigned
3. Consider due dates when suggesting task order (items due sooner should generally be done first)
4. Suggest a logical order for completing the tasks
5. If there are many high priority items, suggest which ones to tackle first
6. Highlight any overdue items or items due very soon";

pub fn pending(todos: &[SummaryTodo]) -> Vec<&SummaryTodo> {
    todos.iter().filter(|t| t.is_pending()).collect()
}

/// `- [HIGH] (Due: 1/1/2024) Buy milk: two litres`
pub fn format_line(todo: &SummaryTodo) -> String {
    let priority = todo
        .priority
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_uppercase)
        .unwrap_or_else(|| "MEDIUM".to_string());

    let due = todo
        .due_date
        .as_ref()
        .and_then(parse_due_date)
        .map(|d| format!(" (Due: {}/{}/{})", d.month(), d.day(), d.year()))
        .unwrap_or_default();

    let mut line = format!("- [{}]{} {}", priority, due, todo.title);
    if let Some(description) = todo.description.as_deref().filter(|d| !d.is_empty()) {
        line.push_str(": ");
        line.push_str(description);
    }
    line
}

/// `None` when nothing is pending; callers answer with [`NO_PENDING_MESSAGE`].
pub fn build_prompt(todos: &[SummaryTodo]) -> Option<String> {
    let pending = pending(todos);
    if pending.is_empty() {
        return None;
    }

    let lines = pending
        .into_iter()
        .map(format_line)
        .collect::<Vec<_>>()
        .join("\n");

    Some(format!("{}\n\nPending to-do items:\n{}\n", INSTRUCTIONS, lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(value: serde_json::Value) -> SummaryTodo {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn line_with_priority_and_due_date() {
        let t = todo(serde_json::json!({"title": "Buy milk", "priority": "high", "dueDate": "2024-01-01"}));
        assert_eq!(format_line(&t), "- [HIGH] (Due: 1/1/2024) Buy milk");
    }

    #[test]
    fn line_defaults_priority_and_skips_bad_dates() {
        let t = todo(serde_json::json!({"title": "Call mom", "dueDate": "soon", "description": "about sunday"}));
        assert_eq!(format_line(&t), "- [MEDIUM] Call mom: about sunday");
    }

    #[test]
    fn empty_description_adds_nothing() {
        let t = todo(serde_json::json!({"title": "x", "priority": "low", "description": ""}));
        assert_eq!(format_line(&t), "- [LOW] x");
    }

    #[test]
    fn no_prompt_when_everything_is_done() {
        let todos = vec![
            todo(serde_json::json!({"title": "a", "completed": true})),
            todo(serde_json::json!({"title": "b", "completed": true})),
        ];
        assert_eq!(build_prompt(&todos), None);
        assert_eq!(build_prompt(&[]), None);
    }

    #[test]
    fn prompt_lists_only_pending_items_with_instructions() {
        let todos = vec![
            todo(serde_json::json!({"title": "done", "completed": true})),
            todo(serde_json::json!({"title": "Buy milk", "priority": "high", "due_date": "2024-01-01"})),
            todo(serde_json::json!({"title": "Read", "priority": "low"})),
        ];
        let prompt = build_prompt(&todos).unwrap();

        assert!(prompt.contains("- [HIGH] (Due: 1/1/2024) Buy milk\n- [LOW] Read"));
        assert!(!prompt.contains("] done"));
        assert!(prompt.contains("Group related items"));
        assert!(prompt.contains("Respect the priority levels"));
        assert!(prompt.contains("Consider due dates"));
        assert!(prompt.contains("Suggest a logical order"));
        assert!(prompt.contains("Highlight any overdue items"));
    }
}
