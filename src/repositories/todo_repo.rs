use super::{not_found, TodoStore};
use crate::db::SupabaseClient;
use crate::models::{NewTodo, Todo, TodoChanges, TodoRow};
use crate::query::{self, TodoQuery};
use crate::utils::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

const TABLE: &str = "todos";

/// Durable store over the Supabase `todos` table.
pub struct SupabaseTodoStore {
    db: SupabaseClient,
}

/// Ids are generated here as UUIDs, so anything else cannot exist and is
/// never interpolated into a PostgREST filter.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn rows_to_todos(json_value: serde_json::Value) -> AppResult<Vec<Todo>> {
    match json_value {
        serde_json::Value::Array(arr) => {
            let rows: Vec<TodoRow> = serde_json::from_value(serde_json::Value::Array(arr))?;
            Ok(rows.into_iter().map(Todo::from).collect())
        }
        other => Err(AppError::Internal(format!("Expected array, got: {}", other))),
    }
}

/// Matches the row only while `completed` still holds the value we read,
/// so a concurrent toggle makes the write a no-op instead of undoing it.
fn toggle_filter(id: &str, completed: bool) -> String {
    format!("id=eq.{}&completed=eq.{}", id, completed)
}

fn first_or_not_found(json_value: serde_json::Value) -> AppResult<Todo> {
    rows_to_todos(json_value)?.into_iter().next().ok_or_else(not_found)
}

impl SupabaseTodoStore {
    pub fn new(db: SupabaseClient) -> Self {
        Self { db }
    }

    async fn find(&self, id: &str) -> AppResult<Todo> {
        if !is_valid_id(id) {
            return Err(not_found());
        }
        let query = format!("select=*&id=eq.{}", id);
        first_or_not_found(self.db.get(TABLE, &query).await?)
    }
}

#[async_trait(?Send)]
impl TodoStore for SupabaseTodoStore {
    async fn create(&self, input: NewTodo) -> AppResult<Todo> {
        let todo = input.into_todo(Uuid::new_v4().to_string(), Utc::now());
        let body = serde_json::to_value(TodoRow::from(&todo))?;
        let json_value = self.db.post(TABLE, body).await?;
        rows_to_todos(json_value)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("No todo returned".into()))
    }

    async fn list(&self, query: &TodoQuery) -> AppResult<Vec<Todo>> {
        let json_value = self.db.get(TABLE, "select=*&order=created_at.desc").await?;
        Ok(query::apply(rows_to_todos(json_value)?, query))
    }

    async fn update(&self, id: &str, changes: TodoChanges) -> AppResult<Todo> {
        if !is_valid_id(id) {
            return Err(not_found());
        }
        let body = changes.to_row_patch(Utc::now());
        first_or_not_found(self.db.patch(TABLE, id, body).await?)
    }

    async fn toggle(&self, id: &str) -> AppResult<Todo> {
        let current = self.find(id).await?;
        let body = TodoChanges::toggle(&current).to_row_patch(Utc::now());
        let filter = toggle_filter(id, current.completed);
        let updated = rows_to_todos(self.db.patch_where(TABLE, &filter, body).await?)?;
        match updated.into_iter().next() {
            Some(todo) => Ok(todo),
            None => {
                // Deleted meanwhile is still a 404.
                self.find(id).await?;
                Err(AppError::Conflict("Todo was modified concurrently".into()))
            }
        }
    }

    async fn delete(&self, id: &str) -> AppResult<Todo> {
        if !is_valid_id(id) {
            return Err(not_found());
        }
        first_or_not_found(self.db.delete(TABLE, id).await?)
    }
}
