pub mod memory_repo;
pub mod todo_repo;

pub use memory_repo::InMemoryTodoStore;
pub use todo_repo::SupabaseTodoStore;

use crate::models::{NewTodo, Todo, TodoChanges};
use crate::query::TodoQuery;
use crate::utils::errors::AppResult;
use async_trait::async_trait;

/// Persistence boundary for todos. Worker futures are not `Send`, hence `?Send`.
#[async_trait(?Send)]
pub trait TodoStore {
    async fn create(&self, input: NewTodo) -> AppResult<Todo>;

    /// Snapshot of the store with `query` applied. Never a live view.
    async fn list(&self, query: &TodoQuery) -> AppResult<Vec<Todo>>;

    async fn update(&self, id: &str, changes: TodoChanges) -> AppResult<Todo>;

    /// Flip `completed` and stamp `updated_at`.
    async fn toggle(&self, id: &str) -> AppResult<Todo>;

    /// Remove and return the record.
    async fn delete(&self, id: &str) -> AppResult<Todo>;
}

pub(crate) fn not_found() -> crate::utils::errors::AppError {
    crate::utils::errors::AppError::NotFound("Todo not found".into())
}
