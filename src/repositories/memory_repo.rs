use super::{not_found, TodoStore};
use crate::models::{NewTodo, Todo, TodoChanges};
use crate::query::{self, TodoQuery};
use crate::utils::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Process-local store. Contents live as long as the isolate and are lost
/// on restart. Each operation holds the lock for its whole duration.
#[derive(Clone, Default)]
pub struct InMemoryTodoStore {
    todos: Arc<Mutex<Vec<Todo>>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Vec<Todo>>> {
        self.todos
            .lock()
            .map_err(|_| AppError::Internal("todo store lock poisoned".into()))
    }

    fn modify(&self, id: &str, changes: &TodoChanges) -> AppResult<Todo> {
        let mut todos = self.lock()?;
        let todo = todos.iter_mut().find(|t| t.id == id).ok_or_else(not_found)?;
        changes.apply(todo, Utc::now());
        Ok(todo.clone())
    }
}

#[async_trait(?Send)]
impl TodoStore for InMemoryTodoStore {
    async fn create(&self, input: NewTodo) -> AppResult<Todo> {
        let todo = input.into_todo(Uuid::new_v4().to_string(), Utc::now());
        self.lock()?.push(todo.clone());
        Ok(todo)
    }

    async fn list(&self, query: &TodoQuery) -> AppResult<Vec<Todo>> {
        let snapshot = self.lock()?.clone();
        Ok(query::apply(snapshot, query))
    }

    async fn update(&self, id: &str, changes: TodoChanges) -> AppResult<Todo> {
        self.modify(id, &changes)
    }

    async fn toggle(&self, id: &str) -> AppResult<Todo> {
        let mut todos = self.lock()?;
        let todo = todos.iter_mut().find(|t| t.id == id).ok_or_else(not_found)?;
        TodoChanges::toggle(todo).apply(todo, Utc::now());
        Ok(todo.clone())
    }

    async fn delete(&self, id: &str) -> AppResult<Todo> {
        let mut todos = self.lock()?;
        let index = todos.iter().position(|t| t.id == id).ok_or_else(not_found)?;
        Ok(todos.remove(index))
    }
}
