use crate::db::SupabaseClient;
use crate::repositories::{InMemoryTodoStore, SupabaseTodoStore, TodoStore};
use crate::utils::config::{Config, StoreBackend};
use crate::utils::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use worker::Env;

#[derive(Clone)]
pub struct AppContext {
    pub env: Env,
    pub config: Config,
    pub request_id: String,
    pub start_time: DateTime<Utc>,
    memory: InMemoryTodoStore,
}

impl AppContext {
    /// `memory` is the isolate's in-memory store, used when `TODO_STORE=memory`.
    pub fn new(env: Env, memory: InMemoryTodoStore) -> Self {
        let config = Config::from_env(&env);
        Self {
            env,
            config,
            request_id: Uuid::new_v4().to_string(),
            start_time: Utc::now(),
            memory,
        }
    }

    pub fn store(&self) -> AppResult<Box<dyn TodoStore>> {
        match self.config.store_backend {
            StoreBackend::Memory => Ok(Box::new(self.memory.clone())),
            StoreBackend::Supabase => {
                let db = SupabaseClient::from_config(&self.config)
                    .map_err(|e| AppError::Configuration(e.to_string()))?;
                Ok(Box::new(SupabaseTodoStore::new(db)))
            }
        }
    }

    pub fn origin(&self) -> &str {
        &self.config.cors_origin
    }

    pub fn include_trace(&self) -> bool {
        !self.config.is_production()
    }
}
