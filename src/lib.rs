pub mod db;
pub mod handlers;
pub mod integrations;
pub mod models;
pub mod query;
pub mod repositories;
pub mod summary;
pub mod utils;

use chrono::{DateTime, Utc};
use repositories::InMemoryTodoStore;
use std::sync::OnceLock;
use utils::context::AppContext;
use utils::{cors, errors, logging};
use worker::*;

/// One in-memory store per isolate, handed to requests through `AppContext`.
static MEMORY_STORE: OnceLock<InMemoryTodoStore> = OnceLock::new();
static BOOTED_AT: OnceLock<DateTime<Utc>> = OnceLock::new();

#[event(fetch)]
async fn fetch(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    BOOTED_AT.get_or_init(Utc::now);
    let memory = MEMORY_STORE.get_or_init(InMemoryTodoStore::new).clone();
    let app_ctx = AppContext::new(env.clone(), memory);
    logging::log_request(&app_ctx, &req);

    // Handle CORS preflight (OPTIONS) requests
    if req.method() == Method::Options {
        return cors::handle_preflight(app_ctx.origin());
    }

    Router::with_data(app_ctx)
        .get("/", |_, ctx| handlers::health::root(&ctx.data))
        .get("/health", |_, ctx| {
            let booted_at = BOOTED_AT.get().copied().unwrap_or(ctx.data.start_time);
            handlers::health::health_check(&ctx.data, booted_at)
        })
        .get("/api/health", |_, ctx| handlers::health::api_health(&ctx.data))
        .get_async("/api/todos", handlers::todo_handler::list_todos)
        .post_async("/api/todos", handlers::todo_handler::create_todo)
        .put_async("/api/todos/:id", handlers::todo_handler::update_todo)
        .patch_async("/api/todos/:id/toggle", handlers::todo_handler::toggle_todo)
        .delete_async("/api/todos/:id", handlers::todo_handler::delete_todo)
        .post_async("/api/summary/generate", handlers::summary_handler::generate_summary)
        .post_async("/api/summary/send-to-slack", handlers::summary_handler::send_to_slack)
        .or_else_any_method("/*catchall", |_, ctx| errors::not_found_route(ctx.data.origin()))
        .run(req, env)
        .await
}
