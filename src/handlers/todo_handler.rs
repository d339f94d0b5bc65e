use crate::handlers::fail;
use crate::models::{CreateTodo, NewTodo, TodoChanges, UpdateTodo};
use crate::query::TodoQuery;
use crate::utils::{context::AppContext, cors, errors};
use worker::*;

fn todo_id(ctx: &RouteContext<AppContext>) -> Option<String> {
    ctx.param("id")
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
}

pub async fn list_todos(req: Request, ctx: RouteContext<AppContext>) -> Result<Response> {
    let app = &ctx.data;
    let url = req.url()?;
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let query = TodoQuery::from_params(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    let store = match app.store() {
        Ok(s) => s,
        Err(e) => return fail(app, "list_todos", e),
    };
    match store.list(&query).await {
        Ok(todos) => cors::add_headers(Response::from_json(&todos)?, app.origin()),
        Err(e) => fail(app, "list_todos", e),
    }
}

pub async fn create_todo(mut req: Request, ctx: RouteContext<AppContext>) -> Result<Response> {
    let app = &ctx.data;
    let body: CreateTodo = match req.json().await {
        Ok(v) => v,
        Err(_) => return errors::json_error("Invalid JSON", 400, app.origin()),
    };

    let input = match NewTodo::from_request(body) {
        Ok(i) => i,
        Err(e) => return fail(app, "create_todo", e),
    };

    let store = match app.store() {
        Ok(s) => s,
        Err(e) => return fail(app, "create_todo", e),
    };
    match store.create(input).await {
        Ok(todo) => cors::add_headers(Response::from_json(&todo)?.with_status(201), app.origin()),
        Err(e) => fail(app, "create_todo", e),
    }
}

pub async fn update_todo(mut req: Request, ctx: RouteContext<AppContext>) -> Result<Response> {
    let app = &ctx.data;
    let id = match todo_id(&ctx) {
        Some(id) => id,
        None => return errors::json_error("Todo not found", 404, app.origin()),
    };
    let body: UpdateTodo = match req.json().await {
        Ok(v) => v,
        Err(_) => return errors::json_error("Invalid JSON", 400, app.origin()),
    };

    let changes = match TodoChanges::from_request(body) {
        Ok(c) => c,
        Err(e) => return fail(app, "update_todo", e),
    };

    let store = match app.store() {
        Ok(s) => s,
        Err(e) => return fail(app, "update_todo", e),
    };
    match store.update(&id, changes).await {
        Ok(todo) => cors::add_headers(Response::from_json(&todo)?, app.origin()),
        Err(e) => fail(app, "update_todo", e),
    }
}

pub async fn toggle_todo(_req: Request, ctx: RouteContext<AppContext>) -> Result<Response> {
    let app = &ctx.data;
    let id = match todo_id(&ctx) {
        Some(id) => id,
        None => return errors::json_error("Todo not found", 404, app.origin()),
    };

    let store = match app.store() {
        Ok(s) => s,
        Err(e) => return fail(app, "toggle_todo", e),
    };
    match store.toggle(&id).await {
        Ok(todo) => cors::add_headers(Response::from_json(&todo)?, app.origin()),
        Err(e) => fail(app, "toggle_todo", e),
    }
}

pub async fn delete_todo(_req: Request, ctx: RouteContext<AppContext>) -> Result<Response> {
    let app = &ctx.data;
    let id = match todo_id(&ctx) {
        Some(id) => id,
        None => return errors::json_error("Todo not found", 404, app.origin()),
    };

    let store = match app.store() {
        Ok(s) => s,
        Err(e) => return fail(app, "delete_todo", e),
    };
    match store.delete(&id).await {
        Ok(todo) => cors::add_headers(Response::from_json(&todo)?, app.origin()),
        Err(e) => fail(app, "delete_todo", e),
    }
}
