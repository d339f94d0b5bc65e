use crate::handlers::fail;
use crate::integrations;
use crate::models::{SendSummaryRequest, SummaryResponse, SummaryTodo};
use crate::summary::SummaryDispatcher;
use crate::utils::{context::AppContext, cors, errors::AppError, errors::AppResult, logging};
use serde::de::DeserializeOwned;
use worker::*;

const TODOS_REQUIRED: &str = "Invalid request. Todos array is required.";

/// An empty body reads as `{}`.
fn parse_body<T: DeserializeOwned>(raw: &str) -> AppResult<T> {
    let raw = if raw.trim().is_empty() { "{}" } else { raw };
    serde_json::from_str(raw).map_err(|_| AppError::Validation("Invalid JSON".into()))
}

/// Checks the key before looking at the body, so a misconfigured server
/// reports 500 whatever the client sent.
fn summary_input(dispatcher: &SummaryDispatcher, raw: &str) -> AppResult<Vec<SummaryTodo>> {
    dispatcher.require_generator()?;
    let body: serde_json::Value = parse_body(raw)?;
    match body.get("todos") {
        Some(items @ serde_json::Value::Array(_)) => serde_json::from_value(items.clone())
            .map_err(|_| AppError::Validation(TODOS_REQUIRED.into())),
        _ => Err(AppError::Validation(TODOS_REQUIRED.into())),
    }
}

pub async fn generate_summary(mut req: Request, ctx: RouteContext<AppContext>) -> Result<Response> {
    let app = &ctx.data;
    let raw = req.text().await.unwrap_or_default();
    let dispatcher = integrations::dispatcher_from_config(&app.config);

    let todos = match summary_input(&dispatcher, &raw) {
        Ok(t) => t,
        Err(e) => return fail(app, "generate_summary", e),
    };

    match dispatcher.generate(&todos).await {
        Ok(summary) => {
            logging::log_info(app, &format!("summary generated for {} todos", todos.len()));
            cors::add_headers(Response::from_json(&SummaryResponse { summary })?, app.origin())
        }
        Err(e) => fail(app, "generate_summary", e),
    }
}

pub async fn send_to_slack(mut req: Request, ctx: RouteContext<AppContext>) -> Result<Response> {
    let app = &ctx.data;
    let raw = req.text().await.unwrap_or_default();
    let body: SendSummaryRequest = match parse_body(&raw) {
        Ok(b) => b,
        Err(e) => return fail(app, "send_to_slack", e),
    };

    let dispatcher = integrations::dispatcher_from_config(&app.config);
    match dispatcher.deliver(body.summary.as_deref()).await {
        Ok(receipt) => {
            logging::log_info(
                app,
                &format!(
                    "summary delivered via {}",
                    dispatcher.delivery_channel().unwrap_or("unknown")
                ),
            );
            cors::add_headers(Response::from_json(&receipt)?, app.origin())
        }
        Err(e) => fail(app, "send_to_slack", e),
    }
}
