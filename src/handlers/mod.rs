pub mod health;
pub mod summary_handler;
pub mod todo_handler;

use crate::utils::{context::AppContext, errors, errors::AppError, logging};
use worker::{Response, Result};

/// Logs server-side failures and renders the error body.
pub(crate) fn fail(app: &AppContext, op: &str, err: AppError) -> Result<Response> {
    if err.status() >= 500 {
        match err.detail() {
            Some(detail) => logging::log_error(app, &format!("{}: {}: {}", op, err, detail)),
            None => logging::log_error(app, &format!("{}: {}", op, err)),
        }
    }
    errors::app_error(&err, app.origin(), app.include_trace())
}
