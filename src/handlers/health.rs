use crate::utils::{context::AppContext, cors};
use chrono::{DateTime, Utc};
use worker::*;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn configured(flag: bool) -> &'static str {
    if flag {
        "configured"
    } else {
        "not configured"
    }
}

pub fn root(app: &AppContext) -> Result<Response> {
    let mut res = Response::ok("Todo Summary Assistant API is running")?;
    res.headers_mut().set("x-backend", "workers-rust")?;
    cors::add_headers(res, app.origin())
}

/// Service status. `booted_at` is when this isolate first served a request.
pub fn health_check(app: &AppContext, booted_at: DateTime<Utc>) -> Result<Response> {
    let cfg = &app.config;
    let uptime = (app.start_time - booted_at).num_milliseconds().max(0) as f64 / 1000.0;
    let body = serde_json::json!({
        "status": "OK",
        "message": "Todo Summary Assistant API is healthy",
        "timestamp": app.start_time.to_rfc3339(),
        "uptime": uptime,
        "environment": cfg.environment,
        "version": VERSION,
        "port": cfg.port,
        "store": cfg.store_backend.as_str(),
        "services": {
            "gemini": configured(cfg.gemini_configured()),
            "slack": configured(cfg.slack_configured()),
        },
    });
    cors::add_headers(Response::from_json(&body)?, app.origin())
}

pub fn api_health(app: &AppContext) -> Result<Response> {
    let body = serde_json::json!({
        "status": "OK",
        "message": "API is running",
        "timestamp": Utc::now().to_rfc3339(),
    });
    cors::add_headers(Response::from_json(&body)?, app.origin())
}
