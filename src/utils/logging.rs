use crate::utils::context::AppContext;
use worker::*;

pub fn log_request(ctx: &AppContext, req: &Request) {
    console_log!("[{}] {} {}", ctx.request_id, req.method(), req.path());
}

pub fn log_info(ctx: &AppContext, msg: &str) {
    console_log!("[{}] {}", ctx.request_id, msg);
}

pub fn log_error(ctx: &AppContext, msg: &str) {
    console_error!("[{}] [ERROR] {}", ctx.request_id, msg);
}
