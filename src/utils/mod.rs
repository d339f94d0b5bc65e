pub mod config;
pub mod context;
pub mod cors;
pub mod errors;
pub mod logging;
