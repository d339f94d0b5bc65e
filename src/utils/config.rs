//! Environment-driven settings. Every option is optional; presence toggles
//! which summary collaborators and which store backend are available.

use worker::Env;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Supabase,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Supabase => "supabase",
            StoreBackend::Memory => "memory",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub slack_webhook_url: Option<String>,
    pub slack_bot_token: Option<String>,
    pub slack_channel_id: Option<String>,
    pub port: u16,
    pub cors_origin: String,
    pub environment: String,
    pub store_backend: StoreBackend,
    pub db_api_url: Option<String>,
    pub db_api_key: Option<String>,
}

impl Config {
    /// Vars take precedence over secrets, matching how the REST clients resolve keys.
    pub fn from_env(env: &Env) -> Self {
        Self::from_lookup(|name| {
            env.var(name)
                .map(|v| v.to_string())
                .or_else(|_| env.secret(name).map(|v| v.to_string()))
                .ok()
        })
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let store_backend = match get("TODO_STORE").map(|v| v.to_lowercase()).as_deref() {
            Some("memory") => StoreBackend::Memory,
            _ => StoreBackend::Supabase,
        };

        Self {
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            slack_webhook_url: get("SLACK_WEBHOOK_URL"),
            slack_bot_token: get("SLACK_BOT_TOKEN"),
            slack_channel_id: get("SLACK_CHANNEL_ID"),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            cors_origin: get("CORS_ORIGIN").unwrap_or_else(|| "*".to_string()),
            environment: get("ENVIRONMENT")
                .or_else(|| get("NODE_ENV"))
                .unwrap_or_else(|| "development".to_string()),
            store_backend,
            db_api_url: get("DB_API_URL"),
            db_api_key: get("DB_API_KEY"),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn gemini_configured(&self) -> bool {
        self.gemini_api_key.is_some()
    }

    pub fn slack_configured(&self) -> bool {
        self.slack_webhook_url.is_some() || self.slack_bot_token.is_some()
    }
}
