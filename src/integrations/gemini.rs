//! Google Gemini `generateContent` client for Cloudflare Workers.

use crate::summary::{GenerationFailure, SummaryGenerator};
use crate::utils::config::Config;
use async_trait::async_trait;
use serde::Deserialize;
use worker::*;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiClient {
    pub api_key: String,
    pub model: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl GeminiClient {
    /// `None` when `GEMINI_API_KEY` is not configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        config.gemini_api_key.as_ref().map(|key| Self {
            api_key: key.clone(),
            model: config.gemini_model.clone(),
        })
    }

    fn headers() -> Result<Headers> {
        let mut h = Headers::new();
        h.set("Content-Type", "application/json")?;
        Ok(h)
    }

    async fn call(&self, prompt: &str) -> Result<(u16, String)> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            GEMINI_BASE_URL, self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let req = Request::new_with_init(
            &url,
            RequestInit::new()
                .with_method(Method::Post)
                .with_headers(Self::headers()?)
                .with_body(Some(body.to_string().into())),
        )?;

        let mut resp = Fetch::Request(req).send().await?;
        let code = resp.status_code();
        let text = resp.text().await?;
        Ok((code, text))
    }
}

/// Text of the first candidate, or the failure message the API reported.
fn parse_reply(code: u16, text: &str) -> std::result::Result<String, GenerationFailure> {
    if code != 200 {
        let message = serde_json::from_str::<ErrorEnvelope>(text)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| format!("Gemini error ({}): {}", code, text));
        return Err(GenerationFailure(message));
    }

    let parsed: GenerateResponse = serde_json::from_str(text)
        .map_err(|e| GenerationFailure(format!("Gemini response json: {}", e)))?;

    let summary: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if summary.is_empty() {
        return Err(GenerationFailure("Gemini returned no text".into()));
    }
    Ok(summary)
}

#[async_trait(?Send)]
impl SummaryGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationFailure> {
        let (code, text) = self
            .call(prompt)
            .await
            .map_err(|e| GenerationFailure(e.to_string()))?;
        parse_reply(code, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_parts_of_first_candidate() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Start with "},{"text":"groceries."}]}},{"content":{"parts":[{"text":"ignored"}]}}]}"#;
        assert_eq!(parse_reply(200, body).unwrap(), "Start with groceries.");
    }

    #[test]
    fn error_message_is_surfaced() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            parse_reply(400, body).unwrap_err(),
            GenerationFailure("API key not valid. Please pass a valid API key.".into())
        );
    }

    #[test]
    fn unstructured_error_keeps_status_and_body() {
        let err = parse_reply(503, "upstream down").unwrap_err();
        assert_eq!(err, GenerationFailure("Gemini error (503): upstream down".into()));
    }

    #[test]
    fn empty_candidates_fail() {
        assert!(parse_reply(200, r#"{"candidates":[]}"#).is_err());
    }

    #[test]
    fn not_built_without_key() {
        let config = Config::from_lookup(|_| None);
        assert!(GeminiClient::from_config(&config).is_none());
    }
}
