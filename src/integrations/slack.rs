//! Slack delivery over an incoming webhook or the `chat.postMessage` API.

use crate::models::DeliveryReceipt;
use crate::summary::DeliveryChannel;
use crate::utils::config::Config;
use crate::utils::errors::{AppError, AppResult};
use async_trait::async_trait;
use worker::*;

const SLACK_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

pub struct SlackWebhook {
    pub url: String,
}

pub struct SlackBot {
    pub token: String,
    pub channel_id: String,
}

async fn post_json(url: &str, headers: Headers, body: serde_json::Value) -> Result<(u16, String)> {
    let req = Request::new_with_init(
        url,
        RequestInit::new()
            .with_method(Method::Post)
            .with_headers(headers)
            .with_body(Some(body.to_string().into())),
    )?;

    let mut resp = Fetch::Request(req).send().await?;
    let code = resp.status_code();
    let text = resp.text().await?;
    Ok((code, text))
}

fn json_headers() -> Result<Headers> {
    let mut h = Headers::new();
    h.set("Content-Type", "application/json")?;
    Ok(h)
}

fn webhook_outcome(code: u16, text: &str) -> AppResult<DeliveryReceipt> {
    if code != 200 {
        return Err(AppError::Delivery(format!(
            "Slack webhook error ({}): {}",
            code, text
        )));
    }
    Ok(DeliveryReceipt {
        message: "Summary sent to Slack successfully via webhook".into(),
        slack_response: None,
    })
}

/// The API answers 200 even on failure; `ok` is what counts.
fn bot_outcome(code: u16, text: &str) -> AppResult<DeliveryReceipt> {
    let body: serde_json::Value = serde_json::from_str(text).map_err(|_| {
        AppError::Delivery(format!("Slack API error ({}): {}", code, text))
    })?;

    if body.get("ok").and_then(|v| v.as_bool()) != Some(true) {
        let reason = body
            .get("error")
            .and_then(|e| e.as_str())
            .unwrap_or("Unknown Slack API error");
        return Err(AppError::Delivery(reason.to_string()));
    }

    Ok(DeliveryReceipt {
        message: "Summary sent to Slack successfully via bot token".into(),
        slack_response: Some(body),
    })
}

#[async_trait(?Send)]
impl DeliveryChannel for SlackWebhook {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn deliver(&self, message: &str) -> AppResult<DeliveryReceipt> {
        let body = serde_json::json!({ "text": message, "mrkdwn": true });
        let (code, text) = post_json(&self.url, json_headers()?, body)
            .await
            .map_err(|e| AppError::Delivery(format!("Slack webhook error: {}", e)))?;
        webhook_outcome(code, &text)
    }
}

#[async_trait(?Send)]
impl DeliveryChannel for SlackBot {
    fn name(&self) -> &'static str {
        "bot_token"
    }

    async fn deliver(&self, message: &str) -> AppResult<DeliveryReceipt> {
        let mut headers = json_headers()?;
        headers.set("Authorization", &format!("Bearer {}", self.token))?;
        let body = serde_json::json!({
            "channel": self.channel_id,
            "text": message,
            "mrkdwn": true,
        });
        let (code, text) = post_json(SLACK_POST_MESSAGE_URL, headers, body)
            .await
            .map_err(|e| AppError::Delivery(format!("Slack API error: {}", e)))?;
        bot_outcome(code, &text)
    }
}

/// Configured delivery paths, webhook first. The bot path needs both the
/// token and the channel id.
pub fn channels_from_config(config: &Config) -> Vec<Box<dyn DeliveryChannel>> {
    let mut channels: Vec<Box<dyn DeliveryChannel>> = Vec::new();
    if let Some(url) = &config.slack_webhook_url {
        channels.push(Box::new(SlackWebhook { url: url.clone() }));
    }
    if let (Some(token), Some(channel_id)) = (&config.slack_bot_token, &config.slack_channel_id) {
        channels.push(Box::new(SlackBot {
            token: token.clone(),
            channel_id: channel_id.clone(),
        }));
    }
    channels
}
