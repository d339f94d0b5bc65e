//! Minimal Supabase PostgREST client for Cloudflare Workers.

use crate::utils::config::Config;
use worker::*;

pub struct SupabaseClient {
    pub base_url: String,
    pub api_key: String,
}

impl SupabaseClient {
    /// Build client from config. Expects `DB_API_URL` and `DB_API_KEY`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config
            .db_api_url
            .clone()
            .ok_or_else(|| Error::RustError("DB_API_URL is not set".into()))?;
        let api_key = config
            .db_api_key
            .clone()
            .ok_or_else(|| Error::RustError("DB_API_KEY is not set".into()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn get_headers(&self) -> Result<Headers> {
        let mut headers = Headers::new();
        headers.set("apikey", &self.api_key)?;
        headers.set("Authorization", &format!("Bearer {}", self.api_key))?;
        headers.set("Content-Type", "application/json")?;
        Ok(headers)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
        representation: bool,
    ) -> Result<Response> {
        let mut headers = self.get_headers()?;
        if representation {
            headers.set("Prefer", "return=representation")?;
        }

        let mut init = RequestInit::new();
        init.with_method(method).with_headers(headers);
        if let Some(body) = body {
            init.with_body(Some(body.to_string().into()));
        }

        let req = Request::new_with_init(url, &init)?;
        Fetch::Request(req).send().await
    }

    async fn expect_json(mut resp: Response, ok: &[u16]) -> Result<serde_json::Value> {
        if !ok.contains(&resp.status_code()) {
            let error_text = resp.text().await?;
            return Err(Error::RustError(format!(
                "Supabase error ({}): {}",
                resp.status_code(),
                error_text
            )));
        }
        resp.json().await
    }

    pub async fn get(&self, table: &str, query: &str) -> Result<serde_json::Value> {
        let url = format!("{}/rest/v1/{}?{}", self.base_url, table, query);
        let resp = self.send(Method::Get, &url, None, false).await?;
        Self::expect_json(resp, &[200]).await
    }

    pub async fn post(&self, table: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let resp = self.send(Method::Post, &url, Some(body), true).await?;
        Self::expect_json(resp, &[200, 201]).await
    }

    pub async fn patch(&self, table: &str, id: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        self.patch_where(table, &format!("id=eq.{}", id), body).await
    }

    /// Patches every row matching a PostgREST filter and returns them.
    /// An empty array means nothing matched.
    pub async fn patch_where(
        &self,
        table: &str,
        filter: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let url = format!("{}/rest/v1/{}?{}", self.base_url, table, filter);
        let resp = self.send(Method::Patch, &url, Some(body), true).await?;
        Self::expect_json(resp, &[200]).await
    }

    /// Deletes by id and returns the removed rows.
    pub async fn delete(&self, table: &str, id: &str) -> Result<serde_json::Value> {
        let url = format!("{}/rest/v1/{}?id=eq.{}", self.base_url, table, id);
        let resp = self.send(Method::Delete, &url, None, true).await?;
        Self::expect_json(resp, &[200]).await
    }
}
