use crate::detail::ItemDetail;
use crate::error::FetchError;
use crate::session::AuthContext;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, Method};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const AUTH_HEADER: &str = "X-Emby-Authorization";

#[async_trait]
pub trait MediaServerApi: Send + Sync {
    async fn fetch_item(&self, ctx: &AuthContext, item_id: &str) -> Result<ItemDetail, FetchError>;
    async fn mark_played(
        &self,
        ctx: &AuthContext,
        item_id: &str,
        date_played: DateTime<Utc>,
    ) -> Result<()>;
    async fn unmark_played(&self, ctx: &AuthContext, item_id: &str) -> Result<()>;
    async fn add_favorite(&self, ctx: &AuthContext, item_id: &str) -> Result<()>;
    async fn remove_favorite(&self, ctx: &AuthContext, item_id: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct JellyfinClient {
    client: Client,
}

impl JellyfinClient {
    pub fn new() -> Result<Self> {
        let user_agent = format!("reelsync/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build media server HTTP client")?;
        Ok(Self { client })
    }

    fn request(&self, method: Method, url: &str, ctx: &AuthContext) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTH_HEADER, &ctx.auth_header)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
    }

    async fn send_write(&self, method: Method, url: String, ctx: &AuthContext) -> Result<()> {
        debug!(%method, %url, "Sending user-state write");
        let res = self
            .request(method.clone(), &url, ctx)
            .send()
            .await
            .with_context(|| format!("{} {} failed", method, url))?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow!("{} {} -> {}: {}", method, url, status, text));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaServerApi for JellyfinClient {
    async fn fetch_item(&self, ctx: &AuthContext, item_id: &str) -> Result<ItemDetail, FetchError> {
        let url = ctx.item_url(item_id);
        debug!(%url, "Fetching item detail");
        let res = self.request(Method::GET, &url, ctx).send().await?;
        let status = res.status();
        let bytes = res.bytes().await?;
        if !status.is_success() {
            return Err(FetchError::Network(format!(
                "{} -> {}: {}",
                url,
                status,
                String::from_utf8_lossy(&bytes)
            )));
        }
        let json: Value = serde_json::from_slice(&bytes)?;
        if !json.is_object() {
            return Err(FetchError::Decode(format!(
                "expected a JSON object for item {}",
                item_id
            )));
        }
        Ok(ItemDetail::from_json(&json, ctx))
    }

    async fn mark_played(
        &self,
        ctx: &AuthContext,
        item_id: &str,
        date_played: DateTime<Utc>,
    ) -> Result<()> {
        self.send_write(Method::POST, ctx.played_url(item_id, Some(date_played)), ctx)
            .await
    }

    async fn unmark_played(&self, ctx: &AuthContext, item_id: &str) -> Result<()> {
        self.send_write(Method::DELETE, ctx.played_url(item_id, None), ctx)
            .await
    }

    async fn add_favorite(&self, ctx: &AuthContext, item_id: &str) -> Result<()> {
        self.send_write(Method::POST, ctx.favorite_url(item_id), ctx)
            .await
    }

    async fn remove_favorite(&self, ctx: &AuthContext, item_id: &str) -> Result<()> {
        self.send_write(Method::DELETE, ctx.favorite_url(item_id), ctx)
            .await
    }
}
