use anyhow::{anyhow, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::env;

pub const ENV_SERVER_URL: &str = "MEDIA_SERVER_URL";
pub const ENV_USER_ID: &str = "MEDIA_SERVER_USER_ID";
pub const ENV_AUTH: &str = "MEDIA_SERVER_AUTH";

/// Server location and credentials for one signed-in user.
///
/// Passed by reference into every fetch and sync call; nothing in the crate
/// keeps a global copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub base_uri: String,
    pub user_id: String,
    /// Opaque value sent as `X-Emby-Authorization`.
    pub auth_header: String,
}

impl AuthContext {
    pub fn new(
        base_uri: impl Into<String>,
        user_id: impl Into<String>,
        auth_header: impl Into<String>,
    ) -> Self {
        let base_uri = base_uri.into().trim_end_matches('/').to_string();
        Self {
            base_uri,
            user_id: user_id.into(),
            auth_header: auth_header.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(
            required_var(ENV_SERVER_URL)?,
            required_var(ENV_USER_ID)?,
            required_var(ENV_AUTH)?,
        ))
    }

    pub fn item_url(&self, item_id: &str) -> String {
        format!("{}/Users/{}/Items/{}", self.base_uri, self.user_id, item_id)
    }

    pub fn played_url(&self, item_id: &str, date_played: Option<DateTime<Utc>>) -> String {
        let base = format!(
            "{}/Users/{}/PlayedItems/{}",
            self.base_uri, self.user_id, item_id
        );
        match date_played {
            Some(date) => format!(
                "{base}?DatePlayed={}",
                urlencoding::encode(&format_date_played(date))
            ),
            None => base,
        }
    }

    pub fn favorite_url(&self, item_id: &str) -> String {
        format!(
            "{}/Users/{}/FavoriteItems/{}",
            self.base_uri, self.user_id, item_id
        )
    }
}

/// `2024-05-13T18:04:09.123Z`
pub fn format_date_played(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn required_var(key: &str) -> Result<String> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow!("Missing required environment variable: {}", key))
}
