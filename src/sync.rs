use crate::jellyfin::MediaServerApi;
use crate::session::AuthContext;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Pushes watched/favorite changes to the server without waiting on them.
///
/// Each call spawns its own task. Failures are logged and dropped; the
/// caller's local flag is never rolled back. Overlapping writes are not
/// sequenced, so the last one to reach the server wins.
#[derive(Clone)]
pub struct UserStateSync {
    api: Arc<dyn MediaServerApi>,
    ctx: Arc<AuthContext>,
}

impl UserStateSync {
    pub fn new(api: Arc<dyn MediaServerApi>, ctx: Arc<AuthContext>) -> Self {
        Self { api, ctx }
    }

    pub fn context(&self) -> &AuthContext {
        &self.ctx
    }

    pub fn set_watched(&self, item_id: &str, value: bool) -> JoinHandle<()> {
        let api = self.api.clone();
        let ctx = self.ctx.clone();
        let item_id = item_id.to_string();
        // Stamp at toggle time, not when the task gets scheduled.
        let date_played = Utc::now();
        tokio::spawn(async move {
            let result = if value {
                api.mark_played(&ctx, &item_id, date_played).await
            } else {
                api.unmark_played(&ctx, &item_id).await
            };
            match result {
                Ok(()) => info!(item_id = %item_id, watched = value, "Synced watched state"),
                Err(e) => warn!(item_id = %item_id, watched = value, "Failed to sync watched state: {:#}", e),
            }
        })
    }

    pub fn set_favorite(&self, item_id: &str, value: bool) -> JoinHandle<()> {
        let api = self.api.clone();
        let ctx = self.ctx.clone();
        let item_id = item_id.to_string();
        tokio::spawn(async move {
            let result = if value {
                api.add_favorite(&ctx, &item_id).await
            } else {
                api.remove_favorite(&ctx, &item_id).await
            };
            match result {
                Ok(()) => info!(item_id = %item_id, favorite = value, "Synced favorite state"),
                Err(e) => warn!(item_id = %item_id, favorite = value, "Failed to sync favorite state: {:#}", e),
            }
        })
    }
}
