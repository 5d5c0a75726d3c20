use anyhow::{Context, Result};
use dotenvy::dotenv;
use reelsync::jellyfin::{JellyfinClient, MediaServerApi};
use reelsync::screen::{DetailScreen, LoadState};
use reelsync::session::{AuthContext, ENV_AUTH, ENV_SERVER_URL, ENV_USER_ID};
use std::env;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn check_env() -> Result<()> {
    for key in [ENV_SERVER_URL, ENV_USER_ID, ENV_AUTH] {
        if env::var(key).is_err() {
            anyhow::bail!("Missing required environment variable: {}", key);
        }
    }
    info!("All required environment variables are set");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    match dotenv() {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }
    init_tracing();
    check_env()?;

    let mut args = env::args().skip(1);
    let item_id = args
        .next()
        .context("usage: reelsync <item-id> [favorite|unfavorite|watched|unwatched]")?;
    let action = args.next();

    let ctx = Arc::new(AuthContext::from_env()?);
    let api: Arc<dyn MediaServerApi> = Arc::new(JellyfinClient::new()?);
    let mut screen = DetailScreen::new(item_id, api, ctx);

    screen.load().await;
    if let LoadState::Failed(reason) = screen.state() {
        anyhow::bail!("Failed to load item {}: {}", screen.item_id(), reason);
    }
    if let Some(detail) = screen.detail() {
        info!(
            name = %detail.name,
            year = detail.production_year,
            runtime = %detail.runtime,
            rating = %detail.official_rating,
            cast = detail.cast.len(),
            "{}",
            detail.play_label()
        );
    }

    let pending = match action.as_deref() {
        Some("favorite") if !screen.favorite() => screen.on_toggle_favorite(),
        Some("unfavorite") if screen.favorite() => screen.on_toggle_favorite(),
        Some("watched") if !screen.watched() => screen.on_toggle_watched(),
        Some("unwatched") if screen.watched() => screen.on_toggle_watched(),
        Some(other @ ("favorite" | "unfavorite" | "watched" | "unwatched")) => {
            info!("Item already {}, nothing to do", other);
            None
        }
        Some(other) => anyhow::bail!("Unknown action: {}", other),
        None => None,
    };
    if let Some(handle) = pending {
        handle.await.context("user-state write task panicked")?;
    }
    Ok(())
}
