//! State owner for one episode detail screen.
//!
//! Holds the loaded [`ItemDetail`] and the two user flags. Loading installs
//! flags silently; only the explicit toggle handlers talk to the server.

use crate::detail::ItemDetail;
use crate::error::FetchError;
use crate::jellyfin::MediaServerApi;
use crate::session::AuthContext;
use crate::sync::UserStateSync;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Proof that a load was started for a particular generation of the screen.
#[derive(Debug)]
#[must_use]
pub struct LoadTicket {
    generation: u64,
}

pub struct DetailScreen {
    item_id: String,
    api: Arc<dyn MediaServerApi>,
    sync: UserStateSync,
    detail: ItemDetail,
    has_detail: bool,
    watched: bool,
    favorite: bool,
    state: LoadState,
    generation: u64,
}

impl DetailScreen {
    pub fn new(item_id: impl Into<String>, api: Arc<dyn MediaServerApi>, ctx: Arc<AuthContext>) -> Self {
        let sync = UserStateSync::new(api.clone(), ctx);
        Self {
            item_id: item_id.into(),
            api,
            sync,
            detail: ItemDetail::default(),
            has_detail: false,
            watched: false,
            favorite: false,
            state: LoadState::Idle,
            generation: 0,
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn detail(&self) -> Option<&ItemDetail> {
        self.has_detail.then_some(&self.detail)
    }

    pub fn watched(&self) -> bool {
        self.watched
    }

    pub fn favorite(&self) -> bool {
        self.favorite
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Returns `None` while a load is already in flight.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.is_loading() {
            return None;
        }
        self.state = LoadState::Loading;
        Some(LoadTicket {
            generation: self.generation,
        })
    }

    /// Installs a fetch result. Returns `false` when the ticket belongs to a
    /// dismissed screen and the result was dropped.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<ItemDetail, FetchError>) -> bool {
        if ticket.generation != self.generation {
            info!(item_id = %self.item_id, "Dropping stale detail load");
            return false;
        }
        match result {
            Ok(detail) => {
                self.watched = detail.watched;
                self.favorite = detail.favorite;
                self.detail = detail;
                self.has_detail = true;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                warn!(item_id = %self.item_id, "Failed to load item detail: {}", e);
                self.state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    pub async fn load(&mut self) -> bool {
        let Some(ticket) = self.begin_load() else {
            return false;
        };
        let result = self
            .api
            .fetch_item(self.sync.context(), &self.item_id)
            .await;
        self.finish_load(ticket, result)
    }

    /// Flips the watched flag and schedules the matching write. Nothing
    /// happens before the first successful load.
    pub fn on_toggle_watched(&mut self) -> Option<JoinHandle<()>> {
        if !self.has_detail {
            return None;
        }
        self.watched = !self.watched;
        self.detail.watched = self.watched;
        Some(self.sync.set_watched(&self.item_id, self.watched))
    }

    pub fn on_toggle_favorite(&mut self) -> Option<JoinHandle<()>> {
        if !self.has_detail {
            return None;
        }
        self.favorite = !self.favorite;
        self.detail.favorite = self.favorite;
        Some(self.sync.set_favorite(&self.item_id, self.favorite))
    }

    /// Invalidates outstanding load tickets. In-flight writes still run.
    pub fn dismiss(&mut self) {
        self.generation += 1;
        if self.is_loading() {
            self.state = LoadState::Idle;
        }
    }
}
