use chrono::{DateTime, Utc};
use reelsync::detail::ItemDetail;
use reelsync::error::FetchError;
use reelsync::jellyfin::MediaServerApi;
use reelsync::screen::{DetailScreen, LoadState};
use reelsync::session::AuthContext;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    MarkPlayed(String, DateTime<Utc>),
    UnmarkPlayed(String),
    AddFavorite(String),
    RemoveFavorite(String),
}

enum Reply {
    Item(Value),
    NetworkDown,
}

struct FakeServer {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
    fail_writes: bool,
}

impl FakeServer {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
            fail_writes: false,
        })
    }

    fn failing_writes(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
            fail_writes: true,
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_writes {
            anyhow::bail!("server unavailable");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MediaServerApi for FakeServer {
    async fn fetch_item(&self, ctx: &AuthContext, item_id: &str) -> Result<ItemDetail, FetchError> {
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Item(json)) => Ok(ItemDetail::from_json(&json, ctx)),
            Some(Reply::NetworkDown) | None => {
                Err(FetchError::Network(format!("unreachable fetching {}", item_id)))
            }
        }
    }

    async fn mark_played(
        &self,
        _ctx: &AuthContext,
        item_id: &str,
        date_played: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        self.record(Call::MarkPlayed(item_id.to_string(), date_played))
    }

    async fn unmark_played(&self, _ctx: &AuthContext, item_id: &str) -> anyhow::Result<()> {
        self.record(Call::UnmarkPlayed(item_id.to_string()))
    }

    async fn add_favorite(&self, _ctx: &AuthContext, item_id: &str) -> anyhow::Result<()> {
        self.record(Call::AddFavorite(item_id.to_string()))
    }

    async fn remove_favorite(&self, _ctx: &AuthContext, item_id: &str) -> anyhow::Result<()> {
        self.record(Call::RemoveFavorite(item_id.to_string()))
    }
}

fn ctx() -> Arc<AuthContext> {
    Arc::new(AuthContext::new("http://jf.local:8096", "user-1", "MediaBrowser Token=abc"))
}

fn episode(played: bool, favorite: bool) -> Value {
    json!({
        "Id": "ep-1",
        "Name": "Pilot",
        "Type": "Episode",
        "ProductionYear": 2008,
        "RunTimeTicks": 36_000_000_000i64,
        "SeriesId": "series-1",
        "SeriesName": "Breaking Bad",
        "IndexNumber": 1,
        "ParentIndexNumber": 1,
        "People": [
            { "Name": "Vince", "Type": "Director" },
            { "Name": "Bryan", "Id": "p1", "Role": "Walter", "Type": "Actor" },
            { "Name": "Peter", "Type": "Writer" },
            { "Name": "Aaron", "Id": "p2", "Role": "Jesse", "Type": "Actor" }
        ],
        "UserData": { "Played": played, "IsFavorite": favorite, "PlaybackPositionTicks": 0 }
    })
}

fn screen_for(server: &Arc<FakeServer>) -> DetailScreen {
    DetailScreen::new("ep-1", server.clone(), ctx())
}

async fn assert_no_calls(server: &Arc<FakeServer>) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(server.calls().is_empty(), "unexpected calls: {:?}", server.calls());
}

#[tokio::test]
async fn load_installs_flags_without_remote_writes() {
    let server = FakeServer::new(vec![Reply::Item(episode(true, true))]);
    let mut screen = screen_for(&server);

    assert!(screen.load().await);
    assert_eq!(screen.state(), &LoadState::Loaded);
    assert!(screen.watched());
    assert!(screen.favorite());
    let detail = screen.detail().expect("detail loaded");
    assert_eq!(detail.name, "Pilot");
    assert_eq!(detail.runtime, "1:00");
    assert_eq!(detail.series_name.as_deref(), Some("Breaking Bad"));
    assert_no_calls(&server).await;
}

#[tokio::test]
async fn people_are_bucketed_in_input_order() {
    let server = FakeServer::new(vec![Reply::Item(episode(false, false))]);
    let mut screen = screen_for(&server);
    screen.load().await;

    let detail = screen.detail().unwrap();
    assert_eq!(detail.directors, vec!["Vince".to_string()]);
    assert_eq!(detail.writers, vec!["Peter".to_string()]);
    let cast: Vec<_> = detail.cast.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(cast, vec!["Bryan", "Aaron"]);
}

#[tokio::test]
async fn favorite_toggle_issues_one_write_per_toggle() {
    let server = FakeServer::new(vec![Reply::Item(episode(false, false))]);
    let mut screen = screen_for(&server);
    screen.load().await;

    screen.on_toggle_favorite().unwrap().await.unwrap();
    assert!(screen.favorite());
    assert_eq!(server.calls(), vec![Call::AddFavorite("ep-1".to_string())]);

    screen.on_toggle_favorite().unwrap().await.unwrap();
    assert!(!screen.favorite());
    assert_eq!(
        server.calls(),
        vec![
            Call::AddFavorite("ep-1".to_string()),
            Call::RemoveFavorite("ep-1".to_string())
        ]
    );
}

#[tokio::test]
async fn watched_toggle_stamps_time_of_toggle() {
    let server = FakeServer::new(vec![Reply::Item(episode(false, false))]);
    let mut screen = screen_for(&server);
    screen.load().await;

    let before = Utc::now();
    screen.on_toggle_watched().unwrap().await.unwrap();
    let after = Utc::now();
    screen.on_toggle_watched().unwrap().await.unwrap();

    let calls = server.calls();
    assert_eq!(calls.len(), 2);
    match &calls[0] {
        Call::MarkPlayed(id, date) => {
            assert_eq!(id, "ep-1");
            assert!(*date >= before && *date <= after);
        }
        other => panic!("expected MarkPlayed, got {:?}", other),
    }
    assert_eq!(calls[1], Call::UnmarkPlayed("ep-1".to_string()));
    assert!(!screen.watched());
}

#[tokio::test]
async fn failed_write_keeps_optimistic_flag() {
    let server = FakeServer::failing_writes(vec![Reply::Item(episode(false, false))]);
    let mut screen = screen_for(&server);
    screen.load().await;

    screen.on_toggle_favorite().unwrap().await.unwrap();
    assert!(screen.favorite());
    assert!(screen.detail().unwrap().favorite);
    assert_eq!(server.calls().len(), 1);
}

#[tokio::test]
async fn toggles_before_first_load_are_ignored() {
    let server = FakeServer::new(vec![]);
    let mut screen = screen_for(&server);

    assert!(screen.on_toggle_favorite().is_none());
    assert!(screen.on_toggle_watched().is_none());
    assert!(!screen.favorite());
    assert_no_calls(&server).await;
}

#[tokio::test]
async fn failed_fetch_without_prior_detail_leaves_empty_state() {
    let server = FakeServer::new(vec![Reply::NetworkDown]);
    let mut screen = screen_for(&server);

    screen.load().await;
    assert!(matches!(screen.state(), LoadState::Failed(_)));
    assert!(screen.detail().is_none());
}

#[tokio::test]
async fn failed_refetch_keeps_previous_detail() {
    let server = FakeServer::new(vec![Reply::Item(episode(true, false)), Reply::NetworkDown]);
    let mut screen = screen_for(&server);

    screen.load().await;
    let loaded = screen.detail().cloned().unwrap();
    screen.load().await;

    assert!(matches!(screen.state(), LoadState::Failed(_)));
    assert_eq!(screen.detail(), Some(&loaded));
    assert!(screen.watched());
}

#[tokio::test]
async fn refetch_rebuilds_lists_wholesale() {
    let mut second = episode(false, false);
    second["People"] = json!([{ "Name": "Solo", "Id": "p9", "Type": "Actor" }]);
    let server = FakeServer::new(vec![Reply::Item(episode(false, false)), Reply::Item(second)]);
    let mut screen = screen_for(&server);

    screen.load().await;
    assert_eq!(screen.detail().unwrap().cast.len(), 2);
    screen.load().await;
    let detail = screen.detail().unwrap();
    assert_eq!(detail.cast.len(), 1);
    assert!(detail.directors.is_empty());
    assert!(detail.writers.is_empty());
}

#[tokio::test]
async fn second_load_is_gated_while_loading() {
    let server = FakeServer::new(vec![]);
    let mut screen = screen_for(&server);

    let ticket = screen.begin_load().expect("first load starts");
    assert!(screen.is_loading());
    assert!(screen.begin_load().is_none());
    assert!(!screen.load().await);

    let detail = ItemDetail::from_json(&episode(false, true), &ctx());
    assert!(screen.finish_load(ticket, Ok(detail)));
    assert!(screen.favorite());
    assert_no_calls(&server).await;
}

#[tokio::test]
async fn dismissed_screen_drops_in_flight_result() {
    let server = FakeServer::new(vec![]);
    let mut screen = screen_for(&server);

    let ticket = screen.begin_load().unwrap();
    screen.dismiss();
    let detail = ItemDetail::from_json(&episode(true, true), &ctx());
    assert!(!screen.finish_load(ticket, Ok(detail)));
    assert!(screen.detail().is_none());
    assert!(!screen.watched());
    assert_eq!(screen.state(), &LoadState::Idle);
}
