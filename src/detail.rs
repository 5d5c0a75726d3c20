use crate::session::AuthContext;
use crate::ticks;
use crate::utils::{
    array_at, bool_at, f64_at, first_str_at, i64_at, nested_str, opt_i64_at, opt_str_at, str_at,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder shown when the server has no blur hash for an image.
pub const DEFAULT_BLUR_HASH: &str = "W$H.4}D%bdo#a#xbtpxVW?W?jXWsXVt7Rjf5axWqxbWXnhada{s-";

const OFFICIAL_RATING_FALLBACK: &str = "PG-13";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub image_tag: String,
    pub image_blur_hash: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
}

/// Flattened view of one playable item, ready for presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub id: String,
    pub name: String,
    pub item_type: String,
    pub production_year: i64,
    pub overview: String,
    pub tagline: String,
    pub official_rating: String,
    pub community_rating: f64,
    pub critic_rating: i64,
    pub runtime_ticks: i64,
    pub progress_ticks: i64,
    pub runtime: String,
    pub remaining: Option<String>,
    pub watched: bool,
    pub favorite: bool,
    pub parent_id: String,
    pub parent_backdrop_item_id: String,
    pub series_id: Option<String>,
    pub season_id: Option<String>,
    pub series_name: Option<String>,
    pub index_number: Option<i64>,
    pub parent_index_number: Option<i64>,
    pub poster: String,
    pub poster_blur_hash: String,
    pub backdrop: String,
    pub backdrop_blur_hash: String,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub studios: Vec<String>,
    pub cast: Vec<CastMember>,
    pub genres: Vec<Genre>,
}

impl ItemDetail {
    /// Maps a `/Users/{user}/Items/{id}` document. Never fails: anything
    /// missing or mistyped takes its default.
    pub fn from_json(json: &Value, ctx: &AuthContext) -> Self {
        let user_data = json.get("UserData").unwrap_or(&Value::Null);

        let poster = str_at(json, "SeriesPrimaryImageTag");
        let poster_blur_hash = nested_str(json, "ImageBlurHashes", "Primary", &poster);
        let backdrop = first_str_at(json, "ParentBackdropImageTags");
        let backdrop_blur_hash = nested_str(json, "ImageBlurHashes", "Backdrop", &backdrop);

        let runtime_ticks = i64_at(json, "RunTimeTicks").max(0);
        let progress_ticks = i64_at(user_data, "PlaybackPositionTicks").max(0);

        let mut directors = Vec::new();
        let mut writers = Vec::new();
        let mut cast = Vec::new();
        for person in array_at(json, "People") {
            match person.get("Type").and_then(Value::as_str) {
                Some("Director") => directors.push(str_at(person, "Name")),
                Some("Writer") => writers.push(str_at(person, "Name")),
                Some("Actor") => cast.push(cast_member(person, ctx)),
                _ => {}
            }
        }

        let studios = array_at(json, "Studios")
            .iter()
            .map(|s| str_at(s, "Name"))
            .collect();
        let genres = array_at(json, "GenreItems")
            .iter()
            .map(|g| Genre {
                id: str_at(g, "Id"),
                name: str_at(g, "Name"),
            })
            .collect();

        Self {
            id: str_at(json, "Id"),
            name: str_at(json, "Name"),
            item_type: str_at(json, "Type"),
            production_year: i64_at(json, "ProductionYear"),
            overview: str_at(json, "Overview"),
            tagline: first_str_at(json, "Taglines"),
            official_rating: opt_str_at(json, "OfficialRating")
                .unwrap_or_else(|| OFFICIAL_RATING_FALLBACK.to_string()),
            community_rating: f64_at(json, "CommunityRating"),
            critic_rating: i64_at(json, "CriticRating"),
            runtime_ticks,
            progress_ticks,
            runtime: ticks::runtime_string(runtime_ticks),
            remaining: ticks::remaining_string(runtime_ticks, progress_ticks),
            watched: bool_at(user_data, "Played"),
            favorite: bool_at(user_data, "IsFavorite"),
            parent_id: str_at(json, "ParentId"),
            parent_backdrop_item_id: str_at(json, "ParentBackdropItemId"),
            series_id: opt_str_at(json, "SeriesId"),
            season_id: opt_str_at(json, "SeasonId"),
            series_name: opt_str_at(json, "SeriesName"),
            index_number: opt_i64_at(json, "IndexNumber"),
            parent_index_number: opt_i64_at(json, "ParentIndexNumber"),
            poster,
            poster_blur_hash,
            backdrop,
            backdrop_blur_hash,
            directors,
            writers,
            studios,
            cast,
            genres,
        }
    }

    pub fn poster_placeholder(&self) -> &str {
        or_default_hash(&self.poster_blur_hash)
    }

    pub fn backdrop_placeholder(&self) -> &str {
        or_default_hash(&self.backdrop_blur_hash)
    }

    pub fn poster_url(&self, ctx: &AuthContext) -> String {
        format!(
            "{}/Items/{}/Images/Primary?fillWidth=300&fillHeight=450&quality=90&tag={}",
            ctx.base_uri,
            self.series_id.as_deref().unwrap_or_default(),
            self.poster
        )
    }

    pub fn backdrop_url(&self, ctx: &AuthContext) -> String {
        format!(
            "{}/Items/{}/Images/Backdrop?maxWidth=1000&quality=90&tag={}",
            ctx.base_uri, self.parent_backdrop_item_id, self.backdrop
        )
    }

    /// Label for the play button: resumes show the time left.
    pub fn play_label(&self) -> String {
        match &self.remaining {
            Some(left) if self.progress_ticks != 0 => format!("{left} left"),
            _ => "Play".to_string(),
        }
    }
}

impl CastMember {
    pub fn placeholder(&self) -> &str {
        or_default_hash(&self.image_blur_hash)
    }
}

fn cast_member(person: &Value, ctx: &AuthContext) -> CastMember {
    let id = str_at(person, "Id");
    let image_tag = str_at(person, "PrimaryImageTag");
    let image_blur_hash = nested_str(person, "ImageBlurHashes", "Primary", &image_tag);
    let image_url = format!(
        "{}/Items/{}/Images/Primary?fillHeight=744&fillWidth=496&quality=96&tag={}",
        ctx.base_uri, id, image_tag
    );
    CastMember {
        name: str_at(person, "Name"),
        role: opt_str_at(person, "Role").filter(|r| !r.is_empty()),
        id,
        image_tag,
        image_blur_hash,
        image_url,
    }
}

fn or_default_hash(hash: &str) -> &str {
    if hash.is_empty() {
        DEFAULT_BLUR_HASH
    } else {
        hash
    }
}
