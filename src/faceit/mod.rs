//! FACEIT Data API v4 client.
//!
//! Player lookup by nickname, ban lookup by player id and the paginated
//! per-game match statistics endpoint.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::calculate::account_age;
use crate::config::FaceitConfig;
use crate::fetch::paginate::{drain, PagedEndpoint};
use crate::fetch::{decode, parse_url, FetchError, FetcherConfig, HttpFetcher, JsonFetcher};
use crate::models::{BanItem, MatchRecord, PlayerId, PlayerProfile, SteamId};

// ── Response documents ──────────────────────────────────────────────────────

/// `GET /players?nickname=` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerDocument {
    pub player_id: PlayerId,
    pub nickname: String,

    #[serde(default)]
    pub avatar: String,

    #[serde(default)]
    pub friends_ids: Vec<String>,

    #[serde(default)]
    pub verified: bool,

    /// Per-game details keyed by game id (`cs2`, `csgo`, ...)
    #[serde(default)]
    pub games: HashMap<String, GameDetails>,

    /// ISO 8601 activation timestamp
    #[serde(default)]
    pub activated_at: Option<String>,

    #[serde(default)]
    pub steam_id_64: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameDetails {
    #[serde(default)]
    pub skill_level: u32,

    #[serde(default)]
    pub faceit_elo: u32,
}

impl PlayerDocument {
    /// Activation date, if present and well-formed.
    pub fn activated_on(&self) -> Option<NaiveDate> {
        let raw = self.activated_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.date_naive())
    }

    /// Linked Steam account, if FACEIT exposes one.
    pub fn steam_id(&self) -> Option<SteamId> {
        self.steam_id_64.as_deref()?.parse().ok()
    }

    /// Map the document onto a [`PlayerProfile`]. Missing game details
    /// default skill level and elo to 0.
    pub fn to_profile(
        &self,
        primary_game: &str,
        num_games: Option<usize>,
        today: NaiveDate,
    ) -> PlayerProfile {
        let game = self.games.get(primary_game).cloned().unwrap_or_default();

        PlayerProfile {
            player_id: self.player_id.clone(),
            nickname: self.nickname.clone(),
            avatar: self.avatar.clone(),
            num_friends: self.friends_ids.len(),
            is_verified: self.verified,
            skill_level: game.skill_level,
            elo: game.faceit_elo,
            num_games,
            account_age: self
                .activated_on()
                .and_then(|activated| account_age(activated, today)),
        }
    }
}

/// `GET /players/{id}/bans` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BanDocument {
    #[serde(default)]
    pub items: Vec<BanItem>,
}

// ── Client ──────────────────────────────────────────────────────────────────

/// FACEIT API client over any [`JsonFetcher`].
pub struct FaceitClient<F> {
    fetcher: F,
    base_url: String,
}

impl FaceitClient<HttpFetcher> {
    /// Build an HTTP-backed client sending `api_key` as bearer token.
    pub fn from_config(config: &FaceitConfig, api_key: String) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(FetcherConfig {
            timeout: config.timeout(),
            bearer_token: Some(api_key),
            ..Default::default()
        })?;
        Ok(Self::new(fetcher, &config.base_url))
    }
}

impl<F: JsonFetcher> FaceitClient<F> {
    pub fn new(fetcher: F, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn url(&self, path: &str) -> Result<Url, FetchError> {
        parse_url(&format!("{}/{}", self.base_url, path))
    }

    /// Player lookup by nickname.
    pub async fn player_by_nickname(&self, nickname: &str) -> Result<PlayerDocument, FetchError> {
        let mut url = self.url("players")?;
        url.query_pairs_mut().append_pair("nickname", nickname);

        info!("FACEIT: fetching player {}", nickname);
        decode("players", self.fetcher.get_json(&url).await?)
    }

    /// Ban lookup by player id.
    pub async fn bans(&self, player_id: &PlayerId) -> Result<BanDocument, FetchError> {
        let url = self.url(&format!("players/{}/bans", player_id))?;

        info!("FACEIT: fetching bans for {}", player_id);
        decode("bans", self.fetcher.get_json(&url).await?)
    }

    /// The paginated stats endpoint of one game category.
    pub fn stats_endpoint(
        &self,
        player_id: &PlayerId,
        game_id: &str,
    ) -> Result<PagedEndpoint, FetchError> {
        let url = self.url(&format!("players/{}/games/{}/stats", player_id, game_id))?;
        Ok(PagedEndpoint::new(url))
    }

    /// Every match of one game category, most recent first.
    pub async fn match_history(
        &self,
        player_id: &PlayerId,
        game_id: &str,
        page_size: u32,
    ) -> Result<Vec<MatchRecord>, FetchError> {
        let endpoint = self.stats_endpoint(player_id, game_id)?;
        info!("FACEIT: draining {} matches for {}", game_id, player_id);
        drain(&self.fetcher, &endpoint, page_size).await
    }
}
