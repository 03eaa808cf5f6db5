//! Steam Web API client.
//!
//! Three read-only lookups keyed by a SteamID64: player summary, owned
//! games and friend list. The API key travels in the query string.

use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::config::SteamConfig;
use crate::fetch::{decode, parse_url, FetchError, JsonFetcher};
use crate::models::SteamId;

/// `communityvisibilitystate` value of a public profile.
pub const PUBLIC_VISIBILITY: u8 = 3;

// ── Response documents ──────────────────────────────────────────────────────

/// `ISteamUser/GetPlayerSummaries/v2` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSummariesDocument {
    pub response: PlayerSummariesPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerSummariesPayload {
    #[serde(default)]
    pub players: Vec<SteamPlayer>,
}

/// One player entry of a summaries response.
#[derive(Debug, Clone, Deserialize)]
pub struct SteamPlayer {
    pub steamid: String,

    /// 1 = private, 3 = public; absent counts as private
    #[serde(default)]
    pub communityvisibilitystate: u8,

    #[serde(default)]
    pub personaname: String,

    /// Account creation time in epoch seconds (only visible when public)
    #[serde(default)]
    pub timecreated: Option<i64>,

    #[serde(default)]
    pub avatarfull: Option<String>,
}

impl SteamPlayer {
    pub fn is_public(&self) -> bool {
        self.communityvisibilitystate == PUBLIC_VISIBILITY
    }
}

/// `IPlayerService/GetOwnedGames/v1` response.
///
/// Steam answers `{"response": {}}` when the library is hidden.
#[derive(Debug, Clone, Deserialize)]
pub struct OwnedGamesDocument {
    pub response: OwnedGamesPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnedGamesPayload {
    #[serde(default)]
    pub game_count: Option<usize>,

    #[serde(default)]
    pub games: Vec<OwnedGame>,
}

impl OwnedGamesPayload {
    /// True for the empty `response` object of a hidden library.
    pub fn is_empty(&self) -> bool {
        self.game_count.is_none() && self.games.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnedGame {
    pub appid: u32,

    #[serde(default)]
    pub name: Option<String>,

    /// Lifetime playtime in minutes
    #[serde(default)]
    pub playtime_forever: u64,
}

/// `ISteamUser/GetFriendList/v1` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FriendListDocument {
    #[serde(default)]
    pub friendslist: Option<FriendList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FriendList {
    #[serde(default)]
    pub friends: Vec<Friend>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Friend {
    pub steamid: String,

    #[serde(default)]
    pub relationship: Option<String>,

    #[serde(default)]
    pub friend_since: Option<i64>,
}

impl FriendListDocument {
    pub fn friend_count(&self) -> usize {
        self.friendslist.as_ref().map_or(0, |list| list.friends.len())
    }
}

// ── Client ──────────────────────────────────────────────────────────────────

/// Steam Web API client over any [`JsonFetcher`].
pub struct SteamClient<F> {
    fetcher: F,
    base_url: String,
    api_key: String,
}

impl<F: JsonFetcher> SteamClient<F> {
    pub fn new(fetcher: F, base_url: &str, api_key: String) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(fetcher: F, config: &SteamConfig, api_key: String) -> Self {
        Self::new(fetcher, &config.base_url, api_key)
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, FetchError> {
        let mut url = parse_url(&format!("{}/{}", self.base_url, path))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("key", &self.api_key);
            for (name, value) in params {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }

    /// Player summary lookup.
    pub async fn player_summaries(
        &self,
        steam_id: SteamId,
    ) -> Result<PlayerSummariesDocument, FetchError> {
        let url = self.endpoint(
            "ISteamUser/GetPlayerSummaries/v2/",
            &[("steamids", steam_id.to_string())],
        )?;
        info!("Steam: fetching summary for {}", steam_id);
        decode("GetPlayerSummaries", self.fetcher.get_json(&url).await?)
    }

    /// Owned games lookup, free-to-play titles included.
    pub async fn owned_games(&self, steam_id: SteamId) -> Result<OwnedGamesDocument, FetchError> {
        let url = self.endpoint(
            "IPlayerService/GetOwnedGames/v1/",
            &[
                ("steamid", steam_id.to_string()),
                ("include_appinfo", "true".to_string()),
                ("include_played_free_games", "true".to_string()),
            ],
        )?;
        info!("Steam: fetching owned games for {}", steam_id);
        decode("GetOwnedGames", self.fetcher.get_json(&url).await?)
    }

    /// Friend list lookup.
    pub async fn friend_list(&self, steam_id: SteamId) -> Result<FriendListDocument, FetchError> {
        let url = self.endpoint(
            "ISteamUser/GetFriendList/v1/",
            &[
                ("steamid", steam_id.to_string()),
                ("relationship", "friend".to_string()),
            ],
        )?;
        info!("Steam: fetching friend list for {}", steam_id);
        decode("GetFriendList", self.fetcher.get_json(&url).await?)
    }
}
