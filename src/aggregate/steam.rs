use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::AggregateError;
use crate::calculate::games::{derive_friends, derive_games, derive_profile};
use crate::config::{AppConfig, SteamConfig};
use crate::fetch::{FetcherConfig, HttpFetcher, JsonFetcher};
use crate::models::{SteamFriendsSummary, SteamGameSummary, SteamId, SteamProfileSummary};
use crate::steam::{FriendListDocument, SteamClient};

/// Loads Steam data for players.
pub struct SteamAggregator<F> {
    client: SteamClient<F>,
    target_app_id: u32,
}

impl SteamAggregator<HttpFetcher> {
    /// Build from configuration. Fails fast when the API key is missing.
    pub fn from_config(config: &AppConfig) -> Result<Self, AggregateError> {
        config.validate()?;
        let api_key = config.steam.resolve_api_key()?;
        let fetcher = HttpFetcher::new(FetcherConfig {
            timeout: config.steam.timeout(),
            ..Default::default()
        })?;
        let client = SteamClient::from_config(fetcher, &config.steam, api_key);
        Ok(Self::with_client(client, &config.steam))
    }
}

impl<F: JsonFetcher> SteamAggregator<F> {
    pub fn with_client(client: SteamClient<F>, config: &SteamConfig) -> Self {
        Self {
            client,
            target_app_id: config.target_app_id,
        }
    }

    pub async fn load(&self, steam_id: SteamId) -> Result<SteamPlayerStats, AggregateError> {
        self.load_at(steam_id, Utc::now().date_naive()).await
    }

    /// Load everything for `steam_id`, measuring account lifetime up to
    /// `today`.
    ///
    /// The friend list is only requested when the privacy gate is open;
    /// Steam refuses it for private profiles anyway.
    pub async fn load_at(
        &self,
        steam_id: SteamId,
        today: NaiveDate,
    ) -> Result<SteamPlayerStats, AggregateError> {
        let summaries = self.client.player_summaries(steam_id).await?;
        let wanted = steam_id.to_string();
        let player = summaries
            .response
            .players
            .into_iter()
            .find(|p| p.steamid == wanted)
            .ok_or_else(|| AggregateError::NotFound(format!("Steam profile {}", steam_id)))?;

        let games = self.client.owned_games(steam_id).await?;
        let mut failure = None;
        let profile = match derive_profile(steam_id, &player, &games) {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Steam: profile {} unusable: {}", steam_id, e);
                failure = Some(AggregateError::from(e));
                SteamProfileSummary {
                    steam_id,
                    is_private: !player.is_public(),
                    is_private_gamedata: games.response.is_empty(),
                    created_at: None,
                }
            }
        };

        let friends = if failure.is_some() {
            None
        } else if profile.is_gated() {
            info!("Steam: profile {} is private, withholding metrics", steam_id);
            None
        } else {
            match self.client.friend_list(steam_id).await {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!("Steam: friend list failed for {}: {}", steam_id, e);
                    failure = Some(AggregateError::from(e));
                    None
                }
            }
        };

        let game_summary = derive_games(&games, &profile, self.target_app_id, today);

        Ok(SteamPlayerStats {
            persona_name: player.personaname,
            profile,
            games: game_summary,
            friends,
            failure,
        })
    }
}

/// Everything retrieved for one Steam account.
#[derive(Debug)]
pub struct SteamPlayerStats {
    persona_name: String,
    profile: SteamProfileSummary,
    games: Option<SteamGameSummary>,
    friends: Option<FriendListDocument>,
    failure: Option<AggregateError>,
}

impl SteamPlayerStats {
    pub fn persona_name(&self) -> &str {
        &self.persona_name
    }

    pub fn profile_summary(&self) -> &SteamProfileSummary {
        &self.profile
    }

    /// Library metrics; `None` behind the privacy gate.
    pub fn game_summary(&self) -> Option<&SteamGameSummary> {
        self.games.as_ref()
    }

    pub fn friends_summary(&self) -> Result<SteamFriendsSummary, AggregateError> {
        if !self.profile.is_gated() && self.friends.is_none() {
            return Err(AggregateError::Unavailable("Friend list"));
        }
        Ok(derive_friends(self.friends.as_ref(), &self.profile))
    }

    pub fn failure(&self) -> Option<&AggregateError> {
        self.failure.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::games::GameStatsError;
    use crate::fetch::{FetchError, MockFetcher};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    const BASE: &str = "https://api.steampowered.com";
    const ID: u64 = 76561198067301616;

    fn summary_url() -> String {
        format!(
            "{}/ISteamUser/GetPlayerSummaries/v2/?key=KEY&steamids={}",
            BASE, ID
        )
    }

    fn games_url() -> String {
        format!(
            "{}/IPlayerService/GetOwnedGames/v1/?key=KEY&steamid={}&include_appinfo=true&include_played_free_games=true",
            BASE, ID
        )
    }

    fn friends_url() -> String {
        format!(
            "{}/ISteamUser/GetFriendList/v1/?key=KEY&steamid={}&relationship=friend",
            BASE, ID
        )
    }

    fn summary(visibility: u8) -> Value {
        json!({"response": {"players": [{
            "steamid": ID.to_string(),
            "communityvisibilitystate": visibility,
            "personaname": "nadysen",
            "timecreated": 1_704_067_200
        }]}})
    }

    fn library() -> Value {
        json!({"response": {"game_count": 2, "games": [
            {"appid": 730, "playtime_forever": 1440},
            {"appid": 440, "playtime_forever": 1440}
        ]}})
    }

    fn friends() -> Value {
        json!({"friendslist": {"friends": [{"steamid": "1"}, {"steamid": "2"}]}})
    }

    fn aggregator(fetcher: MockFetcher) -> SteamAggregator<MockFetcher> {
        SteamAggregator::with_client(
            SteamClient::new(fetcher, BASE, "KEY".to_string()),
            &SteamConfig::default(),
        )
    }

    fn today() -> NaiveDate {
        // 10 days after 2024-01-01 (timecreated above)
        NaiveDate::from_ymd_opt(2024, 1, 11).unwrap()
    }

    #[tokio::test]
    async fn test_public_profile() {
        let fetcher = MockFetcher::new()
            .with_json(summary_url(), summary(3))
            .with_json(games_url(), library())
            .with_json(friends_url(), friends());
        let stats = aggregator(fetcher)
            .load_at(SteamId::new(ID), today())
            .await
            .unwrap();

        let profile = stats.profile_summary();
        assert!(!profile.is_private);
        assert_eq!(
            profile.created_at,
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );

        let games = stats.game_summary().unwrap();
        assert_eq!(games.num_games, 2);
        assert_eq!(games.playtime_target_mins, 1440);
        assert_eq!(games.perc_target_playtime_all_games, 50.0);
        assert_eq!(games.perc_target_playtime_account_age, 10.0);
        assert_eq!(games.playtime_all_games_stdev, 0.0);

        assert_eq!(stats.friends_summary().unwrap().num_friends, Some(2));
        assert_eq!(stats.persona_name(), "nadysen");
        assert!(stats.failure().is_none());
    }

    #[tokio::test]
    async fn test_private_profile_withholds_metrics() {
        let fetcher = MockFetcher::new()
            .with_json(summary_url(), summary(1))
            .with_json(games_url(), library());
        let agg = aggregator(fetcher);
        let stats = agg.load_at(SteamId::new(ID), today()).await.unwrap();

        assert!(stats.profile_summary().is_private);
        assert!(stats.profile_summary().created_at.is_none());
        assert!(stats.game_summary().is_none());
        assert_eq!(stats.friends_summary().unwrap().num_friends, None);
        // Friend list never requested.
        assert_eq!(agg.client.fetcher().requests().len(), 2);
    }

    #[tokio::test]
    async fn test_hidden_library() {
        let fetcher = MockFetcher::new()
            .with_json(summary_url(), summary(3))
            .with_json(games_url(), json!({"response": {}}));
        let stats = aggregator(fetcher)
            .load_at(SteamId::new(ID), today())
            .await
            .unwrap();

        assert!(!stats.profile_summary().is_private);
        assert!(stats.profile_summary().is_private_gamedata);
        assert!(stats.game_summary().is_none());
    }

    #[tokio::test]
    async fn test_unknown_profile_is_not_found() {
        let fetcher =
            MockFetcher::new().with_json(summary_url(), json!({"response": {"players": []}}));
        let agg = aggregator(fetcher);
        let err = agg.load_at(SteamId::new(ID), today()).await.unwrap_err();

        assert!(matches!(err, AggregateError::NotFound(_)));
        assert_eq!(agg.client.fetcher().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_friend_failure_keeps_game_metrics() {
        let fetcher = MockFetcher::new()
            .with_json(summary_url(), summary(3))
            .with_json(games_url(), library())
            .with_status(friends_url(), 500);
        let stats = aggregator(fetcher)
            .load_at(SteamId::new(ID), today())
            .await
            .unwrap();

        assert!(stats.game_summary().is_some());
        assert!(matches!(
            stats.friends_summary(),
            Err(AggregateError::Unavailable(_))
        ));
        assert!(matches!(
            stats.failure(),
            Some(AggregateError::Fetch(FetchError::HttpStatus { status: 500, .. }))
        ));
    }

    #[tokio::test]
    async fn test_missing_creation_time_keeps_privacy_flags() {
        let fetcher = MockFetcher::new()
            .with_json(
                summary_url(),
                json!({"response": {"players": [{
                    "steamid": ID.to_string(),
                    "communityvisibilitystate": 3
                }]}}),
            )
            .with_json(games_url(), library());
        let agg = aggregator(fetcher);
        let stats = agg.load_at(SteamId::new(ID), today()).await.unwrap();

        let profile = stats.profile_summary();
        assert!(!profile.is_private);
        assert!(!profile.is_private_gamedata);
        assert!(profile.created_at.is_none());
        assert!(stats.game_summary().is_none());
        assert!(matches!(
            stats.failure(),
            Some(AggregateError::Games(GameStatsError::MissingCreationTime(_)))
        ));
        assert!(matches!(
            stats.friends_summary(),
            Err(AggregateError::Unavailable(_))
        ));
        // No friend lookup after the failure.
        assert_eq!(agg.client.fetcher().requests().len(), 2);
    }

    #[test]
    fn test_from_config_requires_credential() {
        let mut config = AppConfig::default();
        config.steam.api_key_env = "PLAYER_SCOUT_TEST_NEVER_SET".to_string();

        assert!(matches!(
            SteamAggregator::from_config(&config),
            Err(AggregateError::Config(_))
        ));
    }
}
