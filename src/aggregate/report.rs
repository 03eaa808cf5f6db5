use serde::Serialize;

use super::{FaceitPlayerStats, SteamPlayerStats};
use crate::models::{
    PlayerBanRecord, PlayerMatchSummary, PlayerProfile, SteamFriendsSummary, SteamGameSummary,
    SteamProfileSummary,
};

/// Serializable snapshot of a FACEIT load.
///
/// Parts that could not be produced are left out and their error message
/// recorded in `errors`.
#[derive(Debug, Clone, Serialize)]
pub struct FaceitReport {
    pub profile: PlayerProfile,
    pub bans: Option<PlayerBanRecord>,
    pub summaries: Vec<PlayerMatchSummary>,
    pub errors: Vec<String>,
}

impl FaceitReport {
    pub fn from_stats(stats: &FaceitPlayerStats) -> Self {
        let mut errors = Vec::new();
        if let Some(failure) = stats.failure() {
            errors.push(failure.to_string());
        }

        let bans = stats.bans().ok().cloned();

        let mut summaries = Vec::new();
        if stats.history().is_ok() {
            for window in stats.windows() {
                match stats.summary(window) {
                    Ok(summary) => summaries.push(summary),
                    Err(e) => errors.push(format!("{}: {}", window, e)),
                }
            }
        }

        Self {
            profile: stats.profile().clone(),
            bans,
            summaries,
            errors,
        }
    }
}

/// Serializable snapshot of a Steam load.
#[derive(Debug, Clone, Serialize)]
pub struct SteamReport {
    pub persona_name: String,
    pub profile: SteamProfileSummary,
    pub games: Option<SteamGameSummary>,
    pub friends: Option<SteamFriendsSummary>,
    pub errors: Vec<String>,
}

impl SteamReport {
    pub fn from_stats(stats: &SteamPlayerStats) -> Self {
        let mut errors = Vec::new();
        if let Some(failure) = stats.failure() {
            errors.push(failure.to_string());
        }

        Self {
            persona_name: stats.persona_name().to_string(),
            profile: stats.profile_summary().clone(),
            games: stats.game_summary().cloned(),
            friends: stats.friends_summary().ok(),
            errors,
        }
    }
}

/// Combined FACEIT and Steam report for one player.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faceit: Option<FaceitReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub steam: Option<SteamReport>,

    /// Lookups that failed outright
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{FaceitAggregator, SteamAggregator};
    use crate::config::{FaceitConfig, SteamConfig, WindowConfig};
    use crate::faceit::FaceitClient;
    use crate::fetch::MockFetcher;
    use crate::models::SteamId;
    use crate::steam::SteamClient;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const FACEIT: &str = "https://open.faceit.com/data/v4";
    const STEAM: &str = "https://api.steampowered.com";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn faceit_aggregator(fetcher: MockFetcher) -> FaceitAggregator<MockFetcher> {
        let config = FaceitConfig {
            games: vec!["cs2".to_string()],
            ..Default::default()
        };
        FaceitAggregator::with_client(
            FaceitClient::new(fetcher, FACEIT),
            &config,
            &WindowConfig::default(),
        )
    }

    fn faceit_fetcher() -> MockFetcher {
        let stats = format!("{}/players/p-1/games/cs2/stats", FACEIT);
        MockFetcher::new()
            .with_json(
                format!("{}/players?nickname=nadysen", FACEIT),
                json!({"player_id": "p-1", "nickname": "nadysen"}),
            )
            .with_json(format!("{}/players/p-1/bans", FACEIT), json!({"items": []}))
            .with_json(
                format!("{}?offset=0&limit=100", stats),
                json!({"items": [{"stats": {"Kills": "21", "Score": "16 / 9", "Result": "1"}}]}),
            )
            .with_json(format!("{}?offset=100&limit=100", stats), json!({"items": []}))
    }

    #[tokio::test]
    async fn test_faceit_report_has_every_window() {
        let stats = faceit_aggregator(faceit_fetcher())
            .load_at("nadysen", today())
            .await
            .unwrap();
        let report = FaceitReport::from_stats(&stats);

        let windows: Vec<&str> = report.summaries.iter().map(|s| s.window.as_str()).collect();
        assert_eq!(windows, vec!["all_time", "last_20", "first_10"]);
        assert!(report.summaries.iter().all(|s| s.matches == 1));
        assert!(report.errors.is_empty());
        assert!(!report.bans.unwrap().is_banned);
    }

    #[tokio::test]
    async fn test_faceit_report_records_failure() {
        let fetcher = MockFetcher::new()
            .with_json(
                format!("{}/players?nickname=nadysen", FACEIT),
                json!({"player_id": "p-1", "nickname": "nadysen"}),
            )
            .with_status(format!("{}/players/p-1/bans", FACEIT), 500);
        let stats = faceit_aggregator(fetcher)
            .load_at("nadysen", today())
            .await
            .unwrap();
        let report = FaceitReport::from_stats(&stats);

        assert!(report.bans.is_none());
        assert!(report.summaries.is_empty());
        assert_eq!(report.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_steam_report_serializes_flat_summaries() {
        let id = 7656u64;
        let fetcher = MockFetcher::new()
            .with_json(
                format!("{}/ISteamUser/GetPlayerSummaries/v2/?key=KEY&steamids={}", STEAM, id),
                json!({"response": {"players": [{"steamid": "7656", "communityvisibilitystate": 1}]}}),
            )
            .with_json(
                format!(
                    "{}/IPlayerService/GetOwnedGames/v1/?key=KEY&steamid={}&include_appinfo=true&include_played_free_games=true",
                    STEAM, id
                ),
                json!({"response": {}}),
            );
        let aggregator = SteamAggregator::with_client(
            SteamClient::new(fetcher, STEAM, "KEY".to_string()),
            &SteamConfig::default(),
        );
        let stats = aggregator.load_at(SteamId::new(id), today()).await.unwrap();

        let report = PlayerReport {
            steam: Some(SteamReport::from_stats(&stats)),
            ..Default::default()
        };
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["steam"]["profile"]["is_private"], json!(true));
        assert_eq!(value["steam"]["games"], json!(null));
        assert_eq!(value["steam"]["friends"]["num_friends"], json!(null));
        assert!(value.get("faceit").is_none());
        assert!(value.get("errors").is_none());
    }
}
