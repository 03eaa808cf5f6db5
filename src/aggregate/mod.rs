//! Per-player orchestration of lookups and reductions.
//!
//! FACEIT: profile -> bans -> one match drain per game category ->
//! concatenation -> window reductions. Steam: summary -> owned games ->
//! privacy gate -> friends -> gated metrics.
//!
//! Calls are issued one at a time and never retried. A failed profile
//! lookup aborts; a failure further down stops the remaining calls but keeps
//! what was already retrieved.

mod report;
mod steam;

pub use report::*;
pub use steam::*;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::calculate::games::GameStatsError;
use crate::calculate::window::select;
use crate::calculate::{reduce, StatsError};
use crate::config::{AppConfig, ConfigError, FaceitConfig, WindowConfig};
use crate::faceit::{FaceitClient, PlayerDocument};
use crate::fetch::{FetchError, HttpFetcher, JsonFetcher};
use crate::models::{
    MatchRecord, PlayerBanRecord, PlayerId, PlayerMatchSummary, PlayerProfile, StatisticsWindow,
    SteamId,
};
use crate::{validate_nickname, NicknameError};

/// Errors surfaced by the aggregation facade.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    InvalidNickname(#[from] NicknameError),

    #[error("{0} was not found. Please ensure the name entered is correct.")]
    NotFound(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to compute match statistics: {0}")]
    Stats(#[from] StatsError),

    #[error("Failed to compute Steam statistics: {0}")]
    Games(#[from] GameStatsError),

    #[error("{0} unavailable because an earlier lookup failed")]
    Unavailable(&'static str),
}

/// Loads FACEIT data for players.
pub struct FaceitAggregator<F> {
    client: FaceitClient<F>,
    games: Vec<String>,
    primary_game: String,
    page_size: u32,
    windows: WindowConfig,
}

impl FaceitAggregator<HttpFetcher> {
    /// Build from configuration. Fails fast when the API key is missing.
    pub fn from_config(config: &AppConfig) -> Result<Self, AggregateError> {
        config.validate()?;
        let api_key = config.faceit.resolve_api_key()?;
        let client = FaceitClient::from_config(&config.faceit, api_key)?;
        Ok(Self::with_client(client, &config.faceit, &config.windows))
    }
}

impl<F: JsonFetcher> FaceitAggregator<F> {
    pub fn with_client(
        client: FaceitClient<F>,
        config: &FaceitConfig,
        windows: &WindowConfig,
    ) -> Self {
        Self {
            client,
            games: config.games.clone(),
            primary_game: config.primary_game().to_string(),
            page_size: config.page_size,
            windows: windows.clone(),
        }
    }

    /// Load everything for `nickname` as of today.
    pub async fn load(&self, nickname: &str) -> Result<FaceitPlayerStats, AggregateError> {
        self.load_at(nickname, Utc::now().date_naive()).await
    }

    /// Load everything for `nickname`, measuring account age up to `today`.
    pub async fn load_at(
        &self,
        nickname: &str,
        today: NaiveDate,
    ) -> Result<FaceitPlayerStats, AggregateError> {
        validate_nickname(nickname)?;

        let player = match self.client.player_by_nickname(nickname).await {
            Ok(player) => player,
            Err(e) if e.is_not_found() => {
                return Err(AggregateError::NotFound(format!("Player {}", nickname)))
            }
            Err(e) => return Err(e.into()),
        };

        let mut failure = None;

        let bans = match self.client.bans(&player.player_id).await {
            Ok(doc) => Some(PlayerBanRecord::from_items(player.player_id.clone(), doc.items)),
            Err(e) => {
                warn!("FACEIT: ban lookup failed for {}: {}", player.player_id, e);
                failure = Some(AggregateError::from(e));
                None
            }
        };

        let history = if failure.is_none() {
            match self.drain_history(&player.player_id).await {
                Ok(records) => Some(records),
                Err(e) => {
                    warn!("FACEIT: match history failed for {}: {}", player.player_id, e);
                    failure = Some(AggregateError::from(e));
                    None
                }
            }
        } else {
            None
        };

        let profile = player.to_profile(
            &self.primary_game,
            history.as_ref().map(Vec::len),
            today,
        );

        info!(
            "FACEIT: loaded {} ({} matches)",
            profile.nickname,
            profile.num_games.unwrap_or(0)
        );

        Ok(FaceitPlayerStats {
            player,
            profile,
            bans,
            history,
            windows: self.windows.clone(),
            failure,
        })
    }

    /// Concatenate each category's history in configured order.
    async fn drain_history(&self, player_id: &PlayerId) -> Result<Vec<MatchRecord>, FetchError> {
        let mut history = Vec::new();
        for game in &self.games {
            let records = self
                .client
                .match_history(player_id, game, self.page_size)
                .await?;
            history.extend(records);
        }
        Ok(history)
    }
}

/// Everything retrieved for one FACEIT player.
#[derive(Debug)]
pub struct FaceitPlayerStats {
    player: PlayerDocument,
    profile: PlayerProfile,
    bans: Option<PlayerBanRecord>,
    history: Option<Vec<MatchRecord>>,
    windows: WindowConfig,
    failure: Option<AggregateError>,
}

impl FaceitPlayerStats {
    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    pub fn player_id(&self) -> &PlayerId {
        &self.profile.player_id
    }

    /// Steam account linked on FACEIT, if any.
    pub fn linked_steam_id(&self) -> Option<SteamId> {
        self.player.steam_id()
    }

    pub fn bans(&self) -> Result<&PlayerBanRecord, AggregateError> {
        self.bans.as_ref().ok_or(AggregateError::Unavailable("Ban record"))
    }

    /// Full match history, current game category first.
    pub fn history(&self) -> Result<&[MatchRecord], AggregateError> {
        self.history
            .as_deref()
            .ok_or(AggregateError::Unavailable("Match history"))
    }

    /// The error that stopped loading early, if any.
    pub fn failure(&self) -> Option<&AggregateError> {
        self.failure.as_ref()
    }

    /// Reduce one window of the history.
    pub fn summary(&self, window: StatisticsWindow) -> Result<PlayerMatchSummary, AggregateError> {
        let history = self.history()?;
        let selected = select(history, window);
        let stats = reduce(&selected)?;
        Ok(PlayerMatchSummary::new(
            self.player_id().clone(),
            window,
            selected.len(),
            stats,
        ))
    }

    pub fn all_time(&self) -> Result<PlayerMatchSummary, AggregateError> {
        self.summary(StatisticsWindow::All)
    }

    pub fn recent(&self) -> Result<PlayerMatchSummary, AggregateError> {
        self.summary(StatisticsWindow::LastN(self.windows.recent_matches))
    }

    pub fn earliest(&self) -> Result<PlayerMatchSummary, AggregateError> {
        self.summary(StatisticsWindow::FirstN(self.windows.earliest_matches))
    }

    /// The configured windows: all time, recent, earliest.
    pub fn windows(&self) -> [StatisticsWindow; 3] {
        [
            StatisticsWindow::All,
            StatisticsWindow::LastN(self.windows.recent_matches),
            StatisticsWindow::FirstN(self.windows.earliest_matches),
        ]
    }
}
