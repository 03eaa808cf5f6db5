//! Steam profile, library and friends summaries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::SteamId;

/// Privacy state and creation date of a Steam profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteamProfileSummary {
    pub steam_id: SteamId,
    pub is_private: bool,
    pub is_private_gamedata: bool,

    /// Withheld when either privacy flag is set
    pub created_at: Option<NaiveDate>,
}

impl SteamProfileSummary {
    /// Whether dependent metrics must be withheld.
    pub fn is_gated(&self) -> bool {
        self.is_private || self.is_private_gamedata
    }
}

/// Owned-games metrics for a public Steam library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteamGameSummary {
    pub steam_id: SteamId,
    pub num_games: usize,

    /// Lifetime playtime of the target game in minutes
    pub playtime_target_mins: u64,

    /// Population standard deviation of playtime across owned games
    pub playtime_all_games_stdev: f64,

    /// Share of total playtime spent in the target game, in percent
    pub perc_target_playtime_all_games: f64,

    /// Share of the account's lifetime spent in the target game, in percent
    pub perc_target_playtime_account_age: f64,
}

/// Friend count for a Steam profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteamFriendsSummary {
    pub steam_id: SteamId,

    /// Withheld when the profile is private
    pub num_friends: Option<usize>,
}
