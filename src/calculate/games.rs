//! Steam profile and library metrics.
//!
//! Everything here sits behind the privacy gate: a private profile or a
//! hidden library records both flags and withholds every dependent metric.

use chrono::{DateTime, NaiveDate};
use thiserror::Error;

use super::round2;
use crate::models::{SteamFriendsSummary, SteamGameSummary, SteamId, SteamProfileSummary};
use crate::steam::{FriendListDocument, OwnedGamesDocument, SteamPlayer};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Errors raised while deriving Steam metrics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameStatsError {
    #[error("Public profile {0} has no creation time")]
    MissingCreationTime(SteamId),

    #[error("Creation time {0} is out of range")]
    InvalidTimestamp(i64),
}

/// Convert epoch seconds into a UTC calendar date.
pub fn unix_to_date(seconds: i64) -> Result<NaiveDate, GameStatsError> {
    DateTime::from_timestamp(seconds, 0)
        .map(|dt| dt.date_naive())
        .ok_or(GameStatsError::InvalidTimestamp(seconds))
}

/// Privacy flags and creation date.
pub fn derive_profile(
    steam_id: SteamId,
    player: &SteamPlayer,
    games: &OwnedGamesDocument,
) -> Result<SteamProfileSummary, GameStatsError> {
    let is_private = !player.is_public();
    let is_private_gamedata = games.response.is_empty();

    if is_private || is_private_gamedata {
        return Ok(SteamProfileSummary {
            steam_id,
            is_private,
            is_private_gamedata,
            created_at: None,
        });
    }

    let created = player
        .timecreated
        .ok_or(GameStatsError::MissingCreationTime(steam_id))?;

    Ok(SteamProfileSummary {
        steam_id,
        is_private,
        is_private_gamedata,
        created_at: Some(unix_to_date(created)?),
    })
}

/// Population standard deviation; 0.0 for an empty slice.
pub fn population_stdev(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Library metrics for a public profile, `None` behind the privacy gate.
pub fn derive_games(
    games: &OwnedGamesDocument,
    profile: &SteamProfileSummary,
    target_app_id: u32,
    today: NaiveDate,
) -> Option<SteamGameSummary> {
    if profile.is_gated() {
        return None;
    }
    let created_at = profile.created_at?;

    let owned = &games.response.games;
    let playtimes: Vec<u64> = owned.iter().map(|g| g.playtime_forever).collect();
    let total: u64 = playtimes.iter().sum();

    let target_mins = owned
        .iter()
        .find(|g| g.appid == target_app_id)
        .map_or(0, |g| g.playtime_forever);

    let perc_of_total = if total == 0 {
        0.0
    } else {
        round2(100.0 * target_mins as f64 / total as f64)
    };

    let account_age_mins = (today - created_at).num_days() * MINUTES_PER_DAY;
    let perc_of_account_age = if account_age_mins <= 0 {
        0.0
    } else {
        round2(100.0 * target_mins as f64 / account_age_mins as f64)
    };

    Some(SteamGameSummary {
        steam_id: profile.steam_id,
        num_games: owned.len(),
        playtime_target_mins: target_mins,
        playtime_all_games_stdev: population_stdev(&playtimes),
        perc_target_playtime_all_games: perc_of_total,
        perc_target_playtime_account_age: perc_of_account_age,
    })
}

/// Friend count for a public profile.
pub fn derive_friends(
    friends: Option<&FriendListDocument>,
    profile: &SteamProfileSummary,
) -> SteamFriendsSummary {
    let num_friends = if profile.is_gated() {
        None
    } else {
        Some(friends.map_or(0, FriendListDocument::friend_count))
    };

    SteamFriendsSummary {
        steam_id: profile.steam_id,
        num_friends,
    }
}
