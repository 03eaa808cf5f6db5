//! FACEIT player identity and ban models.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::PlayerId;

/// Ban reason FACEIT uses for smurf accounts.
pub const SMURF_REASON: &str = "smurfing";

/// Time since the FACEIT account was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAge {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl fmt::Display for AccountAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} years, {} months, {} days",
            self.years, self.months, self.days
        )
    }
}

/// Identity fields for a FACEIT player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_id: PlayerId,
    pub nickname: String,

    /// Avatar image URL, empty when the player has none
    pub avatar: String,

    pub num_friends: usize,
    pub is_verified: bool,

    /// Skill level (1-10) for the primary game, 0 when unranked
    pub skill_level: u32,

    /// FACEIT elo for the primary game, 0 when unranked
    pub elo: u32,

    /// Matches retrieved across all game categories, if the history loaded
    pub num_games: Option<usize>,

    pub account_age: Option<AccountAge>,
}

/// One ban entry as reported by FACEIT.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BanItem {
    #[serde(default)]
    pub reason: String,

    #[serde(rename = "type", default)]
    pub ban_type: Option<String>,

    #[serde(default)]
    pub game: Option<String>,

    #[serde(default)]
    pub starts_at: Option<String>,

    #[serde(default)]
    pub ends_at: Option<String>,
}

/// Ban summary for a FACEIT player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBanRecord {
    pub player_id: PlayerId,
    pub is_banned: bool,
    pub is_smurf: bool,
    pub num_bans: usize,
    pub bans: Vec<BanItem>,
}

impl PlayerBanRecord {
    /// Build the record from the raw ban list.
    pub fn from_items(player_id: PlayerId, bans: Vec<BanItem>) -> Self {
        Self {
            player_id,
            is_banned: !bans.is_empty(),
            is_smurf: bans.iter().any(|b| b.reason == SMURF_REASON),
            num_bans: bans.len(),
            bans,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ban(reason: &str) -> BanItem {
        BanItem {
            reason: reason.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_bans() {
        let record = PlayerBanRecord::from_items(PlayerId::from("p1"), Vec::new());
        assert!(!record.is_banned);
        assert!(!record.is_smurf);
        assert_eq!(record.num_bans, 0);
    }

    #[test]
    fn test_smurf_ban_detected() {
        let record = PlayerBanRecord::from_items(
            PlayerId::from("p1"),
            vec![ban("toxic behaviour"), ban("smurfing")],
        );
        assert!(record.is_banned);
        assert!(record.is_smurf);
        assert_eq!(record.num_bans, 2);
    }

    #[test]
    fn test_non_smurf_ban() {
        let record = PlayerBanRecord::from_items(PlayerId::from("p1"), vec![ban("cheating")]);
        assert!(record.is_banned);
        assert!(!record.is_smurf);
    }

    #[test]
    fn test_ban_item_type_rename() {
        let item: BanItem =
            serde_json::from_str(r#"{"reason": "smurfing", "type": "matchmaking"}"#).unwrap();
        assert_eq!(item.ban_type.as_deref(), Some("matchmaking"));
        assert!(item.starts_at.is_none());
    }

    #[test]
    fn test_account_age_display() {
        let age = AccountAge {
            years: 3,
            months: 2,
            days: 1,
        };
        assert_eq!(age.to_string(), "3 years, 2 months, 1 days");
    }
}
