//! Derived match statistics models.

use serde::{Deserialize, Serialize};

use super::{PlayerId, StatisticsWindow};

/// Numeric match attributes that are averaged over a window.
///
/// This is the single declared field list shared by the calculator and
/// [`MatchStatistics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AveragedField {
    Kills,
    KrRatio,
    KdRatio,
    HeadshotPct,
    DoubleKills,
    TripleKills,
    QuadroKills,
    PentaKills,
}

impl AveragedField {
    pub const ALL: [AveragedField; 8] = [
        AveragedField::Kills,
        AveragedField::KrRatio,
        AveragedField::KdRatio,
        AveragedField::HeadshotPct,
        AveragedField::DoubleKills,
        AveragedField::TripleKills,
        AveragedField::QuadroKills,
        AveragedField::PentaKills,
    ];

    /// Key of the attribute inside a [`MatchRecord`](super::MatchRecord).
    pub fn record_key(self) -> &'static str {
        match self {
            AveragedField::Kills => "Kills",
            AveragedField::KrRatio => "K/R Ratio",
            AveragedField::KdRatio => "K/D Ratio",
            AveragedField::HeadshotPct => "Headshots %",
            AveragedField::DoubleKills => "Double Kills",
            AveragedField::TripleKills => "Triple Kills",
            AveragedField::QuadroKills => "Quadro Kills",
            AveragedField::PentaKills => "Penta Kills",
        }
    }

    /// Name of the averaged field in the summary.
    pub fn summary_key(self) -> &'static str {
        match self {
            AveragedField::Kills => "avg_kills",
            AveragedField::KrRatio => "avg_kr_ratio",
            AveragedField::KdRatio => "avg_kd_ratio",
            AveragedField::HeadshotPct => "avg_hsp",
            AveragedField::DoubleKills => "avg_2_kills",
            AveragedField::TripleKills => "avg_3_kills",
            AveragedField::QuadroKills => "avg_4_kills",
            AveragedField::PentaKills => "avg_5_kills",
        }
    }
}

/// Fixed-shape statistics for one window of matches.
///
/// `Default` is the empty-window value: every field `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub avg_kills: f64,
    pub avg_kr_ratio: f64,
    pub avg_kd_ratio: f64,
    pub avg_hsp: f64,
    pub avg_2_kills: f64,
    pub avg_3_kills: f64,
    pub avg_4_kills: f64,
    pub avg_5_kills: f64,

    /// Win rate in percent (0.0 to 100.0)
    pub perc_winrate: f64,

    /// Signed average round margin, positive for wins
    pub avg_score_diff: f64,
}

impl MatchStatistics {
    /// Read an averaged field.
    pub fn average(&self, field: AveragedField) -> f64 {
        match field {
            AveragedField::Kills => self.avg_kills,
            AveragedField::KrRatio => self.avg_kr_ratio,
            AveragedField::KdRatio => self.avg_kd_ratio,
            AveragedField::HeadshotPct => self.avg_hsp,
            AveragedField::DoubleKills => self.avg_2_kills,
            AveragedField::TripleKills => self.avg_3_kills,
            AveragedField::QuadroKills => self.avg_4_kills,
            AveragedField::PentaKills => self.avg_5_kills,
        }
    }

    /// Write an averaged field.
    pub fn set_average(&mut self, field: AveragedField, value: f64) {
        let slot = match field {
            AveragedField::Kills => &mut self.avg_kills,
            AveragedField::KrRatio => &mut self.avg_kr_ratio,
            AveragedField::KdRatio => &mut self.avg_kd_ratio,
            AveragedField::HeadshotPct => &mut self.avg_hsp,
            AveragedField::DoubleKills => &mut self.avg_2_kills,
            AveragedField::TripleKills => &mut self.avg_3_kills,
            AveragedField::QuadroKills => &mut self.avg_4_kills,
            AveragedField::PentaKills => &mut self.avg_5_kills,
        };
        *slot = value;
    }
}

/// Match statistics keyed by player and window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchSummary {
    pub player_id: PlayerId,

    /// Window name, e.g. `last_20`
    pub window: String,

    /// Number of matches the window selected
    pub matches: usize,

    #[serde(flatten)]
    pub stats: MatchStatistics,
}

impl PlayerMatchSummary {
    pub fn new(
        player_id: PlayerId,
        window: StatisticsWindow,
        matches: usize,
        stats: MatchStatistics,
    ) -> Self {
        Self {
            player_id,
            window: window.name(),
            matches,
            stats,
        }
    }
}
