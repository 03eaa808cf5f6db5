//! Named selection rules over an ordered match history.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A selection rule over a recency-ordered match history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum StatisticsWindow {
    /// Entire history.
    All,
    /// The player's `count` earliest matches.
    FirstN(usize),
    /// The player's `count` most recent matches.
    LastN(usize),
}

impl StatisticsWindow {
    /// Stable name used as the summary key, e.g. `last_20`.
    pub fn name(&self) -> String {
        match self {
            StatisticsWindow::All => "all_time".to_string(),
            StatisticsWindow::FirstN(n) => format!("first_{}", n),
            StatisticsWindow::LastN(n) => format!("last_{}", n),
        }
    }
}

impl fmt::Display for StatisticsWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatisticsWindow::All => write!(f, "All time"),
            StatisticsWindow::FirstN(n) => write!(f, "First {} matches", n),
            StatisticsWindow::LastN(n) => write!(f, "Last {} matches", n),
        }
    }
}
