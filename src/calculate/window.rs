//! Window selection over a recency-ordered match history.
//!
//! Index 0 is the most recent match. "Last N" is therefore the head of the
//! sequence and "first N" the tail, handed back oldest first.

use crate::models::{MatchRecord, StatisticsWindow};

/// Select the records a window covers. The source slice is never modified.
pub fn select(records: &[MatchRecord], window: StatisticsWindow) -> Vec<&MatchRecord> {
    match window {
        StatisticsWindow::All => records.iter().collect(),
        StatisticsWindow::LastN(count) => records.iter().take(count).collect(),
        StatisticsWindow::FirstN(count) => {
            let start = records.len().saturating_sub(count);
            records[start..].iter().rev().collect()
        }
    }
}
