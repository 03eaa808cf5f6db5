//! Statistics calculation engine.
//!
//! Reduces windows of match records into fixed-shape summaries:
//! - Per-attribute averages (kills, ratios, headshot %, multi-kills)
//! - Win rate
//! - Signed average score differential
//!
//! Steam library metrics live in [`games`], window selection in [`window`].

pub mod games;
pub mod window;

use std::borrow::Borrow;

use chrono::{Datelike, Months, NaiveDate};
use serde_json::Value;
use thiserror::Error;

use crate::models::{AccountAge, AveragedField, MatchRecord, MatchStatistics};

/// Errors raised while reducing match records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("Field {field:?} is not numeric: {value}")]
    InvalidNumber { field: String, value: String },

    #[error("Malformed score {0:?}, expected \"<A> / <B>\"")]
    MalformedScore(String),

    #[error("Match record has no score")]
    MissingScore,
}

/// Round to 2 decimal places, exact ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Win rate in percent, rounded to 2 decimals. Zero matches gives 0.0.
pub fn calculate_win_rate(wins: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(wins as f64 / total as f64 * 100.0)
    }
}

/// Calendar difference between activation and `today` as years, months
/// and days. `None` if activation lies in the future.
pub fn account_age(activated: NaiveDate, today: NaiveDate) -> Option<AccountAge> {
    if today < activated {
        return None;
    }

    let mut months = (today.year() - activated.year()) * 12 + today.month() as i32
        - activated.month() as i32;
    if today.day() < activated.day() {
        months -= 1;
    }

    let anchor = activated.checked_add_months(Months::new(months as u32))?;
    let days = (today - anchor).num_days();

    Some(AccountAge {
        years: (months / 12) as u32,
        months: (months % 12) as u32,
        days: days as u32,
    })
}

/// Read an attribute as `f64`. Absent (or null) counts as 0.
pub fn numeric_field(record: &MatchRecord, field: &str) -> Result<f64, StatsError> {
    let invalid = |value: &Value| StatsError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    };

    match record.get(field) {
        None | Some(Value::Null) => Ok(0.0),
        Some(value @ Value::Number(n)) => n.as_f64().ok_or_else(|| invalid(value)),
        Some(value @ Value::String(s)) => s.trim().parse::<f64>().map_err(|_| invalid(value)),
        Some(other) => Err(invalid(other)),
    }
}

/// Parse a `"<A> / <B>"` score into its two round counts.
pub fn parse_score(score: &str) -> Result<(u32, u32), StatsError> {
    let parts: Vec<&str> = score.split('/').map(str::trim).collect();
    let malformed = || StatsError::MalformedScore(score.to_string());

    match parts.as_slice() {
        [a, b] => {
            let a = a.parse::<u32>().map_err(|_| malformed())?;
            let b = b.parse::<u32>().map_err(|_| malformed())?;
            Ok((a, b))
        }
        _ => Err(malformed()),
    }
}

/// Margin of a single match: positive on a win, negative otherwise.
pub fn score_differential(record: &MatchRecord) -> Result<i64, StatsError> {
    let score = record.score().ok_or(StatsError::MissingScore)?;
    let (a, b) = parse_score(score)?;
    let margin = i64::from(a.abs_diff(b));
    Ok(if record.is_win() { margin } else { -margin })
}

/// Reduce a window of matches into [`MatchStatistics`].
///
/// An empty window yields every field as exactly `0.0`. The input is only
/// read, so reducing the same window twice gives identical output.
pub fn reduce<R: Borrow<MatchRecord>>(window: &[R]) -> Result<MatchStatistics, StatsError> {
    let mut stats = MatchStatistics::default();
    if window.is_empty() {
        return Ok(stats);
    }

    let count = window.len() as f64;

    for field in AveragedField::ALL {
        let mut total = 0.0;
        for record in window {
            total += numeric_field(record.borrow(), field.record_key())?;
        }
        stats.set_average(field, round2(total / count));
    }

    let wins = window.iter().filter(|r| (*r).borrow().is_win()).count();
    stats.perc_winrate = calculate_win_rate(wins, window.len());

    let mut margin_total: i64 = 0;
    for record in window {
        margin_total += score_differential(record.borrow())?;
    }
    stats.avg_score_diff = round2(margin_total as f64 / count);

    Ok(stats)
}
