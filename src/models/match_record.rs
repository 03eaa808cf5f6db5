//! Per-match statistics as returned by the FACEIT stats endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the match outcome ("1" for a win, "0" otherwise).
pub const RESULT_FIELD: &str = "Result";

/// Field holding the final score as `"<A> / <B>"`.
pub const SCORE_FIELD: &str = "Score";

/// Value of [`RESULT_FIELD`] that marks a win.
pub const WIN_SENTINEL: &str = "1";

/// One match worth of statistics for a player.
///
/// FACEIT encodes almost every value as a string (`"Kills": "21"`,
/// `"Score": "16 / 10"`), so the record keeps the raw mapping and leaves
/// coercion to the calculator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchRecord(Map<String, Value>);

impl MatchRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Whether the result flag equals the win sentinel.
    ///
    /// Accepts both the string form the API uses and a bare number.
    pub fn is_win(&self) -> bool {
        match self.0.get(RESULT_FIELD) {
            Some(Value::String(s)) => s.trim() == WIN_SENTINEL,
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            _ => false,
        }
    }

    /// The composite score string, if present and a string.
    pub fn score(&self) -> Option<&str> {
        self.0.get(SCORE_FIELD).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for MatchRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
