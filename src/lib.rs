//! # Player Scout
//!
//! Retrieves a player's FACEIT history and Steam library and condenses them
//! into windowed match statistics and privacy-gated account metrics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (match records, windows, summaries)
//! - **fetch**: HTTP transport and page draining
//! - **faceit** / **steam**: API clients and their response documents
//! - **calculate**: Window selection, averages and Steam metrics
//! - **aggregate**: Per-player orchestration and reports
//! - **config**: Configuration loading and validation

pub mod aggregate;
pub mod calculate;
pub mod config;
pub mod faceit;
pub mod fetch;
pub mod models;
pub mod steam;

pub use models::*;

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

const NICKNAME_MIN_LEN: usize = 3;
const NICKNAME_MAX_LEN: usize = 12;

/// Why a FACEIT nickname was rejected before any lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NicknameError {
    #[error("Username must be at least {NICKNAME_MIN_LEN} characters long.")]
    TooShort,

    #[error("Username must be no more than {NICKNAME_MAX_LEN} characters long.")]
    TooLong,

    #[error("Username contains invalid characters. Only letters, numbers, '_', and '-' are allowed.")]
    InvalidCharacters,
}

fn nickname_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\p{Alphabetic}\p{N}_-]+$").expect("static pattern"))
}

/// Check a FACEIT nickname: 3 to 12 characters of letters, digits, `_`
/// or `-`. Letters and digits from any script are accepted.
pub fn validate_nickname(nickname: &str) -> Result<(), NicknameError> {
    let len = nickname.chars().count();
    if len < NICKNAME_MIN_LEN {
        return Err(NicknameError::TooShort);
    }
    if len > NICKNAME_MAX_LEN {
        return Err(NicknameError::TooLong);
    }
    if !nickname_pattern().is_match(nickname) {
        return Err(NicknameError::InvalidCharacters);
    }
    Ok(())
}
