use crate::{quarter::Quarter, types::Seconds};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClockError {
    // ── State conflicts ────────────────────────────
    #[error("Clock is already running")]
    ClockAlreadyRunning,

    #[error("Clock is not running")]
    ClockNotRunning,

    #[error("Game has already ended")]
    GameAlreadyEnded,

    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },

    // ── Domain ranges ──────────────────────────────
    #[error("Invalid play clock: {seconds}s (allowed 0..={max}s)")]
    InvalidPlayClock { seconds: Seconds, max: Seconds },

    #[error("Invalid quarter {quarter:?}: {reason}")]
    InvalidQuarter { quarter: Quarter, reason: String },

    #[error("Invalid situation: {reason}")]
    InvalidSituation { reason: String },

    // ── Configuration ──────────────────────────────
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    // ── Resource exhaustion ────────────────────────
    #[error("No timeouts remaining for {side}")]
    NoTimeoutsRemaining { side: &'static str },

    #[error("No challenges remaining for {side}")]
    NoChallengesRemaining { side: &'static str },

    // ── Infrastructure (simulation driver only) ────
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClockError {
    pub(crate) fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState { reason: reason.into() }
    }

    pub(crate) fn invalid_situation(reason: impl Into<String>) -> Self {
        Self::InvalidSituation { reason: reason.into() }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { reason: reason.into() }
    }
}

pub type ClockResult<T> = Result<T, ClockError>;
