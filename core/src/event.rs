//! Clock events: what a GameClock mutation reports back.
//!
//! RULE: Every state change a caller may care about is reported as a
//! ClockEvent. The driver persists them in order; nothing else is
//! logged to the store.

use crate::{
    config::ClockPreset,
    quarter::{GameState, Quarter, StoppingReason},
    types::{GameId, PlayIndex, Seconds, Side},
};
use serde::{Deserialize, Serialize};

/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClockEvent {
    // ── Game flow ──────────────────────────────────
    GameStarted {
        receiving: Side,
    },
    SecondHalfStarted {
        receiving: Side,
    },
    OvertimeStarted {
        period: u32,
        receiving: Side,
    },
    QuarterEnded {
        from: Quarter,
        to: Quarter,
        state: GameState,
    },
    GameEnded {
        home: u16,
        away: u16,
    },

    // ── Clock ──────────────────────────────────────
    ClockStopped {
        quarter: Quarter,
        time_remaining: Seconds,
        reason: StoppingReason,
    },
    TwoMinuteWarning {
        quarter: Quarter,
        time_remaining: Seconds,
    },
    PlayClockExpired {
        quarter: Quarter,
        time_remaining: Seconds,
    },
    /// Game clock hit 0:00. The quarter is still open until end_quarter().
    QuarterExpired {
        quarter: Quarter,
    },

    // ── Plays ──────────────────────────────────────
    PlayResolved {
        quarter: Quarter,
        time_remaining: Seconds,
        seconds_elapsed: Seconds,
        down: u8,
        distance: u8,
        ball_on: u8,
        possession: Side,
    },
    PenaltyEnforced {
        foul: String,
        yards: u8,
        against: Side,
    },
    TimeoutCalled {
        side: Side,
        remaining: u8,
    },
    ScoreChanged {
        side: Side,
        points: u8,
        home: u16,
        away: u16,
    },
    PossessionChanged {
        to: Side,
    },

    // ── Configuration ──────────────────────────────
    ConfigUpdated {
        preset: ClockPreset,
        time_remaining: Seconds,
    },
}

impl ClockEvent {
    /// Stable name for the event_type column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            ClockEvent::GameStarted { .. }       => "game_started",
            ClockEvent::SecondHalfStarted { .. } => "second_half_started",
            ClockEvent::OvertimeStarted { .. }   => "overtime_started",
            ClockEvent::QuarterEnded { .. }      => "quarter_ended",
            ClockEvent::GameEnded { .. }         => "game_ended",
            ClockEvent::ClockStopped { .. }      => "clock_stopped",
            ClockEvent::TwoMinuteWarning { .. }  => "two_minute_warning",
            ClockEvent::PlayClockExpired { .. }  => "play_clock_expired",
            ClockEvent::QuarterExpired { .. }    => "quarter_expired",
            ClockEvent::PlayResolved { .. }      => "play_resolved",
            ClockEvent::PenaltyEnforced { .. }   => "penalty_enforced",
            ClockEvent::TimeoutCalled { .. }     => "timeout_called",
            ClockEvent::ScoreChanged { .. }      => "score_changed",
            ClockEvent::PossessionChanged { .. } => "possession_changed",
            ClockEvent::ConfigUpdated { .. }     => "config_updated",
        }
    }
}

/// A persisted event-log row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub game_id:    GameId,
    pub play_index: PlayIndex,
    pub event_type: String,
    pub payload:    String, // JSON-serialized ClockEvent
}
