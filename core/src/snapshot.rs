//! Snapshots: read-only clock views for displays, and full game state
//! for persistence.
//!
//! A GameSnapshot is saved at every quarter boundary. It holds the whole
//! GameClock, so a game can resume from it without replaying plays.

use crate::{
    clock::GameClock,
    quarter::{GameState, Quarter},
    types::{GameId, PlayIndex, Seconds},
};
use serde::{Deserialize, Serialize};

/// What a scoreboard needs to draw the clock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClockSnapshot {
    pub quarter:         Quarter,
    pub time_remaining:  Seconds,
    pub play_clock:      Seconds,
    pub state:           GameState,
    pub is_running:      bool,
    pub overtime_period: u32,
}

impl ClockSnapshot {
    pub fn display(&self) -> String {
        format!("{} {}", self.quarter.label(), format_clock(self.time_remaining))
    }
}

/// "MM:SS", minutes unpadded past 99.
pub fn format_clock(seconds: Seconds) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id:    GameId,
    pub play_index: PlayIndex,
    pub clock:      GameClock,
}
