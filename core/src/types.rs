//! Shared primitive types used across the entire clock core.

use serde::{Deserialize, Serialize};

/// Game-clock seconds. All clock arithmetic is whole seconds.
pub type Seconds = u32;

/// A stable identifier for one simulated game.
pub type GameId = String;

/// Sequence number of a play within a simulated game.
pub type PlayIndex = u64;

/// One of the two teams.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }

    /// Index into per-side arrays (`[home, away]`).
    pub fn index(self) -> usize {
        match self {
            Self::Home => 0,
            Self::Away => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
        }
    }
}
