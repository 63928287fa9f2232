//! Gridiron clock core: game clock state machine and timing rules
//! engine for American football.
//!
//! `GameClock` is the single owner of game time. Plays, penalties and
//! timeouts go through `GameClock`, which asks the `RulesEngine` for a
//! `ClockDecision` and applies it. Everything under `engine`,
//! `play_caller` and `store` is the simulation harness built on top.

pub mod clock;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod event;
pub mod play;
pub mod play_caller;
pub mod quarter;
pub mod rng;
pub mod rules;
pub mod situation;
pub mod snapshot;
pub mod store;
pub mod types;

pub use clock::{ClockSpeed, GameClock};
pub use config::{ClockConfig, ClockPreset, FeatureFlags, OvertimeType};
pub use decision::{ClockDecision, PlayClockReset, ScoringPlay};
pub use error::{ClockError, ClockResult};
pub use event::ClockEvent;
pub use play::{Penalty, PlayOutcome, PlayType};
pub use quarter::{ClockRunState, GameState, Quarter, StoppingReason};
pub use rules::RulesEngine;
pub use situation::GameSituation;
pub use snapshot::ClockSnapshot;
pub use types::{Seconds, Side};
