//! GameSituation: the down/distance/score facts the rules engine
//! reasons over. Logically game state, not time state.

use crate::{
    decision::first_down_distance,
    error::{ClockError, ClockResult},
    quarter::Quarter,
    types::{Seconds, Side},
};
use serde::{Deserialize, Serialize};

pub const MAX_DISTANCE: u8 = 100;
/// Spot after a touchback or a kickoff fair catch.
pub const TOUCHBACK_SPOT: u8 = 25;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSituation {
    pub down:           u8,
    pub distance:       u8,
    /// Yards from the possessing team's own goal line (1..=99).
    pub ball_on:        u8,
    pub possession:     Side,
    /// Indexed by `Side::index()`.
    pub timeouts:       [u8; 2],
    pub score:          [u16; 2],
    pub quarter:        Quarter,
    /// Clock reading synced in by the GameClock before each decision.
    pub time_remaining: Seconds,
}

impl GameSituation {
    pub fn new(receiving: Side, timeouts_per_half: u8, quarter_length: Seconds) -> Self {
        Self {
            down:           1,
            distance:       10,
            ball_on:        TOUCHBACK_SPOT,
            possession:     receiving,
            timeouts:       [timeouts_per_half; 2],
            score:          [0, 0],
            quarter:        Quarter::Q1,
            time_remaining: quarter_length,
        }
    }

    pub fn yards_to_goal(&self) -> u8 {
        100u8.saturating_sub(self.ball_on)
    }

    pub fn timeouts_for(&self, side: Side) -> u8 {
        self.timeouts[side.index()]
    }

    pub fn score_for(&self, side: Side) -> u16 {
        self.score[side.index()]
    }

    pub fn scores_tied(&self) -> bool {
        self.score[0] == self.score[1]
    }

    /// Points the possessing team leads by (negative when trailing).
    pub fn offense_margin(&self) -> i32 {
        self.score_for(self.possession) as i32 - self.score_for(self.possession.opponent()) as i32
    }

    /// Hand the ball to `side` for a fresh 1st-and-10 at `ball_on`.
    pub fn new_series(&mut self, side: Side, ball_on: u8) {
        self.possession = side;
        self.ball_on = ball_on.clamp(1, 99);
        self.down = 1;
        self.distance = first_down_distance(self.ball_on);
    }

    pub fn validate(&self) -> ClockResult<()> {
        if !(1..=4).contains(&self.down) {
            return Err(ClockError::invalid_situation(format!(
                "down {} outside 1..=4", self.down
            )));
        }
        if self.distance > MAX_DISTANCE {
            return Err(ClockError::invalid_situation(format!(
                "distance {} outside 0..={MAX_DISTANCE}", self.distance
            )));
        }
        if !(1..=99).contains(&self.ball_on) {
            return Err(ClockError::invalid_situation(format!(
                "ball on {} outside 1..=99", self.ball_on
            )));
        }
        if self.distance > self.yards_to_goal() {
            return Err(ClockError::invalid_situation(format!(
                "distance {} beyond the goal line ({} yards away)",
                self.distance,
                self.yards_to_goal()
            )));
        }
        Ok(())
    }
}
