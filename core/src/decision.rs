//! ClockDecision: the rules engine's verdict for one play, penalty or
//! timeout. Produced fresh per decision and only read afterwards.

use crate::{
    quarter::StoppingReason,
    types::{Seconds, Side},
};
use serde::{Deserialize, Serialize};

/// Which play-clock duration the next snap uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayClockReset {
    #[default]
    Normal,
    Short,
}

/// Points put on the board by a play.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoringPlay {
    pub side:   Side,
    pub points: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ClockDecision {
    pub should_stop_clock:          bool,
    pub seconds_elapsed:            Seconds,
    pub trigger_two_minute_warning: bool,
    pub new_down:                   Option<u8>,
    pub new_distance:               Option<u8>,
    pub possession_change:          bool,
    /// Most specific reason when the clock stops; None while it runs.
    pub stopping_reason:            Option<StoppingReason>,
    /// Ball spot after the play, from the (new) offence's own goal line.
    pub new_ball_on:                Option<u8>,
    pub score:                      Option<ScoringPlay>,
    pub play_clock_reset:           PlayClockReset,
}

impl ClockDecision {
    /// A decision that consumes `seconds` and leaves the clock running.
    pub(crate) fn running(seconds: Seconds) -> Self {
        Self {
            seconds_elapsed: seconds,
            ..Self::default()
        }
    }

    /// Stop the clock for `reason`, keeping the higher-precedence reason
    /// when one is already recorded.
    pub(crate) fn stop_for(&mut self, reason: StoppingReason) {
        self.should_stop_clock = true;
        let keep_existing = self
            .stopping_reason
            .is_some_and(|existing| existing.precedence() >= reason.precedence());
        if !keep_existing {
            self.stopping_reason = Some(reason);
        }
        self.play_clock_reset = match self.stopping_reason {
            Some(r) => r.play_clock_reset(),
            None => PlayClockReset::Normal,
        };
    }

    pub(crate) fn first_and_ten(&mut self, ball_on: u8) {
        self.new_down = Some(1);
        self.new_distance = Some(first_down_distance(ball_on));
        self.new_ball_on = Some(ball_on);
    }
}

/// Line to gain for a fresh set of downs: 10, or goal-to-go inside the 10.
pub fn first_down_distance(ball_on: u8) -> u8 {
    10.min(100u8.saturating_sub(ball_on))
}
