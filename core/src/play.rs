//! Play outcomes and penalties: the records a play handler hands to
//! the clock. The core never generates these; it only reads them.

use crate::types::{Seconds, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    Run,
    Pass,
    /// Quarterback kneel: clock-killing play, clock keeps running.
    Kneel,
    /// Spike: minimal runoff, always stops the clock.
    Spike,
    Punt,
    FieldGoal,
    /// Try kick after a touchdown.
    ExtraPoint,
    /// `yards_gained` is the return spot from the receiver's goal line;
    /// zero or less is a touchback.
    Kickoff,
}

/// A finished play as reported by the play handler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayOutcome {
    pub play_type:         PlayType,
    #[serde(default)]
    pub yards_gained:      i32,
    /// Snap-to-whistle time. None uses the configured default.
    #[serde(default)]
    pub duration:          Option<Seconds>,
    #[serde(default)]
    pub first_down:        bool,
    #[serde(default)]
    pub touchdown:         bool,
    #[serde(default)]
    pub turnover:          bool,
    #[serde(default)]
    pub out_of_bounds:     bool,
    #[serde(default)]
    pub incomplete:        bool,
    #[serde(default)]
    pub penalty:           bool,
    #[serde(default)]
    pub two_point_attempt: bool,
    #[serde(default)]
    pub safety:            bool,
    /// Field goal / extra point went through.
    #[serde(default)]
    pub kick_good:         bool,
}

impl PlayOutcome {
    pub fn new(play_type: PlayType, yards_gained: i32) -> Self {
        Self {
            play_type,
            yards_gained,
            duration:          None,
            first_down:        false,
            touchdown:         false,
            turnover:          false,
            out_of_bounds:     false,
            incomplete:        false,
            penalty:           false,
            two_point_attempt: false,
            safety:            false,
            kick_good:         false,
        }
    }

    pub fn run(yards: i32) -> Self {
        Self::new(PlayType::Run, yards)
    }

    pub fn pass_complete(yards: i32) -> Self {
        Self::new(PlayType::Pass, yards)
    }

    pub fn pass_incomplete() -> Self {
        Self { incomplete: true, ..Self::new(PlayType::Pass, 0) }
    }

    pub fn kneel() -> Self {
        Self::new(PlayType::Kneel, -1)
    }

    pub fn spike() -> Self {
        Self { incomplete: true, ..Self::new(PlayType::Spike, 0) }
    }

    /// `net_yards` is the net punt distance from the line of scrimmage.
    pub fn punt(net_yards: i32) -> Self {
        Self::new(PlayType::Punt, net_yards)
    }

    pub fn field_goal(good: bool) -> Self {
        Self { kick_good: good, ..Self::new(PlayType::FieldGoal, 0) }
    }

    pub fn extra_point(good: bool) -> Self {
        Self { kick_good: good, ..Self::new(PlayType::ExtraPoint, 0) }
    }

    /// Two-point try; `converted` marks the ball crossing the goal line.
    pub fn two_point(converted: bool) -> Self {
        Self {
            two_point_attempt: true,
            touchdown: converted,
            ..Self::new(PlayType::Pass, 0)
        }
    }

    pub fn kickoff(return_spot: i32) -> Self {
        Self::new(PlayType::Kickoff, return_spot)
    }

    pub fn with_duration(mut self, seconds: Seconds) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn out_of_bounds(mut self) -> Self {
        self.out_of_bounds = true;
        self
    }

    pub fn touchdown(mut self) -> Self {
        self.touchdown = true;
        self
    }

    pub fn turnover(mut self) -> Self {
        self.turnover = true;
        self
    }

    pub fn safety(mut self) -> Self {
        self.safety = true;
        self
    }

    pub fn with_penalty(mut self) -> Self {
        self.penalty = true;
        self
    }

    /// Untimed try after a touchdown.
    pub fn is_try(&self) -> bool {
        self.play_type == PlayType::ExtraPoint || self.two_point_attempt
    }
}

/// An accepted foul to enforce between plays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Penalty {
    #[serde(default)]
    pub foul:                 String,
    pub yards:                u8,
    /// The offending team.
    pub against:              Side,
    #[serde(default)]
    pub automatic_first_down: bool,
    #[serde(default)]
    pub loss_of_down:         bool,
}

impl Penalty {
    pub fn new(foul: impl Into<String>, yards: u8, against: Side) -> Self {
        Self {
            foul: foul.into(),
            yards,
            against,
            automatic_first_down: false,
            loss_of_down: false,
        }
    }

    pub fn with_automatic_first_down(mut self) -> Self {
        self.automatic_first_down = true;
        self
    }

    pub fn with_loss_of_down(mut self) -> Self {
        self.loss_of_down = true;
        self
    }
}
