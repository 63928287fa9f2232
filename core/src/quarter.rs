//! Quarter / game-state machine.
//!
//! RULE: Quarter and GameState only change through `transition()`.
//! The clock never edits them directly; it asks for a Transition and
//! then applies the listed effects in order.
//!
//!   PreGame  --StartGame-->          Playing(Q1)
//!   Q1       --EndQuarter-->         Q2
//!   Q2       --EndQuarter-->         Halftime
//!   Halftime --ResumeSecondHalf-->   Playing(Q3)
//!   Q3       --EndQuarter-->         Q4
//!   Q4       --EndQuarter-->         Overtime (tied, OT on) | GameEnd
//!   Overtime --EndQuarter-->         Overtime (tied, periods left) | GameEnd
//!   Overtime --OvertimeScore-->      GameEnd
//!   GameEnd  is terminal.

use crate::{
    decision::PlayClockReset,
    error::{ClockError, ClockResult},
    types::Seconds,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
    Overtime,
}

impl Quarter {
    /// Half index for the two-minute-warning record. Overtime is exempt.
    pub fn half(self) -> Option<usize> {
        match self {
            Self::Q1 | Self::Q2 => Some(0),
            Self::Q3 | Self::Q4 => Some(1),
            Self::Overtime => None,
        }
    }

    /// Quarters that end a half and therefore carry a two-minute warning.
    pub fn ends_half(self) -> bool {
        matches!(self, Self::Q2 | Self::Q4)
    }

    pub fn number(self) -> u8 {
        match self {
            Self::Q1 => 1,
            Self::Q2 => 2,
            Self::Q3 => 3,
            Self::Q4 => 4,
            Self::Overtime => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Q1 => "1st",
            Self::Q2 => "2nd",
            Self::Q3 => "3rd",
            Self::Q4 => "4th",
            Self::Overtime => "OT",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    PreGame,
    Playing,
    Halftime,
    GameEnd,
}

/// Why the game clock last stopped. Only the latest reason is kept.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoppingReason {
    OutOfBounds,
    IncompletePass,
    Penalty,
    Timeout,
    TwoMinuteWarning,
    Score,
    QuarterEnd,
    Injury,
    Administrative,
}

impl StoppingReason {
    /// Bookkeeping rank when several reasons apply to one play.
    /// Higher wins.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Penalty          => 9,
            Self::Timeout          => 8,
            Self::QuarterEnd       => 7,
            Self::Score            => 6,
            Self::TwoMinuteWarning => 5,
            Self::Injury           => 4,
            Self::IncompletePass   => 3,
            Self::OutOfBounds      => 2,
            Self::Administrative   => 1,
        }
    }

    /// Play clock used after this kind of stoppage: 40s after a
    /// normal dead ball, 25s after an administrative one.
    pub fn play_clock_reset(self) -> PlayClockReset {
        match self {
            Self::OutOfBounds | Self::IncompletePass => PlayClockReset::Normal,
            _ => PlayClockReset::Short,
        }
    }
}

/// Running/stopped view derived from the clock's flags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClockRunState {
    Running,
    Stopped { reason: Option<StoppingReason> },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    StartGame,
    EndQuarter,
    ResumeSecondHalf,
    StartOvertime,
    OvertimeScore,
}

/// Facts the transition function needs beyond quarter and state.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext {
    pub time_remaining:       Seconds,
    pub scores_tied:          bool,
    pub overtime_enabled:     bool,
    pub untimed_overtime:     bool,
    pub overtime_period:      u32,
    pub overtime_max_periods: Option<u32>,
    pub quarter_length:       Seconds,
    pub overtime_length:      Seconds,
    pub timeouts_per_half:    u8,
    pub overtime_timeouts:    u8,
}

impl TransitionContext {
    fn more_overtime_allowed(&self) -> bool {
        self.overtime_max_periods
            .map_or(true, |max| self.overtime_period < max)
    }

    fn overtime_clock(&self) -> Seconds {
        if self.untimed_overtime { 0 } else { self.overtime_length }
    }
}

/// Side effects the clock applies after moving to the new variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum TransitionEffect {
    StopClock,
    SetTime { seconds: Seconds },
    ResetPlayClock,
    ResetTimeouts { per_side: u8 },
    OpeningKickoff,
    SecondHalfKickoff,
    BeginOvertimePeriod,
    EndGame,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub quarter: Quarter,
    pub state:   GameState,
    pub effects: Vec<TransitionEffect>,
}

/// Compute the next (quarter, state) and its side effects.
/// Pure: never touches a clock.
pub fn transition(
    quarter: Quarter,
    state: GameState,
    trigger: Trigger,
    ctx: &TransitionContext,
) -> ClockResult<Transition> {
    use TransitionEffect::*;

    let next = match (state, quarter, trigger) {
        (GameState::GameEnd, _, _) => return Err(ClockError::GameAlreadyEnded),

        (GameState::PreGame, _, Trigger::StartGame) => Transition {
            quarter: Quarter::Q1,
            state:   GameState::Playing,
            effects: vec![
                StopClock,
                SetTime { seconds: ctx.quarter_length },
                ResetPlayClock,
                ResetTimeouts { per_side: ctx.timeouts_per_half },
                OpeningKickoff,
            ],
        },
        (_, _, Trigger::StartGame) => {
            return Err(ClockError::invalid_state("game already started"));
        }
        (GameState::PreGame, _, _) => {
            return Err(ClockError::invalid_state("game has not started"));
        }

        (GameState::Halftime, _, Trigger::ResumeSecondHalf | Trigger::EndQuarter) => Transition {
            quarter: Quarter::Q3,
            state:   GameState::Playing,
            effects: vec![
                StopClock,
                SetTime { seconds: ctx.quarter_length },
                ResetPlayClock,
                ResetTimeouts { per_side: ctx.timeouts_per_half },
                SecondHalfKickoff,
            ],
        },
        (_, _, Trigger::ResumeSecondHalf) => {
            return Err(ClockError::invalid_state("not at halftime"));
        }
        (GameState::Halftime, _, _) => {
            return Err(ClockError::invalid_state("halftime in progress"));
        }

        (GameState::Playing, Quarter::Q1, Trigger::EndQuarter) => {
            next_regulation_quarter(Quarter::Q2, ctx)
        }
        (GameState::Playing, Quarter::Q2, Trigger::EndQuarter) => Transition {
            quarter: Quarter::Q2,
            state:   GameState::Halftime,
            effects: vec![StopClock, SetTime { seconds: 0 }, ResetPlayClock],
        },
        (GameState::Playing, Quarter::Q3, Trigger::EndQuarter) => {
            next_regulation_quarter(Quarter::Q4, ctx)
        }
        (GameState::Playing, Quarter::Q4, Trigger::EndQuarter) => {
            if ctx.scores_tied && ctx.overtime_enabled {
                enter_overtime(ctx)
            } else {
                end_game(Quarter::Q4)
            }
        }
        (GameState::Playing, Quarter::Q4, Trigger::StartOvertime) => {
            if ctx.time_remaining > 0 {
                return Err(ClockError::InvalidQuarter {
                    quarter,
                    reason: format!("{}s still remain in regulation", ctx.time_remaining),
                });
            }
            if !ctx.overtime_enabled {
                return Err(ClockError::InvalidQuarter {
                    quarter,
                    reason: "overtime is disabled".into(),
                });
            }
            if !ctx.scores_tied {
                return Err(ClockError::InvalidQuarter {
                    quarter,
                    reason: "scores are not tied".into(),
                });
            }
            enter_overtime(ctx)
        }
        (GameState::Playing, _, Trigger::StartOvertime) => {
            return Err(ClockError::InvalidQuarter {
                quarter,
                reason: "overtime can only follow the 4th quarter".into(),
            });
        }
        (GameState::Playing, Quarter::Overtime, Trigger::EndQuarter) => {
            if ctx.scores_tied && ctx.more_overtime_allowed() {
                enter_overtime(ctx)
            } else {
                end_game(Quarter::Overtime)
            }
        }
        (GameState::Playing, Quarter::Overtime, Trigger::OvertimeScore) => {
            end_game(Quarter::Overtime)
        }
        (GameState::Playing, _, Trigger::OvertimeScore) => {
            return Err(ClockError::InvalidQuarter {
                quarter,
                reason: "not in overtime".into(),
            });
        }
    };

    Ok(next)
}

fn next_regulation_quarter(quarter: Quarter, ctx: &TransitionContext) -> Transition {
    Transition {
        quarter,
        state: GameState::Playing,
        effects: vec![
            TransitionEffect::StopClock,
            TransitionEffect::SetTime { seconds: ctx.quarter_length },
            TransitionEffect::ResetPlayClock,
        ],
    }
}

fn enter_overtime(ctx: &TransitionContext) -> Transition {
    Transition {
        quarter: Quarter::Overtime,
        state:   GameState::Playing,
        effects: vec![
            TransitionEffect::StopClock,
            TransitionEffect::SetTime { seconds: ctx.overtime_clock() },
            TransitionEffect::ResetPlayClock,
            TransitionEffect::BeginOvertimePeriod,
            TransitionEffect::ResetTimeouts { per_side: ctx.overtime_timeouts },
            TransitionEffect::OpeningKickoff,
        ],
    }
}

fn end_game(quarter: Quarter) -> Transition {
    Transition {
        quarter,
        state: GameState::GameEnd,
        effects: vec![
            TransitionEffect::StopClock,
            TransitionEffect::ResetPlayClock,
            TransitionEffect::EndGame,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TransitionContext {
        TransitionContext {
            time_remaining:       0,
            scores_tied:          false,
            overtime_enabled:     true,
            untimed_overtime:     false,
            overtime_period:      0,
            overtime_max_periods: Some(1),
            quarter_length:       900,
            overtime_length:      600,
            timeouts_per_half:    3,
            overtime_timeouts:    2,
        }
    }

    #[test]
    fn regulation_sequence_walks_every_quarter() {
        let c = ctx();
        let t = transition(Quarter::Q1, GameState::PreGame, Trigger::StartGame, &c).unwrap();
        assert_eq!((t.quarter, t.state), (Quarter::Q1, GameState::Playing));

        let t = transition(Quarter::Q1, GameState::Playing, Trigger::EndQuarter, &c).unwrap();
        assert_eq!((t.quarter, t.state), (Quarter::Q2, GameState::Playing));

        let t = transition(Quarter::Q2, GameState::Playing, Trigger::EndQuarter, &c).unwrap();
        assert_eq!((t.quarter, t.state), (Quarter::Q2, GameState::Halftime));

        let t = transition(Quarter::Q2, GameState::Halftime, Trigger::ResumeSecondHalf, &c).unwrap();
        assert_eq!((t.quarter, t.state), (Quarter::Q3, GameState::Playing));
        assert!(t.effects.contains(&TransitionEffect::SecondHalfKickoff));

        let t = transition(Quarter::Q3, GameState::Playing, Trigger::EndQuarter, &c).unwrap();
        assert_eq!((t.quarter, t.state), (Quarter::Q4, GameState::Playing));

        let t = transition(Quarter::Q4, GameState::Playing, Trigger::EndQuarter, &c).unwrap();
        assert_eq!((t.quarter, t.state), (Quarter::Q4, GameState::GameEnd));
    }

    #[test]
    fn tied_fourth_quarter_enters_overtime_with_overtime_clock() {
        let c = TransitionContext { scores_tied: true, ..ctx() };
        let t = transition(Quarter::Q4, GameState::Playing, Trigger::EndQuarter, &c).unwrap();
        assert_eq!(t.quarter, Quarter::Overtime);
        assert!(t.effects.contains(&TransitionEffect::SetTime { seconds: 600 }));
        assert!(t.effects.contains(&TransitionEffect::BeginOvertimePeriod));
    }

    #[test]
    fn overtime_period_limit_ends_tied_game() {
        let c = TransitionContext { scores_tied: true, overtime_period: 1, ..ctx() };
        let t = transition(Quarter::Overtime, GameState::Playing, Trigger::EndQuarter, &c).unwrap();
        assert_eq!(t.state, GameState::GameEnd);

        let unlimited = TransitionContext { overtime_max_periods: None, ..c };
        let t = transition(Quarter::Overtime, GameState::Playing, Trigger::EndQuarter, &unlimited)
            .unwrap();
        assert_eq!(t.state, GameState::Playing);
    }

    #[test]
    fn game_end_is_terminal() {
        let c = ctx();
        for trigger in [Trigger::StartGame, Trigger::EndQuarter, Trigger::StartOvertime] {
            let err = transition(Quarter::Q4, GameState::GameEnd, trigger, &c).unwrap_err();
            assert!(matches!(err, ClockError::GameAlreadyEnded));
        }
    }

    #[test]
    fn overtime_entry_requires_expired_tied_fourth_quarter() {
        let c = TransitionContext { scores_tied: true, ..ctx() };
        let err = transition(Quarter::Q3, GameState::Playing, Trigger::StartOvertime, &c).unwrap_err();
        assert!(matches!(err, ClockError::InvalidQuarter { .. }));

        let running = TransitionContext { time_remaining: 30, ..c };
        let err = transition(Quarter::Q4, GameState::Playing, Trigger::StartOvertime, &running)
            .unwrap_err();
        assert!(matches!(err, ClockError::InvalidQuarter { .. }));
    }
}
