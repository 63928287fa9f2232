//! Timing rules engine.
//!
//! Translates "what happened on this play" into "what must happen to
//! the clock". Holds the situation and a copy of the attached config,
//! never the clock time itself; the GameClock syncs the time reading
//! into the situation before asking for a decision.
//!
//! RULES:
//!   - `process_*` are pure: they return a ClockDecision and never
//!     touch the situation. `apply_decision` is the only mutator.
//!   - Every decision starts from a validated situation, and the
//!     situation it would produce is validated before it is returned.

use crate::{
    config::ClockConfig,
    decision::{first_down_distance, ClockDecision, PlayClockReset, ScoringPlay},
    error::{ClockError, ClockResult},
    play::{Penalty, PlayOutcome, PlayType},
    quarter::StoppingReason,
    situation::{GameSituation, MAX_DISTANCE, TOUCHBACK_SPOT},
    types::{Seconds, Side},
};
use serde::{Deserialize, Serialize};

pub const TOUCHDOWN_POINTS: u8 = 6;
pub const FIELD_GOAL_POINTS: u8 = 3;
pub const SAFETY_POINTS: u8 = 2;
pub const EXTRA_POINT_POINTS: u8 = 1;
pub const TWO_POINT_POINTS: u8 = 2;

/// A missed field goal comes back to the spot of the kick or the 20.
const MISSED_FIELD_GOAL_MIN_SPOT: u8 = 20;
/// Holder sets up this far behind the line of scrimmage.
const FIELD_GOAL_SNAP_DEPTH: u8 = 7;
const PUNT_TOUCHBACK_SPOT: u8 = 20;
/// Longest gain or loss a single play can produce.
const MAX_YARDS: i32 = 99;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RulesEngine {
    config:    ClockConfig,
    situation: GameSituation,
}

impl RulesEngine {
    pub fn new(config: ClockConfig, situation: GameSituation) -> Self {
        Self { config, situation }
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn situation(&self) -> &GameSituation {
        &self.situation
    }

    pub(crate) fn situation_mut(&mut self) -> &mut GameSituation {
        &mut self.situation
    }

    pub(crate) fn set_config(&mut self, config: ClockConfig) {
        self.config = config;
    }

    // ── Predicates ─────────────────────────────────────────────────

    /// Inside the last two minutes of a half.
    pub fn is_inside_two_minutes(&self, situation: &GameSituation) -> bool {
        situation.quarter.ends_half()
            && situation.time_remaining <= self.config.two_minute_warning_time
    }

    pub fn validate_situation(&self, situation: &GameSituation) -> ClockResult<()> {
        situation.validate()
    }

    pub fn can_call_timeout(&self, side: Side) -> bool {
        self.situation.timeouts_for(side) > 0
    }

    // ── Decisions ──────────────────────────────────────────────────

    /// Core decision for a finished play.
    pub fn process_play(&self, outcome: &PlayOutcome) -> ClockResult<ClockDecision> {
        self.validate_situation(&self.situation)?;
        let s = &self.situation;
        // No gain or loss can exceed the length of the field.
        let outcome = &PlayOutcome {
            yards_gained: outcome.yards_gained.clamp(-MAX_YARDS, MAX_YARDS),
            ..outcome.clone()
        };

        let seconds = self.seconds_for(outcome);
        let mut decision = ClockDecision::running(seconds);

        if outcome.penalty {
            decision.stop_for(StoppingReason::Penalty);
        }

        if outcome.is_try() {
            self.decide_try(outcome, &mut decision);
        } else if outcome.touchdown {
            // The scoring team kicks off to the other side.
            let scorer = if outcome.turnover || outcome.play_type == PlayType::Punt {
                s.possession.opponent()
            } else {
                s.possession
            };
            decision.score = Some(ScoringPlay { side: scorer, points: TOUCHDOWN_POINTS });
            decision.stop_for(StoppingReason::Score);
            self.change_possession(&mut decision, scorer.opponent(), TOUCHBACK_SPOT);
        } else if outcome.safety {
            let defense = s.possession.opponent();
            decision.score = Some(ScoringPlay { side: defense, points: SAFETY_POINTS });
            decision.stop_for(StoppingReason::Score);
            self.change_possession(&mut decision, defense, TOUCHBACK_SPOT);
        } else {
            match outcome.play_type {
                PlayType::FieldGoal => self.decide_field_goal(outcome, &mut decision),
                PlayType::Punt => {
                    let landing = s.ball_on as i32 + outcome.yards_gained;
                    let spot = if landing >= 100 {
                        PUNT_TOUCHBACK_SPOT
                    } else {
                        flip_spot(landing)
                    };
                    decision.stop_for(StoppingReason::Administrative);
                    self.change_possession(&mut decision, s.possession.opponent(), spot);
                }
                PlayType::Kickoff => {
                    let spot = if outcome.yards_gained <= 0 {
                        TOUCHBACK_SPOT
                    } else {
                        clamp_spot(outcome.yards_gained)
                    };
                    if outcome.turnover {
                        decision.stop_for(StoppingReason::Administrative);
                        self.change_possession(&mut decision, s.possession.opponent(), flip_spot(spot as i32));
                    } else {
                        decision.first_and_ten(spot);
                    }
                }
                _ if outcome.turnover => {
                    let spot = flip_spot(s.ball_on as i32 + outcome.yards_gained);
                    decision.stop_for(StoppingReason::Administrative);
                    self.change_possession(&mut decision, s.possession.opponent(), spot);
                }
                _ => self.decide_scrimmage(outcome, &mut decision),
            }
        }

        if outcome.incomplete {
            decision.stop_for(StoppingReason::IncompletePass);
        }
        if outcome.out_of_bounds {
            decision.stop_for(StoppingReason::OutOfBounds);
        }
        if outcome.play_type == PlayType::Spike {
            decision.stop_for(StoppingReason::Administrative);
        }
        if self.crosses_two_minute_warning(decision.seconds_elapsed) {
            decision.trigger_two_minute_warning = true;
            decision.stop_for(StoppingReason::TwoMinuteWarning);
        }

        self.validate_situation(&self.preview(&decision))?;
        log::debug!(
            "play {:?} yards={} -> stop={} reason={:?} elapsed={}s down={:?} dist={:?} change={}",
            outcome.play_type,
            outcome.yards_gained,
            decision.should_stop_clock,
            decision.stopping_reason,
            decision.seconds_elapsed,
            decision.new_down,
            decision.new_distance,
            decision.possession_change,
        );
        Ok(decision)
    }

    /// Enforce an accepted foul. No time runs off.
    pub fn process_penalty(&self, penalty: &Penalty) -> ClockResult<ClockDecision> {
        self.validate_situation(&self.situation)?;
        let s = &self.situation;
        let offense = s.possession;

        let mut decision = ClockDecision::running(0);
        if self.config.features.clock_stop_penalty {
            decision.stop_for(StoppingReason::Penalty);
        }
        decision.play_clock_reset = PlayClockReset::Short;

        if penalty.against == offense {
            // Half the distance to the offence's own goal line.
            let enforced = half_distance_cap(penalty.yards, s.ball_on);
            let spot = s.ball_on.saturating_sub(enforced).max(1);
            let next_down = if penalty.loss_of_down { s.down + 1 } else { s.down };
            if next_down > 4 {
                decision.stop_for(StoppingReason::Penalty);
                self.change_possession(&mut decision, offense.opponent(), flip_spot(spot as i32));
            } else {
                let max_distance = MAX_DISTANCE.min(100 - spot);
                let distance = s.distance.saturating_add(enforced).min(max_distance);
                decision.new_down = Some(next_down);
                decision.new_distance = Some(distance);
                decision.new_ball_on = Some(spot);
            }
        } else {
            // Half the distance to the defence's goal line.
            let enforced = half_distance_cap(penalty.yards, s.yards_to_goal());
            let spot = (s.ball_on + enforced).min(99);
            if penalty.automatic_first_down || enforced >= s.distance {
                decision.first_and_ten(spot);
            } else {
                let max_distance = MAX_DISTANCE.min(100 - spot);
                decision.new_down = Some(s.down);
                decision.new_distance = Some((s.distance - enforced).min(max_distance));
                decision.new_ball_on = Some(spot);
            }
        }

        self.validate_situation(&self.preview(&decision))?;
        log::debug!(
            "penalty '{}' {}y against {} -> down={:?} dist={:?} ball={:?}",
            penalty.foul,
            penalty.yards,
            penalty.against.name(),
            decision.new_down,
            decision.new_distance,
            decision.new_ball_on,
        );
        Ok(decision)
    }

    /// Charge a timeout to `side`. The caller applies `timeout_decision()`.
    pub fn use_timeout(&mut self, side: Side) -> ClockResult<()> {
        if !self.can_call_timeout(side) {
            return Err(ClockError::NoTimeoutsRemaining { side: side.name() });
        }
        self.situation.timeouts[side.index()] -= 1;
        log::debug!(
            "timeout {} ({} left)",
            side.name(),
            self.situation.timeouts_for(side)
        );
        Ok(())
    }

    pub fn timeout_decision(&self) -> ClockDecision {
        let mut decision = ClockDecision::running(0);
        decision.stop_for(StoppingReason::Timeout);
        decision
    }

    /// Commit a decision's down/distance/possession/score changes.
    pub fn apply_decision(&mut self, decision: &ClockDecision) -> ClockResult<()> {
        let next = self.preview(decision);
        self.validate_situation(&next)?;
        self.situation = next;
        Ok(())
    }

    /// The situation a decision would produce.
    pub fn preview(&self, decision: &ClockDecision) -> GameSituation {
        let mut next = self.situation.clone();
        if let Some(score) = decision.score {
            next.score[score.side.index()] += score.points as u16;
        }
        if decision.possession_change {
            next.possession = next.possession.opponent();
        }
        if let Some(spot) = decision.new_ball_on {
            next.ball_on = spot;
        }
        if let Some(down) = decision.new_down {
            next.down = down;
        }
        if let Some(distance) = decision.new_distance {
            next.distance = distance;
        }
        next
    }

    // ── Internals ──────────────────────────────────────────────────

    fn seconds_for(&self, outcome: &PlayOutcome) -> Seconds {
        let raw = match outcome.play_type {
            _ if outcome.is_try() => 0,
            PlayType::Kneel => self.config.kneel_runoff,
            PlayType::Spike => self.config.spike_runoff,
            _ => outcome.duration.unwrap_or(self.config.default_play_duration),
        };
        raw.min(self.config.play_clock_normal)
    }

    fn crosses_two_minute_warning(&self, seconds: Seconds) -> bool {
        let s = &self.situation;
        let threshold = self.config.two_minute_warning_time;
        self.config.features.two_minute_warning
            && s.quarter.ends_half()
            && s.time_remaining > threshold
            && s.time_remaining.saturating_sub(seconds) <= threshold
    }

    fn decide_try(&self, outcome: &PlayOutcome, decision: &mut ClockDecision) {
        // Possession already flipped on the touchdown; the try belongs
        // to the team that just scored.
        let scorer = self.situation.possession.opponent();
        let points = if outcome.two_point_attempt {
            outcome.touchdown.then_some(TWO_POINT_POINTS)
        } else {
            outcome.kick_good.then_some(EXTRA_POINT_POINTS)
        };
        if let Some(points) = points {
            decision.score = Some(ScoringPlay { side: scorer, points });
            decision.stop_for(StoppingReason::Score);
        } else {
            decision.stop_for(StoppingReason::Administrative);
        }
    }

    fn decide_field_goal(&self, outcome: &PlayOutcome, decision: &mut ClockDecision) {
        let s = &self.situation;
        if outcome.kick_good {
            decision.score = Some(ScoringPlay { side: s.possession, points: FIELD_GOAL_POINTS });
            decision.stop_for(StoppingReason::Score);
            self.change_possession(decision, s.possession.opponent(), TOUCHBACK_SPOT);
        } else {
            let kick_spot = s.ball_on.saturating_sub(FIELD_GOAL_SNAP_DEPTH);
            let spot = flip_spot(kick_spot as i32).max(MISSED_FIELD_GOAL_MIN_SPOT);
            decision.stop_for(StoppingReason::Administrative);
            self.change_possession(decision, s.possession.opponent(), spot);
        }
    }

    /// Ordinary run/pass/kneel/spike/kickoff-return series logic.
    fn decide_scrimmage(&self, outcome: &PlayOutcome, decision: &mut ClockDecision) {
        let s = &self.situation;
        let spot = clamp_spot(s.ball_on as i32 + outcome.yards_gained);
        let gained_line = outcome.first_down || outcome.yards_gained >= s.distance as i32;

        if gained_line {
            decision.first_and_ten(spot);
            let mut after = s.clone();
            after.time_remaining = s.time_remaining.saturating_sub(decision.seconds_elapsed);
            if self.config.features.clock_stop_first_down && self.is_inside_two_minutes(&after) {
                decision.stop_for(StoppingReason::Administrative);
            }
        } else if s.down >= 4 {
            // Turnover on downs.
            decision.stop_for(StoppingReason::Administrative);
            self.change_possession(decision, s.possession.opponent(), flip_spot(spot as i32));
        } else {
            let remaining = (s.distance as i32 - outcome.yards_gained).max(0);
            let max_distance = MAX_DISTANCE.min(100 - spot) as i32;
            decision.new_down = Some(s.down + 1);
            decision.new_distance = Some(remaining.min(max_distance) as u8);
            decision.new_ball_on = Some(spot);
        }
    }

    fn change_possession(&self, decision: &mut ClockDecision, to: Side, ball_on: u8) {
        decision.possession_change = to != self.situation.possession;
        decision.new_down = Some(1);
        decision.new_distance = Some(first_down_distance(ball_on));
        decision.new_ball_on = Some(ball_on);
    }
}

fn clamp_spot(yards_from_goal: i32) -> u8 {
    yards_from_goal.clamp(1, 99) as u8
}

/// Same spot seen from the other team's goal line.
fn flip_spot(yards_from_goal: i32) -> u8 {
    clamp_spot(100_i32.saturating_sub(yards_from_goal))
}

fn half_distance_cap(yards: u8, distance_to_goal: u8) -> u8 {
    let half = distance_to_goal / 2;
    if yards > half { half } else { yards }
}
