//! Game clock: owns time remaining, the play clock, quarter state and
//! the two-minute-warning record. Sole authority over game time.
//!
//! RULES:
//!   - Every public mutator either fully succeeds or returns an error
//!     with no field changed. Fallible work happens before the first
//!     write.
//!   - Quarter/state changes only go through `quarter::transition()`.
//!   - The clock never advances quarters on its own: `tick()` reports
//!     expiry and the caller calls `end_quarter()`.
//!   - The rules engine's situation mirrors `quarter` and
//!     `time_remaining` after every mutation.

use crate::{
    config::{ClockConfig, OvertimeType},
    decision::{ClockDecision, PlayClockReset, ScoringPlay},
    error::{ClockError, ClockResult},
    event::ClockEvent,
    play::{Penalty, PlayOutcome},
    quarter::{
        transition, ClockRunState, GameState, Quarter, StoppingReason, TransitionContext,
        TransitionEffect, Trigger,
    },
    rules::{RulesEngine, FIELD_GOAL_POINTS},
    situation::{GameSituation, TOUCHBACK_SPOT},
    snapshot::ClockSnapshot,
    types::{Seconds, Side},
};
use serde::{Deserialize, Serialize};

/// College overtime possessions start at the opponent's 25.
const UNTIMED_OVERTIME_SPOT: u8 = 75;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClockSpeed {
    RealTime,        // 1 game second per tick
    Accelerated2x,
    Accelerated5x,
    Accelerated10x,
    Custom(u32),
}

impl ClockSpeed {
    pub fn seconds_per_tick(&self) -> Seconds {
        match self {
            ClockSpeed::RealTime       => 1,
            ClockSpeed::Accelerated2x  => 2,
            ClockSpeed::Accelerated5x  => 5,
            ClockSpeed::Accelerated10x => 10,
            ClockSpeed::Custom(n)      => (*n).max(1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameClock {
    quarter:                   Quarter,
    time_remaining:            Seconds,
    play_clock:                Seconds,
    is_running:                bool,
    play_clock_running:        bool,
    state:                     GameState,
    /// [first half, second half]. Overtime has no warning.
    two_minute_warning_given:  [bool; 2],
    overtime_period:           u32,
    speed:                     ClockSpeed,
    last_stop:                 Option<StoppingReason>,
    challenges:                [u8; 2],
    opening_receiver:          Side,
    overtime_first_possession: bool,
    config:                    ClockConfig,
    rules:                     RulesEngine,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(ClockConfig::default())
    }
}

impl GameClock {
    pub fn new(config: ClockConfig) -> Self {
        let situation = GameSituation::new(Side::Home, config.timeouts_per_half, config.quarter_length);
        Self {
            quarter:                   Quarter::Q1,
            time_remaining:            config.quarter_length,
            play_clock:                config.play_clock_normal,
            is_running:                false,
            play_clock_running:        false,
            state:                     GameState::PreGame,
            two_minute_warning_given:  [false; 2],
            overtime_period:           0,
            speed:                     ClockSpeed::RealTime,
            last_stop:                 None,
            challenges:                [config.challenges_per_game; 2],
            opening_receiver:          Side::Home,
            overtime_first_possession: false,
            rules:                     RulesEngine::new(config.clone(), situation),
            config,
        }
    }

    /// Pick the team that receives the opening kickoff.
    pub fn with_opening_receiver(mut self, side: Side) -> Self {
        self.opening_receiver = side;
        self.rules.situation_mut().possession = side;
        self
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn quarter(&self) -> Quarter { self.quarter }
    pub fn time_remaining(&self) -> Seconds { self.time_remaining }
    pub fn play_clock(&self) -> Seconds { self.play_clock }
    pub fn is_running(&self) -> bool { self.is_running }
    pub fn is_play_clock_running(&self) -> bool { self.play_clock_running }
    pub fn state(&self) -> GameState { self.state }
    pub fn overtime_period(&self) -> u32 { self.overtime_period }
    pub fn speed(&self) -> ClockSpeed { self.speed }
    pub fn config(&self) -> &ClockConfig { &self.config }
    pub fn rules(&self) -> &RulesEngine { &self.rules }
    pub fn situation(&self) -> &GameSituation { self.rules.situation() }
    pub fn last_stop(&self) -> Option<StoppingReason> { self.last_stop }

    pub fn two_minute_warning_given(&self) -> [bool; 2] {
        self.two_minute_warning_given
    }

    pub fn challenges_remaining(&self, side: Side) -> u8 {
        self.challenges[side.index()]
    }

    pub fn run_state(&self) -> ClockRunState {
        if self.is_running {
            ClockRunState::Running
        } else {
            ClockRunState::Stopped { reason: self.last_stop }
        }
    }

    /// Overtime under untimed (college) rules: no game clock.
    pub fn is_untimed(&self) -> bool {
        self.quarter == Quarter::Overtime && self.config.untimed_overtime()
    }

    /// Upper bound for `time_remaining` in the current quarter.
    pub fn time_limit(&self) -> Seconds {
        match self.quarter {
            Quarter::Overtime => self.config.overtime_length,
            _ => self.config.quarter_length,
        }
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            quarter:         self.quarter,
            time_remaining:  self.time_remaining,
            play_clock:      self.play_clock,
            state:           self.state,
            is_running:      self.is_running,
            overtime_period: self.overtime_period,
        }
    }

    // ── Run control ────────────────────────────────────────────────

    pub fn start(&mut self) -> ClockResult<()> {
        self.ensure_not_ended()?;
        if self.is_running {
            return Err(ClockError::ClockAlreadyRunning);
        }
        if self.state != GameState::Playing {
            return Err(ClockError::invalid_state(format!(
                "cannot start the clock in {:?}", self.state
            )));
        }
        if self.is_untimed() {
            return Err(ClockError::invalid_state("overtime periods are untimed"));
        }
        if self.time_remaining == 0 {
            return Err(ClockError::invalid_state("no time remaining in the quarter"));
        }
        self.is_running = true;
        log::debug!("clock started {} {}s", self.quarter.label(), self.time_remaining);
        Ok(())
    }

    pub fn stop(&mut self, reason: StoppingReason) -> ClockResult<()> {
        self.ensure_not_ended()?;
        if !self.is_running {
            return Err(ClockError::ClockNotRunning);
        }
        self.is_running = false;
        self.last_stop = Some(reason);
        log::debug!(
            "clock stopped {} {}s ({reason:?})",
            self.quarter.label(),
            self.time_remaining
        );
        Ok(())
    }

    /// Advance one tick of `speed.seconds_per_tick()` game seconds.
    /// A stopped clock ignores ticks.
    pub fn tick(&mut self) -> ClockResult<Vec<ClockEvent>> {
        self.ensure_not_ended()?;
        if !self.is_running {
            return Ok(vec![]);
        }

        let step = self.speed.seconds_per_tick();
        let mut events = Vec::new();

        self.time_remaining = self.time_remaining.saturating_sub(step);

        if self.play_clock_running {
            let before = self.play_clock;
            self.play_clock = self.play_clock.saturating_sub(step);
            if before > 0 && self.play_clock == 0 {
                self.play_clock_running = false;
                log::debug!("play clock expired at {}s", self.time_remaining);
                events.push(ClockEvent::PlayClockExpired {
                    quarter:        self.quarter,
                    time_remaining: self.time_remaining,
                });
            }
        }

        if self.should_trigger_two_minute_warning() {
            events.extend(self.fire_two_minute_warning());
        }

        if self.time_remaining == 0 {
            events.extend(self.expire_quarter());
        }

        self.sync_situation();
        debug_assert!(self.check_invariants().is_ok(), "{:?}", self.check_invariants());
        Ok(events)
    }

    pub fn set_clock_speed(&mut self, speed: ClockSpeed) -> ClockResult<()> {
        self.ensure_not_ended()?;
        self.speed = speed;
        Ok(())
    }

    // ── Play clock ─────────────────────────────────────────────────

    pub fn set_play_clock(&mut self, seconds: Seconds) -> ClockResult<()> {
        self.ensure_not_ended()?;
        if seconds > self.config.play_clock_normal {
            return Err(ClockError::InvalidPlayClock {
                seconds,
                max: self.config.play_clock_normal,
            });
        }
        self.play_clock = seconds;
        Ok(())
    }

    pub fn reset_play_clock(&mut self, kind: PlayClockReset) -> ClockResult<()> {
        self.ensure_not_ended()?;
        self.play_clock = self.play_clock_value(kind);
        Ok(())
    }

    pub fn start_play_clock(&mut self) -> ClockResult<()> {
        self.ensure_not_ended()?;
        self.play_clock_running = true;
        Ok(())
    }

    pub fn stop_play_clock(&mut self) -> ClockResult<()> {
        self.ensure_not_ended()?;
        self.play_clock_running = false;
        Ok(())
    }

    // ── Two-minute warning ─────────────────────────────────────────

    pub fn should_trigger_two_minute_warning(&self) -> bool {
        let Some(half) = self.quarter.half() else {
            return false;
        };
        self.config.features.two_minute_warning
            && self.state == GameState::Playing
            && self.quarter.ends_half()
            && !self.two_minute_warning_given[half]
            && self.time_remaining <= self.config.two_minute_warning_time
    }

    /// Stop the clock for the warning. Calling it again in the same half
    /// changes nothing.
    pub fn trigger_two_minute_warning(&mut self) -> ClockResult<Vec<ClockEvent>> {
        self.ensure_playing()?;
        if self.quarter.half().is_none() {
            return Err(ClockError::InvalidQuarter {
                quarter: self.quarter,
                reason:  "no two-minute warning in overtime".into(),
            });
        }
        Ok(self.fire_two_minute_warning())
    }

    fn fire_two_minute_warning(&mut self) -> Vec<ClockEvent> {
        let Some(half) = self.quarter.half() else {
            return vec![];
        };
        if self.two_minute_warning_given[half] {
            return vec![];
        }
        self.two_minute_warning_given[half] = true;
        self.is_running = false;
        self.last_stop = Some(StoppingReason::TwoMinuteWarning);
        log::info!(
            "two-minute warning: {} quarter, {}s left",
            self.quarter.label(),
            self.time_remaining
        );
        vec![ClockEvent::TwoMinuteWarning {
            quarter:        self.quarter,
            time_remaining: self.time_remaining,
        }]
    }

    fn expire_quarter(&mut self) -> Vec<ClockEvent> {
        self.is_running = false;
        self.last_stop = Some(StoppingReason::QuarterEnd);
        log::info!("{} quarter expired", self.quarter.label());
        vec![ClockEvent::QuarterExpired { quarter: self.quarter }]
    }

    // ── Quarter transitions ────────────────────────────────────────

    pub fn start_game(&mut self) -> ClockResult<Vec<ClockEvent>> {
        self.apply_transition(Trigger::StartGame)
    }

    pub fn end_quarter(&mut self) -> ClockResult<Vec<ClockEvent>> {
        self.apply_transition(Trigger::EndQuarter)
    }

    pub fn resume_second_half(&mut self) -> ClockResult<Vec<ClockEvent>> {
        self.apply_transition(Trigger::ResumeSecondHalf)
    }

    pub fn start_overtime(&mut self) -> ClockResult<Vec<ClockEvent>> {
        self.apply_transition(Trigger::StartOvertime)
    }

    fn transition_context(&self) -> TransitionContext {
        TransitionContext {
            time_remaining:       self.time_remaining,
            scores_tied:          self.situation().scores_tied(),
            overtime_enabled:     self.config.features.overtime,
            untimed_overtime:     self.config.untimed_overtime(),
            overtime_period:      self.overtime_period,
            overtime_max_periods: self.config.overtime_max_periods,
            quarter_length:       self.config.quarter_length,
            overtime_length:      self.config.overtime_length,
            timeouts_per_half:    self.config.timeouts_per_half,
            overtime_timeouts:    self.config.overtime_timeouts,
        }
    }

    fn apply_transition(&mut self, trigger: Trigger) -> ClockResult<Vec<ClockEvent>> {
        let next = transition(self.quarter, self.state, trigger, &self.transition_context())?;
        let from = self.quarter;
        let from_state = self.state;
        let mut events = Vec::new();

        self.quarter = next.quarter;
        self.state = next.state;
        if trigger == Trigger::EndQuarter || trigger == Trigger::StartOvertime {
            self.last_stop = Some(StoppingReason::QuarterEnd);
        }

        for effect in &next.effects {
            match *effect {
                TransitionEffect::StopClock => {
                    self.is_running = false;
                    self.play_clock_running = false;
                }
                TransitionEffect::SetTime { seconds } => self.time_remaining = seconds,
                TransitionEffect::ResetPlayClock => self.play_clock = self.config.play_clock_normal,
                TransitionEffect::ResetTimeouts { per_side } => {
                    self.rules.situation_mut().timeouts = [per_side; 2];
                }
                TransitionEffect::OpeningKickoff => {
                    let spot = if self.is_untimed() { UNTIMED_OVERTIME_SPOT } else { TOUCHBACK_SPOT };
                    let receiver = self.opening_receiver;
                    self.rules.situation_mut().new_series(receiver, spot);
                    if from_state == GameState::PreGame {
                        events.push(ClockEvent::GameStarted { receiving: receiver });
                    }
                }
                TransitionEffect::SecondHalfKickoff => {
                    let receiver = self.opening_receiver.opponent();
                    self.rules.situation_mut().new_series(receiver, TOUCHBACK_SPOT);
                    events.push(ClockEvent::SecondHalfStarted { receiving: receiver });
                }
                TransitionEffect::BeginOvertimePeriod => {
                    self.overtime_period += 1;
                    self.overtime_first_possession = true;
                    events.push(ClockEvent::OvertimeStarted {
                        period:    self.overtime_period,
                        receiving: self.opening_receiver,
                    });
                }
                TransitionEffect::EndGame => {
                    let situation = self.situation();
                    events.push(ClockEvent::GameEnded {
                        home: situation.score_for(Side::Home),
                        away: situation.score_for(Side::Away),
                    });
                }
            }
        }

        if from_state != GameState::PreGame {
            events.insert(0, ClockEvent::QuarterEnded {
                from,
                to:    self.quarter,
                state: self.state,
            });
        }
        log::info!(
            "{trigger:?}: {} {:?} -> {} {:?}",
            from.label(),
            from_state,
            self.quarter.label(),
            self.state
        );

        self.sync_situation();
        debug_assert!(self.check_invariants().is_ok(), "{:?}", self.check_invariants());
        Ok(events)
    }

    // ── Plays, penalties, timeouts ─────────────────────────────────

    /// Run a finished play through the rules engine and apply the verdict.
    pub fn process_play(&mut self, outcome: &PlayOutcome) -> ClockResult<Vec<ClockEvent>> {
        self.ensure_playing()?;
        let decision = self.rules.process_play(outcome)?;
        self.apply_decision(&decision, true)
    }

    pub fn process_penalty(&mut self, penalty: &Penalty) -> ClockResult<Vec<ClockEvent>> {
        self.ensure_playing()?;
        let decision = self.rules.process_penalty(penalty)?;
        let mut events = vec![ClockEvent::PenaltyEnforced {
            foul:    penalty.foul.clone(),
            yards:   penalty.yards,
            against: penalty.against,
        }];
        events.extend(self.apply_decision(&decision, false)?);
        Ok(events)
    }

    pub fn call_timeout(&mut self, side: Side) -> ClockResult<Vec<ClockEvent>> {
        self.ensure_playing()?;
        if !self.rules.can_call_timeout(side) {
            return Err(ClockError::NoTimeoutsRemaining { side: side.name() });
        }
        let decision = self.rules.timeout_decision();
        // Validate before the timeout is spent.
        self.rules.validate_situation(&self.rules.preview(&decision))?;
        self.rules.use_timeout(side)?;
        let mut events = vec![ClockEvent::TimeoutCalled {
            side,
            remaining: self.situation().timeouts_for(side),
        }];
        events.extend(self.apply_decision(&decision, false)?);
        Ok(events)
    }

    /// Spend one of `side`'s replay challenges. Returns how many remain.
    pub fn use_challenge(&mut self, side: Side) -> ClockResult<u8> {
        self.ensure_playing()?;
        let left = &mut self.challenges[side.index()];
        if *left == 0 {
            return Err(ClockError::NoChallengesRemaining { side: side.name() });
        }
        *left -= 1;
        Ok(*left)
    }

    /// Apply a decision. `snapped` marks a live-ball play: the clock
    /// runs from the snap unless the decision stops it.
    fn apply_decision(&mut self, decision: &ClockDecision, snapped: bool) -> ClockResult<Vec<ClockEvent>> {
        let offense = self.situation().possession;
        let was_first_possession = self.overtime_first_possession;

        // Only fallible step; nothing has been written before it.
        self.rules.apply_decision(decision)?;

        let mut events = Vec::new();
        let timed = !self.is_untimed();
        let had_time = self.time_remaining > 0;

        if timed && had_time {
            self.time_remaining = self.time_remaining.saturating_sub(decision.seconds_elapsed);
        }

        if !timed || self.time_remaining == 0 {
            self.is_running = false;
            if timed && had_time {
                events.extend(self.expire_quarter());
            }
        } else if decision.should_stop_clock {
            let reason = decision.stopping_reason.unwrap_or(StoppingReason::Administrative);
            if self.is_running || snapped {
                events.push(ClockEvent::ClockStopped {
                    quarter:        self.quarter,
                    time_remaining: self.time_remaining,
                    reason,
                });
            }
            self.is_running = false;
            self.last_stop = Some(reason);
        } else if snapped {
            self.is_running = true;
        }

        if decision.trigger_two_minute_warning || self.should_trigger_two_minute_warning() {
            events.extend(self.fire_two_minute_warning());
        }

        self.play_clock = self.play_clock_value(decision.play_clock_reset);
        self.play_clock_running = true;

        let situation = self.situation();
        if snapped {
            events.push(ClockEvent::PlayResolved {
                quarter:         self.quarter,
                time_remaining:  self.time_remaining,
                seconds_elapsed: decision.seconds_elapsed,
                down:            situation.down,
                distance:        situation.distance,
                ball_on:         situation.ball_on,
                possession:      situation.possession,
            });
        }
        if let Some(score) = decision.score {
            events.push(ClockEvent::ScoreChanged {
                side:   score.side,
                points: score.points,
                home:   situation.score_for(Side::Home),
                away:   situation.score_for(Side::Away),
            });
        }
        if decision.possession_change {
            events.push(ClockEvent::PossessionChanged { to: situation.possession });
        }

        if self.quarter == Quarter::Overtime {
            if self.overtime_decided(decision.score, decision.possession_change, offense, was_first_possession) {
                events.extend(self.apply_transition(Trigger::OvertimeScore)?);
            }
            if decision.possession_change {
                self.overtime_first_possession = false;
            }
        }

        self.sync_situation();
        debug_assert!(self.check_invariants().is_ok(), "{:?}", self.check_invariants());
        Ok(events)
    }

    /// Whether an overtime play settles the game.
    fn overtime_decided(
        &self,
        score: Option<ScoringPlay>,
        possession_change: bool,
        offense: Side,
        was_first_possession: bool,
    ) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let tied = self.situation().scores_tied();
        match self.config.overtime_type {
            OvertimeType::SuddenDeath => score.is_some(),
            OvertimeType::Untimed => false,
            OvertimeType::ModifiedSuddenDeath => {
                if tied {
                    return false;
                }
                match score {
                    // An opening-drive field goal only earns the lead.
                    Some(s) if was_first_possession
                        && s.points == FIELD_GOAL_POINTS
                        && s.side == offense => false,
                    Some(_) => true,
                    // Trailing team's answering drive ended without a tie.
                    None => possession_change && !was_first_possession,
                }
            }
        }
    }

    // ── Configuration ──────────────────────────────────────────────

    /// Swap the attached config. All-or-nothing.
    pub fn update_config(&mut self, new: ClockConfig) -> ClockResult<Vec<ClockEvent>> {
        self.ensure_not_ended()?;
        let new_time = match self.check_config_change(&new) {
            Ok(time) => time,
            Err(e) => {
                log::warn!("rejected config update to {}: {e}", new.preset.name());
                return Err(e);
            }
        };

        self.time_remaining = new_time;
        if self.state == GameState::PreGame {
            self.challenges = [new.challenges_per_game; 2];
            self.rules.situation_mut().timeouts = [new.timeouts_per_half; 2];
        }
        self.rules.set_config(new.clone());
        self.config = new;
        self.sync_situation();
        log::info!(
            "config updated to {} ({}s remaining)",
            self.config.preset.name(),
            self.time_remaining
        );
        Ok(vec![ClockEvent::ConfigUpdated {
            preset:         self.config.preset,
            time_remaining: self.time_remaining,
        }])
    }

    /// Time remaining the clock would carry under `new`, or why `new`
    /// cannot be attached right now.
    fn check_config_change(&self, new: &ClockConfig) -> ClockResult<Seconds> {
        new.validate()?;
        if new.play_clock_normal < self.play_clock {
            return Err(ClockError::invalid_config(format!(
                "play_clock_normal {}s is below the running play clock {}s",
                new.play_clock_normal, self.play_clock
            )));
        }

        match (self.state, self.quarter) {
            (GameState::PreGame, _) => Ok(new.quarter_length),
            (_, Quarter::Overtime) => {
                if !new.features.overtime || new.overtime_type != self.config.overtime_type {
                    return Err(ClockError::invalid_config(
                        "overtime rules cannot change during overtime",
                    ));
                }
                if !new.untimed_overtime() && new.overtime_length < self.time_remaining {
                    return Err(ClockError::invalid_config(format!(
                        "overtime_length {}s is below the {}s remaining",
                        new.overtime_length, self.time_remaining
                    )));
                }
                Ok(self.time_remaining)
            }
            _ => {
                // Compatibility is judged on the current reading; only an
                // accepted preset switch rescales.
                self.config.check_compatible_change(new, self.time_remaining)?;
                Ok(self.config.rescaled_time(new, self.time_remaining))
            }
        }
    }

    // ── Reset and recovery ─────────────────────────────────────────

    /// Explicit game restart. Keeps config, speed and opening receiver.
    pub fn reset(&mut self) {
        let speed = self.speed;
        let receiver = self.opening_receiver;
        *self = GameClock::new(self.config.clone()).with_opening_receiver(receiver);
        self.speed = speed;
        log::info!("game clock reset");
    }

    /// Recovery only: clamp clock values back into range. Never called
    /// by normal game flow. Returns true when something was corrected.
    pub fn reset_to_valid_state(&mut self) -> bool {
        let before = self.clone();

        self.time_remaining = self.time_remaining.min(self.time_limit());
        self.play_clock = self.play_clock.min(self.config.play_clock_normal);
        if self.state != GameState::Playing || self.time_remaining == 0 || self.is_untimed() {
            self.is_running = false;
        }
        if self.state == GameState::GameEnd {
            self.play_clock_running = false;
        }
        self.sync_situation();

        let changed = *self != before;
        if changed {
            log::warn!(
                "reset_to_valid_state corrected clock: {}s/{}s -> {}s/{}s",
                before.time_remaining,
                before.play_clock,
                self.time_remaining,
                self.play_clock
            );
        }
        changed
    }

    /// Recovery only: bring the play clock and the situation mirror back
    /// in line with the game clock.
    pub fn sync_clocks(&mut self) -> bool {
        let before = self.clone();

        self.play_clock = self.play_clock.min(self.config.play_clock_normal);
        if self.play_clock == 0 {
            self.play_clock_running = false;
        }
        self.time_remaining = self.time_remaining.min(self.time_limit());
        if self.time_remaining == 0 {
            self.is_running = false;
        }
        self.sync_situation();

        let changed = *self != before;
        if changed {
            log::warn!("sync_clocks corrected clock state");
        }
        changed
    }

    /// First violated invariant, if any.
    pub fn check_invariants(&self) -> ClockResult<()> {
        let fail = |reason: String| Err(ClockError::InvalidState { reason });
        if self.time_remaining > self.time_limit() {
            return fail(format!(
                "time_remaining {}s exceeds {}s", self.time_remaining, self.time_limit()
            ));
        }
        if self.play_clock > self.config.play_clock_normal {
            return fail(format!(
                "play_clock {}s exceeds {}s", self.play_clock, self.config.play_clock_normal
            ));
        }
        if self.is_running && self.state != GameState::Playing {
            return fail(format!("clock running in {:?}", self.state));
        }
        if self.is_running && self.time_remaining == 0 {
            return fail("clock running with no time left".into());
        }
        let situation = self.situation();
        if situation.quarter != self.quarter || situation.time_remaining != self.time_remaining {
            return fail("situation out of sync with clock".into());
        }
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────────

    fn ensure_not_ended(&self) -> ClockResult<()> {
        if self.state == GameState::GameEnd {
            return Err(ClockError::GameAlreadyEnded);
        }
        Ok(())
    }

    fn ensure_playing(&self) -> ClockResult<()> {
        self.ensure_not_ended()?;
        if self.state != GameState::Playing {
            return Err(ClockError::invalid_state(format!(
                "not in play ({:?})", self.state
            )));
        }
        Ok(())
    }

    fn play_clock_value(&self, kind: PlayClockReset) -> Seconds {
        match kind {
            PlayClockReset::Normal => self.config.play_clock_normal,
            PlayClockReset::Short  => self.config.play_clock_short,
        }
    }

    fn sync_situation(&mut self) {
        let quarter = self.quarter;
        let time_remaining = self.time_remaining;
        let situation = self.rules.situation_mut();
        situation.quarter = quarter;
        situation.time_remaining = time_remaining;
    }
}
