//! Game simulation driver: feeds a PlayCaller's outcomes through a
//! GameClock until the game ends.
//!
//! STEP ORDER (fixed, never reordered):
//!   1. Open the game / second half when the clock is between halves.
//!   2. End an expired quarter (or a finished untimed overtime period).
//!   3. Pre-snap penalty, if the caller flags one.
//!   4. Timeout, if the caller wants one.
//!   5. Huddle: tick the game clock while it runs.
//!   6. Snap: kickoff, try or scrimmage play through process_play().
//!
//! RULES:
//!   - The driver never touches clock fields; it only calls GameClock
//!     operations and reacts to the events they return.
//!   - Every ClockEvent is persisted in the order it was emitted.
//!   - All randomness lives inside the PlayCaller.

use crate::{
    clock::GameClock,
    config::ClockConfig,
    error::ClockResult,
    event::{ClockEvent, EventLogEntry},
    play_caller::{PlayCaller, SeededPlayCaller},
    quarter::{GameState, Quarter},
    rules::TOUCHDOWN_POINTS,
    snapshot::GameSnapshot,
    store::GameStore,
    types::{GameId, PlayIndex},
};

/// Possession changes that make up one untimed overtime period.
const UNTIMED_PERIOD_POSSESSIONS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NextSnap {
    Kickoff,
    Try,
    Scrimmage,
}

pub struct GameSim {
    pub game_id:     GameId,
    pub clock:       GameClock,
    seed:            u64,
    caller:          Box<dyn PlayCaller>,
    store:           GameStore,
    play_index:      PlayIndex,
    next_snap:       NextSnap,
    ot_possessions:  u32,
}

impl GameSim {
    pub fn new(game_id: GameId, seed: u64, config: ClockConfig, store: GameStore) -> Self {
        Self {
            clock:          GameClock::new(config),
            caller:         Box::new(SeededPlayCaller::new(seed)),
            seed,
            store,
            play_index:     0,
            next_snap:      NextSnap::Kickoff,
            ot_possessions: 0,
            game_id,
        }
    }

    /// Create the game record and return a ready driver.
    /// Call this instead of new() + manual insert_game().
    pub fn build(
        game_id: GameId,
        seed: u64,
        config: ClockConfig,
        store: GameStore,
        started_at: &str,
    ) -> ClockResult<Self> {
        store.insert_game(
            &game_id,
            seed,
            config.preset.name(),
            env!("CARGO_PKG_VERSION"),
            started_at,
        )?;
        Ok(Self::new(game_id, seed, config, store))
    }

    /// Swap in a different play caller before the game starts.
    pub fn with_caller(mut self, caller: Box<dyn PlayCaller>) -> Self {
        self.caller = caller;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn play_index(&self) -> PlayIndex {
        self.play_index
    }

    pub fn caller_name(&self) -> &'static str {
        self.caller.name()
    }

    pub fn is_finished(&self) -> bool {
        self.clock.state() == GameState::GameEnd
    }

    /// One unit of game flow. Returns the events it produced; a finished
    /// game produces none.
    pub fn step(&mut self) -> ClockResult<Vec<ClockEvent>> {
        let events = match self.clock.state() {
            GameState::GameEnd => return Ok(vec![]),
            GameState::PreGame => {
                self.next_snap = NextSnap::Kickoff;
                self.clock.start_game()?
            }
            GameState::Halftime => {
                self.next_snap = NextSnap::Kickoff;
                self.clock.resume_second_half()?
            }
            GameState::Playing => self.step_playing()?,
        };
        self.record(&events)?;
        Ok(events)
    }

    fn step_playing(&mut self) -> ClockResult<Vec<ClockEvent>> {
        let between_snaps = self.next_snap != NextSnap::Try;

        if between_snaps && self.period_over() {
            let events = self.clock.end_quarter()?;
            if events.iter().any(|e| matches!(e, ClockEvent::OvertimeStarted { .. })) {
                self.ot_possessions = 0;
                self.next_snap = if self.clock.is_untimed() {
                    NextSnap::Scrimmage
                } else {
                    NextSnap::Kickoff
                };
            }
            return Ok(events);
        }

        let mut events = Vec::new();
        let snapshot = self.clock.snapshot();

        if self.next_snap == NextSnap::Scrimmage {
            if let Some(penalty) = self.caller.call_penalty(self.clock.situation(), &snapshot) {
                return self.clock.process_penalty(&penalty);
            }
            if let Some(side) = self.caller.wants_timeout(self.clock.situation(), &snapshot) {
                if self.clock.rules().can_call_timeout(side) {
                    events.extend(self.clock.call_timeout(side)?);
                }
            }
        }

        if self.clock.is_running() {
            let huddle = self.caller.huddle_seconds(self.clock.situation(), &snapshot);
            let per_tick = self.clock.speed().seconds_per_tick();
            let ticks = huddle.div_ceil(per_tick);
            for _ in 0..ticks {
                events.extend(self.clock.tick()?);
                if !self.clock.is_running() {
                    break;
                }
            }
            if self.clock.time_remaining() == 0 {
                return Ok(events);
            }
        }

        let snapshot = self.clock.snapshot();
        let situation = self.clock.situation();
        let outcome = match self.next_snap {
            NextSnap::Kickoff => self.caller.call_kickoff(situation, &snapshot),
            NextSnap::Try => self.caller.call_try(situation, &snapshot),
            NextSnap::Scrimmage => self.caller.call_play(situation, &snapshot),
        };
        let was_try = self.next_snap == NextSnap::Try;
        let play_events = self.clock.process_play(&outcome)?;
        self.play_index += 1;

        let touchdown = !was_try && play_events.iter().any(|e| matches!(
            e,
            ClockEvent::ScoreChanged { points, .. } if *points == TOUCHDOWN_POINTS
        ));
        let scored = play_events.iter().any(|e| matches!(e, ClockEvent::ScoreChanged { .. }));
        if self.clock.quarter() == Quarter::Overtime {
            self.ot_possessions += play_events
                .iter()
                .filter(|e| matches!(e, ClockEvent::PossessionChanged { .. }))
                .count() as u32;
        }

        self.next_snap = if touchdown {
            NextSnap::Try
        } else if (scored || was_try) && !self.clock.is_untimed() {
            NextSnap::Kickoff
        } else {
            NextSnap::Scrimmage
        };

        events.extend(play_events);
        Ok(events)
    }

    /// The current period has nothing left to play.
    fn period_over(&self) -> bool {
        if self.clock.is_untimed() {
            self.ot_possessions >= UNTIMED_PERIOD_POSSESSIONS
        } else {
            self.clock.time_remaining() == 0
        }
    }

    /// Run until `n` more plays have been snapped or the game ends.
    pub fn run_plays(&mut self, n: u64) -> ClockResult<()> {
        let target = self.play_index + n;
        while self.play_index < target && !self.is_finished() {
            self.step()?;
        }
        Ok(())
    }

    /// Play the whole game, capped at `max_plays` snaps.
    pub fn run_game(&mut self, max_plays: u64) -> ClockResult<()> {
        while !self.is_finished() && self.play_index < max_plays {
            self.step()?;
        }
        if !self.is_finished() {
            log::warn!(
                "game {} stopped at the {max_plays}-play cap in the {} quarter",
                self.game_id,
                self.clock.quarter().label()
            );
        }
        Ok(())
    }

    /// Final or current score as (home, away).
    pub fn score(&self) -> (u16, u16) {
        let s = self.clock.situation();
        (s.score[0], s.score[1])
    }

    /// Query the persisted log. Used by the determinism test and replay tooling.
    pub fn store_events(&self) -> ClockResult<Vec<EventLogEntry>> {
        self.store.events_for_game(&self.game_id)
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Persist events against the current play index. Quarter and game
    /// boundaries also write a snapshot.
    pub fn record(&self, events: &[ClockEvent]) -> ClockResult<()> {
        for event in events {
            let entry = EventLogEntry {
                id:         None,
                game_id:    self.game_id.clone(),
                play_index: self.play_index,
                event_type: event.type_name().to_string(),
                payload:    serde_json::to_string(event)?,
            };
            self.store.append_event(&entry)?;
        }

        let boundary = events.iter().any(|e| matches!(
            e,
            ClockEvent::QuarterEnded { .. } | ClockEvent::GameEnded { .. }
        ));
        if boundary {
            self.take_snapshot()?;
        }
        Ok(())
    }

    fn take_snapshot(&self) -> ClockResult<()> {
        let snapshot = GameSnapshot {
            game_id:    self.game_id.clone(),
            play_index: self.play_index,
            clock:      self.clock.clone(),
        };
        let json = serde_json::to_string(&snapshot)?;
        self.store.save_snapshot(&self.game_id, self.play_index, &json)?;
        log::debug!("Snapshot saved at play {}", self.play_index);
        Ok(())
    }
}
