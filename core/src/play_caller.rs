//! Play callers: produce the PlayOutcome records a simulated game feeds
//! into the clock. The clock never generates outcomes itself; this is
//! the stand-in for a real play-resolution layer.
//!
//! RULE: A caller may only read the situation and a clock snapshot.
//! All of its randomness comes from RngBank streams.

use crate::{
    play::{Penalty, PlayOutcome},
    quarter::Quarter,
    rng::{PlayRng, RngBank, RngSlot},
    situation::GameSituation,
    snapshot::ClockSnapshot,
    types::{Seconds, Side},
};

/// Longest field goal try the simulated kicker will attempt, in yards
/// to the goal line.
const FIELD_GOAL_RANGE: u8 = 35;
/// End zone depth plus holder depth.
const FIELD_GOAL_EXTRA_YARDS: u8 = 17;
const LATE_GAME: Seconds = 120;

pub trait PlayCaller: Send {
    fn name(&self) -> &'static str;

    /// Scrimmage play for the team in possession.
    fn call_play(&mut self, situation: &GameSituation, clock: &ClockSnapshot) -> PlayOutcome;

    /// Try after a touchdown. Possession has already passed to the
    /// team that will receive the next kickoff.
    fn call_try(&mut self, situation: &GameSituation, clock: &ClockSnapshot) -> PlayOutcome;

    fn call_kickoff(&mut self, situation: &GameSituation, clock: &ClockSnapshot) -> PlayOutcome;

    /// Pre-snap foul, if one is flagged before the next play.
    fn call_penalty(&mut self, situation: &GameSituation, clock: &ClockSnapshot) -> Option<Penalty>;

    /// Team that wants to stop the clock now, if any.
    fn wants_timeout(&mut self, situation: &GameSituation, clock: &ClockSnapshot) -> Option<Side>;

    /// Game seconds spent in the huddle before the next snap.
    fn huddle_seconds(&mut self, situation: &GameSituation, clock: &ClockSnapshot) -> Seconds;
}

/// Situational play mix, fully determined by its seed.
pub struct SeededPlayCaller {
    calling: PlayRng,
    yardage: PlayRng,
    timing:  PlayRng,
}

impl SeededPlayCaller {
    pub fn new(seed: u64) -> Self {
        let bank = RngBank::new(seed);
        Self {
            calling: bank.for_slot(RngSlot::PlayCalling),
            yardage: bank.for_slot(RngSlot::Yardage),
            timing:  bank.for_slot(RngSlot::Timing),
        }
    }

    fn late(clock: &ClockSnapshot) -> bool {
        clock.quarter.ends_half() && clock.time_remaining <= LATE_GAME
    }

    fn run(&mut self, situation: &GameSituation) -> PlayOutcome {
        let mut yards = self.yardage.range_i32(-3, 8);
        if self.yardage.chance(0.05) {
            yards += self.yardage.range_i32(10, 40);
        }
        let duration = self.timing.range_i32(4, 7) as Seconds;
        if self.calling.chance(0.01) {
            return PlayOutcome::run(0).turnover().with_duration(duration);
        }
        let outcome = Self::finish_at_goal_lines(situation, PlayOutcome::run(yards)).with_duration(duration);
        if self.calling.chance(0.08) { outcome.out_of_bounds() } else { outcome }
    }

    fn pass(&mut self, situation: &GameSituation) -> PlayOutcome {
        if self.calling.chance(0.03) {
            return PlayOutcome::pass_complete(0)
                .turnover()
                .with_duration(self.timing.range_i32(4, 7) as Seconds);
        }
        if !self.calling.chance(0.62) {
            return PlayOutcome::pass_incomplete().with_duration(self.timing.range_i32(3, 6) as Seconds);
        }
        let mut yards = self.yardage.range_i32(0, 14);
        if self.yardage.chance(0.08) {
            yards += self.yardage.range_i32(12, 45);
        }
        let outcome = Self::finish_at_goal_lines(situation, PlayOutcome::pass_complete(yards))
            .with_duration(self.timing.range_i32(5, 8) as Seconds);
        if self.calling.chance(0.18) { outcome.out_of_bounds() } else { outcome }
    }

    /// Flag touchdowns and safeties when the gain crosses a goal line.
    fn finish_at_goal_lines(situation: &GameSituation, mut outcome: PlayOutcome) -> PlayOutcome {
        let to_goal = situation.yards_to_goal() as i32;
        let to_own_goal = situation.ball_on as i32;
        if outcome.yards_gained >= to_goal {
            outcome.yards_gained = to_goal;
            outcome.touchdown()
        } else if outcome.yards_gained <= -to_own_goal {
            outcome.yards_gained = -to_own_goal;
            outcome.safety()
        } else {
            outcome
        }
    }

    fn fourth_down(&mut self, situation: &GameSituation, clock: &ClockSnapshot) -> Option<PlayOutcome> {
        let to_goal = situation.yards_to_goal();
        let desperate = situation.offense_margin() < 0
            && clock.quarter >= Quarter::Q4
            && clock.time_remaining <= LATE_GAME * 2;

        if to_goal <= FIELD_GOAL_RANGE && !(desperate && situation.offense_margin() < -3) {
            let kick = (to_goal + FIELD_GOAL_EXTRA_YARDS) as f64;
            let p_good = (1.25 - kick * 0.012).clamp(0.3, 0.98);
            let good = self.calling.chance(p_good);
            let duration = self.timing.range_i32(4, 6) as Seconds;
            return Some(PlayOutcome::field_goal(good).with_duration(duration));
        }
        if desperate || (situation.distance <= 2 && self.calling.chance(0.35)) {
            return None;
        }
        let net = self.yardage.range_i32(32, 50);
        let duration = self.timing.range_i32(5, 9) as Seconds;
        Some(PlayOutcome::punt(net).with_duration(duration))
    }
}

impl PlayCaller for SeededPlayCaller {
    fn name(&self) -> &'static str {
        "seeded"
    }

    fn call_play(&mut self, situation: &GameSituation, clock: &ClockSnapshot) -> PlayOutcome {
        let margin = situation.offense_margin();
        let late = Self::late(clock);

        // Victory formation.
        if late && clock.quarter == Quarter::Q4 && margin > 0 && situation.down < 4 && situation.ball_on > 2 {
            return PlayOutcome::kneel();
        }
        // Hurry-up: kill the clock to save a timeout.
        if late && margin < 0 && clock.is_running && situation.down < 3 && self.calling.chance(0.2) {
            return PlayOutcome::spike();
        }
        if situation.down == 4 {
            if let Some(outcome) = self.fourth_down(situation, clock) {
                return outcome;
            }
        }

        let pass_rate = if late && margin < 0 { 0.8 } else { 0.55 };
        if self.calling.chance(pass_rate) {
            self.pass(situation)
        } else {
            self.run(situation)
        }
    }

    fn call_try(&mut self, situation: &GameSituation, _clock: &ClockSnapshot) -> PlayOutcome {
        // Possession already flipped: the scorer is the defence here.
        let scorer_margin = -situation.offense_margin();
        let go_for_two = matches!(scorer_margin, -2 | 1 | -5) || self.calling.chance(0.04);
        if go_for_two {
            PlayOutcome::two_point(self.calling.chance(0.48))
        } else {
            PlayOutcome::extra_point(self.calling.chance(0.94))
        }
    }

    fn call_kickoff(&mut self, _situation: &GameSituation, _clock: &ClockSnapshot) -> PlayOutcome {
        if self.yardage.chance(0.6) {
            return PlayOutcome::kickoff(0).with_duration(0);
        }
        let spot = self.yardage.range_i32(12, 40);
        PlayOutcome::kickoff(spot).with_duration(self.timing.range_i32(5, 8) as Seconds)
    }

    fn call_penalty(&mut self, situation: &GameSituation, _clock: &ClockSnapshot) -> Option<Penalty> {
        if !self.calling.chance(0.05) {
            return None;
        }
        let offense = situation.possession;
        let penalty = match self.calling.next_u64_below(4) {
            0 => Penalty::new("false start", 5, offense),
            1 => Penalty::new("offensive holding", 10, offense),
            2 => Penalty::new("defensive offside", 5, offense.opponent()),
            _ => Penalty::new("defensive pass interference", 15, offense.opponent())
                .with_automatic_first_down(),
        };
        Some(penalty)
    }

    fn wants_timeout(&mut self, situation: &GameSituation, clock: &ClockSnapshot) -> Option<Side> {
        if !clock.is_running || !Self::late(clock) || clock.time_remaining == 0 {
            return None;
        }
        let offense = situation.possession;
        let trailing = match situation.offense_margin() {
            m if m < 0 => offense,
            m if m > 0 => offense.opponent(),
            _ => return None,
        };
        if situation.timeouts_for(trailing) > 0 && self.timing.chance(0.4) {
            Some(trailing)
        } else {
            None
        }
    }

    fn huddle_seconds(&mut self, situation: &GameSituation, clock: &ClockSnapshot) -> Seconds {
        let margin = situation.offense_margin();
        let range = match (Self::late(clock), margin) {
            (true, m) if m < 0 => (8, 14),
            (true, m) if m > 0 => (30, 37),
            _ => (18, 30),
        };
        self.timing.range_i32(range.0, range.1) as Seconds
    }
}
