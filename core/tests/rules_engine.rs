//! Rules engine: stop/run rules, runoff, down and distance, scoring,
//! penalties and timeouts.

use gridiron_clock_core::{
    ClockConfig, ClockError, GameClock, GameSituation, Penalty, PlayClockReset, PlayOutcome,
    Quarter, RulesEngine, Side, StoppingReason,
};

fn engine_at(down: u8, distance: u8, ball_on: u8) -> RulesEngine {
    let mut situation = GameSituation::new(Side::Home, 3, 900);
    situation.down = down;
    situation.distance = distance;
    situation.ball_on = ball_on;
    RulesEngine::new(ClockConfig::default_test(), situation)
}

fn build() -> GameClock {
    let mut clock = GameClock::new(ClockConfig::default_test());
    clock.start_game().expect("start game");
    clock
}

#[test]
fn fourth_down_failure_turns_the_ball_over() {
    let mut clock = build();
    clock.process_play(&PlayOutcome::run(0)).unwrap();
    clock.process_play(&PlayOutcome::run(0)).unwrap();
    clock.process_play(&PlayOutcome::run(5)).unwrap();
    let s = clock.situation();
    assert_eq!((s.down, s.distance, s.ball_on), (4, 5, 30));

    let decision = clock.rules().process_play(&PlayOutcome::run(3)).unwrap();
    assert!(decision.possession_change);
    assert_eq!(decision.new_down, Some(1));
    assert_eq!(decision.new_distance, Some(10));

    clock.process_play(&PlayOutcome::run(3)).unwrap();
    let s = clock.situation();
    assert_eq!(s.possession, Side::Away, "possession flips on downs");
    assert_eq!((s.down, s.distance, s.ball_on), (1, 10, 67));
    assert!(!clock.is_running(), "change of possession stops the clock");
}

#[test]
fn gaining_exactly_the_distance_is_a_first_down() {
    let engine = engine_at(3, 4, 40);
    let decision = engine.process_play(&PlayOutcome::run(4)).unwrap();
    assert_eq!(decision.new_down, Some(1));
    assert_eq!(decision.new_distance, Some(10));
    assert_eq!(decision.new_ball_on, Some(44));
    assert!(!decision.possession_change);
    assert!(!decision.should_stop_clock, "NFL does not stop on first downs");
}

#[test]
fn short_gain_advances_the_down() {
    let engine = engine_at(2, 7, 40);
    let decision = engine.process_play(&PlayOutcome::run(-3)).unwrap();
    assert_eq!(decision.new_down, Some(3));
    assert_eq!(decision.new_distance, Some(10));
    assert_eq!(decision.new_ball_on, Some(37));
}

#[test]
fn incomplete_and_out_of_bounds_stop_with_full_play_clock() {
    let engine = engine_at(1, 10, 40);

    let incomplete = engine.process_play(&PlayOutcome::pass_incomplete()).unwrap();
    assert!(incomplete.should_stop_clock);
    assert_eq!(incomplete.stopping_reason, Some(StoppingReason::IncompletePass));
    assert_eq!(incomplete.play_clock_reset, PlayClockReset::Normal);
    assert_eq!(incomplete.new_down, Some(2));

    let sideline = engine.process_play(&PlayOutcome::run(6).out_of_bounds()).unwrap();
    assert_eq!(sideline.stopping_reason, Some(StoppingReason::OutOfBounds));
}

#[test]
fn penalty_outranks_incomplete_pass() {
    let engine = engine_at(1, 10, 40);
    let decision = engine
        .process_play(&PlayOutcome::pass_incomplete().with_penalty())
        .unwrap();
    assert!(decision.should_stop_clock);
    assert_eq!(decision.stopping_reason, Some(StoppingReason::Penalty));
    assert_eq!(decision.play_clock_reset, PlayClockReset::Short);
}

#[test]
fn kneel_and_spike_use_fixed_runoff() {
    let engine = engine_at(1, 10, 40);

    let kneel = engine.process_play(&PlayOutcome::kneel().with_duration(30)).unwrap();
    assert_eq!(kneel.seconds_elapsed, 2);
    assert!(!kneel.should_stop_clock, "kneel keeps the clock running");

    let spike = engine.process_play(&PlayOutcome::spike()).unwrap();
    assert_eq!(spike.seconds_elapsed, 1);
    assert!(spike.should_stop_clock);
}

#[test]
fn elapsed_time_is_clamped_to_play_clock() {
    let engine = engine_at(1, 10, 40);
    let decision = engine.process_play(&PlayOutcome::run(3).with_duration(90)).unwrap();
    assert_eq!(decision.seconds_elapsed, 40);

    let default = engine.process_play(&PlayOutcome::run(3)).unwrap();
    assert_eq!(default.seconds_elapsed, 6);
}

#[test]
fn touchdown_scores_and_sets_up_the_try() {
    let mut clock = build();
    let events = clock.process_play(&PlayOutcome::pass_complete(75).touchdown()).unwrap();
    assert!(!events.is_empty());

    let s = clock.situation();
    assert_eq!(s.score, [6, 0]);
    assert_eq!(s.possession, Side::Away, "other side receives after the score");
    assert_eq!(clock.last_stop(), Some(StoppingReason::Score));

    let before = clock.time_remaining();
    clock.process_play(&PlayOutcome::extra_point(true)).unwrap();
    assert_eq!(clock.situation().score, [7, 0], "try credited to the scoring team");
    assert_eq!(clock.time_remaining(), before, "tries are untimed");
}

#[test]
fn interception_return_touchdown_credits_the_defense() {
    let mut clock = build();
    clock
        .process_play(&PlayOutcome::pass_complete(0).turnover().touchdown())
        .unwrap();
    let s = clock.situation();
    assert_eq!(s.score, [0, 6]);
    assert_eq!(s.possession, Side::Home);

    clock.process_play(&PlayOutcome::two_point(true)).unwrap();
    assert_eq!(clock.situation().score, [0, 8]);
}

#[test]
fn safety_gives_two_points_and_the_ball() {
    let engine = engine_at(2, 10, 3);
    let decision = engine.process_play(&PlayOutcome::run(-3).safety()).unwrap();
    let score = decision.score.expect("safety scores");
    assert_eq!((score.side, score.points), (Side::Away, 2));
    assert!(decision.possession_change);
}

#[test]
fn punt_changes_possession_at_the_landing_spot() {
    let engine = engine_at(4, 6, 30);
    let decision = engine.process_play(&PlayOutcome::punt(45)).unwrap();
    assert!(decision.possession_change);
    assert_eq!(decision.new_ball_on, Some(25));
    assert_eq!(decision.stopping_reason, Some(StoppingReason::Administrative));

    let touchback = engine.process_play(&PlayOutcome::punt(80)).unwrap();
    assert_eq!(touchback.new_ball_on, Some(20));
}

#[test]
fn missed_field_goal_from_long_range() {
    let engine = engine_at(4, 8, 60);
    let decision = engine.process_play(&PlayOutcome::field_goal(false)).unwrap();
    assert!(decision.score.is_none());
    assert!(decision.possession_change);
    assert_eq!(decision.new_ball_on, Some(47), "ball goes back to the spot of the kick");
}

#[test]
fn kickoff_return_sets_first_and_ten() {
    let engine = engine_at(1, 10, 25);
    let decision = engine.process_play(&PlayOutcome::kickoff(32)).unwrap();
    assert_eq!(decision.new_ball_on, Some(32));
    assert!(!decision.possession_change);

    let touchback = engine.process_play(&PlayOutcome::kickoff(0)).unwrap();
    assert_eq!(touchback.new_ball_on, Some(25));
}

#[test]
fn penalty_distance_never_leaves_the_field() {
    // Defensive foul inside the 10: half the distance to the goal.
    let engine = engine_at(2, 6, 94);
    let decision = engine
        .process_penalty(&Penalty::new("defensive holding", 5, Side::Away))
        .unwrap();
    assert_eq!(decision.new_ball_on, Some(97));
    assert_eq!(decision.new_down, Some(2));
    assert_eq!(decision.new_distance, Some(3));
    assert!(decision.should_stop_clock);
    assert_eq!(decision.seconds_elapsed, 0);

    let roughing = engine
        .process_penalty(&Penalty::new("roughing the passer", 15, Side::Away).with_automatic_first_down())
        .unwrap();
    assert_eq!(roughing.new_down, Some(1));
    assert_eq!(roughing.new_distance, Some(3), "first and goal from the 3");
}

#[test]
fn offensive_penalty_adds_to_distance() {
    let engine = engine_at(1, 10, 40);
    let decision = engine
        .process_penalty(&Penalty::new("false start", 5, Side::Home))
        .unwrap();
    assert_eq!(decision.new_ball_on, Some(35));
    assert_eq!(decision.new_down, Some(1));
    assert_eq!(decision.new_distance, Some(15));
}

#[test]
fn practice_penalties_leave_the_clock_alone() {
    let mut clock = GameClock::new(ClockConfig::practice());
    clock.start_game().unwrap();
    clock.process_play(&PlayOutcome::run(3)).unwrap();
    assert!(clock.is_running());

    clock
        .process_penalty(&Penalty::new("offside", 5, Side::Away))
        .unwrap();
    assert!(clock.is_running(), "practice preset does not stop on penalties");
}

#[test]
fn timeouts_stop_the_clock_and_run_out() {
    let mut clock = build();
    clock.process_play(&PlayOutcome::run(3)).unwrap();
    assert!(clock.is_running());

    clock.call_timeout(Side::Away).unwrap();
    assert!(!clock.is_running());
    assert_eq!(clock.last_stop(), Some(StoppingReason::Timeout));
    assert_eq!(clock.play_clock(), 25);

    clock.call_timeout(Side::Away).unwrap();
    clock.call_timeout(Side::Away).unwrap();
    assert!(!clock.rules().can_call_timeout(Side::Away));

    let before = clock.clone();
    assert!(matches!(
        clock.call_timeout(Side::Away),
        Err(ClockError::NoTimeoutsRemaining { side: "away" })
    ));
    assert_eq!(clock, before);
}

#[test]
fn college_stops_on_first_down_only_inside_two_minutes() {
    let mut clock = GameClock::new(ClockConfig::college());
    clock.start_game().unwrap();
    clock.process_play(&PlayOutcome::run(12)).unwrap();
    assert!(clock.is_running(), "first down early in the half keeps running");

    let mut situation = clock.situation().clone();
    situation.quarter = Quarter::Q2;
    situation.time_remaining = 90;
    let engine = RulesEngine::new(ClockConfig::college(), situation);
    let decision = engine.process_play(&PlayOutcome::run(12)).unwrap();
    assert!(decision.should_stop_clock);
    assert_eq!(decision.stopping_reason, Some(StoppingReason::Administrative));
}

#[test]
fn invalid_situation_is_rejected() {
    let engine = engine_at(5, 10, 40);
    assert!(matches!(
        engine.process_play(&PlayOutcome::run(3)),
        Err(ClockError::InvalidSituation { .. })
    ));

    let engine = engine_at(1, 20, 90);
    assert!(engine.validate_situation(engine.situation()).is_err());
}

#[test]
fn inside_two_minutes_only_in_second_and_fourth() {
    let engine = engine_at(1, 10, 40);
    let mut situation = engine.situation().clone();
    situation.time_remaining = 100;
    for (quarter, expected) in [
        (Quarter::Q1, false),
        (Quarter::Q2, true),
        (Quarter::Q3, false),
        (Quarter::Q4, true),
    ] {
        situation.quarter = quarter;
        assert_eq!(engine.is_inside_two_minutes(&situation), expected, "{quarter:?}");
    }
}

#[test]
fn out_of_range_yardage_is_held_to_the_field() {
    let mut clock = build();
    clock.process_play(&PlayOutcome::run(i32::MAX)).unwrap();
    let s = clock.situation();
    assert_eq!((s.down, s.distance, s.ball_on), (1, 1, 99), "first and goal from the 1");

    let engine = engine_at(2, 10, 40);
    let loss = engine.process_play(&PlayOutcome::run(i32::MIN)).unwrap();
    assert_eq!(loss.new_ball_on, Some(1));
    assert_eq!(loss.new_down, Some(3));

    let fumble = engine.process_play(&PlayOutcome::run(i32::MIN).turnover()).unwrap();
    assert_eq!(fumble.new_ball_on, Some(99));

    let punt = engine.process_play(&PlayOutcome::punt(i32::MAX)).unwrap();
    assert_eq!(punt.new_ball_on, Some(20), "touchback");
}

#[test]
fn rejected_timeout_keeps_the_timeout() {
    let clock = build();
    let mut value = serde_json::to_value(&clock).unwrap();
    value["rules"]["situation"]["down"] = 5.into();
    let mut clock: GameClock = serde_json::from_value(value).unwrap();
    let before = clock.clone();

    assert!(matches!(
        clock.call_timeout(Side::Home),
        Err(ClockError::InvalidSituation { .. })
    ));
    assert_eq!(clock.situation().timeouts_for(Side::Home), 3);
    assert_eq!(clock, before);
}
