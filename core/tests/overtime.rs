//! Overtime entry, period limits and how scores end the game under each
//! overtime format.

use gridiron_clock_core::{
    ClockConfig, ClockError, ClockEvent, ClockSpeed, GameClock, GameState, PlayOutcome, Quarter,
    Side,
};

fn tied_at_end_of_regulation(config: ClockConfig) -> GameClock {
    let mut clock = GameClock::new(config);
    clock.start_game().expect("start game");
    while clock.quarter() != Quarter::Q4 {
        clock.end_quarter().expect("end quarter");
    }
    clock.set_clock_speed(ClockSpeed::Custom(clock.time_remaining())).expect("speed");
    clock.start().expect("start");
    clock.tick().expect("tick");
    clock.set_clock_speed(ClockSpeed::RealTime).expect("speed");
    assert_eq!(clock.time_remaining(), 0);
    clock
}

fn in_overtime(config: ClockConfig) -> GameClock {
    let mut clock = tied_at_end_of_regulation(config);
    clock.end_quarter().expect("enter overtime");
    assert_eq!(clock.quarter(), Quarter::Overtime);
    clock
}

fn game_ended(events: &[ClockEvent]) -> bool {
    events.iter().any(|e| matches!(e, ClockEvent::GameEnded { .. }))
}

#[test]
fn tied_fourth_quarter_goes_to_sudden_death() {
    let mut clock = tied_at_end_of_regulation(ClockConfig::nfl_regular_season());
    let events = clock.end_quarter().unwrap();

    assert_eq!(clock.quarter(), Quarter::Overtime);
    assert_eq!(clock.state(), GameState::Playing);
    assert_eq!(clock.time_remaining(), 600);
    assert_eq!(clock.overtime_period(), 1);
    assert_eq!(clock.play_clock(), 40);
    assert!(!clock.is_running());
    assert_eq!(clock.situation().timeouts, [2, 2]);
    assert!(events.iter().any(|e| matches!(e, ClockEvent::OvertimeStarted { period: 1, .. })));
}

#[test]
fn start_overtime_checks_its_preconditions() {
    let mut clock = GameClock::new(ClockConfig::default_test());
    clock.start_game().unwrap();
    assert!(matches!(
        clock.start_overtime(),
        Err(ClockError::InvalidQuarter { quarter: Quarter::Q1, .. })
    ));

    while clock.quarter() != Quarter::Q4 {
        clock.end_quarter().unwrap();
    }
    assert!(
        matches!(clock.start_overtime(), Err(ClockError::InvalidQuarter { .. })),
        "time still on the clock"
    );

    let mut clock = tied_at_end_of_regulation(ClockConfig::default_test());
    clock.start_overtime().unwrap();
    assert_eq!(clock.overtime_period(), 1);
    assert_eq!(clock.time_remaining(), 600);
}

#[test]
fn start_overtime_needs_a_tie_and_the_feature() {
    let mut clock = tied_at_end_of_regulation(ClockConfig::practice());
    let before = clock.clone();
    assert!(matches!(clock.start_overtime(), Err(ClockError::InvalidQuarter { .. })));
    assert_eq!(clock, before);

    let mut clock = GameClock::new(ClockConfig::default_test());
    clock.start_game().unwrap();
    clock.process_play(&PlayOutcome::field_goal(true)).unwrap();
    while clock.quarter() != Quarter::Q4 {
        clock.end_quarter().unwrap();
    }
    clock.set_clock_speed(ClockSpeed::Custom(900)).unwrap();
    clock.start().unwrap();
    clock.tick().unwrap();
    assert!(matches!(clock.start_overtime(), Err(ClockError::InvalidQuarter { .. })));
}

#[test]
fn any_score_ends_sudden_death() {
    let mut clock = in_overtime(ClockConfig::nfl_regular_season());
    let events = clock.process_play(&PlayOutcome::field_goal(true)).unwrap();

    assert!(game_ended(&events));
    assert_eq!(clock.state(), GameState::GameEnd);
    assert_eq!(clock.situation().score, [3, 0]);
    assert!(matches!(
        clock.process_play(&PlayOutcome::run(3)),
        Err(ClockError::GameAlreadyEnded)
    ));
}

#[test]
fn regular_season_overtime_can_end_tied() {
    let mut clock = in_overtime(ClockConfig::nfl_regular_season());
    clock.set_clock_speed(ClockSpeed::Custom(600)).unwrap();
    clock.start().unwrap();
    let expired = clock.tick().unwrap();
    assert!(expired.contains(&ClockEvent::QuarterExpired { quarter: Quarter::Overtime }));

    let events = clock.end_quarter().unwrap();
    assert_eq!(clock.state(), GameState::GameEnd, "one period only");
    assert!(events.iter().any(|e| matches!(e, ClockEvent::GameEnded { home: 0, away: 0 })));
}

#[test]
fn playoff_overtime_keeps_adding_periods() {
    let mut clock = in_overtime(ClockConfig::nfl_playoff());
    assert_eq!(clock.time_remaining(), 900);

    clock.end_quarter().unwrap();
    assert_eq!(clock.overtime_period(), 2);
    assert_eq!(clock.state(), GameState::Playing);
    assert_eq!(clock.time_remaining(), 900);
    assert_eq!(clock.situation().timeouts, [3, 3]);
}

#[test]
fn opening_field_goal_does_not_end_modified_sudden_death() {
    let mut clock = in_overtime(ClockConfig::nfl_playoff());
    let events = clock.process_play(&PlayOutcome::field_goal(true)).unwrap();

    assert!(!game_ended(&events));
    assert_eq!(clock.state(), GameState::Playing);
    assert_eq!(clock.situation().possession, Side::Away);

    // Answering drive ends in a punt: the field goal stands.
    let events = clock.process_play(&PlayOutcome::punt(40)).unwrap();
    assert!(game_ended(&events));
    assert_eq!(clock.situation().score, [3, 0]);
}

#[test]
fn answering_touchdown_wins_modified_sudden_death() {
    let mut clock = in_overtime(ClockConfig::nfl_playoff());
    clock.process_play(&PlayOutcome::field_goal(true)).unwrap();
    let events = clock
        .process_play(&PlayOutcome::pass_complete(75).touchdown())
        .unwrap();
    assert!(game_ended(&events));
    assert_eq!(clock.situation().score, [3, 6]);
}

#[test]
fn matched_field_goal_continues_then_next_score_wins() {
    let mut clock = in_overtime(ClockConfig::nfl_playoff());
    clock.process_play(&PlayOutcome::field_goal(true)).unwrap();
    let events = clock.process_play(&PlayOutcome::field_goal(true)).unwrap();
    assert!(!game_ended(&events), "tied again after both possessions");

    let events = clock.process_play(&PlayOutcome::field_goal(true)).unwrap();
    assert!(game_ended(&events));
    assert_eq!(clock.situation().score, [6, 3]);
}

#[test]
fn opening_touchdown_wins_modified_sudden_death() {
    let mut clock = in_overtime(ClockConfig::nfl_playoff());
    let events = clock
        .process_play(&PlayOutcome::run(75).touchdown())
        .unwrap();
    assert!(game_ended(&events));
}

#[test]
fn college_overtime_is_untimed() {
    let mut clock = in_overtime(ClockConfig::college());
    assert_eq!(clock.time_remaining(), 0);
    assert!(clock.is_untimed());
    assert_eq!(clock.situation().ball_on, 75, "possession starts at the opponent's 25");
    assert!(matches!(clock.start(), Err(ClockError::InvalidState { .. })));

    let events = clock
        .process_play(&PlayOutcome::pass_complete(25).touchdown().with_duration(9))
        .unwrap();
    assert!(!game_ended(&events), "untimed overtime never ends on a score");
    assert_eq!(clock.time_remaining(), 0);
    assert!(!clock.is_running());
    assert!(clock.check_invariants().is_ok());

    clock.process_play(&PlayOutcome::extra_point(true)).unwrap();
    let events = clock.end_quarter().unwrap();
    assert!(game_ended(&events), "period ends with a leader");
    assert_eq!(clock.situation().score, [7, 0]);
}

#[test]
fn college_tied_period_starts_another() {
    let mut clock = in_overtime(ClockConfig::college());
    clock.end_quarter().unwrap();
    assert_eq!(clock.overtime_period(), 2);
    assert_eq!(clock.state(), GameState::Playing);
    assert_eq!(clock.situation().timeouts, [1, 1]);
}

#[test]
fn practice_skips_overtime() {
    let mut clock = tied_at_end_of_regulation(ClockConfig::practice());
    clock.end_quarter().unwrap();
    assert_eq!(clock.state(), GameState::GameEnd);
    assert_eq!(clock.overtime_period(), 0);
}
