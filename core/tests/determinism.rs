//! THE MOST IMPORTANT TEST IN THE PROJECT.
//!
//! Two simulations, same seed, same preset.
//! They must produce byte-identical event logs.
//! Any divergence is a blocker; do not merge until fixed.

use gridiron_clock_core::{
    engine::GameSim,
    store::GameStore,
    ClockConfig, GameState,
};

const MAX_PLAYS: u64 = 400;

fn build_sim(seed: u64, config: ClockConfig) -> GameSim {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = GameStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    let game_id = format!("det-test-{seed}");
    GameSim::build(game_id, seed, config, store, "test").expect("build sim")
}

fn collect_event_log(sim: &GameSim) -> Vec<String> {
    sim.store_events()
        .expect("read events")
        .into_iter()
        .map(|e| e.payload)
        .collect()
}

#[test]
fn same_seed_produces_identical_event_logs() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;

    let mut sim_a = build_sim(SEED, ClockConfig::default_test());
    let mut sim_b = build_sim(SEED, ClockConfig::default_test());

    sim_a.run_game(MAX_PLAYS).expect("sim_a run");
    sim_b.run_game(MAX_PLAYS).expect("sim_b run");

    let log_a = collect_event_log(&sim_a);
    let log_b = collect_event_log(&sim_b);

    assert!(!log_a.is_empty(), "simulation persisted no events");
    assert_eq!(
        log_a.len(), log_b.len(),
        "Event log lengths differ: {} vs {}",
        log_a.len(), log_b.len()
    );

    for (i, (a, b)) in log_a.iter().zip(log_b.iter()).enumerate() {
        assert_eq!(
            a, b,
            "Event log diverged at entry {i}:\n  A: {a}\n  B: {b}"
        );
    }
    assert_eq!(sim_a.clock, sim_b.clock, "final clocks differ");
}

#[test]
fn every_preset_is_deterministic() {
    for config in [
        ClockConfig::nfl_playoff(),
        ClockConfig::college(),
        ClockConfig::practice(),
    ] {
        let preset = config.preset.name();
        let mut sim_a = build_sim(7, config.clone());
        let mut sim_b = build_sim(7, config);
        sim_a.run_game(MAX_PLAYS).expect("sim_a run");
        sim_b.run_game(MAX_PLAYS).expect("sim_b run");
        assert_eq!(
            collect_event_log(&sim_a),
            collect_event_log(&sim_b),
            "{preset} diverged"
        );
    }
}

#[test]
fn different_seeds_produce_different_logs() {
    let mut sim_a = build_sim(42, ClockConfig::default_test());
    let mut sim_b = build_sim(99, ClockConfig::default_test());

    sim_a.run_plays(60).expect("run a");
    sim_b.run_plays(60).expect("run b");

    // Same clock rules, different play streams: the logs must differ
    // somewhere or the seed is not reaching the play caller.
    let log_a = collect_event_log(&sim_a);
    let log_b = collect_event_log(&sim_b);

    let any_different = log_a.len() != log_b.len()
        || log_a.iter().zip(log_b.iter()).any(|(a, b)| a != b);
    assert!(any_different, "Different seeds produced identical logs; seed is not being used");
}

#[test]
fn simulated_game_reaches_the_final_whistle() {
    for seed in [1_u64, 2, 3] {
        let mut sim = build_sim(seed, ClockConfig::default_test());
        sim.run_game(MAX_PLAYS).expect("run game");
        assert_eq!(sim.clock.state(), GameState::GameEnd, "seed {seed} did not finish");
        assert!(sim.play_index() > 50, "seed {seed} finished after only {} plays", sim.play_index());

        let (home, away) = sim.score();
        let last = sim.store_events().expect("events").pop().expect("at least one event");
        assert_eq!(last.event_type, "game_ended");
        assert!(last.payload.contains(&format!("\"home\":{home}")));
        assert!(last.payload.contains(&format!("\"away\":{away}")));
    }
}
