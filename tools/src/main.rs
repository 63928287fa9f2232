//! clock-runner: headless game runner for the gridiron clock core.
//!
//! Usage:
//!   clock-runner --seed 12345 --preset playoff --db game.db
//!   clock-runner --config rules.json --max-plays 400
//!   clock-runner --seed 7 --ipc-mode

use anyhow::Result;
use gridiron_clock_core::{
    engine::GameSim,
    event::ClockEvent,
    snapshot::{format_clock, ClockSnapshot},
    store::GameStore,
    ClockConfig, ClockPreset, ClockSpeed, GameSituation, Penalty, PlayOutcome, Side,
    StoppingReason,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick { count: u64 },
    Start,
    Stop {
        #[serde(default = "default_stop_reason")]
        reason: StoppingReason,
    },
    StartGame,
    ResumeSecondHalf,
    StartOvertime,
    EndQuarter,
    Play { outcome: PlayOutcome },
    Penalty { penalty: Penalty },
    Timeout { side: Side },
    Challenge { side: Side },
    SetSpeed { speed: ClockSpeed },
    SetPreset { preset: String },
    Simulate { plays: u64 },
    Quit,
}

fn default_stop_reason() -> StoppingReason {
    StoppingReason::Administrative
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    game_id:    &'a str,
    play_index: u64,
    display:    String,
    play_clock: String,
    clock:      ClockSnapshot,
    situation:  &'a GameSituation,
    events:     Vec<ClockEvent>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let max_plays = parse_arg(&args, "--max-plays", 400u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let preset_name = flag_value(&args, "--preset").unwrap_or("nfl");

    let config = match flag_value(&args, "--config") {
        Some(path) => ClockConfig::load(path)?,
        None => {
            let preset = ClockPreset::parse(preset_name)
                .ok_or_else(|| anyhow::anyhow!("Unknown preset '{preset_name}'"))?;
            ClockConfig::for_preset(preset)
        }
    };

    if !ipc_mode {
        println!("Gridiron Clock: clock-runner");
        println!("  seed:      {seed}");
        println!("  preset:    {}", config.preset.name());
        println!("  max plays: {max_plays}");
        println!("  db:        {db}");
        println!();
    }

    let store = if db == ":memory:" {
        GameStore::in_memory()?
    } else {
        GameStore::open(db)?
    };
    store.migrate()?;

    let game_id = uuid::Uuid::new_v4().to_string();
    let started_at = chrono::Utc::now().to_rfc3339();
    let mut sim = GameSim::build(game_id, seed, config, store, &started_at)?;

    if ipc_mode {
        run_ipc_loop(&mut sim)?;
    } else {
        sim.run_game(max_plays)?;
        print_summary(&sim)?;
    }

    Ok(())
}

fn run_ipc_loop(sim: &mut GameSim) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };
        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        match handle_command(sim, cmd) {
            Ok(events) => {
                sim.record(&events)?;
                let state = build_ui_state(sim, events);
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
            Err(e) => write_error(&mut stdout, &e.to_string())?,
        }
        stdout.flush()?;
    }
    Ok(())
}

/// Apply one IPC command. Clock rule violations come back as errors and
/// leave the game untouched.
fn handle_command(sim: &mut GameSim, cmd: IpcCommand) -> Result<Vec<ClockEvent>> {
    if let IpcCommand::Simulate { plays } = cmd {
        // GameSim persists these itself.
        sim.run_plays(plays)?;
        return Ok(vec![]);
    }

    let clock = &mut sim.clock;
    let events = match cmd {
        IpcCommand::GetState | IpcCommand::Quit | IpcCommand::Simulate { .. } => vec![],
        IpcCommand::Tick { count } => {
            let mut events = Vec::new();
            for _ in 0..count {
                events.extend(clock.tick()?);
            }
            events
        }
        IpcCommand::Start => {
            clock.start()?;
            vec![]
        }
        IpcCommand::Stop { reason } => {
            clock.stop(reason)?;
            vec![]
        }
        IpcCommand::StartGame => clock.start_game()?,
        IpcCommand::ResumeSecondHalf => clock.resume_second_half()?,
        IpcCommand::StartOvertime => clock.start_overtime()?,
        IpcCommand::EndQuarter => clock.end_quarter()?,
        IpcCommand::Play { outcome } => clock.process_play(&outcome)?,
        IpcCommand::Penalty { penalty } => clock.process_penalty(&penalty)?,
        IpcCommand::Timeout { side } => clock.call_timeout(side)?,
        IpcCommand::Challenge { side } => {
            let left = clock.use_challenge(side)?;
            log::info!("{} challenge used, {left} left", side.name());
            vec![]
        }
        IpcCommand::SetSpeed { speed } => {
            clock.set_clock_speed(speed)?;
            vec![]
        }
        IpcCommand::SetPreset { preset } => {
            let preset = ClockPreset::parse(&preset)
                .ok_or_else(|| anyhow::anyhow!("Unknown preset '{preset}'"))?;
            clock.update_config(ClockConfig::for_preset(preset))?
        }
    };
    Ok(events)
}

fn build_ui_state(sim: &GameSim, events: Vec<ClockEvent>) -> UiState<'_> {
    let clock = sim.clock.snapshot();
    UiState {
        game_id:    &sim.game_id,
        play_index: sim.play_index(),
        display:    clock.display(),
        play_clock: format_clock(clock.play_clock),
        clock,
        situation:  sim.clock.situation(),
        events,
    }
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(sim: &GameSim) -> Result<()> {
    let (home, away) = sim.score();
    let clock = sim.clock.snapshot();
    let events = sim.store_events()?;
    let count = |name: &str| events.iter().filter(|e| e.event_type == name).count();

    println!("=== GAME SUMMARY ===");
    println!("  game_id:        {}", sim.game_id);
    println!("  caller:         {}", sim.caller_name());
    println!("  plays:          {}", sim.play_index());
    println!("  final state:    {:?} ({})", clock.state, clock.display());
    println!("  overtime:       {} period(s)", clock.overtime_period);
    println!("  score:          home {home} - away {away}");
    println!("  events logged:  {}", events.len());
    println!("  scores:         {}", count("score_changed"));
    println!("  timeouts:       {}", count("timeout_called"));
    println!("  penalties:      {}", count("penalty_enforced"));
    println!("  2-min warnings: {}", count("two_minute_warning"));
    println!("  snapshots:      {}", sim.store().snapshot_count(&sim.game_id)?);
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
