//! Swarm Survivor headless runner
//!
//! Drives the simulation with synthetic frame timestamps and prints a JSON
//! run summary. Usage: `swarm-survivor [settings.json | easy | normal | hard]`

use std::path::Path;
use std::process::ExitCode;

use swarm_survivor::{DifficultyPreset, Settings};
use swarm_survivor::sim::{Clock, GameEvent, GamePhase, GameState, TickInput, tick};

fn main() -> ExitCode {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(arg) => match DifficultyPreset::from_str(&arg) {
            Some(preset) => Settings::from_preset(preset),
            None => match Settings::load_from_file(Path::new(&arg)) {
                Ok(settings) => settings,
                Err(e) => {
                    log::error!("Failed to load settings from {}: {}", arg, e);
                    return ExitCode::FAILURE;
                }
            },
        },
        None => Settings::default(),
    };

    let mut state = GameState::new(&settings);
    log::info!(
        "Swarm Survivor starting (seed {}, preset {})",
        state.seed,
        settings.preset.as_str()
    );

    let mut clock = Clock::new(settings.max_frame_delta_ms);
    let run_ms = f64::from(settings.run_duration_secs) * 1000.0;
    let frame_ms = f64::from(settings.frame_ms);
    let mut timestamp = 0.0_f64;
    let mut frames: u64 = 0;

    loop {
        let input = TickInput {
            start: frames == 0,
            autopilot: settings.autopilot,
            ..Default::default()
        };
        let dt = clock.tick(timestamp);
        tick(&mut state, &input, dt);

        for event in state.events() {
            if let GameEvent::PowerupApplied { id } = event {
                log::debug!("t={:.1}s took {}", state.elapsed_ms() / 1000.0, id.name());
            }
        }

        frames += 1;
        timestamp += frame_ms;

        if state.phase() == GamePhase::GameOver {
            break;
        }
        if f64::from(state.elapsed_ms()) >= run_ms {
            log::info!("Run duration reached");
            break;
        }
        // Without autopilot nothing resolves an open offer
        if state.phase() == GamePhase::LevelUp && !settings.autopilot {
            log::warn!("Stopped at a level-up offer with no autopilot to choose");
            break;
        }
        if state.phase() == GamePhase::Start {
            log::warn!("Run never started");
            break;
        }
    }

    log::info!("Simulated {} frames", frames);
    match serde_json::to_string_pretty(&state.summary()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize run summary: {}", e);
            ExitCode::FAILURE
        }
    }
}
