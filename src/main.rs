//! Application entry point and thread bootstrapper.

mod cli;
mod error;
mod input;
mod logic;
mod models;
mod render;
mod state;
mod system;

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use clap::Parser;

use crate::cli::Args;
use crate::error::{Error, Result};
use crate::input::events::{InputCommand, RawInputEvent};
use crate::input::manager::InputManager;
use crate::logic::audio::{AudioSink, LogAudio};
use crate::logic::engine::SessionResult;
use crate::logic::game_loop;
use crate::logic::headless::{InputSource, run_headless};
use crate::logic::replay_engine::ReplayEngine;
use crate::models::engine::Chart;
use crate::models::replay::ReplayData;
use crate::models::settings::{SETTINGS_FILE, SettingsState};
use crate::render::{Renderer, TextHud};
use crate::system::bus::{SystemBus, SystemEvent};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("MAIN: Booting fallnote...");

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("MAIN: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let settings_path = args.settings.clone().unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    if args.settings.is_none() && !settings_path.exists() {
        log::info!("MAIN: Writing default settings to {:?}", settings_path);
        if let Err(e) = SettingsState::default().save() {
            log::warn!("MAIN: Could not write default settings: {}", e);
        }
    }
    let mut settings = SettingsState::load_from(&settings_path);
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if args.autoplay {
        settings.autoplay = true;
    }

    let chart_path = args.chart.as_deref().or(settings.chart_path.as_deref());
    let chart = Arc::new(load_chart(chart_path, &settings)?);

    if let Some(path) = args.replay.as_deref() {
        return play_replay(chart, path);
    }
    if args.stdin {
        return run_live(chart, settings, settings_path);
    }
    if !settings.autoplay {
        log::info!("MAIN: No input source given, running autoplay (use --stdin to play)");
    }
    run_autoplay(chart, &settings)
}

fn load_chart(path: Option<&Path>, settings: &SettingsState) -> Result<Chart> {
    match path {
        Some(path) => Chart::load(path),
        None => {
            log::info!(
                "MAIN: No chart configured, generating a {} note demo",
                settings.demo_note_count
            );
            Ok(Chart::generate_demo(settings.demo_note_count))
        }
    }
}

fn run_autoplay(chart: Arc<Chart>, settings: &SettingsState) -> Result<()> {
    let mut audio = LogAudio::new();
    let mut hud = TextHud::new(io::stdout());
    let result = run_headless(chart, settings, InputSource::Autoplay, &mut audio, &mut hud)?;
    log::info!("MAIN: {} audio cues played", audio.total());
    report(&result);
    if let Some(dir) = settings.replay_dir.as_deref() {
        game_loop::save_replay(dir, &result, 1)?;
    }
    Ok(())
}

fn play_replay(chart: Arc<Chart>, path: &Path) -> Result<()> {
    let replay = ReplayData::load(path)?;
    log::info!(
        "MAIN: Replaying {:?} ({} inputs, seed {})",
        path,
        replay.inputs.len(),
        replay.seed
    );
    let mut player = ReplayEngine::new(chart, &replay)?;
    let mut audio = LogAudio::new();
    let mut hud = TextHud::new(io::stdout());
    while !player.is_finished() {
        for transition in player.step() {
            for cue in &transition.cues {
                audio.handle(cue);
            }
            if transition.state.game_end {
                hud.finish(&transition.state)?;
            } else {
                hud.render(&transition.state)?;
            }
        }
    }
    report(&player.run_to_end());
    Ok(())
}

fn run_live(chart: Arc<Chart>, settings: SettingsState, settings_path: PathBuf) -> Result<()> {
    let bus = SystemBus::new();

    let manager = InputManager::from_settings(&settings);
    input::start_thread(bus.clone(), manager)?;
    logic::audio::start_thread(&bus, LogAudio::new())?;
    render::start_thread(&bus, TextHud::new(io::stdout()))?;
    start_stdin_reader(bus.clone(), settings_path)?;

    let logic = game_loop::start_thread(bus, chart, settings)?;
    let results = logic
        .join()
        .map_err(|_| Error::Output(io::Error::other("logic thread panicked")))?;
    for result in &results {
        report(result);
    }
    Ok(())
}

/// Feeds stdin lines as raw key events. The logic loop restamps them on arrival.
///
/// `:reload` re-reads the settings file and rebinds keys; `:quit` ends the session.
fn start_stdin_reader(bus: SystemBus, settings_path: PathBuf) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("Stdin Thread".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let trimmed = line.trim();
                match trimmed {
                    "" => continue,
                    ":reload" => {
                        let settings = SettingsState::load_from(&settings_path);
                        let _ = bus.input_cmd_tx.send(InputCommand::ReloadKeybinds(settings));
                        continue;
                    }
                    ":quit" => {
                        let _ = bus.sys_tx.send(SystemEvent::Quit);
                        return;
                    }
                    _ => {}
                }
                match RawInputEvent::parse_line(trimmed, 0.0) {
                    Some(event) => {
                        if bus.raw_input_tx.send(event).is_err() {
                            break;
                        }
                    }
                    None => log::warn!("INPUT: Ignoring malformed line {:?}", trimmed),
                }
            }
            log::info!("INPUT: Stdin closed");
            let _ = bus.sys_tx.send(SystemEvent::InputClosed);
        })
}

fn report(result: &SessionResult) {
    log::info!(
        "MAIN: Session {:?}: score {:.1}, max combo {}, missed {}, accuracy {:.2}% after {} ticks",
        result.termination,
        result.hud.score,
        result.stats.max_combo,
        result.hud.missed,
        result.hud.accuracy,
        result.ticks
    );
}
