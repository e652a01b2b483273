//! Runs one engine instance over a virtual clock, as fast as possible.
//!
//! Used for autoplay demos, scripted key sequences and tests. Inputs go
//! through the same key bindings, input manager and event queue as the
//! real-time loop; only the clock is simulated.

use std::sync::Arc;

use crate::error::Result;
use crate::input::bindings::KeyBindings;
use crate::input::events::RawInputEvent;
use crate::input::manager::InputManager;
use crate::logic::audio::AudioSink;
use crate::logic::autoplay::Autoplay;
use crate::logic::engine::{Engine, SessionResult};
use crate::logic::replay_engine::tick_limit;
use crate::models::engine::Chart;
use crate::models::engine::constants::TICK_MS;
use crate::models::settings::SettingsState;
use crate::render::Renderer;

/// Where a headless session gets its key events from.
pub enum InputSource {
    Autoplay,
    /// Raw key events stamped in engine-relative ms.
    Scripted(Vec<RawInputEvent>),
}

pub fn run_headless<A, R>(
    chart: Arc<Chart>,
    settings: &SettingsState,
    source: InputSource,
    audio: &mut A,
    renderer: &mut R,
) -> Result<SessionResult>
where
    A: AudioSink,
    R: Renderer,
{
    let bindings = KeyBindings::from_settings(settings);
    let mut manager = InputManager::new(bindings.clone());
    let limit = tick_limit(&chart);
    let mut engine = Engine::new(chart, settings.seed);

    let mut autoplay = match source {
        InputSource::Autoplay => Some(Autoplay::new(&bindings)),
        InputSource::Scripted(mut events) => {
            events.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
            for event in &events {
                if let Some(action) = manager.process(event) {
                    engine.push_input(action);
                }
            }
            None
        }
    };

    log::info!("LOGIC: Headless session started (seed {})", settings.seed);

    let mut tick = 0u64;
    while engine.is_running() && tick < limit {
        let now = tick as f64 * TICK_MS;
        engine.schedule_ticks_until(now);
        for transition in engine.drain_until(now) {
            for cue in &transition.cues {
                audio.handle(cue);
            }
            if transition.state.game_end {
                renderer.finish(&transition.state)?;
            } else {
                renderer.render(&transition.state)?;
            }
        }

        if let Some(bot) = autoplay.as_mut() {
            // Reacts between this tick and the next.
            for event in bot.react(engine.state(), now + 1.0) {
                if let Some(action) = manager.process(&event) {
                    engine.push_input(action);
                }
            }
        }
        tick += 1;
    }

    let result = engine.finish();
    log::info!(
        "LOGIC: Headless session ended ({:?}) score {} missed {}",
        result.termination,
        result.hud.score,
        result.hud.missed
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::KeyPhase;
    use crate::logic::audio::LogAudio;
    use crate::logic::engine::Termination;
    use crate::logic::replay_engine::simulate_replay;
    use crate::models::engine::constants::NUM_LANES;
    use crate::models::engine::{Lane, rng};
    use crate::render::TextHud;

    const CHART: &str = "playable,instrument,velocity,pitch,start,end
True,piano,0.8,60,2.0,2.3
True,piano,0.8,62,2.5,2.8
False,drums,0.5,36,2.75,2.8
True,bass,0.7,40,3.0,4.5
True,piano,0.8,64,5.0,5.2
True,piano,0.8,65,5.5,5.7
True,piano,0.8,67,6.0,6.4
";

    fn chart() -> Arc<Chart> {
        Arc::new(Chart::parse(CHART).unwrap())
    }

    #[test]
    fn test_autoplay_clears_chart() {
        let mut audio = LogAudio::new();
        let mut hud = TextHud::new(Vec::new());
        let result = run_headless(
            chart(),
            &SettingsState::default(),
            InputSource::Autoplay,
            &mut audio,
            &mut hud,
        )
        .unwrap();

        assert_eq!(result.termination, Some(Termination::GameOver));
        assert_eq!(result.hud.missed, 0);
        assert_eq!(result.stats.hits, 5);
        assert_eq!(result.stats.holds, 1);
        assert_eq!(result.stats.distortions, 0);
        assert_eq!(result.stats.ghost_taps, 0);
        assert!(result.hud.score > 0.0);
        assert!(audio.tail_pulses > 0);
        assert_eq!(audio.notes, 6);

        let text = String::from_utf8(hud.into_inner()).unwrap();
        assert!(text.contains("GAME OVER"));
    }

    #[test]
    fn test_autoplay_session_replays_exactly() {
        let chart = chart();
        let result = run_headless(
            chart.clone(),
            &SettingsState::default(),
            InputSource::Autoplay,
            &mut LogAudio::new(),
            &mut TextHud::new(std::io::sink()),
        )
        .unwrap();
        let replayed = simulate_replay(chart, &result.replay).unwrap();
        assert_eq!(replayed.final_state, result.final_state);
        assert_eq!(replayed.ticks, result.ticks);
    }

    #[test]
    fn test_idle_session_misses_everything() {
        let result = run_headless(
            chart(),
            &SettingsState::default(),
            InputSource::Scripted(Vec::new()),
            &mut LogAudio::new(),
            &mut TextHud::new(std::io::sink()),
        )
        .unwrap();
        assert_eq!(result.termination, Some(Termination::GameOver));
        assert_eq!(result.stats.hits, 0);
        assert!(result.replay.inputs.is_empty());
    }

    #[test]
    fn test_scripted_sustain_is_held_to_completion() {
        let chart = Arc::new(
            Chart::parse(
                "playable,instrument,velocity,pitch,start,end
True,bass,0.7,40,3.0,4.5
True,piano,0.8,60,8.0,8.1
",
            )
            .unwrap(),
        );
        // The sustain spawns on tick 40 and takes its lane from that tick's seed.
        let seed = (0..40).fold(10, |s, _| rng::hash(s));
        let lane = Lane::from_index(rng::pick_index(seed, NUM_LANES));
        let key = KeyBindings::new().lane_key(lane).unwrap().to_string();

        let mut events: Vec<RawInputEvent> = (0..60)
            .map(|k| RawInputEvent::new(key.as_str(), KeyPhase::Repeat, 2910.0 + 25.0 * k as f64))
            .collect();
        events.push(RawInputEvent::new(key.as_str(), KeyPhase::Up, 4410.0));

        let result = run_headless(
            chart,
            &SettingsState::default(),
            InputSource::Scripted(events),
            &mut LogAudio::new(),
            &mut TextHud::new(std::io::sink()),
        )
        .unwrap();
        assert_eq!(result.stats.holds, 1);
        assert_eq!(result.stats.broken_holds, 0);
        assert_eq!(result.replay.inputs.len(), 61);
        assert_eq!(result.hud.score, 30.0);
    }

    #[test]
    fn test_scripted_pause_stops_session() {
        let events = vec![RawInputEvent::new("KeyP", KeyPhase::Down, 1000.0)];
        let result = run_headless(
            chart(),
            &SettingsState::default(),
            InputSource::Scripted(events),
            &mut LogAudio::new(),
            &mut TextHud::new(std::io::sink()),
        )
        .unwrap();
        assert_eq!(result.termination, Some(Termination::Paused));
        // The pause arrived before the 1000 ms tick was queued, so it runs first.
        assert_eq!(result.ticks, 40);
    }
}
