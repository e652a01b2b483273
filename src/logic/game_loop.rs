//! Engine lifecycle and the real-time logic loop.
//!
//! The first engine instance starts one restart delay after load. Pause and
//! game over stop the running instance; a restart (from the running
//! instance, or from the restart key while stopped) schedules a fresh
//! instance one delay later. Instances never share state.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossbeam_channel::{select, tick};

use crate::input::events::{InputAction, TimedAction};
use crate::logic::engine::{Engine, SessionResult, Termination};
use crate::models::engine::Chart;
use crate::models::engine::constants::TICK_MS;
use crate::models::settings::SettingsState;
use crate::state::game::{GameState, Transition};
use crate::system::bus::{RenderState, SystemBus, SystemEvent};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// A new instance starts at `start_at_ms` (session clock).
    Waiting { start_at_ms: f64 },
    /// The current instance's clock zero is `started_ms` on the session clock.
    Running { started_ms: f64 },
    Stopped,
}

pub struct Lifecycle {
    chart: Arc<Chart>,
    seed: u32,
    delay_ms: f64,
    phase: Phase,
    engine: Option<Engine>,
    run: u32,
    finished: Vec<SessionResult>,
}

impl Lifecycle {
    pub fn new(chart: Arc<Chart>, seed: u32, delay_ms: f64, now_ms: f64) -> Self {
        Self {
            chart,
            seed,
            delay_ms,
            phase: Phase::Waiting {
                start_at_ms: now_ms + delay_ms,
            },
            engine: None,
            run: 0,
            finished: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of instances started so far.
    pub fn run(&self) -> u32 {
        self.run
    }

    pub fn state(&self) -> Option<&GameState> {
        self.engine.as_ref().map(Engine::state)
    }

    /// Moves the session clock to `now_ms`: starts a pending instance whose
    /// delay has passed, then dispatches every tick due.
    pub fn advance(&mut self, now_ms: f64) -> Vec<Transition> {
        if let Phase::Waiting { start_at_ms } = self.phase {
            if now_ms >= start_at_ms {
                self.run += 1;
                self.engine = Some(Engine::new(self.chart.clone(), self.seed));
                self.phase = Phase::Running {
                    started_ms: start_at_ms,
                };
                log::info!("LOGIC: Engine run {} started", self.run);
            }
        }

        let Phase::Running { started_ms } = self.phase else {
            return Vec::new();
        };
        let Some(engine) = self.engine.as_mut() else {
            return Vec::new();
        };
        let local = now_ms - started_ms;
        engine.schedule_ticks_until(local);
        let transitions = engine.drain_until(local);
        self.settle(now_ms);
        transitions
    }

    /// Feeds a resolved input stamped on the session clock. Ticks due up to
    /// the input's time are applied first.
    pub fn input(&mut self, input: TimedAction) -> Vec<Transition> {
        match self.phase {
            Phase::Running { started_ms } => {
                let Some(engine) = self.engine.as_mut() else {
                    return Vec::new();
                };
                let local = input.time_ms - started_ms;
                engine.schedule_ticks_until(local);
                engine.push_input(TimedAction {
                    action: input.action,
                    time_ms: local,
                });
                let transitions = engine.drain_until(local);
                self.settle(input.time_ms);
                transitions
            }
            Phase::Stopped if input.action == InputAction::Restart => {
                log::info!("LOGIC: Restart requested while stopped");
                self.phase = Phase::Waiting {
                    start_at_ms: input.time_ms + self.delay_ms,
                };
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Sessions that ended since the last call.
    pub fn take_finished(&mut self) -> Vec<SessionResult> {
        std::mem::take(&mut self.finished)
    }

    fn settle(&mut self, now_ms: f64) {
        let Some(reason) = self.engine.as_ref().and_then(Engine::termination) else {
            return;
        };
        if let Some(engine) = self.engine.take() {
            self.finished.push(engine.finish());
        }
        self.phase = match reason {
            Termination::Restarted => Phase::Waiting {
                start_at_ms: now_ms + self.delay_ms,
            },
            Termination::Paused | Termination::GameOver => Phase::Stopped,
        };
    }
}

/// Writes a finished session's replay under `dir`.
pub fn save_replay(dir: &Path, result: &SessionResult, run: u32) -> crate::error::Result<()> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let hash = &result.replay.chart_hash;
    let short = hash.get(..8).unwrap_or(hash);
    let path = dir.join(format!("{short}-run{run}-{stamp}.json"));
    result.replay.save(&path)?;
    log::info!("LOGIC: Replay saved to {:?}", path);
    Ok(())
}

fn publish(bus: &SystemBus, run: u32, transitions: Vec<Transition>) {
    for transition in transitions {
        for cue in transition.cues {
            if bus.audio_tx.send(cue).is_err() {
                log::warn!("LOGIC: Audio thread gone, dropping cue");
            }
        }
        let frame = RenderState {
            state: transition.state,
            run,
        };
        // Terminal frames must reach the renderer; others may be dropped under load.
        if frame.state.game_end {
            let _ = bus.render_tx.send(frame);
        } else {
            let _ = bus.render_tx.try_send(frame);
        }
    }
}

/// Spawns the real-time logic thread. Returns the finished sessions when
/// the loop quits.
pub fn start_thread(
    bus: SystemBus,
    chart: Arc<Chart>,
    settings: SettingsState,
) -> io::Result<JoinHandle<Vec<SessionResult>>> {
    thread::Builder::new()
        .name("Logic Thread".to_string())
        .spawn(move || {
            log::info!("LOGIC: Thread started");
            let origin = Instant::now();
            let now_ms = || origin.elapsed().as_secs_f64() * 1000.0;

            let mut lifecycle = Lifecycle::new(
                chart,
                settings.seed,
                settings.restart_delay_ms as f64,
                now_ms(),
            );
            let ticker = tick(Duration::from_millis(TICK_MS as u64));
            let mut results = Vec::new();
            let mut input_closed = false;

            loop {
                select! {
                    recv(ticker) -> _ => {
                        let transitions = lifecycle.advance(now_ms());
                        publish(&bus, lifecycle.run(), transitions);
                    }
                    recv(bus.action_rx) -> action => match action {
                        Ok(TimedAction { action: InputAction::Quit, .. }) => {
                            log::info!("LOGIC: Quit key pressed");
                            break;
                        }
                        // Inputs are stamped on arrival with the logic clock.
                        Ok(input) => {
                            let transitions = lifecycle.input(TimedAction {
                                action: input.action,
                                time_ms: now_ms(),
                            });
                            publish(&bus, lifecycle.run(), transitions);
                        }
                        Err(_) => break,
                    },
                    recv(bus.sys_rx) -> evt => match evt {
                        Ok(SystemEvent::InputClosed) => input_closed = true,
                        Ok(SystemEvent::Quit) | Err(_) => {
                            log::info!("LOGIC: Quit received...");
                            break;
                        }
                    },
                }

                for result in lifecycle.take_finished() {
                    if let Some(dir) = settings.replay_dir.as_deref() {
                        if let Err(e) = save_replay(dir, &result, lifecycle.run()) {
                            log::error!("LOGIC: Failed to save replay: {}", e);
                        }
                    }
                    results.push(result);
                }

                if input_closed && lifecycle.phase() == Phase::Stopped {
                    log::info!("LOGIC: Input closed and engine stopped, leaving");
                    break;
                }
            }

            log::info!("LOGIC: Thread stopped");
            results
        })
}
