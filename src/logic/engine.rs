//! One engine instance: the event queue in front of the reducer.
//!
//! Clock ticks and resolved inputs are queued by timestamp and applied one
//! at a time. Superseded hold sequences are dropped here, every dispatched
//! input is recorded for replay, and the instance stops for good once it
//! sees a pause, a restart or the end of the chart.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::input::events::{InputAction, TimedAction};
use crate::logic::event_queue::EventQueue;
use crate::models::engine::constants::{NUM_LANES, TICK_MS};
use crate::models::engine::{Chart, Lane};
use crate::models::replay::ReplayData;
use crate::models::stats::HitStats;
use crate::state::game::{GameEvent, GameState, HudSnapshot, Transition};

/// Why an engine instance stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    GameOver,
    Paused,
    Restarted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Queued {
    Tick(u64),
    Input(InputAction),
}

/// Summary of a finished (or abandoned) engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub termination: Option<Termination>,
    pub ticks: u64,
    pub hud: HudSnapshot,
    pub stats: HitStats,
    pub final_state: GameState,
    pub replay: ReplayData,
}

pub struct Engine {
    chart: Arc<Chart>,
    state: GameState,
    queue: EventQueue<Queued>,
    /// Highest hold sequence applied per lane.
    applied_seq: [Option<u64>; NUM_LANES],
    /// Ticks already enqueued.
    ticks_queued: u64,
    /// Ticks already applied.
    ticks: u64,
    replay: ReplayData,
    termination: Option<Termination>,
}

impl Engine {
    pub fn new(chart: Arc<Chart>, seed: u32) -> Self {
        let replay = ReplayData::new(chart.hash(), seed);
        Self {
            chart,
            state: GameState::new(seed),
            queue: EventQueue::new(),
            applied_seq: [None; NUM_LANES],
            ticks_queued: 0,
            ticks: 0,
            replay,
            termination: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn is_running(&self) -> bool {
        self.termination.is_none()
    }

    pub fn replay(&self) -> &ReplayData {
        &self.replay
    }

    /// Enqueues every clock tick due at or before `now_ms` (engine-relative).
    /// The first tick fires at 0 ms.
    pub fn schedule_ticks_until(&mut self, now_ms: f64) {
        while self.ticks_queued as f64 * TICK_MS <= now_ms {
            let elapsed = self.ticks_queued;
            self.queue.push(elapsed as f64 * TICK_MS, Queued::Tick(elapsed));
            self.ticks_queued += 1;
        }
    }

    /// Enqueues a resolved input at its engine-relative arrival time.
    pub fn push_input(&mut self, input: TimedAction) {
        self.queue.push(input.time_ms, Queued::Input(input.action));
    }

    /// Applies every queued event in order. Stops early on termination.
    pub fn drain(&mut self) -> Vec<Transition> {
        let mut out = Vec::new();
        while self.is_running() {
            let Some((time_ms, queued)) = self.queue.pop() else {
                break;
            };
            if let Some(transition) = self.dispatch(time_ms, queued) {
                out.push(transition);
            }
        }
        out
    }

    /// Applies queued events due at or before `now_ms`.
    pub fn drain_until(&mut self, now_ms: f64) -> Vec<Transition> {
        let mut out = Vec::new();
        while self.is_running() {
            let Some((time_ms, queued)) = self.queue.pop_due(now_ms) else {
                break;
            };
            if let Some(transition) = self.dispatch(time_ms, queued) {
                out.push(transition);
            }
        }
        out
    }

    fn dispatch(&mut self, time_ms: f64, queued: Queued) -> Option<Transition> {
        let event = match queued {
            Queued::Tick(elapsed) => GameEvent::Tick { elapsed },
            Queued::Input(action) => self.resolve(action)?,
        };
        self.apply(time_ms, event)
    }

    /// Maps an input to a reducer event. A hold sequence is superseded
    /// once a newer one on the same lane has been applied.
    fn resolve(&mut self, action: InputAction) -> Option<GameEvent> {
        if let Some((lane, seq)) = action.hold_seq() {
            if self.is_stale(lane, seq) {
                log::debug!("ENGINE: Dropping superseded hold seq {} on {}", seq, lane);
                return None;
            }
            self.applied_seq[lane.index()] = Some(seq);
        }
        match action {
            InputAction::Tap(lane) => Some(GameEvent::Tap(lane)),
            InputAction::Hold { lane, .. } => Some(GameEvent::Hold(lane)),
            InputAction::Release { lane, .. } => Some(GameEvent::Release(lane)),
            InputAction::Pause => Some(GameEvent::Pause),
            InputAction::Restart => Some(GameEvent::Restart),
            InputAction::Quit => None,
        }
    }

    fn is_stale(&self, lane: Lane, seq: u64) -> bool {
        self.applied_seq[lane.index()].is_some_and(|applied| seq < applied)
    }

    /// Applies one reducer event directly, bypassing the queue.
    ///
    /// Returns `None` once the instance has terminated.
    pub fn apply(&mut self, time_ms: f64, event: GameEvent) -> Option<Transition> {
        if !self.is_running() {
            return None;
        }
        if !event.is_tick() {
            self.replay.add_input(self.ticks, time_ms, event);
        }

        let transition = self.state.apply(&self.chart, &event);
        self.state = transition.state.clone();
        if event.is_tick() {
            self.ticks += 1;
        }

        if let Some(judgement) = transition.judgement {
            log::debug!(
                "ENGINE: {:?} at {:.0}ms (score {}, combo {})",
                judgement,
                time_ms,
                self.state.score,
                self.state.combo
            );
        }

        self.termination = match event {
            GameEvent::Pause => Some(Termination::Paused),
            GameEvent::Restart => Some(Termination::Restarted),
            _ if self.state.game_end => Some(Termination::GameOver),
            _ => None,
        };
        if let Some(reason) = self.termination {
            log::info!(
                "ENGINE: Stopped ({:?}) after {} ticks, score {}, missed {}",
                reason,
                self.ticks,
                self.state.score,
                self.state.missed
            );
            self.queue.clear();
        }

        Some(transition)
    }

    pub fn finish(self) -> SessionResult {
        SessionResult {
            termination: self.termination,
            ticks: self.ticks,
            hud: self.state.hud(),
            stats: self.state.stats.clone(),
            final_state: self.state,
            replay: self.replay,
        }
    }
}
