//! Replay playback for exact session reproduction.
//!
//! Recorded inputs are re-applied at the tick positions they were first
//! dispatched at, into a fresh engine with the recorded seed.

use std::sync::Arc;

use crate::error::Result;
use crate::logic::engine::{Engine, SessionResult};
use crate::models::engine::constants::{SPAWN_LOOKAHEAD_MS, TICK_MS};
use crate::models::engine::Chart;
use crate::models::replay::{ReplayData, ReplayInput};
use crate::state::game::{GameEvent, Transition};

/// Hard stop for charts whose last entry never gets reported as due
/// (entries shorter than a tick can fall between two ticks).
pub fn tick_limit(chart: &Chart) -> u64 {
    ((chart.duration_sec() * 1000.0 + SPAWN_LOOKAHEAD_MS) / TICK_MS).ceil() as u64 + 1
}

pub struct ReplayEngine {
    engine: Engine,
    inputs: Vec<ReplayInput>,
    input_index: usize,
    tick_limit: u64,
}

impl ReplayEngine {
    /// Fails when the replay belongs to another chart.
    pub fn new(chart: Arc<Chart>, replay: &ReplayData) -> Result<Self> {
        replay.verify_chart(&chart)?;
        let tick_limit = tick_limit(&chart);
        Ok(Self {
            engine: Engine::new(chart, replay.seed),
            inputs: replay.inputs.clone(),
            input_index: 0,
            tick_limit,
        })
    }

    pub fn is_finished(&self) -> bool {
        !self.engine.is_running() || self.engine.ticks() >= self.tick_limit
    }

    /// Applies the inputs recorded before the next tick, then the tick itself.
    pub fn step(&mut self) -> Vec<Transition> {
        let mut out = Vec::new();
        if self.is_finished() {
            return out;
        }

        let tick = self.engine.ticks();
        while let Some(input) = self.inputs.get(self.input_index) {
            if input.tick > tick {
                break;
            }
            let (time_ms, event) = (input.time_ms, input.event);
            self.input_index += 1;
            out.extend(self.engine.apply(time_ms, event));
        }

        out.extend(
            self.engine
                .apply(tick as f64 * TICK_MS, GameEvent::Tick { elapsed: tick }),
        );
        out
    }

    pub fn run_to_end(mut self) -> SessionResult {
        while !self.is_finished() {
            self.step();
        }
        self.engine.finish()
    }
}

/// Replays a recording to completion and returns the reproduced session.
pub fn simulate_replay(chart: Arc<Chart>, replay: &ReplayData) -> Result<SessionResult> {
    Ok(ReplayEngine::new(chart, replay)?.run_to_end())
}
