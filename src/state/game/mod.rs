//! Core gameplay state and its reducer.
//!
//! `GameState` is an immutable snapshot. Every event produces a brand new
//! snapshot through [`GameState::apply`]:
//! - clock ticks run the scheduler (spawn, move, retire, advance the RNG)
//! - lane inputs run the judge (taps, holds, releases)
//! - pause is the identity and restart clears the field
//!
//! The reducer never fails. Chart data is validated when it is loaded.

mod input;
mod notes;
mod snapshot;

pub mod actions;

pub use actions::GameEvent;
pub use snapshot::{AudioCue, HudSnapshot, Transition};

use serde::{Deserialize, Serialize};

use crate::models::engine::constants::{COMBO_STEP, MULTIPLIER_STEP, PENALTY};
use crate::models::engine::{Chart, DEFAULT_SEED, HitWindow, Lane, NoteInstance};
use crate::models::stats::HitStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Notes currently on the field, in spawn order.
    pub active: Vec<NoteInstance>,
    /// Notes retired by the event that produced this snapshot.
    pub exit: Vec<NoteInstance>,
    /// Simulation clock in ms.
    pub time_ms: f64,
    /// Next chart index eligible for playback.
    pub play_index: usize,
    /// Chart indices that started sounding on this tick.
    pub due_to_play: Vec<usize>,
    /// Chart indices spawned on this tick.
    pub spawned: Vec<usize>,
    pub game_end: bool,
    /// Source of note ids; only ever grows.
    pub object_count: u64,
    pub score: f64,
    pub combo: u32,
    pub multiplier: f64,
    /// Time the current sustain has been held, in ms.
    pub hold_duration: f64,
    pub hold: bool,
    /// A tap succeeded or distorted during the current tick.
    pub tap: bool,
    /// An unmatched tap asked for a random fallback note.
    pub play_random_note: bool,
    pub missed: u32,
    pub seed: u32,
    pub stats: HitStats,
}

impl GameState {
    pub fn new(seed: u32) -> Self {
        Self {
            active: Vec::new(),
            exit: Vec::new(),
            time_ms: 0.0,
            play_index: 0,
            due_to_play: Vec::new(),
            spawned: Vec::new(),
            game_end: false,
            object_count: 0,
            score: 0.0,
            combo: 0,
            multiplier: 1.0,
            hold_duration: 0.0,
            hold: false,
            tap: false,
            play_random_note: false,
            missed: 0,
            seed,
            stats: HitStats::new(),
        }
    }

    /// Applies one event and returns the next snapshot with its audio cues.
    pub fn apply(&self, chart: &Chart, event: &GameEvent) -> Transition {
        match *event {
            GameEvent::Tick { elapsed } => self.tick(chart, elapsed),
            GameEvent::Tap(lane) => self.tap(chart, lane),
            GameEvent::Hold(lane) => self.hold(lane),
            GameEvent::Release(lane) => self.release(lane),
            GameEvent::Pause => Transition::quiet(self.clone()),
            GameEvent::Restart => self.restart(),
        }
    }

    /// First active note on `lane` that is in the hit window and not yet tapped.
    fn judgeable_on(&self, lane: Lane) -> Option<usize> {
        let window = HitWindow::new();
        self.active
            .iter()
            .position(|n| n.lane == lane && window.is_judgeable(n))
    }

    /// Copy of this state with the per-tick scratch lists emptied.
    fn without_transients(&self) -> Self {
        let mut next = self.clone();
        next.exit.clear();
        next.due_to_play.clear();
        next.spawned.clear();
        next
    }

    fn reward(&mut self, base: f64) {
        self.score += base * self.multiplier;
        self.combo += 1;
        self.multiplier = multiplier_for(self.combo);
        self.stats.observe_combo(self.combo);
    }

    fn penalize(&mut self) {
        self.score = (self.score - PENALTY).max(0.0);
        self.combo = 0;
        self.multiplier = 1.0;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// `1 + 0.2 * floor(combo / 10)`.
pub fn multiplier_for(combo: u32) -> f64 {
    1.0 + MULTIPLIER_STEP * (combo / COMBO_STEP) as f64
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let s = GameState::default();
        assert_eq!(s.seed, 10);
        assert_eq!(s.multiplier, 1.0);
        assert_eq!(s.score, 0.0);
        assert!(s.active.is_empty());
    }

    #[test]
    fn test_multiplier_steps() {
        assert_eq!(multiplier_for(0), 1.0);
        assert_eq!(multiplier_for(9), 1.0);
        assert_eq!(multiplier_for(10), 1.2);
        assert!((multiplier_for(25) - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_pause_is_identity() {
        let chart = test_support::chart(&[(2.0, 2.2)]);
        let mut s = GameState::new(5);
        s.score = 40.0;
        s.combo = 4;
        let t = s.apply(&chart, &GameEvent::Pause);
        assert_eq!(t.state, s);
        assert!(t.cues.is_empty());
    }
}
