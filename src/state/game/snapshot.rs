//! What a transition hands to the audio and render collaborators.

use serde::{Deserialize, Serialize};

use super::GameState;
use crate::models::engine::ChartEntry;
use crate::models::stats::Judgement;

/// A sound the audio collaborator should play as a result of one transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AudioCue {
    /// A short chart entry reached its start time.
    Note(ChartEntry),
    /// 20 ms pulse of a sustain while the player is holding.
    TailPulse(ChartEntry),
    /// Wrong-lane input: the entry is played for a random fraction of a second.
    Distorted { entry: ChartEntry, duration_sec: f64 },
    /// Input with nothing to hit: a random chart entry is played in full.
    RandomFallback(ChartEntry),
}

/// Result of applying one event: the next snapshot plus its side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: GameState,
    pub cues: Vec<AudioCue>,
    /// Set when the event judged an input or retired unhit notes.
    pub judgement: Option<Judgement>,
}

impl Transition {
    pub(crate) fn quiet(state: GameState) -> Self {
        Self {
            state,
            cues: Vec::new(),
            judgement: None,
        }
    }

    pub(crate) fn judged(state: GameState, judgement: Judgement) -> Self {
        Self {
            state,
            cues: Vec::new(),
            judgement: Some(judgement),
        }
    }

    pub(crate) fn with_cue(mut self, cue: AudioCue) -> Self {
        self.cues.push(cue);
        self
    }
}

/// Text-only view of a snapshot for the HUD and logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub time_ms: f64,
    pub score: f64,
    pub combo: u32,
    pub multiplier: f64,
    pub missed: u32,
    pub active: usize,
    pub accuracy: f64,
    pub game_end: bool,
}

impl GameState {
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            time_ms: self.time_ms,
            score: self.score,
            combo: self.combo,
            multiplier: self.multiplier,
            missed: self.missed,
            active: self.active.len(),
            accuracy: self.stats.calculate_accuracy(),
            game_end: self.game_end,
        }
    }
}
