//! Hit statistics and judgement types.
//!
//! Every input the judge resolves produces one [`Judgement`]; the scheduler
//! adds [`Judgement::Miss`] for notes that fall past the hit line untouched.

use serde::{Deserialize, Serialize};

/// Outcome of a judged input, from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Judgement {
    /// Tap on the right lane inside the window.
    Hit,
    /// Sustain released within tolerance of its length.
    HoldComplete,
    /// Sustain released too early or too late.
    HoldBroken,
    /// Input on the wrong lane while another lane had a note to hit.
    Distorted,
    /// Input with no note in the window anywhere.
    GhostTap,
    /// Note left the field without being hit.
    Miss,
}

impl Judgement {
    pub fn is_success(&self) -> bool {
        matches!(self, Judgement::Hit | Judgement::HoldComplete)
    }
}

/// Accumulated hit statistics for a play session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HitStats {
    pub hits: u32,
    pub holds: u32,
    pub broken_holds: u32,
    pub distortions: u32,
    pub ghost_taps: u32,
    pub misses: u32,
    pub max_combo: u32,
}

impl HitStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, judgement: Judgement) {
        match judgement {
            Judgement::Hit => self.hits += 1,
            Judgement::HoldComplete => self.holds += 1,
            Judgement::HoldBroken => self.broken_holds += 1,
            Judgement::Distorted => self.distortions += 1,
            Judgement::GhostTap => self.ghost_taps += 1,
            Judgement::Miss => self.misses += 1,
        }
    }

    pub fn record_misses(&mut self, count: u32) {
        self.misses += count;
    }

    pub fn observe_combo(&mut self, combo: u32) {
        self.max_combo = self.max_combo.max(combo);
    }

    /// Percentage of judged notes that were hit (0-100).
    ///
    /// Ghost taps are not counted; they never had a note to judge against.
    pub fn calculate_accuracy(&self) -> f64 {
        let good = (self.hits + self.holds) as f64;
        let total = good + (self.broken_holds + self.distortions + self.misses) as f64;
        if total == 0.0 {
            return 0.0;
        }
        good / total * 100.0
    }
}
