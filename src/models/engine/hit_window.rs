//! Spatial hit window for taps and the timing tolerance for hold releases.

use super::constants::FALL_DISTANCE;
use super::instance::NoteInstance;
use crate::models::stats::Judgement;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitWindow {
    /// Lowest note height that can be hit.
    pub top: f64,
    /// Highest note height that can be hit (the hit line).
    pub bottom: f64,
    /// Allowed gap between expected and actual hold duration, exclusive.
    pub hold_tolerance_ms: f64,
}

impl HitWindow {
    pub fn new() -> Self {
        Self {
            top: 320.0,
            bottom: FALL_DISTANCE,
            hold_tolerance_ms: 600.0,
        }
    }

    pub fn contains(&self, y: f64) -> bool {
        self.top <= y && y <= self.bottom
    }

    /// In the window and not already consumed by a tap.
    pub fn is_judgeable(&self, note: &NoteInstance) -> bool {
        self.contains(note.y) && !note.tapped
    }

    /// Judges a hold release against the entry's sustain length.
    pub fn judge_release(&self, expected_ms: f64, held_ms: f64) -> Judgement {
        if (expected_ms - held_ms).abs() < self.hold_tolerance_ms {
            Judgement::HoldComplete
        } else {
            Judgement::HoldBroken
        }
    }
}

impl Default for HitWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bounds() {
        let w = HitWindow::new();
        assert!(w.contains(320.0));
        assert!(w.contains(350.0));
        assert!(!w.contains(319.9));
        assert!(!w.contains(350.1));
    }

    #[test]
    fn test_hold_tolerance() {
        let w = HitWindow::new();
        assert_eq!(w.judge_release(1000.0, 1599.0), Judgement::HoldComplete);
        assert_eq!(w.judge_release(1000.0, 401.0), Judgement::HoldComplete);
        assert_eq!(w.judge_release(1000.0, 1601.0), Judgement::HoldBroken);
        assert_eq!(w.judge_release(1000.0, 1600.0), Judgement::HoldBroken);
    }
}
