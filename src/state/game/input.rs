//! Input judgement: taps, holds, releases and restart.

use super::{AudioCue, GameState, Transition};
use crate::models::engine::constants::{DISTORTION_MAX_SEC, HOLD_SCORE, TAP_SCORE};
use crate::models::engine::{Chart, HitWindow, Lane, rng};
use crate::models::stats::Judgement;

impl GameState {
    pub(super) fn tap(&self, chart: &Chart, lane: Lane) -> Transition {
        let mut next = self.without_transients();

        if let Some(i) = self.judgeable_on(lane) {
            if next.active[i].has_tail() {
                return Transition::quiet(next);
            }
            next.active[i].tapped = true;
            next.tap = true;
            next.reward(TAP_SCORE);
            next.stats.record(Judgement::Hit);
            return Transition::judged(next, Judgement::Hit);
        }

        if let Some(i) = self.judgeable_elsewhere(lane) {
            return next.distort(i);
        }

        next.penalize();
        next.play_random_note = true;
        next.stats.record(Judgement::GhostTap);
        let transition = Transition::judged(next, Judgement::GhostTap);
        match chart.get(rng::pick_index(self.seed, chart.len())) {
            Some(entry) => transition.with_cue(AudioCue::RandomFallback(entry.clone())),
            None => transition,
        }
    }

    pub(super) fn hold(&self, lane: Lane) -> Transition {
        let mut next = self.without_transients();

        if self.judgeable_sustain_on(lane).is_some() {
            next.hold = true;
            return Transition::quiet(next);
        }

        if let Some(i) = self.judgeable_elsewhere(lane) {
            return next.distort(i);
        }

        next.penalize();
        next.stats.record(Judgement::GhostTap);
        Transition::judged(next, Judgement::GhostTap)
    }

    pub(super) fn release(&self, lane: Lane) -> Transition {
        let mut next = self.without_transients();
        next.hold = false;

        let Some(i) = self.judgeable_sustain_on(lane) else {
            next.penalize();
            let judgement = if self.hold {
                Judgement::HoldBroken
            } else {
                Judgement::GhostTap
            };
            next.stats.record(judgement);
            return Transition::judged(next, judgement);
        };

        let expected_ms = self.active[i].entry.duration_ms();
        let judgement = HitWindow::new().judge_release(expected_ms, self.hold_duration);
        if judgement.is_success() {
            next.reward(HOLD_SCORE);
        } else {
            next.penalize();
        }
        next.stats.record(judgement);
        Transition::judged(next, judgement)
    }

    /// Clears the field. The multiplier drops to 0 rather than 1; the next
    /// successful hit restores it.
    pub(super) fn restart(&self) -> Transition {
        let mut next = self.without_transients();
        next.exit = std::mem::take(&mut next.active);
        next.score = 0.0;
        next.combo = 0;
        next.multiplier = 0.0;
        next.hold = false;
        next.tap = false;
        Transition::quiet(next)
    }

    /// Marks note `i` distorted and applies the penalty. Called on the next snapshot.
    fn distort(mut self, i: usize) -> Transition {
        self.active[i].distorted = true;
        self.penalize();
        self.tap = true;
        self.stats.record(Judgement::Distorted);

        let cue = AudioCue::Distorted {
            entry: self.active[i].entry.clone(),
            duration_sec: rng::pick_float(self.seed, DISTORTION_MAX_SEC),
        };
        Transition::judged(self, Judgement::Distorted).with_cue(cue)
    }

    fn judgeable_sustain_on(&self, lane: Lane) -> Option<usize> {
        let window = HitWindow::new();
        self.active
            .iter()
            .position(|n| n.lane == lane && n.has_tail() && window.is_judgeable(n))
    }

    /// Scans the other lanes left to right for anything hittable.
    fn judgeable_elsewhere(&self, lane: Lane) -> Option<usize> {
        Lane::ALL
            .iter()
            .filter(|&&other| other != lane)
            .find_map(|&other| self.judgeable_on(other))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{chart, note_at};
    use super::super::{GameEvent, multiplier_for};
    use super::*;

    fn with_notes(notes: Vec<crate::models::engine::NoteInstance>) -> GameState {
        let mut state = GameState::default();
        state.active = notes;
        state
    }

    fn demo_chart() -> Chart {
        chart(&[(1.0, 1.2), (2.0, 2.3), (3.0, 4.5), (4.0, 4.1)])
    }

    #[test]
    fn test_tap_success() {
        let chart = demo_chart();
        let state = with_notes(vec![note_at(0, Lane::Second, 330.0, 1.0, 1.2)]);
        let t = state.apply(&chart, &GameEvent::Tap(Lane::Second));
        assert_eq!(t.state.score, 10.0);
        assert_eq!(t.state.combo, 1);
        assert!(t.state.tap);
        assert!(t.state.active[0].tapped);
        assert_eq!(t.judgement, Some(Judgement::Hit));
        assert!(t.cues.is_empty());
    }

    #[test]
    fn test_tap_outside_window_is_ghost() {
        let chart = demo_chart();
        let state = with_notes(vec![note_at(0, Lane::Second, 319.0, 1.0, 1.2)]);
        let t = state.apply(&chart, &GameEvent::Tap(Lane::Second));
        assert!(t.state.play_random_note);
        assert!(!t.state.active[0].tapped);
    }

    #[test]
    fn test_combo_multiplier_economy() {
        let chart = demo_chart();
        let mut state = GameState::default();
        for id in 0..10 {
            state.active = vec![note_at(id, Lane::First, 340.0, 1.0, 1.2)];
            state = state.apply(&chart, &GameEvent::Tap(Lane::First)).state;
        }
        assert_eq!(state.combo, 10);
        assert!((state.multiplier - 1.2).abs() < 1e-9);
        assert!((state.score - 100.0).abs() < 1e-9);

        state.active = vec![note_at(10, Lane::First, 340.0, 1.0, 1.2)];
        state = state.apply(&chart, &GameEvent::Tap(Lane::First)).state;
        assert!((state.score - 112.0).abs() < 1e-9);
        assert_eq!(state.combo, 11);
        assert_eq!(state.stats.max_combo, 11);
    }

    #[test]
    fn test_tapped_note_is_not_judged_twice() {
        let chart = demo_chart();
        let state = with_notes(vec![note_at(0, Lane::First, 330.0, 1.0, 1.2)]);
        let t = state.apply(&chart, &GameEvent::Tap(Lane::First));
        let t = t.state.apply(&chart, &GameEvent::Tap(Lane::First));
        assert_eq!(t.judgement, Some(Judgement::GhostTap));
        assert_eq!(t.state.score, 5.0);
        assert_eq!(t.state.combo, 0);
    }

    #[test]
    fn test_tap_on_sustain_is_noop() {
        let chart = demo_chart();
        let mut state = with_notes(vec![note_at(0, Lane::Third, 330.0, 3.0, 4.5)]);
        state.score = 20.0;
        state.combo = 2;
        let t = state.apply(&chart, &GameEvent::Tap(Lane::Third));
        assert_eq!(t.state, state);
        assert_eq!(t.judgement, None);
    }

    #[test]
    fn test_wrong_lane_distorts_first_scanned_lane() {
        let chart = demo_chart();
        let mut state = with_notes(vec![
            note_at(0, Lane::Fourth, 330.0, 1.0, 1.2),
            note_at(1, Lane::Second, 325.0, 2.0, 2.3),
        ]);
        state.score = 3.0;
        state.combo = 7;
        state.multiplier = multiplier_for(7);
        let t = state.apply(&chart, &GameEvent::Tap(Lane::Third));
        assert!(t.state.active[1].distorted);
        assert!(!t.state.active[0].distorted);
        assert_eq!(t.state.score, 0.0);
        assert_eq!(t.state.combo, 0);
        assert_eq!(t.state.multiplier, 1.0);
        assert!(t.state.tap);
        assert_eq!(t.judgement, Some(Judgement::Distorted));
        assert_eq!(
            t.cues,
            vec![AudioCue::Distorted {
                entry: state.active[1].entry.clone(),
                duration_sec: rng::pick_float(state.seed, DISTORTION_MAX_SEC),
            }]
        );
    }

    #[test]
    fn test_unmatched_tap_plays_random_fallback() {
        let chart = demo_chart();
        let mut state = GameState::new(12345);
        state.score = 12.0;
        let t = state.apply(&chart, &GameEvent::Tap(Lane::First));
        assert_eq!(t.state.score, 7.0);
        assert!(t.state.play_random_note);
        let expected = chart.entries()[rng::pick_index(12345, chart.len())].clone();
        assert_eq!(t.cues, vec![AudioCue::RandomFallback(expected)]);
        assert_eq!(t.state.stats.ghost_taps, 1);
    }

    #[test]
    fn test_hold_begin_on_sustain() {
        let chart = demo_chart();
        let state = with_notes(vec![note_at(0, Lane::Third, 330.0, 3.0, 4.5)]);
        let t = state.apply(&chart, &GameEvent::Hold(Lane::Third));
        assert!(t.state.hold);
        assert_eq!(t.state.score, 0.0);
        assert_eq!(t.judgement, None);
    }

    #[test]
    fn test_hold_without_sustain() {
        let chart = demo_chart();
        let mut state = with_notes(vec![note_at(0, Lane::First, 330.0, 1.0, 1.2)]);
        state.score = 20.0;

        let t = state.apply(&chart, &GameEvent::Hold(Lane::Second));
        assert!(t.state.active[0].distorted);
        assert!(!t.state.hold);
        assert_eq!(t.state.score, 15.0);

        let t = GameState::default().apply(&chart, &GameEvent::Hold(Lane::Second));
        assert!(!t.state.play_random_note);
        assert!(t.cues.is_empty());
        assert_eq!(t.judgement, Some(Judgement::GhostTap));
    }

    #[test]
    fn test_release_tolerance() {
        let chart = demo_chart();
        let mut state = with_notes(vec![note_at(0, Lane::Third, 350.0, 3.0, 4.5)]);
        state.hold = true;
        state.combo = 9;
        state.multiplier = multiplier_for(9);

        state.hold_duration = 2099.0;
        let t = state.apply(&chart, &GameEvent::Release(Lane::Third));
        assert_eq!(t.judgement, Some(Judgement::HoldComplete));
        assert_eq!(t.state.score, 30.0);
        assert_eq!(t.state.combo, 10);
        assert!((t.state.multiplier - 1.2).abs() < 1e-9);
        assert!(!t.state.hold);

        state.hold_duration = 2101.0;
        state.score = 2.0;
        let t = state.apply(&chart, &GameEvent::Release(Lane::Third));
        assert_eq!(t.judgement, Some(Judgement::HoldBroken));
        assert_eq!(t.state.score, 0.0);
        assert_eq!(t.state.combo, 0);
        assert!(!t.state.hold);
    }

    #[test]
    fn test_release_without_note_clears_hold() {
        let chart = demo_chart();
        let mut state = GameState::default();
        state.hold = true;
        state.score = 9.0;
        let t = state.apply(&chart, &GameEvent::Release(Lane::First));
        assert!(!t.state.hold);
        assert_eq!(t.state.score, 4.0);
        assert_eq!(t.judgement, Some(Judgement::HoldBroken));
    }

    #[test]
    fn test_restart_clears_field() {
        let chart = demo_chart();
        let mut state = with_notes(vec![
            note_at(0, Lane::First, 100.0, 1.0, 1.2),
            note_at(1, Lane::Third, 50.0, 3.0, 4.5),
        ]);
        state.score = 80.0;
        state.combo = 12;
        state.hold = true;
        state.tap = true;
        state.multiplier = multiplier_for(12);
        let t = state.apply(&chart, &GameEvent::Restart);
        assert!(t.state.active.is_empty());
        assert_eq!(t.state.exit.len(), 2);
        assert_eq!(t.state.score, 0.0);
        assert_eq!(t.state.combo, 0);
        assert_eq!(t.state.multiplier, 0.0);
        assert!(!t.state.hold && !t.state.tap);
    }

    #[test]
    fn test_input_clears_transients() {
        let chart = demo_chart();
        let mut state = GameState::default();
        state.exit = vec![note_at(0, Lane::First, 350.0, 1.0, 1.2)];
        state.due_to_play = vec![0];
        state.spawned = vec![1];
        let t = state.apply(&chart, &GameEvent::Tap(Lane::First));
        assert!(t.state.exit.is_empty());
        assert!(t.state.due_to_play.is_empty());
        assert!(t.state.spawned.is_empty());
    }
}
