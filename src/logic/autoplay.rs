//! Autoplay bot.
//!
//! Watches snapshots and produces the raw key events a perfect player would:
//! a down/up pair for every untailed note entering the hit window, and a
//! held key (one repeat per tick) for sustains, released once the hold has
//! lasted the sustain's length.

use std::collections::HashSet;

use crate::input::bindings::KeyBindings;
use crate::input::events::{KeyPhase, RawInputEvent};
use crate::models::engine::constants::NUM_LANES;
use crate::models::engine::{HitWindow, Lane};
use crate::state::game::GameState;

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeldSustain {
    id: u64,
    expected_ms: f64,
}

pub struct Autoplay {
    keys: [String; NUM_LANES],
    window: HitWindow,
    held: [Option<HeldSustain>; NUM_LANES],
    /// Sustains already held once; never grabbed again.
    done: HashSet<u64>,
}

impl Autoplay {
    pub fn new(bindings: &KeyBindings) -> Self {
        let keys = Lane::ALL.map(|lane| {
            bindings
                .lane_key(lane)
                .map(str::to_string)
                .unwrap_or_default()
        });
        Self {
            keys,
            window: HitWindow::new(),
            held: [None; NUM_LANES],
            done: HashSet::new(),
        }
    }

    /// Key events to send after seeing `state`, stamped at `time_ms`.
    pub fn react(&mut self, state: &GameState, time_ms: f64) -> Vec<RawInputEvent> {
        let mut events = Vec::new();

        for lane in Lane::ALL {
            let key = &self.keys[lane.index()];
            if key.is_empty() {
                continue;
            }

            if let Some(held) = self.held[lane.index()] {
                let still_active = state.active.iter().any(|n| n.id == held.id);
                if !still_active || state.hold_duration >= held.expected_ms {
                    events.push(RawInputEvent::new(key.as_str(), KeyPhase::Up, time_ms));
                    self.held[lane.index()] = None;
                    self.done.insert(held.id);
                } else {
                    events.push(RawInputEvent::new(key.as_str(), KeyPhase::Repeat, time_ms));
                }
                continue;
            }

            let Some(note) = state
                .active
                .iter()
                .find(|n| n.lane == lane && self.window.is_judgeable(n) && !self.done.contains(&n.id))
            else {
                continue;
            };

            if note.has_tail() {
                self.held[lane.index()] = Some(HeldSustain {
                    id: note.id,
                    expected_ms: note.entry.duration_ms(),
                });
                events.push(RawInputEvent::new(key.as_str(), KeyPhase::Repeat, time_ms));
            } else {
                events.push(RawInputEvent::new(key.as_str(), KeyPhase::Down, time_ms));
                events.push(RawInputEvent::new(key.as_str(), KeyPhase::Up, time_ms));
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::engine::{ChartEntry, NoteInstance};

    fn note(id: u64, lane: Lane, y: f64, start: f64, end: f64) -> NoteInstance {
        let entry = ChartEntry {
            playable: true,
            instrument: "piano".into(),
            velocity: 0.5,
            pitch: 60,
            start_sec: start,
            end_sec: end,
        };
        let mut n = NoteInstance::spawn(id, 0.0, lane, 0, &entry);
        n.y = y;
        n
    }

    #[test]
    fn test_taps_notes_in_window() {
        let mut bot = Autoplay::new(&KeyBindings::new());
        let mut state = GameState::default();
        state.active = vec![note(0, Lane::Second, 324.625, 2.0, 2.1), note(1, Lane::Third, 200.0, 2.5, 2.6)];
        let events = bot.react(&state, 1000.0);
        assert_eq!(
            events,
            vec![
                RawInputEvent::new("KeyJ", KeyPhase::Down, 1000.0),
                RawInputEvent::new("KeyJ", KeyPhase::Up, 1000.0),
            ]
        );
    }

    #[test]
    fn test_holds_sustain_until_expected_length() {
        let mut bot = Autoplay::new(&KeyBindings::new());
        let mut state = GameState::default();
        state.active = vec![note(4, Lane::Fourth, 330.0, 2.0, 3.5)];

        let events = bot.react(&state, 0.0);
        assert_eq!(events, vec![RawInputEvent::new("KeyL", KeyPhase::Repeat, 0.0)]);

        state.hold = true;
        state.hold_duration = 1000.0;
        let events = bot.react(&state, 25.0);
        assert_eq!(events[0].phase, KeyPhase::Repeat);

        state.hold_duration = 1500.0;
        let events = bot.react(&state, 50.0);
        assert_eq!(events, vec![RawInputEvent::new("KeyL", KeyPhase::Up, 50.0)]);

        // The same sustain is not grabbed twice.
        assert!(bot.react(&state, 75.0).is_empty());
    }
}
