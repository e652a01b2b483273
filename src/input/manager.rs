use super::bindings::{KeyAction, KeyBindings};
use super::events::{InputAction, KeyPhase, RawInputEvent, TimedAction};
use crate::models::engine::Lane;
use crate::models::engine::constants::NUM_LANES;
use crate::models::settings::SettingsState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldState {
    Idle,
    Holding { seq: u64 },
}

/// Turns raw key edges into gameplay actions.
///
/// Lane keys: a first press is a tap, every auto-repeat opens a fresh hold
/// sequence that supersedes the previous one, and key-up closes whichever
/// sequence is current. Sequence ids are monotonic across all lanes.
pub struct InputManager {
    bindings: KeyBindings,
    lanes: [HoldState; NUM_LANES],
    next_seq: u64,
}

impl InputManager {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            lanes: [HoldState::Idle; NUM_LANES],
            next_seq: 0,
        }
    }

    pub fn from_settings(settings: &SettingsState) -> Self {
        Self::new(KeyBindings::from_settings(settings))
    }

    pub fn process(&mut self, event: &RawInputEvent) -> Option<TimedAction> {
        let bound = self.bindings.resolve(&event.code)?;
        let action = match (bound, event.phase) {
            (KeyAction::Lane(lane), KeyPhase::Down) => InputAction::Tap(lane),
            (KeyAction::Lane(lane), KeyPhase::Repeat) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.lanes[lane.index()] = HoldState::Holding { seq };
                InputAction::Hold { lane, seq }
            }
            (KeyAction::Lane(lane), KeyPhase::Up) => match self.lanes[lane.index()] {
                HoldState::Holding { seq } => {
                    self.lanes[lane.index()] = HoldState::Idle;
                    InputAction::Release { lane, seq }
                }
                HoldState::Idle => return None,
            },
            (KeyAction::Pause, KeyPhase::Down) => InputAction::Pause,
            (KeyAction::Restart, KeyPhase::Down) => InputAction::Restart,
            (KeyAction::Quit, KeyPhase::Down) => InputAction::Quit,
            _ => return None,
        };
        Some(TimedAction {
            action,
            time_ms: event.time_ms,
        })
    }

    pub fn is_holding(&self, lane: Lane) -> bool {
        matches!(self.lanes[lane.index()], HoldState::Holding { .. })
    }

    /// Drops all running hold sequences without emitting releases.
    pub fn reset(&mut self) {
        self.lanes = [HoldState::Idle; NUM_LANES];
    }

    /// Running holds are dropped: their key-up may no longer resolve to the same lane.
    pub fn reload_keybinds(&mut self, settings: &SettingsState) {
        self.bindings.reload_from_settings(settings);
        self.reset();
        log::info!("INPUT: Keybinds reloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(m: &mut InputManager, code: &str, phase: KeyPhase) -> Option<InputAction> {
        m.process(&RawInputEvent::new(code, phase, 0.0))
            .map(|t| t.action)
    }

    #[test]
    fn test_down_is_tap() {
        let mut m = InputManager::new(KeyBindings::new());
        assert_eq!(press(&mut m, "KeyJ", KeyPhase::Down), Some(InputAction::Tap(Lane::Second)));
        assert_eq!(press(&mut m, "KeyJ", KeyPhase::Up), None);
        assert!(!m.is_holding(Lane::Second));
    }

    #[test]
    fn test_repeat_sequences_supersede() {
        let mut m = InputManager::new(KeyBindings::new());
        press(&mut m, "KeyK", KeyPhase::Down);
        assert_eq!(
            press(&mut m, "KeyK", KeyPhase::Repeat),
            Some(InputAction::Hold { lane: Lane::Third, seq: 0 })
        );
        assert_eq!(
            press(&mut m, "KeyH", KeyPhase::Repeat),
            Some(InputAction::Hold { lane: Lane::First, seq: 1 })
        );
        assert_eq!(
            press(&mut m, "KeyK", KeyPhase::Repeat),
            Some(InputAction::Hold { lane: Lane::Third, seq: 2 })
        );
        assert!(m.is_holding(Lane::Third));
        assert_eq!(
            press(&mut m, "KeyK", KeyPhase::Up),
            Some(InputAction::Release { lane: Lane::Third, seq: 2 })
        );
        assert!(!m.is_holding(Lane::Third));
        assert!(m.is_holding(Lane::First));
    }

    #[test]
    fn test_control_keys_only_on_down() {
        let mut m = InputManager::new(KeyBindings::new());
        assert_eq!(press(&mut m, "KeyP", KeyPhase::Down), Some(InputAction::Pause));
        assert_eq!(press(&mut m, "KeyP", KeyPhase::Repeat), None);
        assert_eq!(press(&mut m, "KeyR", KeyPhase::Down), Some(InputAction::Restart));
        assert_eq!(press(&mut m, "KeyR", KeyPhase::Up), None);
        assert_eq!(press(&mut m, "Escape", KeyPhase::Down), Some(InputAction::Quit));
        assert_eq!(press(&mut m, "KeyQ", KeyPhase::Down), None);
    }

    #[test]
    fn test_reset_forgets_holds() {
        let mut m = InputManager::new(KeyBindings::new());
        press(&mut m, "KeyL", KeyPhase::Repeat);
        m.reset();
        assert_eq!(press(&mut m, "KeyL", KeyPhase::Up), None);
    }
}
