use serde::{Deserialize, Serialize};

use crate::models::engine::Lane;
use crate::models::settings::SettingsState;

/// Edge of a keyboard signal as delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyPhase {
    /// First press (not an auto-repeat).
    Down,
    /// Auto-repeat while the key stays down.
    Repeat,
    Up,
}

/// A platform key event, identified by its physical key code name (`KeyH`, `Escape`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInputEvent {
    pub code: String,
    pub phase: KeyPhase,
    /// Wall-clock ms since the session started.
    pub time_ms: f64,
}

impl RawInputEvent {
    pub fn new(code: impl Into<String>, phase: KeyPhase, time_ms: f64) -> Self {
        Self {
            code: code.into(),
            phase,
            time_ms,
        }
    }

    /// Parses one line of the text input protocol: `<code> <down|repeat|up> [time_ms]`.
    pub fn parse_line(line: &str, default_time_ms: f64) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let code = parts.next()?;
        let phase = match parts.next()?.to_ascii_lowercase().as_str() {
            "down" | "d" => KeyPhase::Down,
            "repeat" | "r" => KeyPhase::Repeat,
            "up" | "u" => KeyPhase::Up,
            _ => return None,
        };
        let time_ms = match parts.next() {
            Some(raw) => raw.parse().ok()?,
            None => default_time_ms,
        };
        Some(Self::new(code, phase, time_ms))
    }
}

/// An input after key binding resolution, stamped with its arrival time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedAction {
    pub action: InputAction,
    pub time_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputAction {
    Tap(Lane),
    /// Hold signal belonging to sequence `seq` on `lane`.
    Hold { lane: Lane, seq: u64 },
    /// End of hold sequence `seq`.
    Release { lane: Lane, seq: u64 },
    Pause,
    Restart,
    Quit,
}

impl InputAction {
    /// Sequence id for hold and release signals.
    pub fn hold_seq(&self) -> Option<(Lane, u64)> {
        match *self {
            InputAction::Hold { lane, seq } | InputAction::Release { lane, seq } => {
                Some((lane, seq))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum InputCommand {
    ReloadKeybinds(SettingsState),
}
