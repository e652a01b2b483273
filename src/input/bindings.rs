//! Key code names to gameplay actions.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::models::engine::Lane;
use crate::models::engine::constants::NUM_LANES;
use crate::models::settings::SettingsState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Lane(Lane),
    Pause,
    Restart,
    Quit,
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    binds: HashMap<String, KeyAction>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = Self {
            binds: HashMap::new(),
        };
        bindings.load_defaults();
        bindings
    }

    /// Builds bindings from settings. Unknown key names are skipped with a warning.
    pub fn from_settings(settings: &SettingsState) -> Self {
        let mut bindings = Self::new();
        bindings.reload_from_settings(settings);
        bindings
    }

    pub fn reload_from_settings(&mut self, settings: &SettingsState) {
        let mut lanes = Vec::new();
        for key in settings.lane_keys.iter().take(NUM_LANES) {
            match parse_keycode(key) {
                Ok(code) => lanes.push(code),
                Err(e) => log::warn!("INPUT: {}", e),
            }
        }
        if lanes.len() == NUM_LANES {
            self.binds
                .retain(|_, action| !matches!(action, KeyAction::Lane(_)));
            for (i, code) in lanes.into_iter().enumerate() {
                self.binds.insert(code, KeyAction::Lane(Lane::from_index(i)));
            }
        } else {
            log::warn!("INPUT: Incomplete lane bindings, keeping previous lane keys");
        }

        for (key, action) in [
            (&settings.pause_key, KeyAction::Pause),
            (&settings.restart_key, KeyAction::Restart),
            (&settings.quit_key, KeyAction::Quit),
        ] {
            match parse_keycode(key) {
                Ok(code) => {
                    self.binds.retain(|_, a| *a != action);
                    self.binds.insert(code, action);
                }
                Err(e) => log::warn!("INPUT: {}", e),
            }
        }
    }

    pub fn resolve(&self, code: &str) -> Option<KeyAction> {
        self.binds.get(code).copied()
    }

    /// Key code bound to a lane, if any.
    pub fn lane_key(&self, lane: Lane) -> Option<&str> {
        self.binds
            .iter()
            .find(|(_, action)| **action == KeyAction::Lane(lane))
            .map(|(code, _)| code.as_str())
    }

    fn load_defaults(&mut self) {
        for (i, code) in ["KeyH", "KeyJ", "KeyK", "KeyL"].iter().enumerate() {
            self.binds
                .insert(code.to_string(), KeyAction::Lane(Lane::from_index(i)));
        }
        self.binds.insert("KeyP".to_string(), KeyAction::Pause);
        self.binds.insert("KeyR".to_string(), KeyAction::Restart);
        self.binds.insert("Escape".to_string(), KeyAction::Quit);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalizes a key label to its code name. Accepts code names (`KeyH`),
/// bare letters and digits (`h`, `7`) and a few named keys.
pub fn parse_keycode(label: &str) -> Result<String> {
    let trimmed = label.trim();
    let mut chars = trimmed.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Ok(format!("Key{}", c.to_ascii_uppercase()));
        }
        if c.is_ascii_digit() {
            return Ok(format!("Digit{c}"));
        }
    }

    if let Some(rest) = trimmed.strip_prefix("Key") {
        if rest.len() == 1 && rest.chars().all(|c| c.is_ascii_uppercase()) {
            return Ok(trimmed.to_string());
        }
    }
    if let Some(rest) = trimmed.strip_prefix("Digit") {
        if rest.len() == 1 && rest.chars().all(|c| c.is_ascii_digit()) {
            return Ok(trimmed.to_string());
        }
    }
    if let Some(rest) = trimmed.strip_prefix('F') {
        if matches!(rest.parse::<u8>(), Ok(1..=12)) {
            return Ok(trimmed.to_string());
        }
    }

    match trimmed {
        "Space" | "Enter" | "Escape" | "Tab" | "Backspace" | "ArrowUp" | "ArrowDown"
        | "ArrowLeft" | "ArrowRight" | "Semicolon" | "Comma" | "Period" | "Slash"
        | "ShiftLeft" | "ShiftRight" => Ok(trimmed.to_string()),
        _ => Err(Error::UnknownKey(label.to_string())),
    }
}
