//! Persistent user settings stored as TOML.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::engine::constants::{DEFAULT_SEED, NUM_LANES, START_DELAY_MS};

pub const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsState {
    /// Lane keys, left to right, as key code names (`KeyH`, `KeyJ`, ...).
    pub lane_keys: Vec<String>,
    pub pause_key: String,
    pub restart_key: String,
    /// Quit the whole session (not part of the game reducer).
    pub quit_key: String,
    /// RNG seed for the first engine instance.
    pub seed: u32,
    /// Delay before the first start and after every restart.
    pub restart_delay_ms: u64,
    pub chart_path: Option<PathBuf>,
    /// Notes in the generated chart when no chart path is set.
    pub demo_note_count: usize,
    pub autoplay: bool,
    /// Where finished sessions write their replay. `None` disables recording to disk.
    pub replay_dir: Option<PathBuf>,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            lane_keys: ["KeyH", "KeyJ", "KeyK", "KeyL"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            pause_key: "KeyP".to_string(),
            restart_key: "KeyR".to_string(),
            quit_key: "Escape".to_string(),
            seed: DEFAULT_SEED,
            restart_delay_ms: START_DELAY_MS,
            chart_path: None,
            demo_note_count: 120,
            autoplay: false,
            replay_dir: Some(PathBuf::from("replays")),
        }
    }
}

impl SettingsState {
    /// Loads settings from `path`, falling back to defaults. Missing files
    /// are silent; unreadable or malformed ones are logged.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::read(path) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("SETTINGS: Using defaults, failed to load {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(Path::new(SETTINGS_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| Error::io(path, e))
    }

    /// Restores default lane keys when the configured list has the wrong length.
    fn sanitized(mut self) -> Self {
        if self.lane_keys.len() != NUM_LANES {
            log::warn!(
                "SETTINGS: Expected {} lane keys, got {}; using defaults",
                NUM_LANES,
                self.lane_keys.len()
            );
            self.lane_keys = Self::default().lane_keys;
        }
        self
    }
}
