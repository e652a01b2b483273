//! Serializable replay structures.
//!
//! A replay stores every input event an engine dispatched, tagged with the
//! number of clock ticks that ran before it. Feeding the same events at the
//! same tick positions into a fresh engine with the same chart and seed
//! reproduces the session exactly.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::engine::Chart;
use crate::state::game::GameEvent;

/// Current replay format version for compatibility.
pub const REPLAY_FORMAT_VERSION: u8 = 1;

/// A single dispatched input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayInput {
    /// Ticks dispatched before this input.
    pub tick: u64,
    /// Engine-relative ms at which the input arrived.
    pub time_ms: f64,
    pub event: GameEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayData {
    pub version: u8,
    /// md5 of the chart source the session ran on.
    pub chart_hash: String,
    pub seed: u32,
    /// Inputs in dispatch order.
    pub inputs: Vec<ReplayInput>,
}

impl ReplayData {
    pub fn new(chart_hash: impl Into<String>, seed: u32) -> Self {
        Self {
            version: REPLAY_FORMAT_VERSION,
            chart_hash: chart_hash.into(),
            seed,
            inputs: Vec::new(),
        }
    }

    pub fn add_input(&mut self, tick: u64, time_ms: f64, event: GameEvent) {
        self.inputs.push(ReplayInput {
            tick,
            time_ms,
            event,
        });
    }

    /// Fails when the replay was recorded on a different chart.
    pub fn verify_chart(&self, chart: &Chart) -> Result<()> {
        if self.chart_hash != chart.hash() {
            return Err(Error::ReplayChartMismatch {
                expected: self.chart_hash.clone(),
                actual: chart.hash().to_string(),
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| Error::io(path, e))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::from_json(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::engine::Lane;

    fn sample() -> ReplayData {
        let mut replay = ReplayData::new("abc123", 10);
        replay.add_input(40, 1001.5, GameEvent::Tap(Lane::Second));
        replay.add_input(90, 2250.0, GameEvent::Hold(Lane::Third));
        replay.add_input(130, 3260.0, GameEvent::Release(Lane::Third));
        replay
    }

    #[test]
    fn test_json_keeps_inputs() {
        let replay = sample();
        let json = replay.to_json().unwrap();
        assert!(json.contains("\"chart_hash\":\"abc123\""));
        assert_eq!(ReplayData::from_json(&json).unwrap(), replay);
    }

    #[test]
    fn test_save_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/replays/run.json");
        let replay = sample();
        replay.save(&path).unwrap();
        assert_eq!(ReplayData::load(&path).unwrap(), replay);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(ReplayData::load(&path), Err(Error::Replay(_))));
    }

    #[test]
    fn test_verify_chart() {
        let chart = Chart::parse("h\nTrue,piano,0.5,60,1,1.2\n").unwrap();
        let replay = ReplayData::new(chart.hash(), 10);
        assert!(replay.verify_chart(&chart).is_ok());
        let other = ReplayData::new("deadbeef", 10);
        assert!(matches!(
            other.verify_chart(&chart),
            Err(Error::ReplayChartMismatch { .. })
        ));
    }
}
