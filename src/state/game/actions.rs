//! Events the game state reducer understands.

use serde::{Deserialize, Serialize};

use crate::models::engine::Lane;

/// One discrete event in the merged stream.
///
/// Clock ticks carry the number of ticks elapsed since the engine started;
/// input events carry the lane they target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Tick { elapsed: u64 },
    Tap(Lane),
    /// Key still held (repeat signal) on a lane.
    Hold(Lane),
    /// Key released after a hold sequence.
    Release(Lane),
    Pause,
    Restart,
}

impl GameEvent {
    pub fn is_tick(&self) -> bool {
        matches!(self, GameEvent::Tick { .. })
    }
}
