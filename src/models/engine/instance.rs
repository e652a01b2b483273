//! Falling note instances and their sustain tails.

use serde::{Deserialize, Serialize};

use super::constants::{
    FALL_DISTANCE, FALL_STEP, SPAWN_LOOKAHEAD_MS, TAIL_LENGTH, TAIL_STEP, TAIL_STROKE_WIDTH, TICK_MS,
};
use super::note::ChartEntry;
use super::playfield::{Lane, LaneColor};

/// Sustain line drawn above a long note. `y1` is the top edge, `y2` the bottom edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tail {
    /// Same id as the owning note.
    pub id: u64,
    pub created_time: f64,
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
    pub color: LaneColor,
    pub stroke_width: u32,
}

impl Tail {
    fn new(id: u64, created_time: f64, lane: Lane) -> Self {
        Self {
            id,
            created_time,
            x1: lane.x(),
            x2: lane.x(),
            y1: 0.0,
            y2: 0.0,
            color: lane.color(),
            stroke_width: TAIL_STROKE_WIDTH,
        }
    }

    /// Both edges have met at the bottom.
    pub fn is_collapsed(&self) -> bool {
        self.y1 == self.y2
    }
}

/// A note on its way down a lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteInstance {
    pub id: u64,
    /// Spawn time in ms, advanced by one tick period on every move.
    pub created_time: f64,
    pub lane: Lane,
    pub y: f64,
    pub color: LaneColor,
    pub entry_index: usize,
    pub entry: ChartEntry,
    pub distorted: bool,
    pub tapped: bool,
    pub tail: Option<Tail>,
}

impl NoteInstance {
    /// Spawns a note at the top of `lane`. Sustain entries get a tail with the same id.
    pub fn spawn(id: u64, now_ms: f64, lane: Lane, entry_index: usize, entry: &ChartEntry) -> Self {
        let tail = entry
            .is_sustain()
            .then(|| Tail::new(id, now_ms, lane));
        Self {
            id,
            created_time: now_ms,
            lane,
            y: 0.0,
            color: lane.color(),
            entry_index,
            entry: entry.clone(),
            distorted: false,
            tapped: false,
            tail,
        }
    }

    pub fn x(&self) -> f64 {
        self.lane.x()
    }

    pub fn has_tail(&self) -> bool {
        self.tail.is_some()
    }

    /// Returns the instance one tick later.
    ///
    /// The tail's top edge only starts descending once the sustain's end is
    /// within the spawn lookahead of the note's (pre-move) clock.
    pub fn advanced(&self) -> Self {
        let release_in_view =
            self.created_time + SPAWN_LOOKAHEAD_MS > self.entry.end_sec * 1000.0;

        let mut next = self.clone();
        next.y = (self.y + FALL_STEP).clamp(0.0, FALL_DISTANCE);
        next.created_time = self.created_time + TICK_MS;

        if let Some(tail) = next.tail.as_mut() {
            if release_in_view {
                tail.y1 = (tail.y1 + TAIL_STEP).clamp(0.0, TAIL_LENGTH);
            }
            tail.y2 = (tail.y2 + TAIL_STEP).clamp(0.0, TAIL_LENGTH);
            tail.created_time += TICK_MS;
        }
        next
    }

    /// Untailed notes leave at the hit line; tailed ones wait for the tail to collapse.
    pub fn is_expired(&self) -> bool {
        let at_bottom = self.y >= FALL_DISTANCE;
        match &self.tail {
            Some(tail) => at_bottom && tail.is_collapsed(),
            None => at_bottom,
        }
    }

    /// A note that left the field without ever being hit.
    pub fn counts_as_miss(&self) -> bool {
        !self.tapped && !self.has_tail()
    }
}
