//! Playfield layout: the four lanes, their positions and colors.

use serde::{Deserialize, Serialize};

use super::constants::NUM_LANES;

/// Display color of a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneColor {
    Green,
    Red,
    Blue,
    Yellow,
}

impl LaneColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaneColor::Green => "green",
            LaneColor::Red => "red",
            LaneColor::Blue => "blue",
            LaneColor::Yellow => "yellow",
        }
    }
}

/// One of the four fixed lanes, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lane {
    First,
    Second,
    Third,
    Fourth,
}

impl Lane {
    pub const ALL: [Lane; NUM_LANES] = [Lane::First, Lane::Second, Lane::Third, Lane::Fourth];

    /// Lane for a zero-based column index. Out-of-range indices saturate to the last lane.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(NUM_LANES - 1)]
    }

    pub fn index(&self) -> usize {
        match self {
            Lane::First => 0,
            Lane::Second => 1,
            Lane::Third => 2,
            Lane::Fourth => 3,
        }
    }

    /// Horizontal position in percent of the playfield width.
    pub fn x(&self) -> f64 {
        20.0 * (self.index() + 1) as f64
    }

    pub fn color(&self) -> LaneColor {
        match self {
            Lane::First => LaneColor::Green,
            Lane::Second => LaneColor::Red,
            Lane::Third => LaneColor::Blue,
            Lane::Fourth => LaneColor::Yellow,
        }
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lane {}", self.index() + 1)
    }
}
