//! Game state and its reducer.

pub mod game;

pub use game::{GameEvent, GameState, Transition};
