//! Engine, event queue and the loops that drive them.

pub mod audio;
pub mod autoplay;
pub mod engine;
pub mod event_queue;
pub mod game_loop;
pub mod headless;
pub mod replay_engine;
