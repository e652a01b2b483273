pub mod constants;
pub mod hit_window;
pub mod instance;
pub mod note;
pub mod playfield;
pub mod rng;

pub use constants::*;
pub use hit_window::HitWindow;
pub use instance::{NoteInstance, Tail};
pub use note::{Chart, ChartEntry};
pub use playfield::{Lane, LaneColor};
