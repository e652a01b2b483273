pub mod engine;
pub mod replay;
pub mod settings;
pub mod stats;
