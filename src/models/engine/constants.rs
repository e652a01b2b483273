//! Fixed timing and playfield constants shared by the scheduler and the judge.

/// Number of lanes on the playfield.
pub const NUM_LANES: usize = 4;

/// Simulation tick period in milliseconds.
pub const TICK_MS: f64 = 25.0;

/// How far ahead of its start time a note is spawned (ms).
pub const SPAWN_LOOKAHEAD_MS: f64 = 2000.0;
/// Half-width of the spawn tolerance band around the lookahead (ms).
pub const SPAWN_TOLERANCE_MS: f64 = 12.0;

/// Terminal height of a falling note (the hit line).
pub const FALL_DISTANCE: f64 = 350.0;
/// Height gained per tick. 350 / 4.375 = 80 ticks = 2000 ms.
pub const FALL_STEP: f64 = 4.375;

/// Tails are drawn in percent of the playfield height.
pub const TAIL_LENGTH: f64 = 90.0;
/// Tail edge advance per tick, same speed as the head in tail units.
pub const TAIL_STEP: f64 = FALL_STEP * TAIL_LENGTH / FALL_DISTANCE;
pub const TAIL_STROKE_WIDTH: u32 = 15;

/// Entries longer than this (seconds) become sustain notes with a tail.
pub const SUSTAIN_THRESHOLD_SEC: f64 = 1.0;

/// Upper bound (seconds) of the randomized distorted playback duration.
pub const DISTORTION_MAX_SEC: f64 = 0.5;
/// Fixed duration of a tail pulse while holding (seconds).
pub const TAIL_PULSE_SEC: f64 = 0.020;

pub const TAP_SCORE: f64 = 10.0;
pub const HOLD_SCORE: f64 = 30.0;
pub const PENALTY: f64 = 5.0;
/// Combo needed per multiplier step.
pub const COMBO_STEP: u32 = 10;
pub const MULTIPLIER_STEP: f64 = 0.2;

/// Seed used by the first engine instance unless configured otherwise.
pub const DEFAULT_SEED: u32 = 10;
/// Delay before a (re)started engine instance begins consuming events (ms).
pub const START_DELAY_MS: u64 = 1000;
