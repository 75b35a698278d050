//! Global constants for the background color engine

/// Default background color as 8-bit RGB (the game's stock display color)
pub const DEFAULT_BACKGROUND_RGB8: [u8; 3] = [15, 59, 58];

/// Number of turns in one in-game day
pub const TURNS_PER_DAY: u32 = 1200;

/// Longest day a segment table accepts. The per-turn color memo is sized to the day.
pub const MAX_TURNS_PER_DAY: u32 = 1_000_000;

/// Depth of the outdoor surface. Smaller depths are the world map, larger ones are underground.
pub const GROUND_LEVEL_DEPTH: i32 = 10;

/// Length of a full crossfade between two committed colors
pub const TRANSITION_DURATION_MS: u64 = 1000;

/// Tick deltas at or above this are treated as clock jumps and not applied
pub const CLOCK_JUMP_THRESHOLD_MS: u64 = 100;

/// Tolerance used when comparing color channels
pub const COLOR_EPSILON: f32 = 1e-5;
