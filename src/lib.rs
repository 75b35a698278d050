//! dynback - Dynamic Background Colors
//!
//! Derives an ambient background color from the player's depth, the world
//! they are in and the time of day, and crossfades the rendered background
//! toward it in real time.

pub mod clock;
pub mod color;
pub mod color_utils;
pub mod config;
pub mod constants;
pub mod day_cycle;
pub mod engine;
pub mod error;
pub mod sink;
pub mod transition;
pub mod world;

pub use clock::{Clock, ManualClock, SystemClock};
pub use color::ColorSample;
pub use config::{ConfigError, EngineConfig};
pub use day_cycle::{DaySegment, DaySegmentTable};
pub use engine::AmbientEngine;
pub use error::DayCycleError;
pub use sink::{ColorSink, NullSink, RecordingSink};
pub use transition::{Phase, TransitionController, TransitionSettings, TransitionState};
pub use world::{PartialWorldState, WorldContext, WorldStateProvider};
