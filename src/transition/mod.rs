//! Target color selection and timed crossfades.
//!
//! [`TransitionController`] decides which background color the current world
//! state calls for and moves the committed color toward it over a fixed
//! duration. Each call to [`TransitionController::update`] does two things in
//! order:
//!
//! 1. Advance a running crossfade with the elapsed time, using the target from
//!    the previous tick.
//! 2. Re-evaluate the target for the current tick. If it moved while a
//!    crossfade was running, the color reached so far becomes the new starting
//!    point and the timer restarts.
//!
//! Step 1 has to run first so the in-flight color is still valid when the
//! controller decides to re-latch.

use crate::color::ColorSample;
use crate::color_utils;
use crate::constants::{CLOCK_JUMP_THRESHOLD_MS, GROUND_LEVEL_DEPTH, TRANSITION_DURATION_MS};
use crate::day_cycle::DaySegmentTable;
use crate::error::DayCycleError;
use crate::sink::ColorSink;
use crate::world::WorldContext;


/// Tunables for the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSettings {
    /// Whether to crossfade at all. When off, targets are committed directly.
    pub smooth_transitions: bool,
    /// Length of a full crossfade
    pub duration_ms: u64,
    /// Tick deltas at or above this are dropped
    pub jump_threshold_ms: u64,
    /// Depth of the outdoor surface
    pub ground_level_depth: i32,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            smooth_transitions: true,
            duration_ms: TRANSITION_DURATION_MS,
            jump_threshold_ms: CLOCK_JUMP_THRESHOLD_MS,
            ground_level_depth: GROUND_LEVEL_DEPTH,
        }
    }
}

/// Whether a crossfade is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning,
}

/// Colors and timer owned by the controller.
///
/// While `running`, `elapsed_ms` stays within `[0, duration]`. When it reaches
/// the duration the crossfade stops and `last_committed` becomes `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionState {
    /// Last color pushed as final
    pub last_committed: ColorSample,
    /// Color the world state currently calls for
    pub target: ColorSample,
    /// Most recent intermediate color of a running crossfade
    pub in_flight: ColorSample,
    /// Time spent in the running crossfade
    pub elapsed_ms: u64,
    /// Whether a crossfade is running
    pub running: bool,
}

impl TransitionState {
    fn idle(color: ColorSample) -> Self {
        Self {
            last_committed: color,
            target: color,
            in_flight: color,
            elapsed_ms: 0,
            running: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.running {
            Phase::Transitioning
        } else {
            Phase::Idle
        }
    }
}

/// Owns the transition state and drives crossfades toward the world's target color.
#[derive(Debug, Clone)]
pub struct TransitionController {
    default_color: ColorSample,
    table: DaySegmentTable,
    settings: TransitionSettings,
    state: TransitionState,
    /// Context seen by the last target evaluation, for change detection
    last_seen: Option<WorldContext>,
}

impl TransitionController {
    /// Create an idle controller showing `default_color`.
    pub fn new(
        default_color: ColorSample,
        table: DaySegmentTable,
        settings: TransitionSettings,
    ) -> Self {
        Self {
            default_color,
            table,
            settings,
            state: TransitionState::idle(default_color),
            last_seen: None,
        }
    }

    /// Controller with the stock default color, day table and timings.
    pub fn standard() -> Self {
        let default_color = ColorSample::default_background();
        Self::new(
            default_color,
            DaySegmentTable::standard(default_color),
            TransitionSettings::default(),
        )
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn target_color(&self) -> ColorSample {
        self.state.target
    }

    pub fn last_committed(&self) -> ColorSample {
        self.state.last_committed
    }

    pub fn default_color(&self) -> ColorSample {
        self.default_color
    }

    pub fn table(&self) -> &DaySegmentTable {
        &self.table
    }

    pub fn settings(&self) -> &TransitionSettings {
        &self.settings
    }

    /// Turn crossfading on or off. Takes effect on the next update.
    pub fn set_smooth_transitions(&mut self, enabled: bool) {
        if self.settings.smooth_transitions != enabled {
            log::debug!("Smooth transitions: {}", enabled);
        }
        self.settings.smooth_transitions = enabled;
    }

    /// The color the world state calls for.
    ///
    /// - outside the tracked world: default color
    /// - on the world map (depth below ground level): default color
    /// - underground: default color dimmed by `1 / sqrt(depth - (ground - 1))`
    /// - at ground level: the day table's color for the current turn
    pub fn compute_target_color(&self, ctx: &WorldContext) -> Result<ColorSample, DayCycleError> {
        let ground = self.settings.ground_level_depth;
        if !ctx.in_tracked_world || ctx.depth < ground {
            Ok(self.default_color)
        } else if ctx.depth > ground {
            Ok(self.underground_color(ctx.depth))
        } else {
            self.table.color_for_turn(ctx.turn)
        }
    }

    fn underground_color(&self, depth: i32) -> ColorSample {
        let levels = i64::from(depth) - (i64::from(self.settings.ground_level_depth) - 1);
        let factor = 1.0 / (levels as f64).sqrt();
        color_utils::scale_brightness(self.default_color, factor as f32)
    }

    /// Re-evaluate the target color. Returns whether it changed.
    ///
    /// Evaluation is skipped when the context is unchanged and the target is
    /// not the default color. A default target is always re-evaluated, so a
    /// forced reset (death screen, menus) cannot leave the color stuck.
    pub fn update_target_color(&mut self, ctx: &WorldContext) -> Result<bool, DayCycleError> {
        let at_default = self.state.target.approx_eq(&self.default_color);
        if self.last_seen.as_ref() == Some(ctx) && !at_default {
            log::trace!("Target unchanged for {:?}", ctx);
            return Ok(false);
        }

        let previous = self.state.target;
        let depth_unchanged = self.last_seen.is_some_and(|seen| seen.depth == ctx.depth);
        let underground = ctx.in_tracked_world && ctx.depth > self.settings.ground_level_depth;

        if !(underground && depth_unchanged && !at_default) {
            self.state.target = self.compute_target_color(ctx)?;
        }
        self.last_seen = Some(*ctx);

        Ok(!self.state.target.approx_eq(&previous))
    }

    /// Advance one render tick.
    ///
    /// `elapsed_ms` is the wall-clock time since the previous call. Deltas at
    /// or above the jump threshold are ignored for the crossfade timer.
    pub fn update<S: ColorSink + ?Sized>(
        &mut self,
        elapsed_ms: u64,
        ctx: &WorldContext,
        sink: &mut S,
    ) -> Result<(), DayCycleError> {
        let smooth = self.settings.smooth_transitions;

        if self.state.running {
            self.advance(elapsed_ms, sink);
        }

        let changed = self.update_target_color(ctx)?;

        if !smooth {
            if self.state.running {
                log::debug!("Smooth transitions off, dropping running crossfade");
                self.stop();
            }
            if !self.state.target.approx_eq(&self.state.last_committed) {
                self.commit(self.state.target, sink);
            }
            return Ok(());
        }

        if self.state.running {
            if changed {
                log::debug!(
                    "Target moved to {} mid-crossfade, re-latching at {}",
                    self.state.target,
                    self.state.in_flight
                );
                self.commit(self.state.in_flight, sink);
                self.start();
            }
        } else if !self.state.target.approx_eq(&self.state.last_committed) {
            log::debug!(
                "Crossfade {} -> {} over {}ms",
                self.state.last_committed,
                self.state.target,
                self.settings.duration_ms
            );
            self.start();
        }
        Ok(())
    }

    fn advance<S: ColorSink + ?Sized>(&mut self, elapsed_ms: u64, sink: &mut S) {
        if elapsed_ms < self.settings.jump_threshold_ms {
            self.state.elapsed_ms = self.state.elapsed_ms.saturating_add(elapsed_ms);
        } else {
            log::warn!("Ignoring {}ms clock jump during crossfade", elapsed_ms);
        }

        let duration = self.settings.duration_ms;
        if self.state.elapsed_ms >= duration {
            self.state.elapsed_ms = duration;
            self.stop();
            log::debug!("Crossfade complete at {}", self.state.target);
            self.commit(self.state.target, sink);
        } else {
            let t = self.state.elapsed_ms as f32 / duration as f32;
            self.state.in_flight = self.state.last_committed.lerp(self.state.target, t);
            log::trace!("Crossfade {:.3} -> {}", t, self.state.in_flight);
            sink.set(self.state.in_flight, false);
        }
    }

    fn start(&mut self) {
        self.state.running = true;
        self.state.elapsed_ms = 0;
        self.state.in_flight = self.state.last_committed;
    }

    fn stop(&mut self) {
        self.state.running = false;
    }

    fn commit<S: ColorSink + ?Sized>(&mut self, color: ColorSample, sink: &mut S) {
        self.state.last_committed = color;
        sink.set(color, true);
    }

    /// Drop any crossfade and show the default color.
    ///
    /// Called when a game ends or the player leaves the tracked world, so no
    /// tinted background lingers outside of play.
    pub fn reset<S: ColorSink + ?Sized>(&mut self, sink: &mut S) {
        log::debug!("Resetting background to {}", self.default_color);
        self.state = TransitionState::idle(self.default_color);
        sink.set(self.default_color, true);
    }
}
