//! Lifecycle driver wiring the controller to its collaborators.
//!
//! The host calls [`AmbientEngine::on_tick`] once per render pass and the
//! lifecycle hooks when a game ends. The engine reads the clock, asks the
//! world for its state and forwards everything to the controller.

use crate::clock::{Clock, TickTimer};
use crate::error::DayCycleError;
use crate::sink::ColorSink;
use crate::transition::TransitionController;
use crate::world::{WorldContext, WorldStateProvider};

/// One background color engine per game session.
#[derive(Debug)]
pub struct AmbientEngine<C, W, S> {
    controller: TransitionController,
    clock: C,
    timer: TickTimer,
    world: W,
    sink: S,
}

impl<C, W, S> AmbientEngine<C, W, S>
where
    C: Clock,
    W: WorldStateProvider,
    S: ColorSink,
{
    pub fn new(controller: TransitionController, clock: C, world: W, sink: S) -> Self {
        Self {
            controller,
            clock,
            timer: TickTimer::new(),
            world,
            sink,
        }
    }

    /// Run one update with the time elapsed since the previous tick.
    ///
    /// Returns the context that was evaluated. Errors only when the world
    /// reports a turn outside the configured day.
    pub fn on_tick(&mut self) -> Result<WorldContext, DayCycleError> {
        let elapsed = self.timer.delta(&self.clock);
        let ground = self.controller.settings().ground_level_depth;
        let ctx = WorldContext::resolve(self.world.world_state(), ground);
        self.controller.update(elapsed, &ctx, &mut self.sink)?;
        Ok(ctx)
    }

    /// Game over, score screen or transit out of the tracked world.
    pub fn on_game_end(&mut self) {
        self.controller.reset(&mut self.sink);
    }

    /// End of a player turn. Resets the background once the game has stopped.
    pub fn on_turn_end(&mut self, game_running: bool) {
        if !game_running {
            log::debug!("Game no longer running");
            self.on_game_end();
        }
    }

    pub fn set_smooth_transitions(&mut self, enabled: bool) {
        self.controller.set_smooth_transitions(enabled);
    }

    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Tear down, handing back the collaborators.
    pub fn into_parts(self) -> (TransitionController, C, W, S) {
        (self.controller, self.clock, self.world, self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::sink::RecordingSink;
    use crate::transition::Phase;
    use crate::world::PartialWorldState;

    fn engine(world: PartialWorldState) -> AmbientEngine<ManualClock, PartialWorldState, RecordingSink> {
        AmbientEngine::new(
            TransitionController::standard(),
            ManualClock::new(),
            world,
            RecordingSink::new(),
        )
    }

    fn underground(depth: i32) -> PartialWorldState {
        WorldContext::new(depth, true, 0).into()
    }

    #[test]
    fn test_ticks_use_clock_deltas() {
        let mut engine = engine(underground(14));
        engine.on_tick().unwrap();
        assert_eq!(engine.controller().phase(), Phase::Transitioning);

        for _ in 0..10 {
            engine.clock().advance(20);
            engine.on_tick().unwrap();
        }
        assert_eq!(engine.controller().state().elapsed_ms, 200);
    }

    #[test]
    fn test_stall_does_not_snap() {
        let mut engine = engine(underground(14));
        engine.on_tick().unwrap();
        engine.clock().advance(20);
        engine.on_tick().unwrap();

        // a long stall between frames
        engine.clock().advance(5_000);
        engine.on_tick().unwrap();
        assert_eq!(engine.controller().state().elapsed_ms, 20);
        assert!(engine.controller().is_running());
    }

    #[test]
    fn test_full_session() {
        let mut engine = engine(underground(11));
        engine.on_tick().unwrap();
        while engine.controller().is_running() {
            engine.clock().advance(16);
            engine.on_tick().unwrap();
        }
        let dim = engine.controller().target_color();
        assert_eq!(engine.sink().last_final(), Some(dim));

        engine.on_turn_end(true);
        assert_eq!(engine.controller().last_committed(), dim);

        engine.on_turn_end(false);
        let default_color = engine.controller().default_color();
        assert_eq!(engine.controller().last_committed(), default_color);
        assert_eq!(engine.sink().last_final(), Some(default_color));
    }

    #[test]
    fn test_unavailable_world_degrades_to_default() {
        let mut engine = engine(PartialWorldState::unavailable());
        let ctx = engine.on_tick().unwrap();
        assert!(!ctx.in_tracked_world);
        assert_eq!(engine.controller().phase(), Phase::Idle);
        assert!(engine.sink().is_empty());
    }

    #[test]
    fn test_world_changes_between_ticks() {
        let mut engine = engine(underground(12));
        engine.set_smooth_transitions(false);
        engine.on_tick().unwrap();
        let shallow = engine.controller().last_committed();

        *engine.world_mut() = underground(30);
        engine.clock().advance(16);
        engine.on_tick().unwrap();
        assert!(engine.controller().last_committed().brightness() < shallow.brightness());
        assert_eq!(engine.sink().finals().count(), 2);
    }

    #[test]
    fn test_missing_sink_is_tolerated() {
        let mut engine = AmbientEngine::new(
            TransitionController::standard(),
            ManualClock::new(),
            underground(12),
            None::<RecordingSink>,
        );
        engine.set_smooth_transitions(false);
        engine.on_tick().unwrap();
        engine.on_game_end();
        assert_eq!(
            engine.controller().last_committed(),
            engine.controller().default_color()
        );
    }
}
