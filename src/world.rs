//! World state as seen by the engine.
//!
//! The host fills in a [`PartialWorldState`] once per tick. Anything it could
//! not determine is left as `None` and resolved to safe defaults, so the
//! engine falls back to the default color instead of failing.

use crate::constants::GROUND_LEVEL_DEPTH;

/// Snapshot of the world facts that drive the background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldContext {
    /// Player depth. Values below ground level are the world map, values
    /// above it are underground.
    pub depth: i32,
    /// Whether the player is in the world where dynamic colors apply.
    pub in_tracked_world: bool,
    /// Turn of the current day.
    pub turn: i32,
}

impl WorldContext {
    pub fn new(depth: i32, in_tracked_world: bool, turn: i32) -> Self {
        Self {
            depth,
            in_tracked_world,
            turn,
        }
    }

    /// Context at ground level of the tracked world.
    pub fn surface(turn: i32) -> Self {
        Self::new(GROUND_LEVEL_DEPTH, true, turn)
    }

    /// Fill in missing facts.
    ///
    /// A missing depth becomes `ground_level`, a missing world membership
    /// becomes "not tracked" and a missing turn becomes 0. An untracked world
    /// always renders the default color.
    pub fn resolve(partial: PartialWorldState, ground_level: i32) -> Self {
        if !partial.is_complete() {
            log::debug!("World state incomplete ({:?}), using defaults", partial);
        }
        Self {
            depth: partial.depth.unwrap_or(ground_level),
            in_tracked_world: partial.in_tracked_world.unwrap_or(false),
            turn: partial.turn.unwrap_or(0),
        }
    }
}

/// World state as reported by the host, where any fact may be unavailable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialWorldState {
    pub depth: Option<i32>,
    pub in_tracked_world: Option<bool>,
    pub turn: Option<i32>,
}

impl PartialWorldState {
    /// Nothing known, e.g. before a game is loaded.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.depth.is_some() && self.in_tracked_world.is_some() && self.turn.is_some()
    }
}

impl From<WorldContext> for PartialWorldState {
    fn from(ctx: WorldContext) -> Self {
        Self {
            depth: Some(ctx.depth),
            in_tracked_world: Some(ctx.in_tracked_world),
            turn: Some(ctx.turn),
        }
    }
}

/// Source of world state, queried once per tick.
pub trait WorldStateProvider {
    fn world_state(&self) -> PartialWorldState;
}

impl WorldStateProvider for WorldContext {
    fn world_state(&self) -> PartialWorldState {
        (*self).into()
    }
}

impl WorldStateProvider for PartialWorldState {
    fn world_state(&self) -> PartialWorldState {
        *self
    }
}

impl<T: WorldStateProvider + ?Sized> WorldStateProvider for &T {
    fn world_state(&self) -> PartialWorldState {
        (**self).world_state()
    }
}
