//! Millisecond clocks for timing crossfades.

use std::cell::Cell;
use web_time::Instant;

/// Monotonic millisecond clock.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed start. Must never decrease.
    fn now_millis(&self) -> u64;
}

/// Wall clock backed by [`web_time::Instant`], usable natively and on WASM.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Clock that only moves when told to. Used by tests and the simulator.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get().saturating_add(millis));
    }

    pub fn set(&self, millis: u64) {
        self.now.set(millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// Tracks the time between consecutive reads of a clock.
///
/// The first read yields zero. A clock that appears to run backwards also
/// yields zero rather than wrapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickTimer {
    last: Option<u64>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous call.
    pub fn delta<C: Clock + ?Sized>(&mut self, clock: &C) -> u64 {
        let now = clock.now_millis();
        let delta = match self.last {
            Some(last) => now.saturating_sub(last),
            None => 0,
        };
        self.last = Some(now);
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new();
        assert_eq!(clock.now_millis(), 0);
        clock.advance(16);
        clock.advance(17);
        assert_eq!(clock.now_millis(), 33);
    }

    #[test]
    fn test_tick_timer_deltas() {
        let clock = ManualClock::new();
        let mut timer = TickTimer::new();
        clock.set(500);
        assert_eq!(timer.delta(&clock), 0);
        clock.advance(16);
        assert_eq!(timer.delta(&clock), 16);
        assert_eq!(timer.delta(&clock), 0);
    }

    #[test]
    fn test_tick_timer_backwards_clock_is_zero() {
        let clock = ManualClock::new();
        let mut timer = TickTimer::new();
        clock.set(1000);
        timer.delta(&clock);
        clock.set(900);
        assert_eq!(timer.delta(&clock), 0);
        clock.set(950);
        assert_eq!(timer.delta(&clock), 50);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert!(b >= a);
    }
}
