//! # Frame Clock
//!
//! Measures wall time between ticks. Large gaps (a backgrounded tab, a debugger
//! pause) are clamped so the simulation never integrates a huge step, and the
//! reference time is reset whenever the viewport becomes visible again.

use web_time::{Duration, Instant};

/// Upper bound for a single frame delta, in seconds.
pub const MAX_FRAME_DELTA: f32 = 1.0;

/// Wall-clock frame timer with visibility-aware pausing.
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    visible: bool,
}

impl FrameClock {
    /// Creates a clock whose first tick measures from now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock whose first tick measures from `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            last_tick: start,
            visible: true,
        }
    }

    /// Returns the clamped seconds elapsed since the previous tick.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Same as [`FrameClock::tick`] with an explicit timestamp.
    ///
    /// While the viewport is hidden the clock is paused and reports zero.
    /// A timestamp earlier than the previous tick also reports zero.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        if !self.visible {
            return 0.0;
        }

        let elapsed = now
            .checked_duration_since(self.last_tick)
            .unwrap_or(Duration::ZERO);
        self.last_tick = now;

        elapsed.as_secs_f32().clamp(0.0, MAX_FRAME_DELTA)
    }

    /// Handles a visibility change of the presentation surface.
    pub fn set_visible(&mut self, visible: bool) {
        self.set_visible_at(visible, Instant::now());
    }

    /// Same as [`FrameClock::set_visible`] with an explicit timestamp.
    ///
    /// Becoming visible moves the reference time to `now`, so the hidden
    /// duration is never reported by the next tick.
    pub fn set_visible_at(&mut self, visible: bool, now: Instant) {
        if visible && !self.visible {
            self.last_tick = now;
        }
        self.visible = visible;
    }

    /// Whether the clock is currently running.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_elapsed_seconds() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let delta = clock.tick_at(start + Duration::from_millis(250));
        assert!((delta - 0.25).abs() < 1e-6);
    }

    #[test]
    fn clamps_a_ten_second_gap_to_one_second() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        assert_eq!(clock.tick_at(start + Duration::from_secs(10)), MAX_FRAME_DELTA);
    }

    #[test]
    fn measures_from_the_previous_tick() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        clock.tick_at(start + Duration::from_secs(5));
        let delta = clock.tick_at(start + Duration::from_millis(5100));
        assert!((delta - 0.1).abs() < 1e-4);
    }

    #[test]
    fn never_negative_for_out_of_order_timestamps() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::starting_at(start);
        assert_eq!(clock.tick_at(start - Duration::from_millis(500)), 0.0);
    }

    #[test]
    fn paused_while_hidden() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        clock.set_visible_at(false, start);
        assert_eq!(clock.tick_at(start + Duration::from_millis(300)), 0.0);
        assert!(!clock.is_visible());
    }

    #[test]
    fn becoming_visible_discards_the_hidden_duration() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        clock.set_visible_at(false, start);

        let shown = start + Duration::from_secs(30);
        clock.set_visible_at(true, shown);

        let delta = clock.tick_at(shown + Duration::from_millis(16));
        assert!((delta - 0.016).abs() < 1e-4);
    }

    #[test]
    fn repeated_visible_events_do_not_reset_the_reference() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        clock.set_visible_at(true, start + Duration::from_millis(100));
        let delta = clock.tick_at(start + Duration::from_millis(200));
        assert!((delta - 0.2).abs() < 1e-4);
    }
}
