//! Display-refresh pacing for native builds.
//!
//! Skipped frames never present, so nothing blocks on vsync between them. The
//! shell asks the pacer whether a frame is due and sleeps the event loop until
//! the next deadline otherwise. Web builds are paced by the browser.

use web_time::{Duration, Instant};

/// Refresh rate assumed when the monitor does not report one.
pub const FALLBACK_REFRESH_MILLIHERTZ: u32 = 60_000;

/// Time between two display refreshes at `millihertz`.
pub fn refresh_interval(millihertz: Option<u32>) -> Duration {
    let millihertz = match millihertz {
        Some(rate) if rate > 0 => rate,
        _ => FALLBACK_REFRESH_MILLIHERTZ,
    };
    Duration::from_secs_f64(1000.0 / millihertz as f64)
}

#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    interval: Duration,
    next_frame: Instant,
}

impl FramePacer {
    /// A pacer whose first frame is due at `now`.
    pub fn new(refresh_millihertz: Option<u32>, now: Instant) -> Self {
        Self {
            interval: refresh_interval(refresh_millihertz),
            next_frame: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next frame is due.
    pub fn next_frame(&self) -> Instant {
        self.next_frame
    }

    /// Follows the window to a monitor with a different refresh rate.
    pub fn set_refresh_rate(&mut self, refresh_millihertz: Option<u32>) {
        self.interval = refresh_interval(refresh_millihertz);
    }

    /// Whether a frame is due at `now`. A due frame moves the deadline one
    /// interval past `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_frame {
            return false;
        }
        self.next_frame = now + self.interval;
        true
    }
}
