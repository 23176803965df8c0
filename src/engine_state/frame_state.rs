//! # Frame State
//!
//! The per-frame value threaded through the tick. Every subsystem reports whether
//! it changed something visible and the result is folded in here; only the render
//! loop reads and clears the flag.

/// Timing and redraw bookkeeping for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Seconds since the previous tick, always within `[0, MAX_FRAME_DELTA]`
    pub delta: f32,
    /// Whether a render is owed before the next idle frame
    pub dirty: bool,
}

impl Default for FrameState {
    /// The first frame always renders.
    fn default() -> Self {
        Self {
            delta: 0.0,
            dirty: true,
        }
    }
}

impl FrameState {
    /// Folds a subsystem's "did I change anything visible" answer into the frame.
    pub fn mark_dirty(&mut self, dirty: bool) {
        self.dirty |= dirty;
    }

    /// Clears the flag, returning whether a render was owed.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}
