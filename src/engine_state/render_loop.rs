//! # Render Loop
//!
//! The per-refresh driver. Each tick runs, in order:
//! 1. the camera controls' damping update,
//! 2. the walk simulation, in [`WALK_SUBSTEPS`] fixed sub-steps, when walking,
//! 3. the dirty check: one render pass if a redraw is owed, nothing otherwise.
//!
//! Walk motion can dirty the frame, so it must run before the render decision.

use super::{
    collaborators::{CameraControls, Renderer, WalkSimulation},
    frame_clock::MAX_FRAME_DELTA,
    frame_state::FrameState,
};

/// Number of equal sub-steps the walk simulation takes per frame.
pub const WALK_SUBSTEPS: u32 = 4;

/// The subsystems a tick drives.
pub struct TickSystems<'a> {
    pub camera: &'a mut dyn CameraControls,
    pub walk: &'a mut dyn WalkSimulation,
    pub renderer: &'a mut dyn Renderer,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub rendered: bool,
    pub walk_steps: u32,
}

/// Frame driver with render statistics.
#[derive(Debug, Default)]
pub struct RenderLoop {
    frames_rendered: u64,
    frames_skipped: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one tick.
    ///
    /// `delta` comes from the frame clock and is clamped again here so the
    /// frame's invariant holds for any caller.
    pub fn tick(
        &mut self,
        frame: &mut FrameState,
        delta: f32,
        walking: bool,
        systems: TickSystems<'_>,
    ) -> TickReport {
        frame.delta = delta.clamp(0.0, MAX_FRAME_DELTA);

        frame.mark_dirty(systems.camera.update(frame.delta));

        let mut walk_steps = 0;
        if walking {
            let step = frame.delta / WALK_SUBSTEPS as f32;
            for _ in 0..WALK_SUBSTEPS {
                frame.mark_dirty(systems.walk.step(step));
                walk_steps += 1;
            }
        }

        let rendered = frame.take_dirty();
        if rendered {
            systems.renderer.render();
            self.frames_rendered += 1;
        } else {
            self.frames_skipped += 1;
        }

        TickReport {
            rendered,
            walk_steps,
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Idle frames that cost no render pass.
    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::test_support::{Call, MockCollaborators};

    fn tick(
        render_loop: &mut RenderLoop,
        mocks: &mut MockCollaborators,
        frame: &mut FrameState,
        delta: f32,
        walking: bool,
    ) -> TickReport {
        render_loop.tick(
            frame,
            delta,
            walking,
            TickSystems {
                camera: &mut mocks.camera,
                walk: &mut mocks.walk,
                renderer: &mut mocks.renderer,
            },
        )
    }

    #[test]
    fn walking_takes_four_equal_substeps() {
        let mut mocks = MockCollaborators::new();
        let mut render_loop = RenderLoop::new();
        let mut frame = FrameState::default();

        let report = tick(&mut render_loop, &mut mocks, &mut frame, 0.2, true);
        assert_eq!(report.walk_steps, 4);

        let steps: Vec<f32> = mocks
            .recorder
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::WalkStep(dt) => Some(*dt),
                _ => None,
            })
            .collect();
        assert_eq!(steps, vec![0.05; 4]);
        assert!((steps.iter().sum::<f32>() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn not_walking_takes_no_substeps() {
        let mut mocks = MockCollaborators::new();
        let mut render_loop = RenderLoop::new();
        let mut frame = FrameState::default();

        let report = tick(&mut render_loop, &mut mocks, &mut frame, 0.2, false);
        assert_eq!(report.walk_steps, 0);
        assert_eq!(mocks.recorder.borrow().count(|c| matches!(c, Call::WalkStep(_))), 0);
    }

    #[test]
    fn renders_once_when_dirty_then_idles() {
        let mut mocks = MockCollaborators::new();
        let mut render_loop = RenderLoop::new();
        let mut frame = FrameState::default();

        assert!(tick(&mut render_loop, &mut mocks, &mut frame, 0.016, false).rendered);
        assert!(!frame.dirty);
        assert!(!tick(&mut render_loop, &mut mocks, &mut frame, 0.016, false).rendered);
        assert!(!tick(&mut render_loop, &mut mocks, &mut frame, 0.016, false).rendered);

        assert_eq!(mocks.recorder.borrow().count(|c| *c == Call::Render), 1);
        assert_eq!(render_loop.frames_rendered(), 1);
        assert_eq!(render_loop.frames_skipped(), 2);
    }

    #[test]
    fn moving_camera_keeps_rendering() {
        let mut mocks = MockCollaborators::new();
        let mut render_loop = RenderLoop::new();
        let mut frame = FrameState::default();
        tick(&mut render_loop, &mut mocks, &mut frame, 0.016, false);

        mocks.recorder.borrow_mut().camera_moving = true;
        assert!(tick(&mut render_loop, &mut mocks, &mut frame, 0.016, false).rendered);
        assert!(tick(&mut render_loop, &mut mocks, &mut frame, 0.016, false).rendered);
    }

    #[test]
    fn walk_motion_dirties_the_same_frame() {
        let mut mocks = MockCollaborators::new();
        let mut render_loop = RenderLoop::new();
        let mut frame = FrameState::default();
        tick(&mut render_loop, &mut mocks, &mut frame, 0.016, true);

        mocks.recorder.borrow_mut().walk_moving = true;
        assert!(tick(&mut render_loop, &mut mocks, &mut frame, 0.016, true).rendered);
    }

    #[test]
    fn camera_updates_before_walk_before_render() {
        let mut mocks = MockCollaborators::new();
        let mut render_loop = RenderLoop::new();
        let mut frame = FrameState::default();

        tick(&mut render_loop, &mut mocks, &mut frame, 0.1, true);

        let recorder = mocks.recorder.borrow();
        let camera = recorder.position(|c| matches!(c, Call::CameraUpdate(_))).unwrap();
        let first_step = recorder.position(|c| matches!(c, Call::WalkStep(_))).unwrap();
        let render = recorder.position(|c| *c == Call::Render).unwrap();
        assert!(camera < first_step && first_step < render);
    }

    #[test]
    fn delta_is_clamped() {
        let mut mocks = MockCollaborators::new();
        let mut render_loop = RenderLoop::new();
        let mut frame = FrameState::default();

        tick(&mut render_loop, &mut mocks, &mut frame, 10.0, true);
        assert_eq!(frame.delta, MAX_FRAME_DELTA);
        assert!(mocks
            .recorder
            .borrow()
            .calls
            .contains(&Call::WalkStep(MAX_FRAME_DELTA / 4.0)));
    }
}
