//! # Application State Management
//!
//! The winit shell around the editor:
//! - Window and graphics initialization, and startup failure handling
//! - Wiring the reference collaborators into an [`EditorState`]
//! - Translating window and device events into editor input
//! - Pointer lock while walking
//! - Per-frame chunk generation and ticking, paced to the display refresh

pub mod frame_pacer;
pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use cgmath::Deg;
use frame_pacer::FramePacer;
use graphics_resources_builder::{Graphics, GraphicsResult, MaybeGraphics};
use input_manager::InputManager;
use input_state::EditorInput;
use log::{debug, error, info, warn};

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::config::EditorConfig;
use crate::core::StResource;
use crate::engine_state::{
    camera_state::{camera::Projection, walk::WalkController, OrbitControls},
    collaborators::Collaborators,
    input_mode::ModeTransition,
    panel::PanelState,
    rendering::{SurfaceRenderer, ViewCameras},
    voxels::{
        brush::{BrushTargets, VoxelBrush},
        storage::MemoryStorage,
        world::VoxelWorld,
    },
    EditorState,
};

/// Chunks the world generates per frame.
const CHUNKS_PER_FRAME: usize = 4;

/// The application's lifecycle: waiting for graphics, then running the editor.
pub struct ApplicationState {
    pub graphics: MaybeGraphics,
    pub state: Option<InitializedApplicationState>,
    pub config: EditorConfig,
}

/// The running editor and the handles the shell drives directly.
pub struct InitializedApplicationState {
    pub editor: EditorState,
    pub window: Arc<Window>,
    pub input_manager: InputManager,
    /// Shared with the editor's world collaborator, for chunk generation
    pub world: StResource<VoxelWorld>,
    /// Shared with the editor's camera collaborator, for viewport size
    pub camera: StResource<OrbitControls>,
    pub pacer: FramePacer,
}

impl ApplicationState {
    pub fn new(graphics: MaybeGraphics, config: EditorConfig) -> Self {
        Self {
            graphics,
            state: None,
            config,
        }
    }

    /// Wires the reference collaborators around the graphics resources and
    /// starts the editor.
    fn initialize_application_state(&mut self, gfx: Graphics) {
        let config = &self.config;
        let size = gfx.window.inner_size();

        let panel = StResource::new(PanelState::default());
        let world = StResource::new(VoxelWorld::new());
        let storage = StResource::new(MemoryStorage::with_chunks(config.stored_chunks()));
        let camera = StResource::new(OrbitControls::new(
            config.camera,
            Projection::new(size.width, size.height, Deg(60.0), 0.1, 1000.0),
        ));
        let walk = StResource::new(WalkController::new(config.walk));

        let brush = VoxelBrush::new(BrushTargets {
            world: world.clone(),
            storage: storage.clone(),
            camera: camera.clone(),
            panel: panel.clone(),
        });
        let renderer = SurfaceRenderer::new(
            gfx.surface,
            gfx.surface_config,
            gfx.device,
            gfx.queue,
            panel.clone(),
            ViewCameras {
                orbit: camera.clone(),
                walk: walk.clone(),
            },
        );

        let collaborators = Collaborators {
            world: Box::new(world.clone()),
            storage: Box::new(storage),
            camera: Box::new(camera.clone()),
            walk: Box::new(walk),
            draw: Box::new(brush),
            panel: Box::new(panel),
            renderer: Box::new(renderer),
        };

        let editor = EditorState::start(collaborators, config.pan_modifier.key_code());
        info!("Editor started");

        let pacer = FramePacer::new(refresh_rate(&gfx.window), web_time::Instant::now());
        debug!("Pacing frames every {:?}", pacer.interval());

        gfx.window.request_redraw();
        self.state = Some(InitializedApplicationState {
            editor,
            window: gfx.window,
            input_manager: InputManager::new(),
            world,
            camera,
            pacer,
        });
    }

    /// Starts the editor from the graphics startup result. Returns `false` when
    /// startup failed, leaving no editor behind.
    fn receive_graphics(&mut self, graphics: GraphicsResult) -> bool {
        self.graphics = MaybeGraphics::Moved;
        match graphics {
            Ok(gfx) => {
                self.initialize_application_state(gfx);
                true
            }
            Err(err) => {
                error!("Editor failed to start: {}", err);
                self.state = None;
                false
            }
        }
    }
}

/// Refresh rate of the monitor the window is on, if known.
fn refresh_rate(window: &Window) -> Option<u32> {
    window
        .current_monitor()
        .and_then(|monitor| monitor.refresh_rate_millihertz())
}

impl InitializedApplicationState {
    /// Whether a frame is due, sleeping the event loop until the next refresh
    /// otherwise.
    #[cfg(not(target_family = "wasm"))]
    fn frame_due(&mut self, event_loop: &ActiveEventLoop) -> bool {
        use winit::event_loop::ControlFlow;

        let due = self.pacer.poll(web_time::Instant::now());
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.pacer.next_frame()));
        due
    }

    /// The browser paces frames through requestAnimationFrame.
    #[cfg(target_family = "wasm")]
    fn frame_due(&mut self, _event_loop: &ActiveEventLoop) -> bool {
        true
    }

    fn handle_input(&mut self, input: EditorInput) {
        match input {
            EditorInput::KeyDown(chord) => {
                let outcome = self.editor.key_down(chord);
                if outcome.prevent_default {
                    debug!("{:?} consumed by {:?}", chord.code, outcome.command);
                }
                if let Some(transition) = outcome.transition {
                    self.apply_pointer_lock(transition);
                }
            }
            EditorInput::KeyUp(code) => {
                if let Some(transition) = self.editor.key_up(code) {
                    self.apply_pointer_lock(transition);
                }
            }
            EditorInput::Gesture(gesture) => {
                if !self.editor.gesture(gesture) {
                    debug!("Ignored {:?} in {:?}", gesture, self.editor.mode());
                }
            }
            EditorInput::Scroll(amount) => self.editor.scroll(amount),
        }
    }

    /// Grabs and hides the cursor on entering walk, releases it on leaving.
    fn apply_pointer_lock(&self, transition: ModeTransition) {
        if transition.entered_walk() {
            let grabbed = self
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(err) = grabbed {
                warn!("Could not grab cursor: {}", err);
            }
            self.window.set_cursor_visible(false);
        } else if transition.left_walk() {
            if let Err(err) = self.window.set_cursor_grab(CursorGrabMode::None) {
                warn!("Could not release cursor: {}", err);
            }
            self.window.set_cursor_visible(true);
        }
    }
}

impl ApplicationHandler<GraphicsResult> for ApplicationState {
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested = event {
            event_loop.exit();
            return;
        }
        let Some(state) = &mut self.state else {
            return;
        };

        if let Some(input) = state.input_manager.intake_input(&event) {
            state.handle_input(input);
        }

        match event {
            WindowEvent::Moved(_) => {
                state.pacer.set_refresh_rate(refresh_rate(&state.window));
            }
            WindowEvent::Resized(size) => {
                state.camera.get_mut().resize(size.width, size.height);
                state.editor.resize(size.width, size.height);
            }
            WindowEvent::Occluded(occluded) => {
                state.editor.set_visible(!occluded);
            }
            WindowEvent::Focused(false) => {
                for input in state.input_manager.reset_inputs() {
                    state.handle_input(input);
                }
            }
            WindowEvent::RedrawRequested => {
                state.editor.tick();
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                let held = state.input_manager.held_button();
                state.editor.pointer_motion(delta, held);
            }
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: GraphicsResult) {
        if !self.receive_graphics(graphics) {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &mut self.state else {
            return;
        };
        if !state.frame_due(event_loop) {
            return;
        }
        state.world.get_mut().generate_pending(CHUNKS_PER_FRAME);
        let intent = state.input_manager.movement_intent();
        state.editor.set_movement(intent);
        state.window.request_redraw();
    }
}
