//! # Engine State Module
//!
//! The interaction-orchestration core of the editor.
//!
//! ## Key Components
//!
//! * `EditorState` - Wires the components below to the collaborators and exposes
//!   the event and tick entry points the host calls
//! * `frame_clock` - Clamped, visibility-aware frame timing
//! * `chunk_scheduler` - Nearest-first chunk load order and request tracking
//! * `input_mode` - Orbit / Pan / Walk arbitration and the draw gate
//! * `commands` - Keyboard chord lookup table
//! * `render_loop` - Camera update, walk sub-stepping and dirty-gated rendering
//! * `collaborators` - Contracts for everything the core delegates to
//!
//! The reference collaborators used by the standalone binary live in
//! `camera_state`, `voxels`, `panel` and `rendering`.
//!
//! ## Architecture
//!
//! Everything runs on one thread. Input events are handled to completion one at a
//! time and the host calls [`EditorState::tick`] once per display refresh. Every
//! call into a collaborator that can change what is on screen answers with a
//! `bool`, which is folded into the [`FrameState`] owned here; the render loop is
//! the only reader of that flag.

use winit::keyboard::KeyCode;

use chunk_scheduler::{compute_load_order, ChunkLoadQueue};
use collaborators::{Collaborators, DragButton, MovementIntent};
use commands::{Command, CommandDispatcher, KeyChord};
use frame_clock::FrameClock;
use frame_state::FrameState;
use input_mode::{
    CameraInput, DrawAction, InputModeController, Mode, ModeTransition, PointerGesture,
};
use render_loop::{RenderLoop, TickReport, TickSystems};

pub mod camera_state;
pub mod chunk_scheduler;
pub mod collaborators;
pub mod commands;
pub mod frame_clock;
pub mod frame_state;
pub mod input_mode;
pub mod panel;
pub mod render_loop;
pub mod rendering;
pub mod voxels;

#[cfg(test)]
pub(crate) mod test_support;

/// What handling a key press did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The command that ran, if any
    pub command: Option<Command>,
    /// The movement-mode change it caused, if any
    pub transition: Option<ModeTransition>,
    /// The host should suppress the key's default behaviour
    pub prevent_default: bool,
}

/// The running editor: core components plus collaborators.
///
/// # Examples
///
/// ```ignore
/// let mut editor = EditorState::start(collaborators, KeyCode::Space);
///
/// // From the host's event handlers
/// editor.key_down(KeyChord::press(KeyCode::Escape));
/// editor.gesture(PointerGesture::DragStart(PointerPosition::new(10.0, 20.0)));
///
/// // Once per display refresh
/// editor.tick();
/// ```
pub struct EditorState {
    collaborators: Collaborators,
    clock: FrameClock,
    frame: FrameState,
    input_mode: InputModeController,
    dispatcher: CommandDispatcher,
    render_loop: RenderLoop,
    chunk_queue: ChunkLoadQueue,
    pan_modifier: KeyCode,
}

impl EditorState {
    /// Wires the editor and issues the startup chunk requests.
    ///
    /// # Arguments
    ///
    /// * `collaborators` - The world, storage, camera, walk, draw, panel and renderer
    /// * `pan_modifier` - Key that enables camera pan and rotate while held
    pub fn start(mut collaborators: Collaborators, pan_modifier: KeyCode) -> Self {
        let input_mode = InputModeController::new();
        collaborators.camera.apply_input(input_mode.camera_input());
        let chunk_queue = Self::schedule_chunks(&mut collaborators);

        Self {
            collaborators,
            clock: FrameClock::new(),
            frame: FrameState::default(),
            input_mode,
            dispatcher: CommandDispatcher::new(),
            render_loop: RenderLoop::new(),
            chunk_queue,
            pan_modifier,
        }
    }

    /// Computes the load order from storage and requests every chunk in it.
    fn schedule_chunks(collaborators: &mut Collaborators) -> ChunkLoadQueue {
        let stored = collaborators.storage.list_stored();
        let mut queue = ChunkLoadQueue::new(compute_load_order(&stored));
        let issued = queue.issue_all(collaborators.world.as_mut());
        log::info!(
            "Requested {} chunks ({} stored chunks on record)",
            issued,
            stored.len()
        );
        queue
    }

    pub fn mode(&self) -> Mode {
        self.input_mode.mode()
    }

    pub fn frame(&self) -> &FrameState {
        &self.frame
    }

    pub fn chunk_queue(&self) -> &ChunkLoadQueue {
        &self.chunk_queue
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    /// Handles a key going down.
    pub fn key_down(&mut self, chord: KeyChord) -> KeyOutcome {
        if chord.code == self.pan_modifier {
            if chord.repeat {
                return KeyOutcome::default();
            }
            let transition = self.input_mode.press_pan_modifier();
            if let Some(transition) = transition {
                self.apply_transition(transition);
            }
            return KeyOutcome {
                transition,
                ..KeyOutcome::default()
            };
        }

        let Some(dispatch) = self
            .dispatcher
            .resolve(&chord, self.input_mode.is_walking())
        else {
            return KeyOutcome::default();
        };

        log::info!("Command {:?}", dispatch.command);
        let transition = self.execute(dispatch.command);

        KeyOutcome {
            command: Some(dispatch.command),
            transition,
            prevent_default: dispatch.prevent_default,
        }
    }

    /// Handles a key coming up.
    pub fn key_up(&mut self, code: KeyCode) -> Option<ModeTransition> {
        if code != self.pan_modifier {
            return None;
        }
        let transition = self.input_mode.release_pan_modifier()?;
        self.apply_transition(transition);
        Some(transition)
    }

    fn execute(&mut self, command: Command) -> Option<ModeTransition> {
        let collaborators = &mut self.collaborators;
        match command {
            Command::ToggleWalk => {
                let transition = self.input_mode.toggle_walk();
                self.apply_transition(transition);
                return Some(transition);
            }
            Command::ToggleMaterialView => {
                collaborators.panel.toggle_material_view();
                self.frame.mark_dirty(true);
            }
            Command::SetCursorSize(index) => {
                self.frame
                    .mark_dirty(collaborators.panel.set_cursor_size(index));
            }
            Command::ToggleOrientationMode => {
                self.frame
                    .mark_dirty(collaborators.panel.toggle_orientation_mode());
            }
            Command::Undo => self.frame.mark_dirty(collaborators.world.undo()),
            Command::Redo => self.frame.mark_dirty(collaborators.world.redo()),
            Command::ResetState => return self.reset(),
        }
        None
    }

    fn apply_transition(&mut self, transition: ModeTransition) {
        self.collaborators
            .camera
            .apply_input(CameraInput::for_mode(transition.to));
        if transition.entered_walk() {
            self.collaborators.walk.set_active(true);
        } else if transition.left_walk() {
            self.collaborators.walk.set_active(false);
        }
        self.frame.mark_dirty(true);
    }

    /// Runs a pointer gesture through the draw gate. Returns whether it was accepted.
    pub fn gesture(&mut self, gesture: PointerGesture) -> bool {
        let Some(action) = self.input_mode.gesture(gesture) else {
            return false;
        };

        let draw = &mut self.collaborators.draw;
        let changed = match action {
            DrawAction::Begin(at) => {
                draw.begin(at);
                true
            }
            DrawAction::Extend(at) => draw.extend(at),
            DrawAction::Finish(at) => {
                draw.finish(at);
                true
            }
        };
        self.frame.mark_dirty(changed);
        true
    }

    /// Raw pointer motion. Looks around while walking, otherwise feeds a camera
    /// drag when a button is held.
    ///
    /// A primary-button drag belongs to the draw tool while a stroke is running.
    pub fn pointer_motion(&mut self, delta: (f64, f64), held: Option<DragButton>) {
        let changed = match held {
            _ if self.input_mode.is_walking() => self.collaborators.walk.look(delta),
            Some(DragButton::Primary) if self.input_mode.is_drawing() => false,
            Some(button) => self.collaborators.camera.pointer_moved(delta, button),
            None => false,
        };
        self.frame.mark_dirty(changed);
    }

    /// Wheel input. Ignored while walking.
    pub fn scroll(&mut self, amount: f32) {
        if self.input_mode.is_walking() {
            return;
        }
        self.frame.mark_dirty(self.collaborators.camera.zoom(amount));
    }

    /// Movement keys held this frame.
    pub fn set_movement(&mut self, intent: MovementIntent) {
        self.collaborators.walk.set_movement(intent);
    }

    /// The viewport changed size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.collaborators.renderer.resize(width, height);
        self.frame.mark_dirty(true);
    }

    /// The viewport was hidden or shown.
    pub fn set_visible(&mut self, visible: bool) {
        self.clock.set_visible(visible);
        if visible {
            self.frame.mark_dirty(true);
        }
    }

    /// Runs one frame using the wall clock.
    pub fn tick(&mut self) -> TickReport {
        let delta = self.clock.tick();
        self.tick_with_delta(delta)
    }

    /// Runs one frame with an externally measured delta.
    pub fn tick_with_delta(&mut self, delta: f32) -> TickReport {
        self.frame
            .mark_dirty(self.collaborators.world.take_changes());
        self.frame
            .mark_dirty(self.chunk_queue.drain_acknowledgements() > 0);

        let collaborators = &mut self.collaborators;
        self.render_loop.tick(
            &mut self.frame,
            delta,
            self.input_mode.is_walking(),
            TickSystems {
                camera: collaborators.camera.as_mut(),
                walk: collaborators.walk.as_mut(),
                renderer: collaborators.renderer.as_mut(),
            },
        )
    }

    /// Clears persisted state and restarts the editor in place.
    ///
    /// Irreversible. Returns the mode change if the editor was not idle in Orbit.
    pub fn reset(&mut self) -> Option<ModeTransition> {
        log::warn!("Resetting editor: clearing stored state and restarting");
        let from = self.input_mode.mode();

        let collaborators = &mut self.collaborators;
        collaborators.storage.clear();
        // discard the stroke before the world it painted into
        collaborators.draw.reset();
        collaborators.world.reset();
        collaborators.panel.reset();
        if self.input_mode.is_walking() {
            collaborators.walk.set_active(false);
        }
        collaborators.walk.reset();
        collaborators.camera.reset();

        self.input_mode = InputModeController::new();
        collaborators.camera.apply_input(self.input_mode.camera_input());
        self.clock = FrameClock::new();
        self.frame = FrameState::default();
        self.render_loop = RenderLoop::new();
        self.chunk_queue = Self::schedule_chunks(collaborators);

        (from != Mode::Orbit).then_some(ModeTransition {
            from,
            to: Mode::Orbit,
        })
    }
}
