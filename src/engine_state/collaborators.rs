//! # Collaborator Contracts
//!
//! The orchestration layer drives everything it does not own through these traits:
//! the voxel world, persisted storage, camera controls, the first-person walk
//! simulation, the draw tool, the UI panel and the renderer.
//!
//! Methods that may change what is on screen return `bool` ("something visible
//! changed"). The caller folds that answer into the frame's dirty flag; no
//! collaborator ever writes the flag itself.

use super::{
    chunk_scheduler::{ChunkAck, ChunkCoordinate},
    input_mode::{CameraInput, PointerPosition},
};

/// The voxel world engine.
pub trait WorldCollaborator {
    /// Requests that a chunk be loaded, generated and meshed.
    ///
    /// Fire-and-forget: the world calls [`ChunkAck::complete`] whenever the chunk
    /// is ready, possibly on a later frame.
    fn update_chunk(&mut self, ack: ChunkAck);

    /// Steps the edit history back. Returns whether anything changed.
    fn undo(&mut self) -> bool;

    /// Steps the edit history forward. Returns whether anything changed.
    fn redo(&mut self) -> bool;

    /// Drains change notifications raised since the last call.
    fn take_changes(&mut self) -> bool;

    /// Drops all world content and history.
    fn reset(&mut self) {}
}

/// Persisted editor state.
pub trait StorageCollaborator {
    /// Coordinates of every chunk that has persisted content.
    fn list_stored(&self) -> Vec<ChunkCoordinate>;

    /// Irreversibly clears everything that was persisted.
    fn clear(&mut self);
}

/// Orbit/pan camera controls with damping.
pub trait CameraControls {
    /// Enables or disables pan, rotate and the controls as a whole.
    fn apply_input(&mut self, input: CameraInput);

    /// Advances damping/inertia. Returns whether the camera moved.
    fn update(&mut self, delta: f32) -> bool;

    /// Pointer motion during a camera drag with `button` held.
    fn pointer_moved(&mut self, delta: (f64, f64), button: DragButton) -> bool;

    /// Wheel zoom.
    fn zoom(&mut self, amount: f32) -> bool;

    /// Returns the camera to its initial placement.
    fn reset(&mut self) {}
}

/// Mouse button driving a camera drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragButton {
    /// Rotates around the target
    Primary,
    /// Pans the target
    Secondary,
}

/// Movement keys held during the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MovementIntent {
    /// Whether any movement key is held.
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }
}

/// First-person walk simulation.
pub trait WalkSimulation {
    /// Called on every Walk enter/leave transition.
    fn set_active(&mut self, active: bool);

    /// Latest movement keys.
    fn set_movement(&mut self, intent: MovementIntent);

    /// Mouse-look input.
    fn look(&mut self, delta: (f64, f64)) -> bool;

    /// Integrates one fixed sub-step of `dt` seconds. Returns whether the viewer moved.
    fn step(&mut self, dt: f32) -> bool;

    /// Returns the walker to its spawn point.
    fn reset(&mut self) {}
}

/// Voxel drawing driven by a pointer drag.
pub trait DrawTool {
    /// Starts a stroke.
    fn begin(&mut self, at: PointerPosition) -> bool;

    /// Extends the current stroke.
    fn extend(&mut self, at: PointerPosition) -> bool;

    /// Commits the current stroke.
    fn finish(&mut self, at: PointerPosition) -> bool;

    /// Discards any stroke in progress.
    fn reset(&mut self) {}
}

/// UI widget state (material view, cursor size, orientation mode).
pub trait EditorPanel {
    fn toggle_material_view(&mut self) -> bool;

    /// `index` is 0, 1 or 2.
    fn set_cursor_size(&mut self, index: usize) -> bool;

    fn toggle_orientation_mode(&mut self) -> bool;

    fn reset(&mut self) {}
}

/// The render pipeline.
pub trait Renderer {
    /// Performs one full render pass.
    fn render(&mut self);

    /// Reconfigures for a new viewport size.
    fn resize(&mut self, width: u32, height: u32);
}

/// Everything the editor delegates to, wired once at startup.
pub struct Collaborators {
    pub world: Box<dyn WorldCollaborator>,
    pub storage: Box<dyn StorageCollaborator>,
    pub camera: Box<dyn CameraControls>,
    pub walk: Box<dyn WalkSimulation>,
    pub draw: Box<dyn DrawTool>,
    pub panel: Box<dyn EditorPanel>,
    pub renderer: Box<dyn Renderer>,
}
