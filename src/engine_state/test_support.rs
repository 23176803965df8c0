//! Recording collaborators for unit tests.

use std::{cell::RefCell, rc::Rc};

use super::{
    chunk_scheduler::{ChunkAck, ChunkCoordinate},
    collaborators::{
        CameraControls, Collaborators, DragButton, DrawTool, EditorPanel, MovementIntent, Renderer,
        StorageCollaborator, WalkSimulation, WorldCollaborator,
    },
    input_mode::{CameraInput, PointerPosition},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UpdateChunk(ChunkCoordinate),
    Undo,
    Redo,
    WorldReset,
    StorageClear,
    CameraInput(CameraInput),
    CameraUpdate(f32),
    CameraPointer(DragButton),
    CameraZoom,
    CameraReset,
    WalkActive(bool),
    WalkMovement(MovementIntent),
    WalkLook,
    WalkStep(f32),
    WalkReset,
    DrawBegin(PointerPosition),
    DrawExtend(PointerPosition),
    DrawFinish(PointerPosition),
    DrawReset,
    MaterialView,
    CursorSize(usize),
    Orientation,
    PanelReset,
    Render,
    Resize(u32, u32),
}

/// Shared call log plus the knobs mocks consult when answering.
#[derive(Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
    pub acks: Vec<ChunkAck>,
    pub stored: Vec<ChunkCoordinate>,
    pub camera_moving: bool,
    pub walk_moving: bool,
    pub world_changed: bool,
    pub history_changes: bool,
}

impl Recorder {
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.iter().position(predicate)
    }
}

pub type SharedRecorder = Rc<RefCell<Recorder>>;

pub struct MockWorld(pub SharedRecorder);
pub struct MockStorage(pub SharedRecorder);
pub struct MockCamera(pub SharedRecorder);
pub struct MockWalk(pub SharedRecorder);
pub struct MockDraw(pub SharedRecorder);
pub struct MockPanel(pub SharedRecorder);
pub struct MockRenderer(pub SharedRecorder);

impl WorldCollaborator for MockWorld {
    fn update_chunk(&mut self, ack: ChunkAck) {
        let mut recorder = self.0.borrow_mut();
        recorder.calls.push(Call::UpdateChunk(ack.coordinate()));
        recorder.acks.push(ack);
    }

    fn undo(&mut self) -> bool {
        let mut recorder = self.0.borrow_mut();
        recorder.calls.push(Call::Undo);
        recorder.history_changes
    }

    fn redo(&mut self) -> bool {
        let mut recorder = self.0.borrow_mut();
        recorder.calls.push(Call::Redo);
        recorder.history_changes
    }

    fn take_changes(&mut self) -> bool {
        std::mem::take(&mut self.0.borrow_mut().world_changed)
    }

    fn reset(&mut self) {
        self.0.borrow_mut().calls.push(Call::WorldReset);
    }
}

impl StorageCollaborator for MockStorage {
    fn list_stored(&self) -> Vec<ChunkCoordinate> {
        self.0.borrow().stored.clone()
    }

    fn clear(&mut self) {
        let mut recorder = self.0.borrow_mut();
        recorder.calls.push(Call::StorageClear);
        recorder.stored.clear();
    }
}

impl CameraControls for MockCamera {
    fn apply_input(&mut self, input: CameraInput) {
        self.0.borrow_mut().calls.push(Call::CameraInput(input));
    }

    fn update(&mut self, delta: f32) -> bool {
        let mut recorder = self.0.borrow_mut();
        recorder.calls.push(Call::CameraUpdate(delta));
        recorder.camera_moving
    }

    fn pointer_moved(&mut self, _delta: (f64, f64), button: DragButton) -> bool {
        self.0.borrow_mut().calls.push(Call::CameraPointer(button));
        true
    }

    fn zoom(&mut self, _amount: f32) -> bool {
        self.0.borrow_mut().calls.push(Call::CameraZoom);
        true
    }

    fn reset(&mut self) {
        self.0.borrow_mut().calls.push(Call::CameraReset);
    }
}

impl WalkSimulation for MockWalk {
    fn set_active(&mut self, active: bool) {
        self.0.borrow_mut().calls.push(Call::WalkActive(active));
    }

    fn set_movement(&mut self, intent: MovementIntent) {
        self.0.borrow_mut().calls.push(Call::WalkMovement(intent));
    }

    fn look(&mut self, _delta: (f64, f64)) -> bool {
        self.0.borrow_mut().calls.push(Call::WalkLook);
        true
    }

    fn step(&mut self, dt: f32) -> bool {
        let mut recorder = self.0.borrow_mut();
        recorder.calls.push(Call::WalkStep(dt));
        recorder.walk_moving
    }

    fn reset(&mut self) {
        self.0.borrow_mut().calls.push(Call::WalkReset);
    }
}

impl DrawTool for MockDraw {
    fn begin(&mut self, at: PointerPosition) -> bool {
        self.0.borrow_mut().calls.push(Call::DrawBegin(at));
        true
    }

    fn extend(&mut self, at: PointerPosition) -> bool {
        self.0.borrow_mut().calls.push(Call::DrawExtend(at));
        true
    }

    fn finish(&mut self, at: PointerPosition) -> bool {
        self.0.borrow_mut().calls.push(Call::DrawFinish(at));
        true
    }

    fn reset(&mut self) {
        self.0.borrow_mut().calls.push(Call::DrawReset);
    }
}

impl EditorPanel for MockPanel {
    fn toggle_material_view(&mut self) -> bool {
        self.0.borrow_mut().calls.push(Call::MaterialView);
        true
    }

    fn set_cursor_size(&mut self, index: usize) -> bool {
        self.0.borrow_mut().calls.push(Call::CursorSize(index));
        true
    }

    fn toggle_orientation_mode(&mut self) -> bool {
        self.0.borrow_mut().calls.push(Call::Orientation);
        true
    }

    fn reset(&mut self) {
        self.0.borrow_mut().calls.push(Call::PanelReset);
    }
}

impl Renderer for MockRenderer {
    fn render(&mut self) {
        self.0.borrow_mut().calls.push(Call::Render);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.0.borrow_mut().calls.push(Call::Resize(width, height));
    }
}

/// One mock of each collaborator, all writing to the same recorder.
pub struct MockCollaborators {
    pub recorder: SharedRecorder,
    pub world: MockWorld,
    pub storage: MockStorage,
    pub camera: MockCamera,
    pub walk: MockWalk,
    pub draw: MockDraw,
    pub panel: MockPanel,
    pub renderer: MockRenderer,
}

impl MockCollaborators {
    pub fn new() -> Self {
        Self::with_stored(Vec::new())
    }

    pub fn with_stored(stored: Vec<ChunkCoordinate>) -> Self {
        let recorder: SharedRecorder = Rc::new(RefCell::new(Recorder {
            stored,
            ..Recorder::default()
        }));
        Self {
            world: MockWorld(recorder.clone()),
            storage: MockStorage(recorder.clone()),
            camera: MockCamera(recorder.clone()),
            walk: MockWalk(recorder.clone()),
            draw: MockDraw(recorder.clone()),
            panel: MockPanel(recorder.clone()),
            renderer: MockRenderer(recorder.clone()),
            recorder,
        }
    }

    /// Boxes the mocks, returning the recorder for assertions.
    pub fn into_collaborators(self) -> (Collaborators, SharedRecorder) {
        (
            Collaborators {
                world: Box::new(self.world),
                storage: Box::new(self.storage),
                camera: Box::new(self.camera),
                walk: Box::new(self.walk),
                draw: Box::new(self.draw),
                panel: Box::new(self.panel),
                renderer: Box::new(self.renderer),
            },
            self.recorder,
        )
    }
}
