//! # World Module
//!
//! The in-memory voxel world used by the standalone editor.
//!
//! ## Architecture
//!
//! Voxels are stored sparsely in a hash map keyed by world voxel coordinate.
//! Chunks only exist as bookkeeping: a chunk request is parked in a pending
//! queue and fulfilled a few per frame by [`VoxelWorld::generate_pending`],
//! which lays the ground layer for chunks on `y == 0` and acknowledges the
//! request.
//!
//! ## Edit History
//!
//! Every brush stroke is recorded as one [`Stroke`] holding the previous and the
//! new content of each voxel it touched. Undo restores the previous content,
//! redo re-applies the new content. Committing a stroke drops the redo stack.

use std::collections::{HashMap, HashSet, VecDeque};

use cgmath::Point3;

use crate::core::StResource;
use crate::engine_state::{
    chunk_scheduler::{ChunkAck, ChunkCoordinate},
    collaborators::WorldCollaborator,
};

/// Edge length of a chunk in voxels.
pub const CHUNK_DIMENSION: i32 = 16;

/// Material painted on freshly generated ground.
pub const GROUND_MATERIAL: Material = 1;

/// Material identifier of a solid voxel.
pub type Material = u8;

/// World voxel coordinate.
pub type VoxelCoordinate = Point3<i32>;

/// Chunk containing `voxel`.
pub fn chunk_of(voxel: VoxelCoordinate) -> ChunkCoordinate {
    Point3::new(
        voxel.x.div_euclid(CHUNK_DIMENSION),
        voxel.y.div_euclid(CHUNK_DIMENSION),
        voxel.z.div_euclid(CHUNK_DIMENSION),
    )
}

/// One voxel's content before and after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelEdit {
    pub voxel: VoxelCoordinate,
    pub before: Option<Material>,
    pub after: Option<Material>,
}

/// The edits of one brush stroke, undone and redone as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stroke {
    edits: Vec<VoxelEdit>,
}

impl Stroke {
    pub fn new(edits: Vec<VoxelEdit>) -> Self {
        Self { edits }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }
}

/// Sparse voxel storage with chunk bookkeeping and an undo/redo history.
#[derive(Default)]
pub struct VoxelWorld {
    voxels: HashMap<VoxelCoordinate, Material>,
    loaded: HashSet<ChunkCoordinate>,
    pending: VecDeque<ChunkAck>,
    undo_stack: Vec<Stroke>,
    redo_stack: Vec<Stroke>,
    changed: bool,
}

impl VoxelWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn voxel_at(&self, voxel: VoxelCoordinate) -> Option<Material> {
        self.voxels.get(&voxel).copied()
    }

    pub fn voxel_count(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_loaded(&self, chunk: ChunkCoordinate) -> bool {
        self.loaded.contains(&chunk)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Chunk requests not fulfilled yet.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[cfg(test)]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Parks a chunk request until the next call to [`Self::generate_pending`].
    pub fn request_chunk(&mut self, ack: ChunkAck) {
        self.pending.push_back(ack);
    }

    /// Generates up to `budget` pending chunks, oldest request first, and
    /// acknowledges each one. Returns how many were generated.
    pub fn generate_pending(&mut self, budget: usize) -> usize {
        let mut generated = 0;
        while generated < budget {
            let Some(ack) = self.pending.pop_front() else {
                break;
            };
            let chunk = ack.coordinate();
            if self.loaded.insert(chunk) {
                self.generate_chunk(chunk);
                self.changed = true;
            }
            ack.complete();
            generated += 1;
        }
        if generated > 0 {
            log::debug!(
                "Generated {} chunks, {} still pending",
                generated,
                self.pending.len()
            );
        }
        generated
    }

    /// Flat ground: the bottom voxel layer of every chunk on the `y == 0` layer.
    fn generate_chunk(&mut self, chunk: ChunkCoordinate) {
        if chunk.y != 0 {
            return;
        }
        let origin_x = chunk.x * CHUNK_DIMENSION;
        let origin_z = chunk.z * CHUNK_DIMENSION;
        for z in origin_z..origin_z + CHUNK_DIMENSION {
            for x in origin_x..origin_x + CHUNK_DIMENSION {
                self.voxels
                    .entry(Point3::new(x, 0, z))
                    .or_insert(GROUND_MATERIAL);
            }
        }
    }

    /// Sets one voxel, returning the edit if its content changed.
    pub fn paint(&mut self, voxel: VoxelCoordinate, material: Option<Material>) -> Option<VoxelEdit> {
        let before = self.voxel_at(voxel);
        if before == material {
            return None;
        }
        self.write(voxel, material);
        self.changed = true;
        Some(VoxelEdit {
            voxel,
            before,
            after: material,
        })
    }

    /// Records already applied edits as one undoable stroke.
    pub fn commit(&mut self, stroke: Stroke) -> bool {
        if stroke.is_empty() {
            return false;
        }
        log::debug!("Committed stroke of {} voxels", stroke.len());
        self.undo_stack.push(stroke);
        self.redo_stack.clear();
        true
    }

    fn write(&mut self, voxel: VoxelCoordinate, material: Option<Material>) {
        match material {
            Some(material) => {
                self.voxels.insert(voxel, material);
            }
            None => {
                self.voxels.remove(&voxel);
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        let Some(stroke) = self.undo_stack.pop() else {
            return false;
        };
        for edit in stroke.edits.iter().rev() {
            self.write(edit.voxel, edit.before);
        }
        self.redo_stack.push(stroke);
        self.changed = true;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(stroke) = self.redo_stack.pop() else {
            return false;
        };
        for edit in &stroke.edits {
            self.write(edit.voxel, edit.after);
        }
        self.undo_stack.push(stroke);
        self.changed = true;
        true
    }

    /// Drops all content, history and pending requests.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl WorldCollaborator for StResource<VoxelWorld> {
    fn update_chunk(&mut self, ack: ChunkAck) {
        self.get_mut().request_chunk(ack);
    }

    fn undo(&mut self) -> bool {
        self.get_mut().undo()
    }

    fn redo(&mut self) -> bool {
        self.get_mut().redo()
    }

    fn take_changes(&mut self) -> bool {
        std::mem::take(&mut self.get_mut().changed)
    }

    fn reset(&mut self) {
        self.get_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::chunk_scheduler::{compute_load_order, ChunkLoadQueue};

    fn loaded_world(budget: usize) -> (StResource<VoxelWorld>, ChunkLoadQueue) {
        let mut world = StResource::new(VoxelWorld::new());
        let mut queue = ChunkLoadQueue::new(compute_load_order(&[]));
        queue.issue_all(&mut world);
        world.get_mut().generate_pending(budget);
        (world, queue)
    }

    fn stroke(world: &mut VoxelWorld, voxels: &[VoxelCoordinate]) -> Stroke {
        Stroke::new(
            voxels
                .iter()
                .filter_map(|v| world.paint(*v, Some(2)))
                .collect(),
        )
    }

    #[test]
    fn chunk_of_rounds_towards_negative_infinity() {
        assert_eq!(chunk_of(Point3::new(0, 0, 0)), Point3::new(0, 0, 0));
        assert_eq!(chunk_of(Point3::new(15, 16, -1)), Point3::new(0, 1, -1));
        assert_eq!(chunk_of(Point3::new(-16, -17, 31)), Point3::new(-1, -2, 1));
    }

    #[test]
    fn requests_wait_until_generated() {
        let (world, mut queue) = loaded_world(0);
        assert_eq!(world.get().pending_count(), 98);
        assert_eq!(queue.drain_acknowledgements(), 0);
    }

    #[test]
    fn generation_respects_budget_and_acknowledges() {
        let (mut world, mut queue) = loaded_world(10);
        assert_eq!(world.get().loaded_count(), 10);
        assert!(world.get().is_loaded(Point3::new(0, 0, 0)));
        assert!(!world.get().is_loaded(Point3::new(3, 1, 3)));
        assert_eq!(world.get().pending_count(), 88);
        assert_eq!(queue.drain_acknowledgements(), 10);
        assert!(world.take_changes());
        assert!(!world.take_changes());

        world.get_mut().generate_pending(usize::MAX);
        assert_eq!(queue.drain_acknowledgements(), 88);
        assert_eq!(queue.outstanding(), 0);
    }

    #[test]
    fn ground_only_on_bottom_layer() {
        let (world, _queue) = loaded_world(usize::MAX);
        let world = world.get();
        assert_eq!(world.voxel_at(Point3::new(0, 0, 0)), Some(GROUND_MATERIAL));
        assert_eq!(world.voxel_at(Point3::new(-48, 0, 63)), Some(GROUND_MATERIAL));
        assert_eq!(world.voxel_at(Point3::new(0, 16, 0)), None);
        assert_eq!(world.voxel_count(), 49 * 16 * 16);
    }

    #[test]
    fn undo_and_redo_whole_strokes() {
        let mut world = VoxelWorld::new();
        let first = stroke(&mut world, &[Point3::new(0, 1, 0), Point3::new(1, 1, 0)]);
        assert!(world.commit(first));
        let second = stroke(&mut world, &[Point3::new(2, 1, 0)]);
        assert!(world.commit(second));
        assert_eq!(world.voxel_count(), 3);

        assert!(world.undo());
        assert_eq!(world.voxel_count(), 2);
        assert!(world.undo());
        assert_eq!(world.voxel_count(), 0);
        assert!(!world.undo());

        assert!(world.redo());
        assert_eq!(world.voxel_at(Point3::new(1, 1, 0)), Some(2));
        assert_eq!(world.voxel_at(Point3::new(2, 1, 0)), None);
    }

    #[test]
    fn undo_restores_overwritten_material() {
        let mut world = VoxelWorld::new();
        world.paint(Point3::new(0, 0, 0), Some(GROUND_MATERIAL));
        let edit = stroke(&mut world, &[Point3::new(0, 0, 0)]);
        world.commit(edit);

        world.undo();
        assert_eq!(world.voxel_at(Point3::new(0, 0, 0)), Some(GROUND_MATERIAL));
    }

    #[test]
    fn commit_drops_redo_and_ignores_empty_strokes() {
        let mut world = VoxelWorld::new();
        let first = stroke(&mut world, &[Point3::new(0, 1, 0)]);
        world.commit(first);
        world.undo();
        assert!(world.can_redo());

        let second = stroke(&mut world, &[Point3::new(5, 1, 5)]);
        world.commit(second);
        assert!(!world.can_redo());
        assert!(!world.commit(Stroke::default()));
    }

    #[test]
    fn painting_same_material_is_not_an_edit() {
        let mut world = VoxelWorld::new();
        assert!(world.paint(Point3::new(0, 0, 0), Some(3)).is_some());
        assert!(world.paint(Point3::new(0, 0, 0), Some(3)).is_none());
        assert!(world.paint(Point3::new(1, 0, 0), None).is_none());
    }

    #[test]
    fn reset_clears_everything() {
        let (mut world, _queue) = loaded_world(5);
        world.reset();
        let world = world.get();
        assert_eq!(world.voxel_count(), 0);
        assert_eq!(world.loaded_count(), 0);
        assert_eq!(world.pending_count(), 0);
    }
}
