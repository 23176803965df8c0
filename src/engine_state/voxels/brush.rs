//! # Voxel Brush
//!
//! The draw tool of the standalone editor. Each pointer position of a stroke is
//! projected onto the ground's top face through the orbit camera, and a cursor of
//! the panel's size is painted there. Voxels appear as the stroke runs; finishing
//! the stroke commits every voxel it changed as one undoable edit and records the
//! touched chunks in storage. A discarded stroke is painted back out.

use std::collections::HashSet;

use cgmath::Point3;

use crate::core::StResource;
use crate::engine_state::{
    camera_state::{walk::GROUND_HEIGHT, OrbitControls},
    collaborators::DrawTool,
    input_mode::PointerPosition,
    panel::{OrientationMode, PanelState},
};

use super::{
    storage::MemoryStorage,
    world::{chunk_of, Material, Stroke, VoxelCoordinate, VoxelEdit, VoxelWorld},
};

/// Material the brush paints.
pub const BRUSH_MATERIAL: Material = 2;

/// Shared state the brush reads and writes.
pub struct BrushTargets {
    pub world: StResource<VoxelWorld>,
    pub storage: StResource<MemoryStorage>,
    pub camera: StResource<OrbitControls>,
    pub panel: StResource<PanelState>,
}

pub struct VoxelBrush {
    targets: BrushTargets,
    stroke: Option<Vec<VoxelEdit>>,
}

impl VoxelBrush {
    pub fn new(targets: BrushTargets) -> Self {
        Self {
            targets,
            stroke: None,
        }
    }

    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    /// Voxels covered by the cursor under `at`, if the pointer is over the ground.
    fn footprint(&self, at: PointerPosition) -> Vec<VoxelCoordinate> {
        let Some(hit) = self.targets.camera.get().pick_plane(at, GROUND_HEIGHT) else {
            return Vec::new();
        };
        let panel = *self.targets.panel.get();
        cursor_voxels(
            Point3::new(hit.x.floor() as i32, GROUND_HEIGHT as i32, hit.z.floor() as i32),
            panel.cursor_edge() as i32,
            panel.orientation,
        )
    }

    /// Paints the footprint under `at`. Returns whether any voxel changed.
    fn paint(&mut self, at: PointerPosition) -> bool {
        let footprint = self.footprint(at);
        let Some(stroke) = self.stroke.as_mut() else {
            return false;
        };
        let mut world = self.targets.world.get_mut();
        let before = stroke.len();
        stroke.extend(
            footprint
                .into_iter()
                .filter_map(|voxel| world.paint(voxel, Some(BRUSH_MATERIAL))),
        );
        stroke.len() > before
    }
}

/// Cursor of `edge` voxels per side anchored at `anchor`.
///
/// Horizontal cursors lie on the ground; vertical ones stand up from it.
pub fn cursor_voxels(
    anchor: VoxelCoordinate,
    edge: i32,
    orientation: OrientationMode,
) -> Vec<VoxelCoordinate> {
    let mut voxels = Vec::with_capacity((edge * edge) as usize);
    for a in 0..edge {
        for b in 0..edge {
            voxels.push(match orientation {
                OrientationMode::Horizontal => Point3::new(anchor.x + a, anchor.y, anchor.z + b),
                OrientationMode::Vertical => Point3::new(anchor.x + a, anchor.y + b, anchor.z),
            });
        }
    }
    voxels
}

impl DrawTool for VoxelBrush {
    fn begin(&mut self, at: PointerPosition) -> bool {
        if self.stroke.is_some() {
            log::warn!("Stroke started while another was running, committing the old one");
            self.finish(at);
        }
        self.stroke = Some(Vec::new());
        self.paint(at)
    }

    fn extend(&mut self, at: PointerPosition) -> bool {
        self.paint(at)
    }

    fn finish(&mut self, at: PointerPosition) -> bool {
        let changed = self.paint(at);
        let Some(edits) = self.stroke.take() else {
            return changed;
        };

        let chunks: HashSet<_> = edits.iter().map(|edit| chunk_of(edit.voxel)).collect();
        if self.targets.world.get_mut().commit(Stroke::new(edits)) {
            let mut storage = self.targets.storage.get_mut();
            for chunk in chunks {
                storage.record(chunk);
            }
        }
        changed
    }

    fn reset(&mut self) {
        let Some(edits) = self.stroke.take() else {
            return;
        };
        let mut world = self.targets.world.get_mut();
        for edit in edits.iter().rev() {
            world.paint(edit.voxel, edit.before);
        }
    }
}
