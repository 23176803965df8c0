//! # Editor Panel
//!
//! The UI widget state the keyboard commands drive: material view, cursor size
//! and orientation mode. The state sits behind a shared handle so the renderer can
//! read it when drawing.

use crate::core::StResource;

use super::collaborators::EditorPanel;

/// Cursor edge lengths, in voxels, selectable with the digit keys.
pub const CURSOR_SIZES: [u32; 3] = [1, 2, 3];

/// Plane the draw cursor is aligned to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrientationMode {
    #[default]
    Horizontal,
    Vertical,
}

impl OrientationMode {
    fn toggled(self) -> Self {
        match self {
            OrientationMode::Horizontal => OrientationMode::Vertical,
            OrientationMode::Vertical => OrientationMode::Horizontal,
        }
    }
}

/// Widget state shared between the panel and the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelState {
    /// Show material ids instead of shaded colour
    pub material_view: bool,
    /// Index into [`CURSOR_SIZES`]
    pub cursor_size: usize,
    pub orientation: OrientationMode,
}

impl PanelState {
    /// Cursor edge length in voxels.
    pub fn cursor_edge(&self) -> u32 {
        CURSOR_SIZES[self.cursor_size]
    }
}

impl EditorPanel for StResource<PanelState> {
    fn toggle_material_view(&mut self) -> bool {
        let mut state = self.get_mut();
        state.material_view = !state.material_view;
        log::info!("Material view {}", if state.material_view { "on" } else { "off" });
        true
    }

    fn set_cursor_size(&mut self, index: usize) -> bool {
        if index >= CURSOR_SIZES.len() {
            log::warn!("Ignoring cursor size index {}", index);
            return false;
        }
        let mut state = self.get_mut();
        if state.cursor_size == index {
            return false;
        }
        state.cursor_size = index;
        log::info!("Cursor size {}", CURSOR_SIZES[index]);
        true
    }

    fn toggle_orientation_mode(&mut self) -> bool {
        let mut state = self.get_mut();
        state.orientation = state.orientation.toggled();
        log::info!("Orientation {:?}", state.orientation);
        true
    }

    fn reset(&mut self) {
        *self.get_mut() = PanelState::default();
    }
}
