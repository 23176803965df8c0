//! # Input State
//!
//! The editor-level inputs the input manager produces from window events, and the
//! pointer and modifier state it tracks between events.

use winit::keyboard::KeyCode;

use crate::engine_state::{
    collaborators::DragButton,
    commands::KeyChord,
    input_mode::{PointerGesture, PointerPosition},
};

/// One window event translated for the editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorInput {
    KeyDown(KeyChord),
    KeyUp(KeyCode),
    Gesture(PointerGesture),
    /// Positive zooms out
    Scroll(f32),
}

/// Modifier keys as of the last modifiers-changed event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierKeys {
    /// Control, or the platform's command key
    pub ctrl: bool,
    pub shift: bool,
}

/// Cursor position and the mouse buttons the editor cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Last cursor position inside the window, in physical pixels
    pub position: Option<PointerPosition>,
    pub primary: bool,
    pub secondary: bool,
}

impl PointerState {
    /// The button driving a camera drag, primary first.
    pub fn held_button(&self) -> Option<DragButton> {
        if self.primary {
            Some(DragButton::Primary)
        } else if self.secondary {
            Some(DragButton::Secondary)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_wins_over_secondary() {
        let mut pointer = PointerState::default();
        assert_eq!(pointer.held_button(), None);

        pointer.secondary = true;
        assert_eq!(pointer.held_button(), Some(DragButton::Secondary));

        pointer.primary = true;
        assert_eq!(pointer.held_button(), Some(DragButton::Primary));
    }
}
