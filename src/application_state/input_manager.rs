//! # Input Manager
//!
//! Translates window events into [`EditorInput`]s and tracks the state that lives
//! between events:
//! - keys currently held, for movement intent and focus-loss release
//! - modifier keys, attached to every key chord
//! - the cursor position and mouse buttons, for drag gestures

use std::collections::HashSet;

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
};

use crate::engine_state::{
    collaborators::{DragButton, MovementIntent},
    commands::KeyChord,
    input_mode::{PointerGesture, PointerPosition},
};

use super::input_state::{EditorInput, ModifierKeys, PointerState};

/// Pixels per wheel line when the platform reports pixel deltas.
const PIXELS_PER_LINE: f32 = 100.0;

/// Tracks held input and turns window events into editor input.
#[derive(Debug, Default)]
pub struct InputManager {
    held_keys: HashSet<KeyCode>,
    modifiers: ModifierKeys,
    pointer: PointerState,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a window event, returning what the editor should see of it.
    pub fn intake_input(&mut self, event: &WindowEvent) -> Option<EditorInput> {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        repeat,
                        ..
                    },
                ..
            } => self.key_input(*key, *state, *repeat),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers_changed(modifiers.state());
                None
            }
            WindowEvent::MouseInput { button, state, .. } => self.mouse_button(*button, *state),
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(*position),
            WindowEvent::CursorLeft { .. } => {
                self.pointer.position = None;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => self.wheel(*delta),
            _ => None,
        }
    }

    pub fn key_input(&mut self, code: KeyCode, state: ElementState, repeat: bool) -> Option<EditorInput> {
        match state {
            ElementState::Pressed => {
                self.held_keys.insert(code);
                Some(EditorInput::KeyDown(KeyChord {
                    code,
                    ctrl: self.modifiers.ctrl,
                    shift: self.modifiers.shift,
                    repeat,
                }))
            }
            ElementState::Released => {
                self.held_keys.remove(&code).then_some(EditorInput::KeyUp(code))
            }
        }
    }

    pub fn modifiers_changed(&mut self, state: ModifiersState) {
        self.modifiers = ModifierKeys {
            ctrl: state.control_key() || state.super_key(),
            shift: state.shift_key(),
        };
    }

    pub fn mouse_button(&mut self, button: MouseButton, state: ElementState) -> Option<EditorInput> {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => {
                if self.pointer.primary == pressed {
                    return None;
                }
                self.pointer.primary = pressed;
                let at = self.pointer.position?;
                Some(EditorInput::Gesture(if pressed {
                    PointerGesture::DragStart(at)
                } else {
                    PointerGesture::DragEnd(at)
                }))
            }
            MouseButton::Right => {
                self.pointer.secondary = pressed;
                None
            }
            _ => None,
        }
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> Option<EditorInput> {
        let at = PointerPosition::new(position.x, position.y);
        self.pointer.position = Some(at);
        self.pointer
            .primary
            .then_some(EditorInput::Gesture(PointerGesture::DragMove(at)))
    }

    pub fn wheel(&mut self, delta: MouseScrollDelta) -> Option<EditorInput> {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
        };
        (lines != 0.0).then_some(EditorInput::Scroll(-lines))
    }

    /// The button a raw mouse-motion delta is dragging with.
    pub fn held_button(&self) -> Option<DragButton> {
        self.pointer.held_button()
    }

    /// Walk keys currently held.
    pub fn movement_intent(&self) -> MovementIntent {
        let held = |code| self.held_keys.contains(&code);
        MovementIntent {
            forward: held(KeyCode::KeyW),
            backward: held(KeyCode::KeyS),
            left: held(KeyCode::KeyA),
            right: held(KeyCode::KeyD),
            up: held(KeyCode::Space),
            down: held(KeyCode::ShiftLeft),
        }
    }

    /// Releases everything held, returning the releases the editor must see.
    ///
    /// Called when the window loses focus, since the matching release events
    /// will never arrive.
    pub fn reset_inputs(&mut self) -> Vec<EditorInput> {
        let mut released: Vec<EditorInput> =
            self.held_keys.drain().map(EditorInput::KeyUp).collect();

        if self.pointer.primary {
            if let Some(at) = self.pointer.position {
                released.push(EditorInput::Gesture(PointerGesture::DragEnd(at)));
            }
        }
        self.pointer.primary = false;
        self.pointer.secondary = false;
        self.modifiers = ModifierKeys::default();
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, y: f64) -> PhysicalPosition<f64> {
        PhysicalPosition::new(x, y)
    }

    #[test]
    fn chords_carry_modifiers_and_repeat() {
        let mut input = InputManager::new();
        input.modifiers_changed(ModifiersState::CONTROL | ModifiersState::SHIFT);

        assert_eq!(
            input.key_input(KeyCode::KeyZ, ElementState::Pressed, true),
            Some(EditorInput::KeyDown(
                KeyChord::press(KeyCode::KeyZ).with_ctrl().with_shift().repeated()
            ))
        );
    }

    #[test]
    fn command_key_counts_as_ctrl() {
        let mut input = InputManager::new();
        input.modifiers_changed(ModifiersState::SUPER);
        let Some(EditorInput::KeyDown(chord)) =
            input.key_input(KeyCode::Backspace, ElementState::Pressed, false)
        else {
            panic!("expected a key chord");
        };
        assert!(chord.ctrl);
    }

    #[test]
    fn release_without_press_is_dropped() {
        let mut input = InputManager::new();
        assert_eq!(input.key_input(KeyCode::KeyW, ElementState::Released, false), None);

        input.key_input(KeyCode::KeyW, ElementState::Pressed, false);
        assert_eq!(
            input.key_input(KeyCode::KeyW, ElementState::Released, false),
            Some(EditorInput::KeyUp(KeyCode::KeyW))
        );
    }

    #[test]
    fn primary_button_drives_drag_gestures() {
        let mut input = InputManager::new();
        assert_eq!(input.cursor_moved(at(5.0, 6.0)), None);

        let start = PointerPosition::new(5.0, 6.0);
        assert_eq!(
            input.mouse_button(MouseButton::Left, ElementState::Pressed),
            Some(EditorInput::Gesture(PointerGesture::DragStart(start)))
        );
        assert_eq!(
            input.cursor_moved(at(7.0, 8.0)),
            Some(EditorInput::Gesture(PointerGesture::DragMove(
                PointerPosition::new(7.0, 8.0)
            )))
        );
        assert_eq!(
            input.mouse_button(MouseButton::Left, ElementState::Released),
            Some(EditorInput::Gesture(PointerGesture::DragEnd(
                PointerPosition::new(7.0, 8.0)
            )))
        );
        assert_eq!(input.cursor_moved(at(9.0, 9.0)), None);
    }

    #[test]
    fn secondary_button_only_sets_the_drag_button() {
        let mut input = InputManager::new();
        input.cursor_moved(at(1.0, 1.0));
        assert_eq!(input.mouse_button(MouseButton::Right, ElementState::Pressed), None);
        assert_eq!(input.held_button(), Some(DragButton::Secondary));
        assert_eq!(input.cursor_moved(at(2.0, 2.0)), None);
    }

    #[test]
    fn wheel_down_zooms_out() {
        let mut input = InputManager::new();
        assert_eq!(
            input.wheel(MouseScrollDelta::LineDelta(0.0, -2.0)),
            Some(EditorInput::Scroll(2.0))
        );
        assert_eq!(
            input.wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 50.0))),
            Some(EditorInput::Scroll(-0.5))
        );
        assert_eq!(input.wheel(MouseScrollDelta::LineDelta(3.0, 0.0)), None);
    }

    #[test]
    fn movement_follows_held_keys() {
        let mut input = InputManager::new();
        input.key_input(KeyCode::KeyW, ElementState::Pressed, false);
        input.key_input(KeyCode::ShiftLeft, ElementState::Pressed, false);
        let intent = input.movement_intent();
        assert!(intent.forward && intent.down);
        assert!(!intent.backward && !intent.up);
    }

    #[test]
    fn focus_loss_releases_keys_and_ends_the_drag() {
        let mut input = InputManager::new();
        input.cursor_moved(at(3.0, 4.0));
        input.key_input(KeyCode::Space, ElementState::Pressed, false);
        input.mouse_button(MouseButton::Left, ElementState::Pressed);

        let released = input.reset_inputs();
        assert!(released.contains(&EditorInput::KeyUp(KeyCode::Space)));
        assert_eq!(
            released.last(),
            Some(&EditorInput::Gesture(PointerGesture::DragEnd(
                PointerPosition::new(3.0, 4.0)
            )))
        );
        assert!(!input.movement_intent().any());
        assert_eq!(input.held_button(), None);
        assert!(input.reset_inputs().is_empty());
    }
}
