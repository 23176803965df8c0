//! # Input Mode Arbitration
//!
//! Exactly one movement mode is active at a time:
//! - `Orbit`: default. The camera only zooms and settles, and left drags draw.
//! - `Pan`: the pan modifier is held. Left drags pan and rotate the camera.
//! - `Walk`: first-person movement. Camera controls are disabled entirely.
//!
//! Drawing is an overlay on top of `Orbit`: a drag may only start a stroke while
//! neither Pan nor Walk is active. A stroke that is already running keeps going
//! until its drag ends, even if the movement mode changes underneath it.

/// The interaction mode as seen by the camera adapter and the draw gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Orbit,
    Pan,
    Walk,
    Draw,
}

/// Screen-space pointer position in physical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One phase of a pointer drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerGesture {
    DragStart(PointerPosition),
    DragMove(PointerPosition),
    DragEnd(PointerPosition),
}

/// What the draw tool should do in response to a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawAction {
    Begin(PointerPosition),
    Extend(PointerPosition),
    Finish(PointerPosition),
}

/// Camera control flags derived from the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraInput {
    /// Whether the controls react to input and damping at all
    pub enabled: bool,
    pub enable_pan: bool,
    pub enable_rotate: bool,
}

impl CameraInput {
    /// Maps a mode onto the camera controls.
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Orbit | Mode::Draw => Self {
                enabled: true,
                enable_pan: false,
                enable_rotate: false,
            },
            Mode::Pan => Self {
                enabled: true,
                enable_pan: true,
                enable_rotate: true,
            },
            Mode::Walk => Self {
                enabled: false,
                enable_pan: false,
                enable_rotate: false,
            },
        }
    }
}

/// A movement-mode change that was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: Mode,
    pub to: Mode,
}

impl ModeTransition {
    pub fn entered_walk(&self) -> bool {
        self.to == Mode::Walk && self.from != Mode::Walk
    }

    pub fn left_walk(&self) -> bool {
        self.from == Mode::Walk && self.to != Mode::Walk
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Movement {
    Orbit,
    Pan,
    Walk,
}

impl From<Movement> for Mode {
    fn from(movement: Movement) -> Self {
        match movement {
            Movement::Orbit => Mode::Orbit,
            Movement::Pan => Mode::Pan,
            Movement::Walk => Mode::Walk,
        }
    }
}

/// State machine arbitrating the active input mode.
#[derive(Debug)]
pub struct InputModeController {
    movement: Movement,
    drawing: bool,
}

impl InputModeController {
    /// Starts in `Orbit` with no stroke.
    pub fn new() -> Self {
        Self {
            movement: Movement::Orbit,
            drawing: false,
        }
    }

    /// The effective mode. `Draw` is only reported on top of `Orbit`.
    pub fn mode(&self) -> Mode {
        if self.drawing && self.movement == Movement::Orbit {
            Mode::Draw
        } else {
            self.movement.into()
        }
    }

    pub fn is_walking(&self) -> bool {
        self.movement == Movement::Walk
    }

    pub fn is_panning(&self) -> bool {
        self.movement == Movement::Pan
    }

    /// Whether a stroke is in progress, regardless of the movement mode.
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Camera flags for the current mode.
    pub fn camera_input(&self) -> CameraInput {
        CameraInput::for_mode(self.mode())
    }

    /// Enters Walk, or leaves it back to Orbit.
    pub fn toggle_walk(&mut self) -> ModeTransition {
        let from = self.mode();
        self.movement = match self.movement {
            Movement::Walk => Movement::Orbit,
            Movement::Orbit | Movement::Pan => Movement::Walk,
        };
        let to = self.mode();
        log::info!("Input mode {:?} -> {:?}", from, to);
        ModeTransition { from, to }
    }

    /// The pan modifier went down. Ignored while walking or already panning.
    pub fn press_pan_modifier(&mut self) -> Option<ModeTransition> {
        match self.movement {
            Movement::Orbit => {
                let from = self.mode();
                self.movement = Movement::Pan;
                Some(ModeTransition {
                    from,
                    to: self.mode(),
                })
            }
            Movement::Pan => None,
            Movement::Walk => {
                log::debug!("Pan modifier ignored while walking");
                None
            }
        }
    }

    /// The pan modifier came up. Only meaningful while panning.
    pub fn release_pan_modifier(&mut self) -> Option<ModeTransition> {
        if self.movement != Movement::Pan {
            return None;
        }
        self.movement = Movement::Orbit;
        Some(ModeTransition {
            from: Mode::Pan,
            to: self.mode(),
        })
    }

    /// Runs a pointer gesture through the draw gate.
    ///
    /// Returns `None` when the gesture is dropped.
    pub fn gesture(&mut self, gesture: PointerGesture) -> Option<DrawAction> {
        match gesture {
            PointerGesture::DragStart(at) => {
                if self.movement != Movement::Orbit || self.drawing {
                    log::debug!("Drag start ignored in {:?}", self.mode());
                    return None;
                }
                self.drawing = true;
                Some(DrawAction::Begin(at))
            }
            PointerGesture::DragMove(at) => self.drawing.then_some(DrawAction::Extend(at)),
            PointerGesture::DragEnd(at) => {
                if !self.drawing {
                    return None;
                }
                self.drawing = false;
                Some(DrawAction::Finish(at))
            }
        }
    }
}

impl Default for InputModeController {
    fn default() -> Self {
        Self::new()
    }
}
