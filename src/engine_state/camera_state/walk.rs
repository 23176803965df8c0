//! First-person walking over flat ground.
//!
//! There is no collision against voxels: the walker stands on the top face of
//! the ground layer, can jump, and crouches while the down key is held. The
//! renderer reads the walker's camera while walk mode is active.

use cgmath::*;

use crate::config::WalkConfig;
use crate::core::StResource;
use crate::engine_state::collaborators::{MovementIntent, WalkSimulation};

use super::camera::Camera;

/// Height of the ground layer's top face.
pub const GROUND_HEIGHT: f32 = 1.0;
pub const EYE_HEIGHT: f32 = 1.6;
pub const CROUCH_EYE_HEIGHT: f32 = 1.0;
const GRAVITY: f32 = 20.0;
const JUMP_SPEED: f32 = 7.0;

/// Spawn point, eyes at standing height above the origin.
pub fn spawn_camera() -> Camera {
    Camera::new(
        Point3::new(0.5, GROUND_HEIGHT + EYE_HEIGHT, 0.5),
        Deg(0.0),
        Deg(0.0),
    )
}

#[derive(Debug, Clone)]
pub struct WalkController {
    camera: Camera,
    vertical_velocity: f32,
    movement: MovementIntent,
    active: bool,
    settings: WalkConfig,
}

impl WalkController {
    pub fn new(settings: WalkConfig) -> Self {
        Self {
            camera: spawn_camera(),
            vertical_velocity: 0.0,
            movement: MovementIntent::default(),
            active: false,
            settings,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn floor(&self) -> f32 {
        let eye = if self.movement.down {
            CROUCH_EYE_HEIGHT
        } else {
            EYE_HEIGHT
        };
        GROUND_HEIGHT + eye
    }

    fn grounded(&self) -> bool {
        self.camera.position.y <= self.floor() && self.vertical_velocity <= 0.0
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    positive as i32 as f32 - negative as i32 as f32
}

impl WalkController {
    fn activate(&mut self, active: bool) {
        self.active = active;
        self.movement = MovementIntent::default();
        self.vertical_velocity = 0.0;
    }

    fn look_by(&mut self, (dx, dy): (f64, f64)) -> bool {
        if !self.active {
            return false;
        }
        let sensitivity = self.settings.look_sensitivity;
        self.camera
            .rotate(Rad(dx as f32 * sensitivity), Rad(-dy as f32 * sensitivity));
        true
    }

    fn advance(&mut self, dt: f32) -> bool {
        if !self.active || dt <= 0.0 {
            return false;
        }
        let before = self.camera.position;

        let wish = self.camera.ground_forward()
            * axis(self.movement.forward, self.movement.backward)
            + self.camera.ground_right() * axis(self.movement.right, self.movement.left);
        if wish.magnitude2() > 0.0 {
            self.camera.position += wish.normalize() * self.settings.speed * dt;
        }

        if self.movement.up && self.grounded() {
            self.vertical_velocity = JUMP_SPEED;
        }
        self.vertical_velocity -= GRAVITY * dt;
        self.camera.position.y += self.vertical_velocity * dt;

        let floor = self.floor();
        if self.camera.position.y <= floor {
            self.camera.position.y = floor;
            self.vertical_velocity = 0.0;
        }

        self.camera.position != before
    }
}

impl WalkSimulation for StResource<WalkController> {
    fn set_active(&mut self, active: bool) {
        self.get_mut().activate(active);
    }

    fn set_movement(&mut self, intent: MovementIntent) {
        let mut walk = self.get_mut();
        if walk.active {
            walk.movement = intent;
        }
    }

    fn look(&mut self, delta: (f64, f64)) -> bool {
        self.get_mut().look_by(delta)
    }

    fn step(&mut self, dt: f32) -> bool {
        self.get_mut().advance(dt)
    }

    fn reset(&mut self) {
        let mut walk = self.get_mut();
        let settings = walk.settings;
        *walk = WalkController::new(settings);
    }
}
