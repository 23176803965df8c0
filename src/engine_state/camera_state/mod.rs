//! # Camera State Management
//!
//! The camera collaborators of the standalone editor:
//! - `OrbitControls`: Damped orbit/pan/zoom around a target point
//! - `walk::WalkController`: First-person walking over the ground plane
//!
//! ## Damping
//! Pointer and wheel input is accumulated as velocity. Each update applies part of
//! the remaining velocity and keeps the rest, so the camera eases out after the
//! pointer stops. The fraction kept per 1/60 s is `1 - damping`, which makes the
//! motion independent of the frame rate; the total motion always equals the input.

use cgmath::*;

use crate::config::CameraConfig;
use crate::core::StResource;

use super::{
    collaborators::{CameraControls, DragButton},
    input_mode::{CameraInput, PointerPosition},
};

pub mod camera;
pub mod walk;

use camera::{intersect_horizontal_plane, pick_ray, Projection, SAFE_FRAC_PI_2};

/// Below this much remaining velocity the camera is at rest.
const REST_EPSILON: f32 = 1e-4;
const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 200.0;

const INITIAL_TARGET: Point3<f32> = Point3::new(0.0, 1.0, 0.0);
const INITIAL_DISTANCE: f32 = 32.0;
const INITIAL_YAW: Rad<f32> = Rad(std::f32::consts::FRAC_PI_4);
const INITIAL_PITCH: Rad<f32> = Rad(0.6);

/// Orbit camera around a target point.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    target: Point3<f32>,
    yaw: Rad<f32>,
    pitch: Rad<f32>,
    distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
    pan_velocity: Vector3<f32>,
    input: CameraInput,
    settings: CameraConfig,
    projection: Projection,
}

impl OrbitControls {
    pub fn new(settings: CameraConfig, projection: Projection) -> Self {
        Self {
            target: INITIAL_TARGET,
            yaw: INITIAL_YAW,
            pitch: INITIAL_PITCH,
            distance: INITIAL_DISTANCE,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
            pan_velocity: Vector3::zero(),
            input: CameraInput {
                enabled: true,
                enable_pan: false,
                enable_rotate: false,
            },
            settings,
            projection,
        }
    }

    pub fn input(&self) -> CameraInput {
        self.input
    }

    pub fn target(&self) -> Point3<f32> {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Camera position derived from target, angles and distance.
    pub fn eye_position(&self) -> Point3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        self.target
            + Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin) * self.distance
    }

    /// Unit direction from the eye towards the target.
    pub fn view_direction(&self) -> Vector3<f32> {
        (self.target - self.eye_position()).normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye_position(), self.target, Vector3::unit_y())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    /// Point on the plane `y == height` under the pointer.
    pub fn pick_plane(&self, pointer: PointerPosition, height: f32) -> Option<Point3<f32>> {
        let (origin, direction) = pick_ray(self.view_matrix(), &self.projection, pointer)?;
        intersect_horizontal_plane(origin, direction, height)
    }

    pub fn is_moving(&self) -> bool {
        self.yaw_velocity != 0.0
            || self.pitch_velocity != 0.0
            || self.zoom_velocity != 0.0
            || self.pan_velocity != Vector3::zero()
    }

    fn stop(&mut self) {
        self.yaw_velocity = 0.0;
        self.pitch_velocity = 0.0;
        self.zoom_velocity = 0.0;
        self.pan_velocity = Vector3::zero();
    }

    fn pan_by(&mut self, (dx, dy): (f64, f64)) {
        // screen drag moves the target across the ground, scaled by distance
        let scale = self.settings.pan_sensitivity * self.distance;
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos);
        let towards_eye = Vector3::new(yaw_cos, 0.0, yaw_sin);
        self.pan_velocity += right * (dx as f32 * scale) + towards_eye * (dy as f32 * scale);
    }
}

/// Splits `velocity` into the part applied this update and the part kept.
fn damp(velocity: f32, retain: f32) -> (f32, f32) {
    let kept = velocity * retain;
    if kept.abs() < REST_EPSILON {
        (velocity, 0.0)
    } else {
        (velocity - kept, kept)
    }
}

impl CameraControls for StResource<OrbitControls> {
    fn apply_input(&mut self, input: CameraInput) {
        let mut controls = self.get_mut();
        controls.input = input;
        if !input.enabled {
            controls.stop();
        }
    }

    fn update(&mut self, delta: f32) -> bool {
        let mut controls = self.get_mut();
        if delta <= 0.0 || !controls.is_moving() {
            return false;
        }
        let retain = (1.0 - controls.settings.damping.clamp(0.0, 1.0)).powf(delta * 60.0);

        let (yaw, yaw_kept) = damp(controls.yaw_velocity, retain);
        let (pitch, pitch_kept) = damp(controls.pitch_velocity, retain);
        let (zoom, zoom_kept) = damp(controls.zoom_velocity, retain);
        let pan_kept = controls.pan_velocity * retain;
        let (pan, pan_kept) = if pan_kept.magnitude() < REST_EPSILON {
            (controls.pan_velocity, Vector3::zero())
        } else {
            (controls.pan_velocity - pan_kept, pan_kept)
        };

        controls.yaw_velocity = yaw_kept;
        controls.pitch_velocity = pitch_kept;
        controls.zoom_velocity = zoom_kept;
        controls.pan_velocity = pan_kept;

        controls.yaw += Rad(yaw);
        controls.pitch = Rad((controls.pitch.0 + pitch).clamp(0.05, SAFE_FRAC_PI_2));
        controls.distance = (controls.distance * zoom.exp()).clamp(MIN_DISTANCE, MAX_DISTANCE);
        controls.target += pan;
        true
    }

    fn pointer_moved(&mut self, (dx, dy): (f64, f64), button: DragButton) -> bool {
        let mut controls = self.get_mut();
        if !controls.input.enabled {
            return false;
        }
        match button {
            DragButton::Primary if controls.input.enable_rotate => {
                let sensitivity = controls.settings.rotate_sensitivity;
                controls.yaw_velocity += dx as f32 * sensitivity;
                controls.pitch_velocity += dy as f32 * sensitivity;
                true
            }
            DragButton::Secondary if controls.input.enable_pan => {
                controls.pan_by((dx, dy));
                true
            }
            _ => false,
        }
    }

    fn zoom(&mut self, amount: f32) -> bool {
        let mut controls = self.get_mut();
        if !controls.input.enabled || amount == 0.0 {
            return false;
        }
        controls.zoom_velocity += amount * controls.settings.zoom_sensitivity;
        true
    }

    fn reset(&mut self) {
        let mut controls = self.get_mut();
        let (settings, projection) = (controls.settings, controls.projection);
        *controls = OrbitControls::new(settings, projection);
    }
}
