//! # Camera Implementation
//!
//! View and projection math shared by the orbit controls, the walk controller and
//! the brush's pointer picking.
//!
//! ## Key Components
//! - `Camera`: A first-person position plus yaw/pitch
//! - `Projection`: Perspective projection for the current viewport
//! - `pick_ray` / `intersect_horizontal_plane`: Screen-to-world picking

use cgmath::*;
use std::f32::consts::FRAC_PI_2;

use crate::engine_state::input_mode::PointerPosition;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// NDC depth in WGPU ranges from 0 to 1 instead of -1 to 1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,  // Scale Z from [-1,1] to [-0.5,0.5]
    0.0, 0.0, 0.5, 1.0,  // Translate Z from [-0.5,0.5] to [0,1]
);

/// Safe limit for pitch to prevent gimbal lock
pub const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// A first-person camera in 3D space.
///
/// `yaw` is measured from +X towards +Z, `pitch` upwards from the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        };
        camera.clamp_pitch();
        camera
    }

    /// Normalized direction the camera faces.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// Forward direction flattened onto the ground plane.
    pub fn ground_forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        Vector3::new(yaw_cos, 0.0, yaw_sin)
    }

    /// Right direction on the ground plane.
    pub fn ground_right(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        Vector3::new(-yaw_sin, 0.0, yaw_cos)
    }

    /// Turns the camera, keeping pitch within the safe range.
    pub fn rotate(&mut self, yaw: Rad<f32>, pitch: Rad<f32>) {
        self.yaw += yaw;
        self.pitch += pitch;
        self.clamp_pitch();
    }

    fn clamp_pitch(&mut self) {
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }

    /// View matrix transforming world space into camera space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }
}

/// Perspective projection for the current viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    width: u32,
    height: u32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect(), self.znear, self.zfar)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(800, 600, Deg(60.0), 0.1, 1000.0)
    }
}

/// World-space ray through a pointer position, as origin and normalized direction.
///
/// Returns `None` when the view-projection matrix is singular.
pub fn pick_ray(
    view: Matrix4<f32>,
    projection: &Projection,
    pointer: PointerPosition,
) -> Option<(Point3<f32>, Vector3<f32>)> {
    let inverse = (projection.calc_matrix() * view).invert()?;

    let ndc_x = (2.0 * pointer.x / projection.width() as f64 - 1.0) as f32;
    let ndc_y = (1.0 - 2.0 * pointer.y / projection.height() as f64) as f32;

    let near = inverse * Vector4::new(ndc_x, ndc_y, 0.0, 1.0);
    let far = inverse * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);
    if near.w == 0.0 || far.w == 0.0 {
        return None;
    }
    let near = Point3::from_homogeneous(near);
    let far = Point3::from_homogeneous(far);

    let direction = far - near;
    if direction.magnitude2() == 0.0 {
        return None;
    }
    Some((near, direction.normalize()))
}

/// Where a ray meets the plane `y == height`, if it does so in front of the origin.
pub fn intersect_horizontal_plane(
    origin: Point3<f32>,
    direction: Vector3<f32>,
    height: f32,
) -> Option<Point3<f32>> {
    if direction.y.abs() < f32::EPSILON {
        return None;
    }
    let t = (height - origin.y) / direction.y;
    (t >= 0.0).then(|| origin + direction * t)
}
