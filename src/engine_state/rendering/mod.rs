//! Rendering for the standalone editor.
//!
//! A single clear pass over the window surface. The clear colour follows the
//! panel state so material view, orientation and cursor size changes are visible
//! on screen, and is shaded by the direction of whichever camera owns the view.

use cgmath::Vector3;
use log::{debug, error, warn};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};

use crate::core::StResource;

use super::{
    camera_state::{walk::WalkController, OrbitControls},
    collaborators::Renderer,
    panel::{OrientationMode, PanelState, CURSOR_SIZES},
};

/// Cameras the renderer looks through.
pub struct ViewCameras {
    pub orbit: StResource<OrbitControls>,
    pub walk: StResource<WalkController>,
}

impl ViewCameras {
    /// Viewing direction of the walker while walking, of the orbit camera otherwise.
    pub fn view_direction(&self) -> Vector3<f32> {
        let walk = self.walk.get();
        if walk.is_active() {
            walk.camera().forward()
        } else {
            self.orbit.get().view_direction()
        }
    }
}

/// Owns the surface and draws one frame per [`Renderer::render`] call.
pub struct SurfaceRenderer {
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    device: Device,
    queue: Queue,
    panel: StResource<PanelState>,
    cameras: ViewCameras,
}

impl SurfaceRenderer {
    /// Takes over an already configured surface.
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        panel: StResource<PanelState>,
        cameras: ViewCameras,
    ) -> Self {
        Self {
            surface,
            surface_config,
            device,
            queue,
            panel,
            cameras,
        }
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    fn acquire_frame(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Some(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                self.reconfigure();
                self.surface.get_current_texture().ok()
            }
            Err(wgpu::SurfaceError::Timeout) => {
                debug!("Surface timed out, skipping frame");
                None
            }
            Err(err) => {
                error!("Error getting current frame: {:?}", err);
                None
            }
        }
    }
}

impl Renderer for SurfaceRenderer {
    fn render(&mut self) {
        let Some(frame) = self.acquire_frame() else {
            return;
        };
        let clear = clear_color(&self.panel.get(), self.cameras.view_direction());

        let view = frame.texture.create_view(&Default::default());
        let mut encoder = self.device.create_command_encoder(&Default::default());
        {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("editor_clear_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
    }

    fn resize(&mut self, width: u32, height: u32) {
        // zero-sized surfaces are invalid
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.reconfigure();
    }
}

/// Background colour for the current panel state, seen along `direction`.
///
/// Looking up brightens the colour and looking down darkens it; facing +X warms it.
pub fn clear_color(panel: &PanelState, direction: Vector3<f32>) -> wgpu::Color {
    let (r, g, b) = if panel.material_view {
        (0.08, 0.05, 0.12)
    } else {
        (0.45, 0.65, 0.9)
    };
    let green_shift = match panel.orientation {
        OrientationMode::Horizontal => 0.0,
        OrientationMode::Vertical => 0.08,
    };
    let brightness = 1.0 + 0.1 * (panel.cursor_size as f64 / (CURSOR_SIZES.len() - 1) as f64);
    let shade = brightness * (0.85 + 0.15 * direction.y as f64);
    let warmth = 0.04 * direction.x as f64;

    wgpu::Color {
        r: ((r + warmth) * shade).clamp(0.0, 1.0),
        g: ((g + green_shift) * shade).clamp(0.0, 1.0),
        b: (b * shade).clamp(0.0, 1.0),
        a: 1.0,
    }
}
