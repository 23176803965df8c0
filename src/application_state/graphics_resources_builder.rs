//! # Graphics Resources Builder
//!
//! Creates the window, surface and device the editor renders with.
//!
//! The main components are:
//! - `Graphics`: The initialized graphics resources
//! - `GraphicsBuilder`: Runs the asynchronous initialization and sends the result
//!   back through the event loop
//! - `MaybeGraphics`: Where initialization currently stands

use std::future::Future;
use std::sync::Arc;

use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

use crate::error::StartupError;
use crate::{CANVAS_ID, PANEL_ID};

/// Everything rendering needs, ready to use.
pub struct Graphics {
    pub window: Arc<Window>,
    pub surface: Surface<'static>,
    pub surface_config: SurfaceConfiguration,
    pub device: Device,
    pub queue: Queue,
}

/// What the builder sends back to the event loop.
pub type GraphicsResult = Result<Graphics, StartupError>;

/// Finds the canvas the editor renders into, checking the UI panel is present too.
///
/// `lookup` resolves a page element by id.
#[cfg_attr(not(target_family = "wasm"), allow(dead_code))]
pub fn require_elements<T>(lookup: impl Fn(&str) -> Option<T>) -> Result<T, StartupError> {
    let canvas =
        lookup(CANVAS_ID).ok_or_else(|| StartupError::MissingCanvas(CANVAS_ID.to_string()))?;
    if lookup(PANEL_ID).is_none() {
        return Err(StartupError::MissingPanel(PANEL_ID.to_string()));
    }
    Ok(canvas)
}

/// Creates the window and surface, the synchronous half of startup.
fn create_window_and_surface(
    event_loop: &ActiveEventLoop,
) -> Result<(Arc<Window>, wgpu::Instance, Surface<'static>), StartupError> {
    #[allow(unused_mut)]
    let mut window_attrs = Window::default_attributes().with_title("Voxel Editor");

    #[cfg(target_family = "wasm")]
    {
        use wasm_bindgen::UnwrapThrowExt;
        use web_sys::wasm_bindgen::JsCast;
        use winit::platform::web::WindowAttributesExtWebSys;

        let window = web_sys::window().unwrap_throw();
        let document = window.document().unwrap_throw();
        let canvas = require_elements(|id| document.get_element_by_id(id))?;
        let html_canvas_element = canvas.unchecked_into();
        window_attrs = window_attrs.with_canvas(Some(html_canvas_element));
    }

    let window = Arc::new(
        event_loop
            .create_window(window_attrs)
            .map_err(StartupError::CreateWindow)?,
    );

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        #[cfg(not(target_family = "wasm"))]
        backends: wgpu::Backends::PRIMARY,
        #[cfg(target_family = "wasm")]
        backends: wgpu::Backends::GL | wgpu::Backends::BROWSER_WEBGPU,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance
        .create_surface(window.clone())
        .map_err(StartupError::CreateSurface)?;

    Ok((window, instance, surface))
}

/// Asynchronously creates and configures all graphics resources.
fn create_graphics(event_loop: &ActiveEventLoop) -> impl Future<Output = GraphicsResult> + 'static {
    let prepared = create_window_and_surface(event_loop);

    async move {
        let (window, instance, surface) = prepared?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(StartupError::NoAdapter)?;

        let required_limits = if cfg!(target_family = "wasm") {
            wgpu::Limits::downlevel_webgl2_defaults()
        } else {
            wgpu::Limits::default()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits,
                label: None,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(StartupError::RequestDevice)?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(StartupError::UnsupportedSurface)?;
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        log::info!(
            "Graphics ready: {:?}, {}x{}",
            adapter.get_info().backend,
            surface_config.width,
            surface_config.height
        );

        Ok(Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
        })
    }
}

/// Runs graphics initialization once and sends the result to the event loop.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<GraphicsResult>>,
}

/// Where graphics initialization stands.
pub enum MaybeGraphics {
    /// Waiting for the event loop to resume
    Builder(GraphicsBuilder),
    /// Resources were handed to the editor, or startup failed
    Moved,
}

impl GraphicsBuilder {
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsResult>) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
        }
    }

    /// Starts initialization. Later calls do nothing.
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            // event_loop_proxy is already spent - we already constructed Graphics
            return;
        };

        #[cfg(target_family = "wasm")]
        {
            let gfx_fut = create_graphics(event_loop);
            wasm_bindgen_futures::spawn_local(async move {
                let gfx = gfx_fut.await;
                if event_loop_proxy.send_event(gfx).is_err() {
                    log::error!("Event loop closed before graphics were ready");
                }
            });
        }

        #[cfg(not(target_family = "wasm"))]
        {
            let gfx = pollster::block_on(create_graphics(event_loop));
            if event_loop_proxy.send_event(gfx).is_err() {
                log::error!("Event loop closed before graphics were ready");
            }
        }
    }
}
