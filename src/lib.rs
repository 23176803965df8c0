#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Editor
//!
//! The interaction core of a browser-and-desktop voxel editor, built with Rust,
//! winit and WGPU.
//!
//! The editor decides when to render, in which order chunks load, how keyboard
//! chords become commands, and which of orbit, pan, walk or draw owns the pointer.
//! Everything it does not own (the voxel world, storage, camera, walk simulation,
//! draw tool, UI panel and renderer) sits behind the traits in
//! `engine_state::collaborators`.
//!
//! ## Key Modules
//!
//! * `application_state` - winit event loop shell, graphics startup and input translation
//! * `engine_state` - The editor core plus the reference collaborators
//! * `config` - JSON configuration
//! * `core` - Shared single-threaded resource handles
//!
//! ## Usage
//!
//! ```ignore
//! // Native application initialization
//! fn main() {
//!     voxel_editor::run();
//! }
//! ```
//!
//! For web builds, JavaScript calls the exported `run_web` once the page holding
//! the `wgpu-canvas` canvas and the `ui-panel` element has loaded.

use application_state::{
    graphics_resources_builder::{GraphicsBuilder, GraphicsResult, MaybeGraphics},
    ApplicationState,
};
#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::wasm_bindgen;

use winit::event_loop::EventLoop;

use config::EditorConfig;

mod application_state;
pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

/// Id of the canvas the editor renders into.
const CANVAS_ID: &str = "wgpu-canvas";

/// Id of the element hosting the UI panel.
const PANEL_ID: &str = "ui-panel";

fn init_logger(config: &EditorConfig) {
    cfg_if::cfg_if! {
        if #[cfg(target_family = "wasm")] {
            let _ = config;
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if console_log::init_with_level(log::Level::Info).is_err() {
                web_sys::console::warn_1(&"Logger was already initialized".into());
            }
        } else {
            let mut log_builder = env_logger::Builder::new();
            log_builder.target(env_logger::Target::Stdout);
            if let Some(filter) = &config.log_filter {
                log_builder.parse_filters(filter);
            }
            log_builder.parse_env("RUST_LOG").init();
        }
    }
    log::info!("Logger initialized");
}

fn build_event_loop() -> Option<EventLoop<GraphicsResult>> {
    match EventLoop::with_user_event().build() {
        Ok(event_loop) => Some(event_loop),
        Err(err) => {
            log::error!("Failed to create event loop: {}", err);
            None
        }
    }
}

/// Runs the editor in a native window until it is closed.
#[cfg(not(target_family = "wasm"))]
pub fn run() {
    let config = match EditorConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            env_logger::Builder::new()
                .target(env_logger::Target::Stdout)
                .parse_env("RUST_LOG")
                .init();
            log::error!("Editor failed to start: {}", err);
            return;
        }
    };
    init_logger(&config);

    let Some(event_loop) = build_event_loop() else {
        return;
    };
    let mut state = ApplicationState::new(
        MaybeGraphics::Builder(GraphicsBuilder::new(event_loop.create_proxy())),
        config,
    );

    if let Err(err) = event_loop.run_app(&mut state) {
        log::error!("Event loop failed: {}", err);
    }
}

/// Starts the editor inside the page's canvas.
#[cfg(target_family = "wasm")]
#[wasm_bindgen]
pub fn run_web() {
    use winit::platform::web::EventLoopExtWebSys;

    let config = EditorConfig::default();
    init_logger(&config);

    let Some(event_loop) = build_event_loop() else {
        return;
    };
    let state = ApplicationState::new(
        MaybeGraphics::Builder(GraphicsBuilder::new(event_loop.create_proxy())),
        config,
    );

    event_loop.spawn_app(state);
}
