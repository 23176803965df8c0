//! Fatal startup failures.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that stops the editor from starting.
///
/// Startup never leaves a half-wired editor behind: the first failure aborts and
/// the event loop exits after logging it.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("viewport canvas `{0}` not found in the document")]
    MissingCanvas(String),
    #[error("UI panel element `{0}` not found in the document")]
    MissingPanel(String),
    #[error("failed to create window: {0}")]
    CreateWindow(#[source] winit::error::OsError),
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[source] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter: {0}")]
    NoAdapter(#[source] wgpu::RequestAdapterError),
    #[error("failed to acquire graphics device: {0}")]
    RequestDevice(#[source] wgpu::RequestDeviceError),
    #[error("surface does not support the adapter")]
    UnsupportedSurface,
    #[error("failed to read config file {path:?}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config file {path:?}: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
