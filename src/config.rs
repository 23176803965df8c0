//! # Editor Configuration
//!
//! Tunables for the reference collaborators and the pan modifier key. Every field
//! has a default, so an empty JSON object is a valid configuration.
//!
//! Native builds read the JSON file named by [`CONFIG_ENV_VAR`]; web builds always
//! use the defaults.

use std::path::Path;

use cgmath::Point3;
use serde::Deserialize;
use winit::keyboard::KeyCode;

use crate::engine_state::chunk_scheduler::ChunkCoordinate;
use crate::error::StartupError;

/// Environment variable holding the config file path.
pub const CONFIG_ENV_VAR: &str = "VOXEL_EDITOR_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub camera: CameraConfig,
    pub walk: WalkConfig,
    pub pan_modifier: PanModifier,
    /// `env_logger` filter used when `RUST_LOG` is unset
    pub log_filter: Option<String>,
    /// Chunks the in-memory storage starts out with, as `[x, y, z]`
    pub stored_chunks: Vec<[i32; 3]>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            walk: WalkConfig::default(),
            pan_modifier: PanModifier::default(),
            log_filter: None,
            stored_chunks: Vec::new(),
        }
    }
}

/// Orbit camera tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of remaining velocity lost per 1/60 s
    pub damping: f32,
    pub rotate_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub pan_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            damping: 0.1,
            rotate_sensitivity: 0.005,
            zoom_sensitivity: 0.1,
            pan_sensitivity: 0.002,
        }
    }
}

/// First-person walk tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Horizontal speed in voxels per second
    pub speed: f32,
    pub look_sensitivity: f32,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            speed: 6.0,
            look_sensitivity: 0.003,
        }
    }
}

/// Key that, held, enables camera pan and rotate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanModifier {
    #[default]
    Space,
    Shift,
    Alt,
}

impl PanModifier {
    pub fn key_code(self) -> KeyCode {
        match self {
            PanModifier::Space => KeyCode::Space,
            PanModifier::Shift => KeyCode::ShiftLeft,
            PanModifier::Alt => KeyCode::AltLeft,
        }
    }
}

impl EditorConfig {
    /// Loads the file named by [`CONFIG_ENV_VAR`], or the defaults when it is unset.
    pub fn from_env() -> Result<Self, StartupError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, StartupError> {
        let contents = std::fs::read_to_string(path).map_err(|source| StartupError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| StartupError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn stored_chunks(&self) -> impl Iterator<Item = ChunkCoordinate> + '_ {
        self.stored_chunks
            .iter()
            .map(|&[x, y, z]| Point3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_all_defaults() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.pan_modifier.key_code(), KeyCode::Space);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: EditorConfig = serde_json::from_str(
            r#"{
                "camera": { "damping": 0.25 },
                "pan_modifier": "alt",
                "stored_chunks": [[0, 2, 0], [1, 0, -1]]
            }"#,
        )
        .unwrap();

        assert_eq!(config.camera.damping, 0.25);
        assert_eq!(
            config.camera.rotate_sensitivity,
            CameraConfig::default().rotate_sensitivity
        );
        assert_eq!(config.pan_modifier.key_code(), KeyCode::AltLeft);
        assert_eq!(
            config.stored_chunks().collect::<Vec<_>>(),
            vec![Point3::new(0, 2, 0), Point3::new(1, 0, -1)]
        );
    }

    #[test]
    fn unknown_modifier_is_rejected() {
        assert!(serde_json::from_str::<EditorConfig>(r#"{ "pan_modifier": "meta" }"#).is_err());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let error = EditorConfig::load(Path::new("/nonexistent/voxel-editor.json")).unwrap_err();
        assert!(matches!(error, StartupError::ReadConfig { .. }));
    }
}
