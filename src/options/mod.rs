//! Scene options with TOML preset support.
//!
//! Camera defaults, lighting, display toggles, window behaviour, snapshot
//! location and key bindings are consolidated here. Options serialize
//! to/from TOML so a host can ship presets alongside its binary.

mod camera;
mod display;
mod lighting;
mod snapshot;
mod window;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::{
    default_pixel_ratio, DisplayOptions, BACKGROUND_BLACK, BACKGROUND_WHITE,
};
pub use lighting::LightingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use snapshot::{SnapshotOptions, SNAPSHOT_FILE_NAME};
pub use window::WindowOptions;

use crate::error::SceneError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[lighting]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct SceneOptions {
    /// Projection and view defaults.
    pub camera: CameraOptions,
    /// Lighting parameters.
    pub lighting: LightingOptions,
    /// Background, overlays and display steps.
    pub display: DisplayOptions,
    /// Window behaviour.
    pub window: WindowOptions,
    /// View snapshot file.
    pub snapshot: SnapshotOptions,
    /// Key chord bindings.
    #[schemars(skip)]
    pub keybindings: KeyBindings,
}

impl SceneOptions {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(SceneOptions)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`SceneError::Io`] if the file cannot be read and
    /// [`SceneError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path).map_err(SceneError::Io)?;
        toml::from_str(&content)
            .map_err(|e| SceneError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed), creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// [`SceneError::OptionsParse`] if serialization fails and
    /// [`SceneError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SceneError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SceneError::Io)?;
        }
        std::fs::write(path, content).map_err(SceneError::Io)
    }
}
