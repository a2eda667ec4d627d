//! Persisted scene translation/rotation ("view snapshot").
//!
//! The file is a flat JSON object; every field is optional on load so a
//! hand-edited snapshot can override just the translation, for example.

use std::path::Path;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::state::CameraState;
use crate::error::SceneError;

/// On-disk form of a view snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSnapshot {
    /// Scene translation x.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenetrans_x: Option<f32>,
    /// Scene translation y.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenetrans_y: Option<f32>,
    /// Scene translation z.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenetrans_z: Option<f32>,
    /// Scene rotation w.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenerotn_w: Option<f32>,
    /// Scene rotation x.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenerotn_x: Option<f32>,
    /// Scene rotation y.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenerotn_y: Option<f32>,
    /// Scene rotation z.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenerotn_z: Option<f32>,
}

impl ViewSnapshot {
    /// Capture the current translation and rotation.
    #[must_use]
    pub fn capture(camera: &CameraState) -> Self {
        Self {
            scenetrans_x: Some(camera.translation.x),
            scenetrans_y: Some(camera.translation.y),
            scenetrans_z: Some(camera.translation.z),
            scenerotn_w: Some(camera.rotation.w),
            scenerotn_x: Some(camera.rotation.x),
            scenerotn_y: Some(camera.rotation.y),
            scenerotn_z: Some(camera.rotation.z),
        }
    }

    /// Load a snapshot. Any failure (missing file, bad JSON) yields `None`.
    #[must_use]
    pub fn load(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                log::debug!("no view snapshot at {}: {e}", path.display());
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::debug!("ignoring malformed view snapshot: {e}");
                None
            }
        }
    }

    /// Write the snapshot as JSON, truncating any existing file.
    ///
    /// # Errors
    ///
    /// [`SceneError::Json`] or [`SceneError::Io`].
    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let content = serde_json::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply present fields to `camera`. The translation (including fields
    /// left unchanged) becomes the new translation default.
    pub fn apply(&self, camera: &mut CameraState) {
        let t = camera.translation;
        camera.translation = Vec3::new(
            self.scenetrans_x.unwrap_or(t.x),
            self.scenetrans_y.unwrap_or(t.y),
            self.scenetrans_z.unwrap_or(t.z),
        );
        camera.translation_default = camera.translation;

        let r = camera.rotation;
        let rotation = Quat::from_xyzw(
            self.scenerotn_x.unwrap_or(r.x),
            self.scenerotn_y.unwrap_or(r.y),
            self.scenerotn_z.unwrap_or(r.z),
            self.scenerotn_w.unwrap_or(r.w),
        );
        if rotation.length_squared() > 0.0 {
            camera.rotation = rotation.normalize();
        }
    }

    /// Rust source that reproduces this view, for pasting into client code.
    #[must_use]
    pub fn setup_code(camera: &CameraState) -> String {
        let t = camera.translation;
        let r = camera.rotation;
        format!(
            "scene.set_translation(Vec3::new({}, {}, {}));\n\
             scene.set_rotation(Quat::from_xyzw({}, {}, {}, {}));",
            t.x, t.y, t.z, r.x, r.y, r.z, r.w
        )
    }
}
