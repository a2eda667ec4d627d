use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default snapshot file name inside the temp directory.
pub const SNAPSHOT_FILE_NAME: &str = "viscene.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Snapshot", inline)]
#[serde(default)]
/// Where the view snapshot lives and whether it is read at start-up.
pub struct SnapshotOptions {
    /// Snapshot file path.
    #[schemars(skip)]
    pub path: PathBuf,
    /// Apply the snapshot when the scene initialises GL.
    #[schemars(title = "Load On Start")]
    pub load_on_start: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            path: std::env::temp_dir().join(SNAPSHOT_FILE_NAME),
            load_on_start: true,
        }
    }
}
