//! Camera and projection state for the scene.
//!
//! Holds the scene translation/rotation, cylindrical-camera parameters and
//! the projection matrices derived from them, plus the on-disk view snapshot.

/// Perspective/orthographic/cylindrical projection and unprojection.
pub mod projection;
/// View snapshot file load/save.
pub mod snapshot;
/// Scene translation, rotation and cylindrical camera state.
pub mod state;

pub use projection::{Projection, ProjectionType};
pub use snapshot::ViewSnapshot;
pub use state::CameraState;
