use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Projection, default view and input sensitivity.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(
        title = "Field of View",
        range(min = 2.0, max = 178.0),
        extend("step" = 2.0)
    )]
    pub fov: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub z_near: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub z_far: f32,
    /// Default scene translation. A positive z puts the scene behind the
    /// camera.
    #[schemars(skip)]
    pub translation: [f32; 3],
    /// Scene translation per scroll increment.
    #[schemars(
        title = "Scroll Step",
        range(min = 0.01, max = 1.0),
        extend("step" = 0.01)
    )]
    pub scroll_step: f32,
    /// Degrees of rotation per world unit of drag.
    #[schemars(
        title = "Rotate Speed",
        range(min = 5.0, max = 120.0),
        extend("step" = 1.0)
    )]
    pub rotation_sensitivity: f32,
    /// Orthographic box, left/bottom corner.
    #[schemars(skip)]
    pub ortho_lb: [f32; 2],
    /// Orthographic box, right/top corner.
    #[schemars(skip)]
    pub ortho_rt: [f32; 2],
    /// Cylindrical projection screen radius.
    #[schemars(skip)]
    pub cyl_radius: f32,
    /// Cylindrical projection screen height.
    #[schemars(skip)]
    pub cyl_height: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fov: 30.0,
            z_near: 0.001,
            z_far: 300.0,
            translation: [0.0, 0.0, -5.0],
            scroll_step: 0.1,
            rotation_sensitivity: 40.0,
            ortho_lb: [-1.3, -1.0],
            ortho_rt: [1.3, 1.0],
            cyl_radius: 0.005,
            cyl_height: 0.01,
        }
    }
}
