use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ambient and diffuse intensities used by [`LightingOptions::effects`].
const EFFECTS_AMBIENT: f32 = 0.4;
const EFFECTS_DIFFUSE: f32 = 0.6;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Single-light shading parameters.
pub struct LightingOptions {
    /// Light colour.
    #[schemars(skip)]
    pub light_colour: [f32; 3],
    /// Ambient intensity.
    #[schemars(
        title = "Ambient",
        range(min = 0.0, max = 1.0),
        extend("step" = 0.05)
    )]
    pub ambient_intensity: f32,
    /// Diffuse light position in scene coordinates.
    #[schemars(skip)]
    pub diffuse_position: [f32; 3],
    /// Diffuse intensity. Zero gives flat, unlit colours.
    #[schemars(
        title = "Diffuse",
        range(min = 0.0, max = 1.0),
        extend("step" = 0.05)
    )]
    pub diffuse_intensity: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            light_colour: [1.0, 1.0, 1.0],
            ambient_intensity: 1.0,
            diffuse_position: [5.0, 5.0, 15.0],
            diffuse_intensity: 0.0,
        }
    }
}

impl LightingOptions {
    /// Switch between shaded (ambient plus diffuse) and flat lighting.
    pub fn effects(&mut self, on: bool) {
        if on {
            self.ambient_intensity = EFFECTS_AMBIENT;
            self.diffuse_intensity = EFFECTS_DIFFUSE;
        } else {
            self.ambient_intensity = 1.0;
            self.diffuse_intensity = 0.0;
        }
    }
}
