use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::gpu::GlVersion;

/// White background. Alpha 0.5 so transparent exports stay readable.
pub const BACKGROUND_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 0.5];
/// Black, fully transparent background.
pub const BACKGROUND_BLACK: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Framebuffer pixels per window pixel when the host does not report one.
#[must_use]
pub fn default_pixel_ratio() -> f32 {
    if cfg!(target_os = "macos") {
        2.0
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Background, overlays and per-model display steps.
pub struct DisplayOptions {
    /// Clear colour (RGBA).
    #[schemars(skip)]
    pub background: [f32; 4],
    /// Draw the coordinate arrows.
    #[schemars(title = "Coordinate Arrows")]
    pub show_coord_arrows: bool,
    /// Place the arrows at the scene origin instead of a fixed screen
    /// position.
    #[schemars(title = "Arrows In Scene")]
    pub coord_arrows_in_scene: bool,
    /// Screen position (normalised device coordinates) of the arrows when
    /// not in scene.
    #[schemars(skip)]
    pub coord_arrows_offset: [f32; 2],
    /// Arrow length in scene units.
    #[schemars(skip)]
    pub coord_arrows_length: f32,
    /// Arrow thickness multiplier.
    #[schemars(skip)]
    pub coord_arrows_thickness: f32,
    /// Axis label size; 0 disables the labels.
    #[schemars(skip)]
    pub coord_arrows_em: f32,
    /// Draw the title.
    #[schemars(title = "Title")]
    pub show_title: bool,
    /// Screen position (normalised device coordinates) of the text anchor.
    #[schemars(skip)]
    pub title_position: [f32; 2],
    /// Scene depth at which text is placed.
    #[schemars(skip)]
    pub text_z: f32,
    /// Framebuffer pixels per window pixel.
    #[schemars(skip)]
    pub pixel_ratio: f32,
    /// Opacity change per alpha key press.
    #[schemars(
        title = "Alpha Step",
        range(min = 0.01, max = 0.5),
        extend("step" = 0.01)
    )]
    pub alpha_step: f32,
    /// GLSL dialect for the built-in shaders.
    #[schemars(skip)]
    pub gl_version: GlVersion,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            background: BACKGROUND_WHITE,
            show_coord_arrows: false,
            coord_arrows_in_scene: false,
            coord_arrows_offset: [-0.8, -0.8],
            coord_arrows_length: 0.1,
            coord_arrows_thickness: 1.0,
            coord_arrows_em: 0.01,
            show_title: false,
            title_position: [-0.8, 0.8],
            text_z: -1.0,
            pixel_ratio: default_pixel_ratio(),
            alpha_step: 0.1,
            gl_version: GlVersion::default(),
        }
    }
}
