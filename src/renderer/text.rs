//! Text overlays: the font service seam and the text renderable.
//!
//! Glyph rasterisation and texture management belong to the host's
//! [`FontService`]. The scene decides where text goes and with which
//! transforms; the service measures and draws it with the text program.

use glam::{Vec3, Vec4};

use super::draw_context::DrawContext;
use super::model::{ModelBase, Renderable};
use crate::error::SceneError;
use crate::gpu::{GlFunctions, ProgramId, Uniform};

/// Default label height in scene units.
pub const LABEL_FONT_SIZE: f32 = 0.01;
/// Default title height in scene units.
pub const TITLE_FONT_SIZE: f32 = 0.035;

/// How a piece of text is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextFeatures {
    /// Glyph height in scene units.
    pub font_size: f32,
    /// Rasterisation resolution in pixels per em.
    pub resolution: u32,
    /// Text colour.
    pub colour: Vec3,
    /// Centre the text horizontally on its anchor.
    pub centre_horizontally: bool,
}

impl Default for TextFeatures {
    fn default() -> Self {
        Self::with_size(LABEL_FONT_SIZE, 24)
    }
}

impl TextFeatures {
    /// Black, left-aligned text of the given size and resolution.
    #[must_use]
    pub fn with_size(font_size: f32, resolution: u32) -> Self {
        Self {
            font_size,
            resolution,
            colour: Vec3::ZERO,
            centre_horizontally: false,
        }
    }
}

/// Extent of a laid-out string in scene units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextGeometry {
    /// Advance width of the whole string.
    pub total_width: f32,
    /// Largest ascent above the baseline.
    pub max_bearing_y: f32,
    /// Largest descent below the baseline.
    pub max_drop: f32,
}

impl TextGeometry {
    /// Half the advance width.
    #[must_use]
    pub fn half_width(&self) -> f32 {
        self.total_width * 0.5
    }

    /// Ascent plus descent.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max_bearing_y + self.max_drop
    }
}

/// Host-provided font rasterisation and glyph drawing.
///
/// Shared by `Rc`: the scene attaches on construction and detaches when
/// dropped, so a service shared by several scenes can reference-count its
/// GPU resources.
pub trait FontService {
    /// A scene started using this service.
    fn attach(&self) {}

    /// A scene stopped using this service.
    fn detach(&self) {}

    /// Measure `text`.
    fn geometry(&self, text: &str, features: &TextFeatures) -> TextGeometry;

    /// Draw `text` with `program`, which is current and already holds the
    /// transform, colour and alpha uniforms.
    fn draw_text(
        &self,
        gl: &dyn GlFunctions,
        program: ProgramId,
        text: &str,
        features: &TextFeatures,
    );
}

/// Black on light backgrounds, white on dark ones.
pub(crate) fn contrast_colour(background: Vec4) -> Vec3 {
    let luminance = background.truncate().dot(Vec3::new(0.299, 0.587, 0.114));
    if luminance > 0.5 {
        Vec3::ZERO
    } else {
        Vec3::ONE
    }
}

/// A text overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct TextModel {
    base: ModelBase,
    text: String,
    features: TextFeatures,
    colour: Vec3,
}

impl TextModel {
    /// Empty text with `features`.
    #[must_use]
    pub fn new(features: TextFeatures) -> Self {
        Self {
            base: ModelBase::default(),
            text: String::new(),
            colour: features.colour,
            features,
        }
    }

    /// Set the string and its position relative to the text anchor.
    pub fn set_text(&mut self, text: impl Into<String>, offset: Vec3) {
        self.text = text.into();
        self.base.translation = offset;
    }

    /// The string.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Position relative to the text anchor.
    #[must_use]
    pub fn offset(&self) -> Vec3 {
        self.base.translation
    }

    /// Setting features.
    #[must_use]
    pub fn features(&self) -> &TextFeatures {
        &self.features
    }

    /// Current colour.
    #[must_use]
    pub fn colour(&self) -> Vec3 {
        self.colour
    }

    /// Set the colour.
    pub fn set_colour(&mut self, colour: Vec3) {
        self.colour = colour;
    }

    /// Measure the current string.
    #[must_use]
    pub fn geometry(&self, fonts: &dyn FontService) -> TextGeometry {
        fonts.geometry(&self.text, &self.features)
    }

    /// Keep black or white text readable on `background`. Other colours are
    /// left alone.
    pub fn set_visible_on(&mut self, background: Vec4) {
        if self.colour == Vec3::ZERO || self.colour == Vec3::ONE {
            self.colour = contrast_colour(background);
        }
    }
}

impl Renderable for TextModel {
    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ModelBase {
        &mut self.base
    }

    fn render(&mut self, ctx: &DrawContext<'_>) -> Result<(), SceneError> {
        let (Some(program), Some(fonts)) = (ctx.text, ctx.fonts) else {
            return Ok(());
        };
        if self.base.hidden || self.text.is_empty() {
            return Ok(());
        }
        let gl = ctx.gl;
        gl.use_program(program);
        let model = Uniform::Mat4(self.base.model_matrix());
        gl.set_uniform(program, "m_matrix", model);
        let view = Uniform::Mat4(self.base.scene_matrix);
        gl.set_uniform(program, "v_matrix", view);
        gl.set_uniform(program, "text_colour", Uniform::Vec3(self.colour));
        gl.set_uniform(program, "alpha", Uniform::Float(self.base.alpha()));
        fonts.draw_text(gl, program, &self.text, &self.features);
        Ok(())
    }
}
