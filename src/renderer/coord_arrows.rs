//! The x/y/z axis indicator.

use std::ops::Range;

use glam::{Quat, Vec3, Vec4};

use super::draw_context::DrawContext;
use super::mesh::MeshData;
use super::model::{draw_with_graphics, ModelBase, Renderable, UploadedMesh};
use super::text::{contrast_colour, TextFeatures, TextModel};
use crate::error::SceneError;
use crate::gpu::GlFunctions;

/// Shaft half-width per unit of arrow length (at thickness 1).
const SHAFT_HALF_WIDTH: f32 = 0.03;
/// Centre block half-size per unit of arrow length (at thickness 1).
const CENTRE_HALF_SIZE: f32 = 0.08;

/// Three coloured axis arrows (x red, y green, z blue) around a centre
/// block whose colour contrasts with the background, plus optional axis
/// labels.
#[derive(Debug)]
pub struct CoordArrows {
    base: ModelBase,
    mesh: MeshData,
    uploaded: UploadedMesh,
    centre: Range<usize>,
    centre_colour: Vec3,
    labels: Vec<TextModel>,
}

impl CoordArrows {
    /// Build arrows of `length` scene units. `thickness` scales the shaft
    /// and centre block; `em` is the label font size (0 disables labels).
    #[must_use]
    pub fn new(length: f32, thickness: f32, em: f32) -> Self {
        let mut mesh = MeshData::new();
        let centre_colour = Vec3::ZERO;

        let c = length * CENTRE_HALF_SIZE * thickness;
        mesh.push_cuboid(Vec3::splat(-c), Vec3::splat(c), centre_colour);
        let centre = 0..mesh.vertex_count();

        let w = length * SHAFT_HALF_WIDTH * thickness;
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            let across = Vec3::ONE - axis;
            let min = -w * across;
            let max = axis * length + w * across;
            mesh.push_cuboid(min, max, axis);
        }

        let labels = if em > 0.0 {
            let features = TextFeatures::with_size(em, 24);
            [("x", Vec3::X), ("y", Vec3::Y), ("z", Vec3::Z)]
                .into_iter()
                .map(|(name, axis)| {
                    let mut label = TextModel::new(features);
                    label.set_text(name, axis * (length + 2.0 * em));
                    label
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            base: ModelBase::default(),
            mesh,
            uploaded: UploadedMesh::default(),
            centre,
            centre_colour,
            labels,
        }
    }

    /// Current centre block colour.
    #[must_use]
    pub fn centre_colour(&self) -> Vec3 {
        self.centre_colour
    }

    /// Recolour the centre block (and labels) to stand out against
    /// `background`. The mesh is re-uploaded only if the colour changes.
    pub fn set_colour_for_background(&mut self, background: Vec4) {
        for label in &mut self.labels {
            label.set_visible_on(background);
        }
        let colour = contrast_colour(background);
        if colour == self.centre_colour {
            return;
        }
        self.centre_colour = colour;
        self.mesh.recolor(self.centre.clone(), colour);
        self.uploaded.invalidate();
    }

    /// Orientation of the arrows when pinned to a screen position.
    pub fn set_view_rotation(&mut self, rotation: Quat) {
        self.base.view_rotation = rotation;
    }

    /// Axis labels (empty when labels are disabled).
    #[must_use]
    pub fn labels(&self) -> &[TextModel] {
        &self.labels
    }
}

impl Renderable for CoordArrows {
    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ModelBase {
        &mut self.base
    }

    fn render(&mut self, ctx: &DrawContext<'_>) -> Result<(), SceneError> {
        if self.base.hidden {
            return Ok(());
        }
        let id = self.uploaded.ensure(ctx.gl, &self.mesh)?;
        draw_with_graphics(&self.base, id, ctx);

        // Labels ride on the arrows' full transform.
        let frame = self.base.scene_matrix * self.base.model_matrix();
        for label in &mut self.labels {
            label.set_scene_matrix(frame);
            label.render(ctx)?;
        }
        Ok(())
    }

    fn mesh(&self) -> Option<&MeshData> {
        Some(&self.mesh)
    }

    fn release(&mut self, gl: &dyn GlFunctions) {
        self.uploaded.release(gl);
    }
}
