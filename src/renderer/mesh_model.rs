use glam::Vec3;

use super::draw_context::DrawContext;
use super::mesh::MeshData;
use super::model::{draw_with_graphics, ModelBase, Renderable, UploadedMesh};
use crate::error::SceneError;
use crate::gpu::GlFunctions;

/// A renderable built from a client-supplied triangle mesh.
///
/// The mesh is uploaded lazily on first render, so models can be built and
/// added before the GL context is ready.
#[derive(Debug, Default)]
pub struct MeshModel {
    base: ModelBase,
    mesh: MeshData,
    uploaded: UploadedMesh,
}

impl MeshModel {
    /// A 3D model of `mesh` at `translation`.
    #[must_use]
    pub fn new(mesh: MeshData, translation: Vec3) -> Self {
        Self {
            base: ModelBase::at(translation),
            mesh,
            uploaded: UploadedMesh::default(),
        }
    }

    /// A 2D model: rendered with the scene translation but not its rotation.
    #[must_use]
    pub fn two_dimensional(mesh: MeshData, translation: Vec3) -> Self {
        let mut model = Self::new(mesh, translation);
        model.base.two_dimensional = true;
        model
    }

    /// Replace the geometry. The GPU copy is refreshed on the next render.
    pub fn set_mesh(&mut self, mesh: MeshData) {
        self.mesh = mesh;
        self.uploaded.invalidate();
    }
}

impl Renderable for MeshModel {
    fn base(&self) -> &ModelBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ModelBase {
        &mut self.base
    }

    fn render(&mut self, ctx: &DrawContext<'_>) -> Result<(), SceneError> {
        if self.base.hidden || self.mesh.is_empty() {
            return Ok(());
        }
        let id = self.uploaded.ensure(ctx.gl, &self.mesh)?;
        draw_with_graphics(&self.base, id, ctx);
        Ok(())
    }

    fn mesh(&self) -> Option<&MeshData> {
        Some(&self.mesh)
    }

    fn release(&mut self, gl: &dyn GlFunctions) {
        self.uploaded.release(gl);
    }
}
