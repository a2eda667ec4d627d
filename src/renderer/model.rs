//! The renderable trait and the state every renderable shares.

use glam::{Mat4, Quat, Vec3};

use super::draw_context::DrawContext;
use super::mesh::MeshData;
use crate::error::SceneError;
use crate::gpu::{GlFunctions, MeshId, Uniform};

/// State the render sequencer reads and writes on every renderable.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBase {
    /// Scene transform, set by the sequencer before each render.
    pub scene_matrix: Mat4,
    /// Position of the model within the scene.
    pub translation: Vec3,
    /// Orientation applied on top of the scene transform (used by the
    /// screen-fixed coordinate arrows).
    pub view_rotation: Quat,
    /// Opacity in `[0, 1]`.
    alpha: f32,
    /// Hidden models are skipped by `render`.
    pub hidden: bool,
    /// 2D models get the translation-only scene transform.
    pub two_dimensional: bool,
}

impl Default for ModelBase {
    fn default() -> Self {
        Self {
            scene_matrix: Mat4::IDENTITY,
            translation: Vec3::ZERO,
            view_rotation: Quat::IDENTITY,
            alpha: 1.0,
            hidden: false,
            two_dimensional: false,
        }
    }
}

impl ModelBase {
    /// A visible, opaque 3D model at `translation`.
    #[must_use]
    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    /// Opacity.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Set opacity, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Model matrix: the view rotation followed by the translation.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.view_rotation, self.translation)
    }
}

/// Anything the scene can hold in its registry and draw.
///
/// Implementors provide access to their [`ModelBase`] and a `render`; the
/// rest has default implementations over the base.
pub trait Renderable {
    /// Shared state.
    fn base(&self) -> &ModelBase;

    /// Shared state, mutably.
    fn base_mut(&mut self) -> &mut ModelBase;

    /// Draw with the scene's programs. Hidden models draw nothing.
    ///
    /// # Errors
    ///
    /// [`SceneError::Gl`] if GPU buffers cannot be created.
    fn render(&mut self, ctx: &DrawContext<'_>) -> Result<(), SceneError>;

    /// Geometry for 3D export. Overlays return `None`.
    fn mesh(&self) -> Option<&MeshData> {
        None
    }

    /// Free GPU resources. The context must be current.
    fn release(&mut self, gl: &dyn GlFunctions) {
        let _ = gl;
    }

    /// Set the scene transform used by the next `render`.
    fn set_scene_matrix(&mut self, matrix: Mat4) {
        self.base_mut().scene_matrix = matrix;
    }

    /// Set the scene transform to a pure translation.
    fn set_scene_translation(&mut self, translation: Vec3) {
        self.base_mut().scene_matrix = Mat4::from_translation(translation);
    }

    /// Whether this model ignores the scene rotation.
    fn is_two_dimensional(&self) -> bool {
        self.base().two_dimensional
    }

    /// Whether this model is hidden.
    fn is_hidden(&self) -> bool {
        self.base().hidden
    }

    /// Flip the hidden flag.
    fn toggle_hide(&mut self) {
        let base = self.base_mut();
        base.hidden = !base.hidden;
    }

    /// Opacity.
    fn alpha(&self) -> f32 {
        self.base().alpha()
    }

    /// Set opacity, clamped to `[0, 1]`.
    fn set_alpha(&mut self, alpha: f32) {
        self.base_mut().set_alpha(alpha);
    }

    /// Raise opacity by `step`.
    fn inc_alpha(&mut self, step: f32) {
        let alpha = self.alpha() + step;
        self.set_alpha(alpha);
    }

    /// Lower opacity by `step`.
    fn dec_alpha(&mut self, step: f32) {
        let alpha = self.alpha() - step;
        self.set_alpha(alpha);
    }
}

/// Bind the graphics program with `base`'s transforms and draw `mesh`.
pub(crate) fn draw_with_graphics(
    base: &ModelBase,
    mesh: MeshId,
    ctx: &DrawContext<'_>,
) {
    let gl = ctx.gl;
    let program = ctx.graphics;
    gl.use_program(program);
    gl.set_uniform(program, "m_matrix", Uniform::Mat4(base.model_matrix()));
    gl.set_uniform(program, "v_matrix", Uniform::Mat4(base.scene_matrix));
    gl.set_uniform(program, "alpha", Uniform::Float(base.alpha()));
    gl.draw_mesh(mesh);
}

/// GPU copy of a [`MeshData`], uploaded on first draw and re-uploaded after
/// [`invalidate`](Self::invalidate).
#[derive(Debug, Default)]
pub(crate) struct UploadedMesh {
    current: Option<MeshId>,
    retired: Vec<MeshId>,
}

impl UploadedMesh {
    /// Mark the GPU copy stale; it is deleted on the next `ensure`.
    pub(crate) fn invalidate(&mut self) {
        if let Some(id) = self.current.take() {
            self.retired.push(id);
        }
    }

    /// The GPU copy of `mesh`, uploading it if needed.
    pub(crate) fn ensure(
        &mut self,
        gl: &dyn GlFunctions,
        mesh: &MeshData,
    ) -> Result<MeshId, SceneError> {
        for id in self.retired.drain(..) {
            gl.delete_mesh(id);
        }
        if let Some(id) = self.current {
            return Ok(id);
        }
        let id = gl.upload_mesh(mesh).map_err(SceneError::Gl)?;
        self.current = Some(id);
        Ok(id)
    }

    /// Delete every GPU copy.
    pub(crate) fn release(&mut self, gl: &dyn GlFunctions) {
        self.invalidate();
        for id in self.retired.drain(..) {
            gl.delete_mesh(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::headless::{GlCall, HeadlessGl};

    #[test]
    fn alpha_is_clamped() {
        let mut base = ModelBase::default();
        base.set_alpha(1.7);
        assert_eq!(base.alpha(), 1.0);
        base.set_alpha(-0.2);
        assert_eq!(base.alpha(), 0.0);
    }

    #[test]
    fn model_matrix_rotates_then_translates() {
        let mut base = ModelBase::at(Vec3::new(1.0, 0.0, 0.0));
        base.view_rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let p = base.model_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn uploaded_mesh_reuploads_after_invalidate() {
        let gl = HeadlessGl::new();
        let mut mesh = MeshData::new();
        mesh.push_cuboid(Vec3::ZERO, Vec3::ONE, Vec3::ONE);
        let mut uploaded = UploadedMesh::default();

        let first = uploaded.ensure(&gl, &mesh).unwrap();
        assert_eq!(uploaded.ensure(&gl, &mesh).unwrap(), first);

        uploaded.invalidate();
        let second = uploaded.ensure(&gl, &mesh).unwrap();
        assert_ne!(first, second);
        assert!(gl.calls().contains(&GlCall::DeleteMesh(first)));
        assert_eq!(gl.live_meshes(), 1);

        uploaded.release(&gl);
        assert_eq!(gl.live_meshes(), 0);
    }

    #[test]
    fn upload_failure_is_gl_error() {
        let gl = HeadlessGl::new();
        gl.fail_uploads(true);
        let mut uploaded = UploadedMesh::default();
        let err = uploaded.ensure(&gl, &MeshData::new()).unwrap_err();
        assert!(matches!(err, SceneError::Gl(_)));
    }
}
