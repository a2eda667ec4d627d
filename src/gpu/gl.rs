//! The OpenGL function surface the scene draws through.
//!
//! The host loads GL function pointers for its context and hands the scene
//! an implementation of [`GlFunctions`]. Methods take `&self`; backends keep
//! their handle tables behind interior mutability so the provider can be
//! shared through an `Rc` by the scene and every renderable.

use glam::{Mat4, Vec3, Vec4};

use crate::renderer::MeshData;

/// Attribute location of vertex positions in the default shaders.
pub const ATTRIB_POSITION: u32 = 0;
/// Attribute location of vertex normals in the default shaders.
pub const ATTRIB_NORMAL: u32 = 1;
/// Attribute location of vertex colours in the default shaders.
pub const ATTRIB_COLOR: u32 = 2;

/// Backend-assigned id of a linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u32);

/// Backend-assigned id of an uploaded mesh (vertex array plus buffers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// Shader pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    /// Vertex shader.
    Vertex,
    /// Fragment shader.
    Fragment,
}

/// One shader stage of a program: its kind, a name for diagnostics and the
/// GLSL source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderStage {
    /// Pipeline stage.
    pub kind: ShaderKind,
    /// Name used in compile error messages (e.g. `"scene.vert"`).
    pub name: &'static str,
    /// Complete GLSL source, including the `#version` line.
    pub source: String,
}

/// A uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    /// `float`
    Float(f32),
    /// `vec3`
    Vec3(Vec3),
    /// `vec4`
    Vec4(Vec4),
    /// `mat4`, column-major.
    Mat4(Mat4),
}

/// OpenGL operations used by the scene and its renderables.
pub trait GlFunctions {
    /// The driver's `GL_VERSION` string.
    fn version_string(&self) -> String;

    /// Compile and link a program from `stages`. Errors carry the compiler
    /// or linker log.
    fn compile_program(
        &self,
        stages: &[ShaderStage],
    ) -> Result<ProgramId, String>;

    /// Delete a program. Unknown ids are ignored.
    fn delete_program(&self, program: ProgramId);

    /// Make `program` current.
    fn use_program(&self, program: ProgramId);

    /// Set a uniform on `program`, which must be current. Names the program
    /// does not declare are ignored.
    fn set_uniform(&self, program: ProgramId, name: &str, value: Uniform);

    /// Set the viewport to `(0, 0, width, height)`.
    fn viewport(&self, width: u32, height: u32);

    /// Clear colour and depth buffers, colour to `color`.
    fn clear(&self, color: Vec4);

    /// Enable depth testing and alpha blending, disable face culling.
    fn enable_scene_defaults(&self);

    /// Upload a mesh into GPU buffers.
    fn upload_mesh(&self, mesh: &MeshData) -> Result<MeshId, String>;

    /// Draw an uploaded mesh as indexed triangles with the current program.
    fn draw_mesh(&self, mesh: MeshId);

    /// Release an uploaded mesh. Unknown ids are ignored.
    fn delete_mesh(&self, mesh: MeshId);

    /// Read back the colour buffer as tightly packed RGBA8, bottom row
    /// first.
    fn read_pixels(&self, width: u32, height: u32) -> Vec<u8>;
}
