//! GL function surface, host context seam and shader programs.
//!
//! Everything the scene needs from the platform arrives through two traits:
//! [`GlFunctions`](gl::GlFunctions) for drawing and
//! [`HostContext`](context::HostContext) for context ownership and buffer
//! swaps.

/// Host context trait and scoped acquisition guard.
pub mod context;
/// The `GlFunctions` trait and its value types.
pub mod gl;
/// `GlFunctions` over a glow context.
#[cfg(feature = "glow")]
pub mod glow_backend;
/// Recording GL and host doubles.
pub mod headless;
/// Default GLSL sources and the scene's program set.
pub mod shaders;

pub use context::{ContextGuard, HostContext};
pub use gl::{GlFunctions, MeshId, ProgramId, ShaderKind, ShaderStage, Uniform};
#[cfg(feature = "glow")]
pub use glow_backend::GlowFunctions;
pub use headless::{GlCall, HeadlessGl, HeadlessHost};
pub use shaders::{GlVersion, GraphicsShader, ShaderPrograms};
