use super::text::FontService;
use crate::gpu::{GlFunctions, ProgramId};

/// What a renderable needs from the scene while drawing one frame.
pub struct DrawContext<'a> {
    /// GL provider.
    pub gl: &'a dyn GlFunctions,
    /// Graphics program for the current projection (already current and
    /// holding the projection and lighting uniforms).
    pub graphics: ProgramId,
    /// Text program, when loaded.
    pub text: Option<ProgramId>,
    /// Font service, when one is attached.
    pub fonts: Option<&'a dyn FontService>,
}
