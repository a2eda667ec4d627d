use glam::{Mat4, Vec2};

/// What cursor movement currently does to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureMode {
    /// No button held; cursor movement only updates the cursor position.
    #[default]
    None,
    /// Primary button: trackball rotation about the x/y axes.
    Rotate,
    /// Primary button with control: rotation about the view (z) axis.
    RotateAboutViewAxis,
    /// Secondary button: translation in the view plane.
    Translate,
}

impl GestureMode {
    /// Whether either rotation mode is active.
    #[must_use]
    pub fn is_rotating(self) -> bool {
        matches!(self, Self::Rotate | Self::RotateAboutViewAxis)
    }
}

/// Transient state of a press-drag-release gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    /// Active mode. Only one of rotate/translate can be active.
    pub mode: GestureMode,
    /// Screen position at gesture start (translate moves it along with the
    /// cursor).
    pub press_position: Vec2,
    /// Inverse of the rotation-only scene matrix at gesture start.
    pub inv_scene: Mat4,
}

impl Default for GestureState {
    fn default() -> Self {
        Self {
            mode: GestureMode::None,
            press_position: Vec2::ZERO,
            inv_scene: Mat4::IDENTITY,
        }
    }
}
