//! The scene's interactive vocabulary.
//!
//! Key bindings resolve to `SceneCommand`s; hosts can also construct them
//! directly and pass them to [`Scene::execute`](super::Scene::execute).

/// A discrete scene operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneCommand {
    /// Ask the host to finish.
    RequestQuit,
    /// Show or hide the coordinate arrows.
    ToggleCoordArrows,
    /// Log the key help.
    ShowHelp,
    /// Lock or unlock the scene against camera changes.
    ToggleSceneLock,
    /// Save the framebuffer as PNG, named after the title.
    SaveImage,
    /// Save all models as glTF, named after the title.
    SaveGltf,
    /// Log view setup code and save the view snapshot.
    SaveSnapshot,
    /// Select the model at `index`, if it exists.
    SelectModel {
        /// Registry index.
        index: usize,
    },
    /// Hide or show the selected model.
    ToggleHideSelected,
    /// Lower the selected model's opacity by the alpha step.
    DecreaseAlpha,
    /// Raise the selected model's opacity by the alpha step.
    IncreaseAlpha,
    /// Multiply the cylindrical projection radius.
    ScaleCylRadius {
        /// Multiplier.
        factor: f32,
    },
    /// Multiply the cylindrical projection height.
    ScaleCylHeight {
        /// Multiplier.
        factor: f32,
    },
    /// Restore default translation, rotation and cylindrical camera.
    ResetView,
    /// Narrow the field of view by 2°.
    DecreaseFov,
    /// Widen the field of view by 2°.
    IncreaseFov,
    /// Halve the near clip plane.
    DecreaseZNear,
    /// Double the near clip plane.
    IncreaseZNear,
    /// Perspective → orthographic → cylindrical → perspective.
    CycleProjection,
}

impl SceneCommand {
    /// Whether a locked scene refuses this command.
    #[must_use]
    pub fn blocked_by_lock(self) -> bool {
        matches!(
            self,
            Self::ToggleCoordArrows
                | Self::ResetView
                | Self::DecreaseFov
                | Self::IncreaseFov
                | Self::DecreaseZNear
                | Self::IncreaseZNear
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_blocks_camera_commands_only() {
        assert!(SceneCommand::ResetView.blocked_by_lock());
        assert!(SceneCommand::IncreaseFov.blocked_by_lock());
        assert!(SceneCommand::ToggleCoordArrows.blocked_by_lock());

        assert!(!SceneCommand::CycleProjection.blocked_by_lock());
        assert!(!SceneCommand::SelectModel { index: 0 }.blocked_by_lock());
        assert!(!SceneCommand::ToggleHideSelected.blocked_by_lock());
        assert!(!SceneCommand::IncreaseAlpha.blocked_by_lock());
        assert!(!SceneCommand::ScaleCylRadius { factor: 2.0 }
            .blocked_by_lock());
        assert!(!SceneCommand::ToggleSceneLock.blocked_by_lock());
    }
}
