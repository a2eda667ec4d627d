use glam::{Mat4, Quat, Vec3, Vec4};

use super::projection::ProjectionType;

/// The default z position for the scene: away from the viewer so models at
/// the origin are visible.
pub const Z_DEFAULT: f32 = -5.0;

/// Scene translation, rotation and cylindrical-camera state.
///
/// Every `*_default` field is the target of [`reset`](Self::reset).
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    /// Current scene translation in world units.
    pub translation: Vec3,
    /// Translation restored by a view reset.
    pub translation_default: Vec3,
    /// Current scene orientation. Always a unit quaternion.
    pub rotation: Quat,
    /// Rotation restored by a view reset.
    pub rotation_default: Quat,
    /// Rotation captured at the start of a gesture.
    pub saved_rotation: Quat,
    /// Camera position used by the cylindrical projection shader.
    pub cyl_cam_pos: Vec4,
    /// Cylindrical camera position restored by a view reset.
    pub cyl_cam_pos_default: Vec4,
    /// Radius of the cylindrical projection screen around the camera.
    pub cyl_radius: f32,
    /// Height of the cylindrical projection screen.
    pub cyl_height: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, Z_DEFAULT))
    }
}

impl CameraState {
    /// Create camera state with the given default translation.
    #[must_use]
    pub fn new(translation: Vec3) -> Self {
        Self {
            translation,
            translation_default: translation,
            rotation: Quat::IDENTITY,
            rotation_default: Quat::IDENTITY,
            saved_rotation: Quat::IDENTITY,
            cyl_cam_pos: Vec4::W,
            cyl_cam_pos_default: Vec4::W,
            cyl_radius: 0.005,
            cyl_height: 0.01,
        }
    }

    /// Set the translation and make it the new default.
    pub fn set_translation(&mut self, translation: Vec3) {
        if translation.z > 0.0 {
            log::warn!(
                "scene translation z = {} is positive; normally the default z \
                 value is negative",
                translation.z
            );
        }
        self.translation = translation;
        self.translation_default = translation;
    }

    /// Set only the x/y translation (and their defaults).
    pub fn set_translation_xy(&mut self, x: f32, y: f32) {
        self.translation.x = x;
        self.translation.y = y;
        self.translation_default.x = x;
        self.translation_default.y = y;
    }

    /// Set the rotation and make it the new default.
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
        self.rotation_default = self.rotation;
    }

    /// Restore translation, rotation and cylindrical camera position to their
    /// defaults.
    pub fn reset(&mut self) {
        self.translation = self.translation_default;
        self.cyl_cam_pos = self.cyl_cam_pos_default;
        self.rotation = self.rotation_default;
    }

    /// Snapshot the rotation at gesture start and return the inverse of the
    /// rotation-only scene matrix.
    pub fn begin_gesture(&mut self) -> Mat4 {
        self.saved_rotation = self.rotation;
        Mat4::from_quat(self.saved_rotation).inverse()
    }

    /// Rotate the scene about `axis` by `angle` radians, applied in the
    /// scene's current frame.
    pub fn rotate_scene(&mut self, axis: Vec3, angle: f32) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        self.rotation = (self.rotation * Quat::from_axis_angle(axis, -angle))
            .normalize();
    }

    /// Replace the rotation with the gesture-start rotation composed with a
    /// rotation of `angle` radians about `axis`.
    pub fn rotate_from_saved(&mut self, axis: Vec3, angle: f32) {
        self.rotation = self.saved_rotation;
        self.rotate_scene(axis, angle);
    }

    /// The scene view matrix for the given projection type. The cylindrical
    /// projection expresses translation through `cyl_cam_pos` instead.
    #[must_use]
    pub fn scene_view(&self, ptype: ProjectionType) -> Mat4 {
        let rotation = Mat4::from_quat(self.rotation);
        if ptype.is_flat() {
            Mat4::from_translation(self.translation) * rotation
        } else {
            rotation
        }
    }

    /// Translation-only scene matrix, used for two-dimensional models.
    #[must_use]
    pub fn translation_only(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
    }
}
