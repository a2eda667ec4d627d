//! Maps pointer and scroll events onto camera mutations.
//!
//! Rotation is measured from the gesture's start position and re-applied to
//! the rotation saved at button press, so dragging back to the press point
//! restores the original orientation. Translation is incremental: each move
//! applies the delta since the previous move and then advances the press
//! position to the cursor.

use glam::{UVec2, Vec2, Vec3};

use super::event::{Action, Modifiers, MouseButton};
use super::gesture::{GestureMode, GestureState};
use crate::camera::{CameraState, Projection, ProjectionType};

/// Default rotation, in degrees, per world unit of drag.
pub const ROTATION_DEGREES_PER_UNIT: f32 = 40.0;
/// Default scroll translation step in world units.
pub const SCROLL_STEP: f32 = 0.1;

/// Converts mouse-button, cursor and scroll events into camera state
/// changes.
#[derive(Debug, Clone)]
pub struct InputMapper {
    gesture: GestureState,
    cursor: Vec2,
    window: UVec2,
    locked: bool,
    /// World-unit step applied per scroll increment.
    pub scroll_step: f32,
    /// Degrees of rotation per world unit of drag.
    pub rotation_sensitivity: f32,
}

impl InputMapper {
    /// Create a mapper for a window of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            gesture: GestureState::default(),
            cursor: Vec2::ZERO,
            window: UVec2::new(width, height),
            locked: false,
            scroll_step: SCROLL_STEP,
            rotation_sensitivity: ROTATION_DEGREES_PER_UNIT,
        }
    }

    /// Current cursor position in window pixels.
    #[must_use]
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Current window size in window pixels.
    #[must_use]
    pub fn window_size(&self) -> UVec2 {
        self.window
    }

    /// Current gesture state.
    #[must_use]
    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Whether the scene is locked against camera changes.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock or unlock the scene. Locking ends any gesture in progress.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        if locked {
            self.gesture.mode = GestureMode::None;
        }
    }

    /// Record a new window size. Always requires a re-render.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.window = UVec2::new(width, height);
        true
    }

    /// Begin or end a gesture.
    pub fn mouse_button(
        &mut self,
        camera: &mut CameraState,
        button: MouseButton,
        action: Action,
        modifiers: Modifiers,
    ) {
        if self.locked {
            return;
        }

        let pressed = action == Action::Press;
        if pressed {
            self.gesture.press_position = self.cursor;
            self.gesture.inv_scene = camera.begin_gesture();
        }

        match button {
            MouseButton::Left => {
                self.gesture.mode = match (pressed, modifiers.control) {
                    (false, _) => GestureMode::None,
                    (true, false) => GestureMode::Rotate,
                    (true, true) => GestureMode::RotateAboutViewAxis,
                };
            }
            MouseButton::Right => {
                self.gesture.mode = if pressed {
                    GestureMode::Translate
                } else {
                    GestureMode::None
                };
            }
            MouseButton::Middle => {}
        }
    }

    /// Track the cursor and apply the active gesture. Returns `true` when the
    /// camera changed. A zero-width window (minimised) never moves the
    /// camera.
    pub fn cursor_moved(
        &mut self,
        camera: &mut CameraState,
        projection: &Projection,
        x: f32,
        y: f32,
    ) -> bool {
        self.cursor = Vec2::new(x, y);
        if self.locked || self.window.x == 0 {
            return false;
        }

        match self.gesture.mode {
            GestureMode::None => false,
            GestureMode::Rotate | GestureMode::RotateAboutViewAxis => {
                self.apply_rotation(camera, projection);
                true
            }
            GestureMode::Translate => {
                self.apply_translation(camera, projection);
                true
            }
        }
    }

    /// Zoom (orthographic) or dolly/pan (perspective, cylindrical). Returns
    /// `false` only when the scene is locked.
    pub fn scroll(
        &mut self,
        camera: &mut CameraState,
        projection: &mut Projection,
        x: f32,
        y: f32,
    ) -> bool {
        if self.locked {
            return false;
        }

        match projection.ptype {
            ProjectionType::Orthographic => {
                let _ = projection.rescale_ortho(y * self.scroll_step);
            }
            ProjectionType::Perspective | ProjectionType::Cylindrical => {
                camera.translation.x -= x * self.scroll_step;
                camera.cyl_cam_pos.x += x * self.scroll_step;

                let step = y * self.scroll_step;
                camera.translation.z += step;
                let moved = camera.rotation * Vec3::new(0.0, step, 0.0);
                camera.cyl_cam_pos += moved.extend(0.0);
            }
        }
        true
    }

    /// Pixel position to normalised coordinates, centred on and scaled by
    /// half the window width for both axes.
    fn to_ndc(&self, p: Vec2) -> Vec2 {
        let half_width = self.window.x as f32 * 0.5;
        (p - half_width) / half_width
    }

    /// World-space movement between the press position and the cursor at
    /// the depth of the scene.
    fn world_delta(
        &self,
        camera: &CameraState,
        projection: &Projection,
    ) -> Vec3 {
        let depth = camera.translation.z;
        let press = self.to_ndc(self.gesture.press_position);
        let v0 = projection.unproject(press, depth);
        let v1 = projection.unproject(self.to_ndc(self.cursor), depth);
        v1 - v0
    }

    fn apply_rotation(
        &self,
        camera: &mut CameraState,
        projection: &Projection,
    ) {
        let delta = self.world_delta(camera, projection);

        // Screen x drives rotation about y and screen y about x.
        let about_view_axis =
            self.gesture.mode == GestureMode::RotateAboutViewAxis;
        let movement = if about_view_axis {
            Vec3::new(0.0, 0.0, -delta.y + delta.x)
        } else {
            Vec3::new(-delta.y, -delta.x, 0.0)
        };

        let degrees = movement.length() * self.rotation_sensitivity;
        let axis = self
            .gesture
            .inv_scene
            .transform_vector3(movement.normalize_or_zero())
            .normalize_or_zero();

        camera.rotate_from_saved(axis, degrees.to_radians());
    }

    fn apply_translation(
        &mut self,
        camera: &mut CameraState,
        projection: &Projection,
    ) {
        let delta = self.world_delta(camera, projection);
        self.gesture.press_position = self.cursor;

        camera.translation.x += delta.x;
        camera.translation.y -= delta.y;

        camera.cyl_cam_pos.x -= delta.x;
        camera.cyl_cam_pos.z += delta.y;
    }
}
