//! Projection state and the matrices derived from it.
//!
//! All matrices follow the OpenGL clip-space convention (depth in −1..1).

use glam::{Mat4, Vec2, Vec3, Vec4, Vec4Swizzles};
use serde::{Deserialize, Serialize};

/// Smallest field of view reachable through [`Projection::decrease_fov`].
pub const FOV_MIN: f32 = 2.0;
/// Largest field of view reachable through [`Projection::increase_fov`].
pub const FOV_MAX: f32 = 178.0;
/// Field-of-view change per key press, in degrees.
pub const FOV_STEP: f32 = 2.0;

/// How the scene is projected onto the viewport.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionType {
    /// Symmetric perspective frustum.
    #[default]
    Perspective,
    /// Orthographic box bounded by `ortho_lb`/`ortho_rt`.
    Orthographic,
    /// Perspective clip matrix with geometry bent around a cylinder in the
    /// vertex stage.
    Cylindrical,
}

impl ProjectionType {
    /// Next type in the perspective → orthographic → cylindrical cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Perspective => Self::Orthographic,
            Self::Orthographic => Self::Cylindrical,
            Self::Cylindrical => Self::Perspective,
        }
    }

    /// Whether this type uses the flat (non-cylindrical) shader pair.
    #[must_use]
    pub fn is_flat(self) -> bool {
        !matches!(self, Self::Cylindrical)
    }
}

/// Projection parameters plus the forward and inverse matrices computed from
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Projection type.
    pub ptype: ProjectionType,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Near clipping plane distance.
    pub z_near: f32,
    /// Far clipping plane distance.
    pub z_far: f32,
    /// Orthographic left-bottom bound.
    pub ortho_lb: Vec2,
    /// Orthographic right-top bound.
    pub ortho_rt: Vec2,
    matrix: Mat4,
    inverse: Mat4,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(30.0, 0.001, 300.0)
    }
}

impl Projection {
    /// Create a perspective projection with the given parameters and the
    /// default orthographic bounds.
    #[must_use]
    pub fn new(fov: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            ptype: ProjectionType::Perspective,
            fov,
            z_near,
            z_far,
            ortho_lb: Vec2::new(-1.3, -1.0),
            ortho_rt: Vec2::new(1.3, 1.0),
            matrix: Mat4::IDENTITY,
            inverse: Mat4::IDENTITY,
        }
    }

    /// The current projection matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// The inverse of [`matrix`](Self::matrix).
    #[must_use]
    pub fn inverse(&self) -> Mat4 {
        self.inverse
    }

    /// Recompute the forward and inverse matrices for a viewport of the given
    /// size. Cylindrical projection reuses the perspective clip matrix.
    pub fn compute(&mut self, width: u32, height: u32) {
        self.matrix = match self.ptype {
            ProjectionType::Perspective | ProjectionType::Cylindrical => {
                let aspect = width.max(1) as f32 / height.max(1) as f32;
                Mat4::perspective_rh_gl(
                    self.fov.to_radians(),
                    aspect,
                    self.z_near,
                    self.z_far,
                )
            }
            ProjectionType::Orthographic => Mat4::orthographic_rh_gl(
                self.ortho_lb.x,
                self.ortho_rt.x,
                self.ortho_lb.y,
                self.ortho_rt.y,
                self.z_near,
                self.z_far,
            ),
        };
        self.inverse = self.matrix.inverse();
    }

    /// Normalised device depth of a point on the view axis at world depth
    /// `world_z`.
    #[must_use]
    pub fn ndc_depth(&self, world_z: f32) -> f32 {
        let pp = self.matrix * Vec4::new(0.0, 0.0, world_z, 1.0);
        pp.z / pp.w
    }

    /// Map a point in normalised device coordinates back into world space,
    /// assuming it lies at the depth of the reference plane `world_z`.
    ///
    /// True depth is unknown for a 2D screen position, so the probe point
    /// `(0, 0, world_z)` is forward-projected to obtain the post-projective
    /// depth, which is then used for the inverse projection.
    #[must_use]
    pub fn unproject(&self, ndc: Vec2, world_z: f32) -> Vec3 {
        let p = Vec4::new(ndc.x, ndc.y, self.ndc_depth(world_z), 1.0);
        let v = self.inverse * p;
        v.xyz() / v.w
    }

    /// Like [`unproject`](Self::unproject) but without the divide by w.
    ///
    /// Under perspective the result always lies on the eye plane z = -1
    /// whatever `world_z` is, so geometry anchored there keeps its screen
    /// size while the scene is dollied. Orthographic results match
    /// `unproject`.
    #[must_use]
    pub fn eye_point(&self, ndc: Vec2, world_z: f32) -> Vec3 {
        let p = Vec4::new(ndc.x, ndc.y, self.ndc_depth(world_z), 1.0);
        (self.inverse * p).xyz()
    }

    /// Cycle the projection type and return the new one.
    pub fn cycle(&mut self) -> ProjectionType {
        self.ptype = self.ptype.next();
        self.ptype
    }

    /// Reduce the field of view by one step, never below [`FOV_MIN`].
    pub fn decrease_fov(&mut self) -> f32 {
        self.fov = (self.fov - FOV_STEP).max(FOV_MIN);
        self.fov
    }

    /// Increase the field of view by one step, never above [`FOV_MAX`].
    pub fn increase_fov(&mut self) -> f32 {
        self.fov = (self.fov + FOV_STEP).min(FOV_MAX);
        self.fov
    }

    /// Grow (positive `amount`) or shrink the orthographic bounds. A rescale
    /// that would move either bound across zero is rejected and `false` is
    /// returned.
    pub fn rescale_ortho(&mut self, amount: f32) -> bool {
        let lb = self.ortho_lb + amount;
        let rt = self.ortho_rt - amount;
        if lb.cmplt(Vec2::ZERO).all() && rt.cmpgt(Vec2::ZERO).all() {
            self.ortho_lb = lb;
            self.ortho_rt = rt;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn cycle_is_three_periodic() {
        let mut p = Projection::default();
        let start = p.ptype;
        let _ = p.cycle();
        assert_eq!(p.ptype, ProjectionType::Orthographic);
        let _ = p.cycle();
        assert_eq!(p.ptype, ProjectionType::Cylindrical);
        let _ = p.cycle();
        assert_eq!(p.ptype, start);
    }

    #[test]
    fn fov_decrease_clamps_at_minimum() {
        let mut p = Projection::new(30.0, 0.001, 300.0);
        for _ in 0..20 {
            let _ = p.decrease_fov();
        }
        assert_eq!(p.fov, FOV_MIN);
    }

    #[test]
    fn fov_stays_in_range_for_mixed_sequences() {
        let mut p = Projection::new(31.0, 0.001, 300.0);
        for i in 0..400 {
            if (i / 97) % 2 == 0 {
                let _ = p.increase_fov();
            } else {
                let _ = p.decrease_fov();
            }
            assert!((FOV_MIN..=FOV_MAX).contains(&p.fov));
        }
    }

    #[test]
    fn ortho_rescale_never_crosses_zero() {
        let mut p = Projection::default();
        p.ptype = ProjectionType::Orthographic;
        for _ in 0..100 {
            let _ = p.rescale_ortho(0.1);
            assert!(p.ortho_lb.x < 0.0 && p.ortho_lb.y < 0.0);
            assert!(p.ortho_rt.x > 0.0 && p.ortho_rt.y > 0.0);
        }
        for _ in 0..100 {
            let _ = p.rescale_ortho(-0.1);
            assert!(p.ortho_lb.x < 0.0 && p.ortho_rt.x > 0.0);
        }
    }

    #[test]
    fn rejected_rescale_leaves_bounds_untouched() {
        let mut p = Projection::default();
        let (lb, rt) = (p.ortho_lb, p.ortho_rt);
        assert!(!p.rescale_ortho(1.0));
        assert_eq!(p.ortho_lb, lb);
        assert_eq!(p.ortho_rt, rt);
    }

    #[test]
    fn unproject_centre_lands_on_view_axis() {
        let mut p = Projection::default();
        p.compute(640, 480);
        let v = p.unproject(Vec2::ZERO, -5.0);
        assert!(approx(v, Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn unproject_inverts_forward_projection() {
        let mut p = Projection::default();
        p.compute(800, 600);
        let world = Vec3::new(0.4, -0.2, -5.0);
        let clip = p.matrix() * world.extend(1.0);
        let ndc = clip.xy() / clip.w;
        assert!(approx(p.unproject(ndc, world.z), world));
    }

    #[test]
    fn orthographic_unproject_is_linear() {
        let mut p = Projection::default();
        p.ptype = ProjectionType::Orthographic;
        p.compute(640, 480);
        let v = p.unproject(Vec2::new(1.0, 1.0), -5.0);
        assert!(approx(v, Vec3::new(1.3, 1.0, -5.0)));
    }

    #[test]
    fn zero_sized_viewport_keeps_matrices_finite() {
        let mut p = Projection::default();
        p.compute(640, 0);
        assert!(p.matrix().is_finite());
        assert!(p.inverse().is_finite());
        p.compute(0, 0);
        assert!(p.matrix().is_finite());
        assert!(p.inverse().is_finite());
    }

    #[test]
    fn perspective_eye_point_ignores_scene_depth() {
        let mut p = Projection::default();
        p.compute(800, 600);
        let ndc = Vec2::new(-0.8, -0.8);
        let near = p.eye_point(ndc, -5.0);
        let far = p.eye_point(ndc, -20.0);
        assert!(approx(near, far));
        assert!((near.z + 1.0).abs() < 1e-4);
        // Same direction from the eye as the divided point.
        let divided = p.unproject(ndc, -5.0);
        assert!(approx(divided / -divided.z, near));
    }

    #[test]
    fn orthographic_eye_point_matches_unproject() {
        let mut p = Projection::default();
        p.ptype = ProjectionType::Orthographic;
        p.compute(640, 480);
        let ndc = Vec2::new(0.5, -0.25);
        assert!(approx(p.eye_point(ndc, -5.0), p.unproject(ndc, -5.0)));
    }
}
