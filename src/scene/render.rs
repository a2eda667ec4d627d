//! Frame sequencing.
//!
//! One frame binds the graphics program for the current projection, sets
//! the frame-wide uniforms, then draws the coordinate arrows, the registry
//! models in order, and the title and labels, before handing the frame to
//! the host to present.

use std::rc::Rc;

use glam::{Quat, UVec2, Vec2, Vec3};

use super::Scene;
use crate::camera::ProjectionType;
use crate::error::SceneError;
use crate::gpu::{ContextGuard, Uniform};
use crate::renderer::{DrawContext, Renderable};

impl Scene {
    /// Framebuffer size: the window size times the pixel ratio.
    #[must_use]
    pub fn framebuffer_size(&self) -> UVec2 {
        let window = self.mapper.window_size().as_vec2();
        (window * self.options.display.pixel_ratio).as_uvec2()
    }

    /// Scene-space position of a screen point given in normalised device
    /// coordinates, at the text depth.
    #[must_use]
    pub fn text_position(&self, ndc: Vec2) -> Vec3 {
        self.projection.unproject(ndc, self.options.display.text_z)
    }

    /// Render one frame and present it. Initialises GL first if needed.
    ///
    /// # Errors
    ///
    /// [`SceneError::ShaderLoad`] if the program for the projection cannot
    /// be built, [`SceneError::Gl`] if a model cannot upload its geometry.
    pub fn render(&mut self) -> Result<(), SceneError> {
        self.init_gl()?;

        let context = Rc::clone(&self.context);
        let guard = ContextGuard::acquire(context.as_ref());
        let gl = Rc::clone(&self.gl);
        let gl = gl.as_ref();
        let ptype = self.projection.ptype;

        let graphics = self.programs.ensure_graphics(gl, ptype)?;
        let text = self.programs.text();

        gl.use_program(graphics);
        let fb = self.framebuffer_size();
        gl.viewport(fb.x, fb.y);

        self.refresh_projection();
        if ptype == ProjectionType::Cylindrical {
            let cam = &self.camera;
            let uniforms = [
                ("cyl_cam_pos", Uniform::Vec4(cam.cyl_cam_pos)),
                ("cyl_radius", Uniform::Float(cam.cyl_radius)),
                ("cyl_height", Uniform::Float(cam.cyl_height)),
            ];
            for (name, value) in uniforms {
                gl.set_uniform(graphics, name, value);
            }
        }
        let scene_view = self.camera.scene_view(ptype);

        let background = self.background();
        gl.clear(background);

        let lighting = &self.options.lighting;
        gl.set_uniform(
            graphics,
            "light_colour",
            Uniform::Vec3(Vec3::from_array(lighting.light_colour)),
        );
        gl.set_uniform(
            graphics,
            "ambient_intensity",
            Uniform::Float(lighting.ambient_intensity),
        );
        gl.set_uniform(
            graphics,
            "diffuse_position",
            Uniform::Vec3(Vec3::from_array(lighting.diffuse_position)),
        );
        gl.set_uniform(
            graphics,
            "diffuse_intensity",
            Uniform::Float(lighting.diffuse_intensity),
        );

        let projection = Uniform::Mat4(self.projection.matrix());
        if let Some(text) = text {
            gl.use_program(text);
            gl.set_uniform(text, "p_matrix", projection);
        }
        gl.use_program(graphics);
        gl.set_uniform(graphics, "p_matrix", projection);

        let arrows_anchor = self.projection.eye_point(
            Vec2::from_array(self.options.display.coord_arrows_offset),
            self.camera.translation.z,
        );
        let text_anchor = self.text_position(Vec2::from_array(
            self.options.display.title_position,
        ));

        let ctx = DrawContext {
            gl,
            graphics,
            text,
            fonts: self.fonts.as_deref(),
        };

        let display = &self.options.display;
        if display.show_coord_arrows && ptype.is_flat() {
            if let Some(arrows) = &mut self.coord_arrows {
                arrows.set_colour_for_background(background);
                if display.coord_arrows_in_scene {
                    arrows.set_view_rotation(Quat::IDENTITY);
                    arrows.set_scene_matrix(scene_view);
                } else {
                    arrows.set_scene_translation(arrows_anchor);
                    arrows.set_view_rotation(self.camera.rotation);
                }
                arrows.render(&ctx)?;
            }
        }

        let translation_only = self.camera.translation_only();
        for model in self.models.iter_mut() {
            if model.is_two_dimensional() {
                model.set_scene_matrix(translation_only);
            } else {
                model.set_scene_matrix(scene_view);
            }
            model.render(&ctx)?;
        }

        if display.show_title {
            if let Some(title) = &mut self.title_text {
                title.set_scene_translation(text_anchor);
                title.set_visible_on(background);
                title.render(&ctx)?;
            }
        }
        for label in &mut self.labels {
            label.set_scene_translation(text_anchor);
            label.set_visible_on(background);
            label.render(&ctx)?;
        }

        guard.swap_buffers();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec4};

    use super::*;
    use crate::gpu::{GlCall, ProgramId};
    use crate::renderer::{MeshData, MeshModel, TextFeatures};
    use crate::scene::test_support::{options, rig, rig_with};

    const TEST_BACKGROUND: Vec4 = Vec4::new(0.2, 0.2, 0.2, 1.0);

    fn cube() -> MeshData {
        let mut mesh = MeshData::new();
        mesh.push_cuboid(Vec3::ZERO, Vec3::ONE, Vec3::X);
        mesh
    }

    fn matrix_uniforms(calls: &[GlCall], name: &str) -> Vec<Mat4> {
        calls
            .iter()
            .filter_map(|c| match c {
                GlCall::SetUniform {
                    name: n,
                    value: Uniform::Mat4(m),
                    ..
                } if n == name => Some(*m),
                _ => None,
            })
            .collect()
    }

    fn position(calls: &[GlCall], wanted: impl Fn(&GlCall) -> bool) -> usize {
        calls.iter().position(wanted).unwrap()
    }

    #[test]
    fn frame_follows_sequencing_order() {
        let mut r = rig();
        r.scene.set_background(TEST_BACKGROUND);
        let _ = r.scene.add_model(Box::new(MeshModel::new(cube(), Vec3::ZERO)));
        r.scene.render().unwrap();
        let calls = r.gl.calls();

        let uniform = |wanted: &'static str| {
            move |c: &GlCall| {
                matches!(c, GlCall::SetUniform { name, .. } if name == wanted)
            }
        };
        let viewport =
            position(&calls, |c| matches!(c, GlCall::Viewport { .. }));
        let clear = position(&calls, |c| *c == GlCall::Clear(TEST_BACKGROUND));
        let light = position(&calls, uniform("light_colour"));
        let p_matrix = position(&calls, uniform("p_matrix"));
        let draw = position(&calls, |c| matches!(c, GlCall::DrawMesh(_)));

        assert!(viewport < clear);
        assert!(clear < light);
        assert!(light < p_matrix);
        assert!(p_matrix < draw);
        assert_eq!(r.host.swaps(), 1);
        assert_eq!(r.host.acquired(), r.host.released());
    }

    #[test]
    fn projection_goes_to_text_then_graphics() {
        let mut r = rig();
        r.scene.render().unwrap();
        let calls = r.gl.calls();
        let programs: Vec<ProgramId> = calls
            .iter()
            .filter_map(|c| match c {
                GlCall::SetUniform { program, name, .. }
                    if name == "p_matrix" =>
                {
                    Some(*program)
                }
                _ => None,
            })
            .collect();
        let graphics = r.scene.programs.graphics().unwrap();
        let text = r.scene.programs.text().unwrap();
        assert_eq!(programs, vec![text, graphics]);
    }

    #[test]
    fn two_dimensional_models_ignore_rotation() {
        let mut r = rig();
        r.scene.set_rotation(Quat::from_rotation_y(0.5));
        let _ = r.scene.add_model(Box::new(MeshModel::new(cube(), Vec3::ZERO)));
        let _ = r.scene.add_model(Box::new(MeshModel::two_dimensional(
            cube(),
            Vec3::ZERO,
        )));
        r.scene.render().unwrap();

        let cam = r.scene.camera();
        let views = matrix_uniforms(&r.gl.calls(), "v_matrix");
        assert_eq!(views.len(), 2);
        assert_eq!(views[0], cam.scene_view(ProjectionType::Perspective));
        assert_eq!(views[1], Mat4::from_translation(cam.translation));
    }

    #[test]
    fn hidden_models_draw_nothing() {
        let mut r = rig();
        let index =
            r.scene.add_model(Box::new(MeshModel::new(cube(), Vec3::ZERO)));
        r.scene.models_mut()[index].toggle_hide();
        r.scene.render().unwrap();
        assert!(!r.gl.calls().iter().any(|c| matches!(c, GlCall::DrawMesh(_))));
    }

    #[test]
    fn cylindrical_uploads_camera_uniforms_without_translation() {
        let mut r = rig();
        r.scene.projection_mut().ptype = ProjectionType::Cylindrical;
        let _ = r.scene.add_model(Box::new(MeshModel::new(cube(), Vec3::ZERO)));
        r.scene.render().unwrap();

        let gl = &r.gl;
        let cam = r.scene.camera();
        assert_eq!(
            gl.last_uniform("cyl_cam_pos"),
            Some(Uniform::Vec4(cam.cyl_cam_pos))
        );
        assert_eq!(
            gl.last_uniform("cyl_radius"),
            Some(Uniform::Float(cam.cyl_radius))
        );
        let views = matrix_uniforms(&gl.calls(), "v_matrix");
        assert_eq!(views[0].w_axis.z, 0.0);
    }

    #[test]
    fn shader_reloads_only_on_kind_change() {
        let mut r = rig();
        r.scene.render().unwrap();
        let _ = r.gl.take_calls();

        // Perspective → orthographic keeps the same program.
        r.scene.projection_mut().ptype = ProjectionType::Orthographic;
        r.scene.render().unwrap();
        let compiles = |calls: &[GlCall]| {
            calls
                .iter()
                .filter(|c| matches!(c, GlCall::CompileProgram { .. }))
                .count()
        };
        assert_eq!(compiles(&r.gl.take_calls()), 0);

        r.scene.projection_mut().ptype = ProjectionType::Cylindrical;
        r.scene.render().unwrap();
        assert_eq!(compiles(&r.gl.take_calls()), 1);
    }

    #[test]
    fn coord_arrows_follow_placement_mode() {
        let mut opts = options();
        opts.display.show_coord_arrows = true;
        let mut r = rig_with(opts, false);
        r.scene.set_rotation(Quat::from_rotation_x(0.3));
        r.scene.render().unwrap();

        let anchor = r.scene.projection().eye_point(
            Vec2::from_array(r.scene.options().display.coord_arrows_offset),
            r.scene.camera().translation.z,
        );
        let views = matrix_uniforms(&r.gl.calls(), "v_matrix");
        assert_eq!(views[0], Mat4::from_translation(anchor));
        assert!((anchor.z + 1.0).abs() < 1e-4);

        r.scene.options_mut().display.coord_arrows_in_scene = true;
        let _ = r.gl.take_calls();
        r.scene.render().unwrap();
        let views = matrix_uniforms(&r.gl.calls(), "v_matrix");
        let expected = r.scene.camera().scene_view(ProjectionType::Perspective);
        assert_eq!(views[0], expected);
    }

    #[test]
    fn screen_fixed_arrows_ignore_scene_depth() {
        let mut opts = options();
        opts.display.show_coord_arrows = true;
        let mut r = rig_with(opts, false);

        r.scene.set_translation(Vec3::new(0.0, 0.0, -5.0));
        r.scene.render().unwrap();
        let near = matrix_uniforms(&r.gl.take_calls(), "v_matrix")[0];

        r.scene.set_translation(Vec3::new(0.0, 0.0, -20.0));
        r.scene.render().unwrap();
        let far = matrix_uniforms(&r.gl.take_calls(), "v_matrix")[0];

        assert!(near.abs_diff_eq(far, 1e-4));
        assert!((near.w_axis.z + 1.0).abs() < 1e-4);
    }

    #[test]
    fn coord_arrows_skipped_in_cylindrical() {
        let mut opts = options();
        opts.display.show_coord_arrows = true;
        let mut r = rig_with(opts, false);
        r.scene.projection_mut().ptype = ProjectionType::Cylindrical;
        r.scene.render().unwrap();
        assert!(!r.gl.calls().iter().any(|c| matches!(c, GlCall::DrawMesh(_))));
    }

    #[test]
    fn title_and_labels_render_at_text_anchor() {
        let mut opts = options();
        opts.display.show_title = true;
        let mut r = rig_with(opts, true);
        r.scene.init_gl().unwrap();
        let _ = r
            .scene
            .add_label("label", Vec3::ZERO, TextFeatures::default())
            .unwrap();
        r.scene.render().unwrap();
        assert_eq!(r.fonts.drawn(), vec!["Test scene", "label"]);

        let anchor = r.scene.text_position(Vec2::new(-0.8, 0.8));
        let views = matrix_uniforms(&r.gl.calls(), "v_matrix");
        assert!(views.iter().all(|m| *m == Mat4::from_translation(anchor)));
    }

    #[test]
    fn text_is_skipped_without_fonts() {
        let mut opts = options();
        opts.display.show_title = true;
        let mut r = rig_with(opts, false);
        r.scene.render().unwrap();
        assert!(r.fonts.drawn().is_empty());
    }
}
