//! Saving the framebuffer, the models and the view.

use std::path::Path;
use std::rc::Rc;

use glam::IVec2;

use super::Scene;
use crate::camera::ViewSnapshot;
use crate::error::SceneError;
use crate::export::{prepare_pixels, save_png, GltfDocument};
use crate::gpu::ContextGuard;

impl Scene {
    /// Read back the framebuffer and save it as a PNG at `path`. Alpha is
    /// forced opaque unless `transparent` is set.
    ///
    /// Returns the image size in pixels, or `(-1, -1)` after logging the
    /// error if the image could not be written.
    pub fn save_image(&mut self, path: &Path, transparent: bool) -> IVec2 {
        let size = self.framebuffer_size();
        let raw = {
            let context = Rc::clone(&self.context);
            let _guard = ContextGuard::acquire(context.as_ref());
            self.gl.read_pixels(size.x, size.y)
        };
        let pixels = prepare_pixels(&raw, size.x, size.y, transparent);
        match save_png(path, pixels, size.x, size.y) {
            Ok(()) => size.as_ivec2(),
            Err(e) => {
                log::error!("could not save {}: {e}", path.display());
                IVec2::splat(-1)
            }
        }
    }

    /// Write every model that has geometry to a glTF file at `path`, in
    /// registry order.
    ///
    /// # Errors
    ///
    /// [`SceneError::Json`] or [`SceneError::Io`].
    pub fn save_gltf(&self, path: &Path) -> Result<(), SceneError> {
        let models = self.models.iter().filter_map(|model| {
            model.mesh().map(|mesh| (model.base().translation, mesh))
        });
        GltfDocument::from_models(models).save(path)
    }

    /// Write the current translation and rotation to the snapshot file.
    ///
    /// # Errors
    ///
    /// [`SceneError::Json`] or [`SceneError::Io`].
    pub fn save_snapshot(&self) -> Result<(), SceneError> {
        ViewSnapshot::capture(&self.camera).save(&self.options.snapshot.path)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::gpu::GlCall;
    use crate::renderer::{MeshData, MeshModel, TextFeatures, TextModel};
    use crate::scene::test_support::{options, rig, rig_with};

    fn temp(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("viscene-out-{}-{name}", std::process::id()))
    }

    #[test]
    fn image_size_scales_with_pixel_ratio() {
        let mut opts = options();
        opts.display.pixel_ratio = 2.0;
        let mut r = rig_with(opts, false);
        let path = temp("ratio.png");
        let size = r.scene.save_image(&path, false);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(size, IVec2::new(1600, 1200));
        assert!(r.gl.calls().contains(&GlCall::ReadPixels {
            width: 1600,
            height: 1200
        }));
        assert_eq!(r.host.acquired(), r.host.released());
    }

    #[test]
    fn unwritable_image_path_returns_sentinel() {
        let mut r = rig();
        let path = temp("missing-dir").join("nested").join("x.png");
        assert_eq!(r.scene.save_image(&path, true), IVec2::splat(-1));
    }

    #[test]
    fn gltf_skips_models_without_geometry() {
        let mut r = rig();
        let mut mesh = MeshData::new();
        mesh.push_cuboid(Vec3::ZERO, Vec3::ONE, Vec3::Y);
        let model = MeshModel::new(mesh, Vec3::new(2.0, 0.0, 0.0));
        let _ = r.scene.add_model(Box::new(model));
        let _ = r
            .scene
            .add_model(Box::new(TextModel::new(TextFeatures::default())));

        let path = temp("scene.gltf");
        r.scene.save_gltf(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap())
                .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(json["nodes"].as_array().unwrap().len(), 1);
        assert_eq!(json["nodes"][0]["translation"][0], 2.0);
        assert_eq!(json["buffers"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn empty_scene_gltf_has_no_buffers() {
        let r = rig();
        let path = temp("empty.gltf");
        r.scene.save_gltf(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap())
                .unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(json["nodes"].as_array().unwrap().is_empty());
        assert!(json["buffers"].as_array().unwrap().is_empty());
    }
}
