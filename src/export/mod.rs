//! File exports: PNG captures of the framebuffer and glTF scenes.

/// glTF 2.0 document built from registry meshes.
pub mod gltf;
/// Framebuffer readback to PNG.
pub mod image;

pub use gltf::GltfDocument;
pub use image::{prepare_pixels, save_png};
