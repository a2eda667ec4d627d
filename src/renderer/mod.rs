//! Renderables: the trait the scene draws through and the built-in models.
//!
//! Client geometry goes in as [`MeshModel`]s; the scene itself owns a
//! [`CoordArrows`] and the title and label [`TextModel`]s.

/// The x/y/z axis indicator.
pub mod coord_arrows;
mod draw_context;
/// CPU-side triangle mesh.
pub mod mesh;
/// Client mesh renderable.
pub mod mesh_model;
/// `Renderable` trait and shared model state.
pub mod model;
/// Font service seam and text overlays.
pub mod text;

pub use coord_arrows::CoordArrows;
pub use draw_context::DrawContext;
pub use mesh::MeshData;
pub use mesh_model::MeshModel;
pub use model::{ModelBase, Renderable};
pub use text::{FontService, TextFeatures, TextGeometry, TextModel};
