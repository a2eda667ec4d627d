//! glTF 2.0 export with inline base64 buffers.
//!
//! Each model becomes one node and one mesh. Its geometry is written as four
//! buffers (indices, positions, colours, normals), each with one buffer view
//! and one accessor, in that order. All meshes share a single double-sided
//! material.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use glam::Vec3;
use serde::Serialize;

use crate::error::SceneError;
use crate::renderer::MeshData;

const TARGET_ARRAY_BUFFER: u32 = 34962;
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;
const COMPONENT_UNSIGNED_INT: u32 = 5125;
const COMPONENT_FLOAT: u32 = 5126;
const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";
/// Value of `asset.generator`.
pub const GENERATOR: &str =
    concat!("viscene ", env!("CARGO_PKG_VERSION"), " glTF export");

/// A complete glTF document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GltfDocument {
    /// Index of the scene to show.
    pub scene: usize,
    /// Scenes (always one).
    pub scenes: Vec<GltfScene>,
    /// One node per model.
    pub nodes: Vec<GltfNode>,
    /// One mesh per model.
    pub meshes: Vec<GltfMesh>,
    /// Four per model.
    pub buffers: Vec<GltfBuffer>,
    /// One per buffer.
    pub buffer_views: Vec<GltfBufferView>,
    /// One per buffer view.
    pub accessors: Vec<GltfAccessor>,
    /// The shared material.
    pub materials: Vec<GltfMaterial>,
    /// Format metadata.
    pub asset: GltfAsset,
}

/// Node list of a scene.
#[derive(Debug, Clone, Serialize)]
pub struct GltfScene {
    /// Root node indices.
    pub nodes: Vec<usize>,
}

/// A node placing one mesh.
#[derive(Debug, Clone, Serialize)]
pub struct GltfNode {
    /// Mesh index.
    pub mesh: usize,
    /// Model translation.
    pub translation: [f32; 3],
}

/// A mesh with a single primitive.
#[derive(Debug, Clone, Serialize)]
pub struct GltfMesh {
    /// Triangle primitives.
    pub primitives: Vec<GltfPrimitive>,
}

/// Indexed triangle list.
#[derive(Debug, Clone, Serialize)]
pub struct GltfPrimitive {
    /// Vertex attribute accessors.
    pub attributes: GltfAttributes,
    /// Index accessor.
    pub indices: usize,
    /// Material index.
    pub material: usize,
}

/// Attribute name to accessor index.
#[derive(Debug, Clone, Serialize)]
pub struct GltfAttributes {
    /// Vertex positions.
    #[serde(rename = "POSITION")]
    pub position: usize,
    /// Vertex colours.
    #[serde(rename = "COLOR_0")]
    pub color: usize,
    /// Vertex normals.
    #[serde(rename = "NORMAL")]
    pub normal: usize,
}

/// Inline binary data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GltfBuffer {
    /// Base64 data URI.
    pub uri: String,
    /// Decoded length.
    pub byte_length: usize,
}

/// A view over a whole buffer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GltfBufferView {
    /// Buffer index.
    pub buffer: usize,
    /// Always 0.
    pub byte_offset: usize,
    /// Bytes covered.
    pub byte_length: usize,
    /// GL binding target.
    pub target: u32,
}

/// Typed access to a buffer view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GltfAccessor {
    /// Buffer view index.
    pub buffer_view: usize,
    /// Always 0.
    pub byte_offset: usize,
    /// GL component type.
    pub component_type: u32,
    /// `SCALAR` or `VEC3`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Element count.
    pub count: usize,
    /// Componentwise maximum (positions only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<[f32; 3]>,
    /// Componentwise minimum (positions only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<[f32; 3]>,
}

/// Surface material.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GltfMaterial {
    /// Render both faces.
    pub double_sided: bool,
}

/// Format metadata.
#[derive(Debug, Clone, Serialize)]
pub struct GltfAsset {
    /// Writing tool.
    pub generator: String,
    /// glTF version.
    pub version: String,
}

impl GltfDocument {
    /// Build a document from `(translation, mesh)` pairs in draw order.
    #[must_use]
    pub fn from_models<'a>(
        models: impl IntoIterator<Item = (Vec3, &'a MeshData)>,
    ) -> Self {
        let mut doc = Self {
            scene: 0,
            scenes: Vec::new(),
            nodes: Vec::new(),
            meshes: Vec::new(),
            buffers: Vec::new(),
            buffer_views: Vec::new(),
            accessors: Vec::new(),
            materials: vec![GltfMaterial { double_sided: true }],
            asset: GltfAsset {
                generator: GENERATOR.to_owned(),
                version: "2.0".to_owned(),
            },
        };
        for (translation, mesh) in models {
            doc.push_model(translation, mesh);
        }
        doc.scenes.push(GltfScene {
            nodes: (0..doc.nodes.len()).collect(),
        });
        doc
    }

    fn push_model(&mut self, translation: Vec3, mesh: &MeshData) {
        let index = self.meshes.len();
        let first = self.accessors.len();
        let vertices = mesh.vertex_count();

        self.push_accessor(
            bytemuck::cast_slice(&mesh.indices),
            TARGET_ELEMENT_ARRAY_BUFFER,
            COMPONENT_UNSIGNED_INT,
            "SCALAR",
            mesh.indices.len(),
            None,
        );
        let bounds = mesh
            .bounds()
            .map_or(([0.0; 3], [0.0; 3]), |(lo, hi)| {
                (lo.to_array(), hi.to_array())
            });
        self.push_accessor(
            bytemuck::cast_slice(&mesh.positions),
            TARGET_ARRAY_BUFFER,
            COMPONENT_FLOAT,
            "VEC3",
            vertices,
            Some(bounds),
        );
        self.push_accessor(
            bytemuck::cast_slice(&mesh.colors),
            TARGET_ARRAY_BUFFER,
            COMPONENT_FLOAT,
            "VEC3",
            mesh.colors.len() / 3,
            None,
        );
        self.push_accessor(
            bytemuck::cast_slice(&mesh.normals),
            TARGET_ARRAY_BUFFER,
            COMPONENT_FLOAT,
            "VEC3",
            mesh.normals.len() / 3,
            None,
        );

        self.meshes.push(GltfMesh {
            primitives: vec![GltfPrimitive {
                attributes: GltfAttributes {
                    position: first + 1,
                    color: first + 2,
                    normal: first + 3,
                },
                indices: first,
                material: 0,
            }],
        });
        self.nodes.push(GltfNode {
            mesh: index,
            translation: translation.to_array(),
        });
    }

    fn push_accessor(
        &mut self,
        bytes: &[u8],
        target: u32,
        component_type: u32,
        kind: &'static str,
        count: usize,
        bounds: Option<([f32; 3], [f32; 3])>,
    ) {
        let buffer = self.buffers.len();
        self.buffers.push(GltfBuffer {
            uri: format!("{DATA_URI_PREFIX}{}", STANDARD.encode(bytes)),
            byte_length: bytes.len(),
        });
        self.buffer_views.push(GltfBufferView {
            buffer,
            byte_offset: 0,
            byte_length: bytes.len(),
            target,
        });
        self.accessors.push(GltfAccessor {
            buffer_view: buffer,
            byte_offset: 0,
            component_type,
            kind,
            count,
            max: bounds.map(|(_, hi)| hi),
            min: bounds.map(|(lo, _)| lo),
        });
    }

    /// Write the document as pretty JSON.
    ///
    /// # Errors
    ///
    /// [`SceneError::Json`] or [`SceneError::Io`].
    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        let mut mesh = MeshData::new();
        let red = Vec3::new(1.0, 0.0, 0.0);
        let a = mesh.push_vertex(Vec3::ZERO, Vec3::Z, red);
        let b = mesh.push_vertex(Vec3::X, Vec3::Z, red);
        let c = mesh.push_vertex(Vec3::new(0.0, 2.0, -1.0), Vec3::Z, red);
        mesh.push_triangle(a, b, c);
        mesh
    }

    #[test]
    fn empty_scene_has_no_nodes_or_buffers() {
        let doc = GltfDocument::from_models(std::iter::empty());
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["scenes"][0]["nodes"].as_array().unwrap().len(), 0);
        assert!(json["buffers"].as_array().unwrap().is_empty());
        assert_eq!(json["materials"][0]["doubleSided"], true);
        assert_eq!(json["asset"]["version"], "2.0");
    }

    #[test]
    fn each_model_gets_four_accessors() {
        let a = triangle();
        let b = triangle();
        let doc = GltfDocument::from_models([
            (Vec3::ZERO, &a),
            (Vec3::new(1.0, 2.0, 3.0), &b),
        ]);
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.buffers.len(), 8);
        assert_eq!(doc.accessors.len(), 8);
        assert_eq!(doc.nodes[1].translation, [1.0, 2.0, 3.0]);

        let prim = &doc.meshes[1].primitives[0];
        assert_eq!(prim.indices, 4);
        assert_eq!(prim.attributes.position, 5);
        assert_eq!(prim.attributes.color, 6);
        assert_eq!(prim.attributes.normal, 7);
    }

    #[test]
    fn accessors_describe_their_buffers() {
        let mesh = triangle();
        let doc = GltfDocument::from_models([(Vec3::ZERO, &mesh)]);
        let json = serde_json::to_value(&doc).unwrap();

        let indices = &json["accessors"][0];
        assert_eq!(indices["componentType"], 5125);
        assert_eq!(indices["type"], "SCALAR");
        assert_eq!(indices["count"], 3);
        assert!(indices.get("max").is_none());

        let positions = &json["accessors"][1];
        assert_eq!(positions["componentType"], 5126);
        assert_eq!(positions["type"], "VEC3");
        assert_eq!(positions["count"], 3);
        assert_eq!(positions["max"], serde_json::json!([1.0, 2.0, 0.0]));
        assert_eq!(positions["min"], serde_json::json!([0.0, 0.0, -1.0]));

        assert_eq!(json["bufferViews"][0]["target"], 34963);
        assert_eq!(json["bufferViews"][1]["target"], 34962);
        assert_eq!(json["buffers"][0]["byteLength"], 12);
        assert_eq!(json["buffers"][1]["byteLength"], 36);
    }

    #[test]
    fn buffers_decode_to_raw_data() {
        let mesh = triangle();
        let doc = GltfDocument::from_models([(Vec3::ZERO, &mesh)]);
        let uri = &doc.buffers[0].uri;
        let data = uri.strip_prefix(DATA_URI_PREFIX).unwrap();
        let bytes = STANDARD.decode(data).unwrap();
        let expected: &[u8] = bytemuck::cast_slice(&[0u32, 1, 2]);
        assert_eq!(bytes, expected);
    }
}
