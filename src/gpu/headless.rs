//! Recording GL and host doubles.
//!
//! [`HeadlessGl`] executes nothing; it records each call so tests (ours and
//! downstream) can assert on the exact sequence a render produced.
//! [`HeadlessHost`] counts context acquisitions, releases and swaps.
//! [`HeadlessFonts`] measures text with a fixed advance and records what
//! it was asked to draw.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use glam::Vec4;

use super::context::HostContext;
use super::gl::{GlFunctions, MeshId, ProgramId, ShaderStage, Uniform};
use crate::renderer::text::{FontService, TextFeatures, TextGeometry};
use crate::renderer::MeshData;

/// One recorded GL call.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    /// A program was compiled; carries the names of its stages.
    CompileProgram {
        /// Assigned id.
        program: ProgramId,
        /// Stage names in order.
        stages: Vec<&'static str>,
    },
    /// A program was deleted.
    DeleteProgram(ProgramId),
    /// A program was made current.
    UseProgram(ProgramId),
    /// A uniform was set.
    SetUniform {
        /// Target program.
        program: ProgramId,
        /// Uniform name.
        name: String,
        /// Value set.
        value: Uniform,
    },
    /// The viewport was set.
    Viewport {
        /// Width in framebuffer pixels.
        width: u32,
        /// Height in framebuffer pixels.
        height: u32,
    },
    /// Colour and depth were cleared.
    Clear(Vec4),
    /// Depth test and blending were enabled.
    EnableSceneDefaults,
    /// A mesh was uploaded.
    UploadMesh {
        /// Assigned id.
        mesh: MeshId,
        /// Number of indices.
        index_count: usize,
    },
    /// A mesh was drawn.
    DrawMesh(MeshId),
    /// A mesh was released.
    DeleteMesh(MeshId),
    /// The colour buffer was read back.
    ReadPixels {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
}

/// GL provider that records calls instead of executing them.
#[derive(Debug, Default)]
pub struct HeadlessGl {
    calls: RefCell<Vec<GlCall>>,
    next_id: Cell<u32>,
    meshes: RefCell<HashMap<MeshId, usize>>,
    framebuffer: RefCell<Option<Vec<u8>>>,
    fail_compile: Cell<bool>,
    fail_upload: Cell<bool>,
}

impl HeadlessGl {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    /// Take and clear the recorded calls.
    pub fn take_calls(&self) -> Vec<GlCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    /// The last value set for uniform `name` on any program.
    #[must_use]
    pub fn last_uniform(&self, name: &str) -> Option<Uniform> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            GlCall::SetUniform { name: n, value, .. } if n == name => {
                Some(*value)
            }
            _ => None,
        })
    }

    /// Number of meshes currently uploaded.
    #[must_use]
    pub fn live_meshes(&self) -> usize {
        self.meshes.borrow().len()
    }

    /// Make every subsequent `compile_program` fail.
    pub fn fail_compiles(&self, fail: bool) {
        self.fail_compile.set(fail);
    }

    /// Make every subsequent `upload_mesh` fail.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_upload.set(fail);
    }

    /// Pixels returned by `read_pixels`. Without one, reads return zeros.
    pub fn set_framebuffer(&self, pixels: Vec<u8>) {
        *self.framebuffer.borrow_mut() = Some(pixels);
    }

    fn record(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate_id(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl GlFunctions for HeadlessGl {
    fn version_string(&self) -> String {
        "4.1 headless".to_owned()
    }

    fn compile_program(
        &self,
        stages: &[ShaderStage],
    ) -> Result<ProgramId, String> {
        if self.fail_compile.get() {
            return Err("compilation disabled".to_owned());
        }
        let program = ProgramId(self.allocate_id());
        self.record(GlCall::CompileProgram {
            program,
            stages: stages.iter().map(|s| s.name).collect(),
        });
        Ok(program)
    }

    fn delete_program(&self, program: ProgramId) {
        self.record(GlCall::DeleteProgram(program));
    }

    fn use_program(&self, program: ProgramId) {
        self.record(GlCall::UseProgram(program));
    }

    fn set_uniform(&self, program: ProgramId, name: &str, value: Uniform) {
        self.record(GlCall::SetUniform {
            program,
            name: name.to_owned(),
            value,
        });
    }

    fn viewport(&self, width: u32, height: u32) {
        self.record(GlCall::Viewport { width, height });
    }

    fn clear(&self, color: Vec4) {
        self.record(GlCall::Clear(color));
    }

    fn enable_scene_defaults(&self) {
        self.record(GlCall::EnableSceneDefaults);
    }

    fn upload_mesh(&self, mesh: &MeshData) -> Result<MeshId, String> {
        if self.fail_upload.get() {
            return Err("buffer allocation disabled".to_owned());
        }
        let id = MeshId(self.allocate_id());
        let _ = self.meshes.borrow_mut().insert(id, mesh.indices.len());
        self.record(GlCall::UploadMesh {
            mesh: id,
            index_count: mesh.indices.len(),
        });
        Ok(id)
    }

    fn draw_mesh(&self, mesh: MeshId) {
        self.record(GlCall::DrawMesh(mesh));
    }

    fn delete_mesh(&self, mesh: MeshId) {
        let _ = self.meshes.borrow_mut().remove(&mesh);
        self.record(GlCall::DeleteMesh(mesh));
    }

    fn read_pixels(&self, width: u32, height: u32) -> Vec<u8> {
        self.record(GlCall::ReadPixels { width, height });
        let len = width as usize * height as usize * 4;
        match self.framebuffer.borrow().as_ref() {
            Some(pixels) if pixels.len() == len => pixels.clone(),
            _ => vec![0; len],
        }
    }
}

/// Host context double that counts calls.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    acquired: Cell<u32>,
    released: Cell<u32>,
    swaps: Cell<u32>,
    swap_interval: Cell<Option<i32>>,
}

impl HeadlessHost {
    /// Create a host with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `make_current` calls.
    #[must_use]
    pub fn acquired(&self) -> u32 {
        self.acquired.get()
    }

    /// Number of `release` calls.
    #[must_use]
    pub fn released(&self) -> u32 {
        self.released.get()
    }

    /// Number of `swap_buffers` calls.
    #[must_use]
    pub fn swaps(&self) -> u32 {
        self.swaps.get()
    }

    /// Last swap interval requested.
    #[must_use]
    pub fn swap_interval(&self) -> Option<i32> {
        self.swap_interval.get()
    }
}

impl HostContext for HeadlessHost {
    fn make_current(&self) {
        self.acquired.set(self.acquired.get() + 1);
    }

    fn release(&self) {
        self.released.set(self.released.get() + 1);
    }

    fn swap_buffers(&self) {
        self.swaps.set(self.swaps.get() + 1);
    }

    fn set_swap_interval(&self, interval: i32) {
        self.swap_interval.set(Some(interval));
    }
}

/// Advance per glyph, as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.6;

/// Font service double with fixed glyph metrics.
#[derive(Debug, Default)]
pub struct HeadlessFonts {
    attached: Cell<u32>,
    drawn: RefCell<Vec<String>>,
}

impl HeadlessFonts {
    /// Create a detached service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scenes currently attached.
    #[must_use]
    pub fn attached(&self) -> u32 {
        self.attached.get()
    }

    /// Strings drawn so far, in order.
    #[must_use]
    pub fn drawn(&self) -> Vec<String> {
        self.drawn.borrow().clone()
    }
}

impl FontService for HeadlessFonts {
    fn attach(&self) {
        self.attached.set(self.attached.get() + 1);
    }

    fn detach(&self) {
        self.attached.set(self.attached.get().saturating_sub(1));
    }

    fn geometry(&self, text: &str, features: &TextFeatures) -> TextGeometry {
        TextGeometry {
            total_width: text.chars().count() as f32
                * GLYPH_ADVANCE
                * features.font_size,
            max_bearing_y: 0.8 * features.font_size,
            max_drop: 0.2 * features.font_size,
        }
    }

    fn draw_text(
        &self,
        _gl: &dyn GlFunctions,
        _program: ProgramId,
        text: &str,
        _features: &TextFeatures,
    ) {
        self.drawn.borrow_mut().push(text.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::gl::ShaderKind;

    #[test]
    fn records_calls_in_order() {
        let gl = HeadlessGl::new();
        let program = gl
            .compile_program(&[ShaderStage {
                kind: ShaderKind::Vertex,
                name: "a.vert",
                source: String::new(),
            }])
            .unwrap();
        gl.use_program(program);
        gl.set_uniform(program, "alpha", Uniform::Float(0.5));

        assert_eq!(
            gl.take_calls(),
            vec![
                GlCall::CompileProgram {
                    program,
                    stages: vec!["a.vert"]
                },
                GlCall::UseProgram(program),
                GlCall::SetUniform {
                    program,
                    name: "alpha".to_owned(),
                    value: Uniform::Float(0.5)
                },
            ]
        );
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn mesh_lifetime_is_tracked() {
        let gl = HeadlessGl::new();
        let mesh = MeshData {
            indices: vec![0, 1, 2],
            positions: vec![0.0; 9],
            colors: vec![1.0; 9],
            normals: vec![0.0; 9],
        };
        let id = gl.upload_mesh(&mesh).unwrap();
        assert_eq!(gl.live_meshes(), 1);
        gl.delete_mesh(id);
        assert_eq!(gl.live_meshes(), 0);

        gl.fail_uploads(true);
        assert!(gl.upload_mesh(&mesh).is_err());
    }

    #[test]
    fn fonts_measure_with_fixed_advance() {
        let fonts = HeadlessFonts::new();
        let g = fonts.geometry("abcd", &TextFeatures::with_size(0.5, 24));
        assert!((g.total_width - 1.2).abs() < 1e-6);
        assert!((g.height() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn read_pixels_uses_framebuffer_of_matching_size() {
        let gl = HeadlessGl::new();
        assert_eq!(gl.read_pixels(2, 1), vec![0; 8]);
        gl.set_framebuffer(vec![7; 8]);
        assert_eq!(gl.read_pixels(2, 1), vec![7; 8]);
        assert_eq!(gl.read_pixels(1, 1), vec![0; 4]);
    }
}
