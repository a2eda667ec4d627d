//! [`GlFunctions`] over a `glow` context.
//!
//! Scene-level ids ([`ProgramId`], [`MeshId`]) map to glow handles through
//! hash tables so the trait surface stays free of backend types.

use std::cell::{Cell, RefCell};

use glam::Vec4;
use glow::HasContext;
use rustc_hash::FxHashMap;

use super::gl::{
    GlFunctions, MeshId, ProgramId, ShaderKind, ShaderStage, Uniform,
    ATTRIB_COLOR, ATTRIB_NORMAL, ATTRIB_POSITION,
};
use crate::renderer::MeshData;

struct GlowMesh {
    vao: glow::VertexArray,
    buffers: [glow::Buffer; 4],
    index_count: i32,
}

/// GL provider backed by a loaded `glow::Context`.
pub struct GlowFunctions {
    gl: glow::Context,
    programs: RefCell<FxHashMap<ProgramId, glow::Program>>,
    meshes: RefCell<FxHashMap<MeshId, GlowMesh>>,
    next_id: Cell<u32>,
}

impl GlowFunctions {
    /// Wrap an already-loaded context.
    #[must_use]
    pub fn new(gl: glow::Context) -> Self {
        Self {
            gl,
            programs: RefCell::new(FxHashMap::default()),
            meshes: RefCell::new(FxHashMap::default()),
            next_id: Cell::new(0),
        }
    }

    /// Load GL function pointers with the host's proc-address lookup.
    ///
    /// # Safety
    ///
    /// The context the loader belongs to must be current, and `loader` must
    /// return valid function pointers for it.
    pub unsafe fn from_loader<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const std::ffi::c_void,
    {
        // SAFETY: upheld by the caller.
        Self::new(unsafe { glow::Context::from_loader_function(loader) })
    }

    /// The wrapped context, for host-side drawing (fonts, overlays).
    #[must_use]
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    fn allocate_id(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn program(&self, id: ProgramId) -> Option<glow::Program> {
        self.programs.borrow().get(&id).copied()
    }

    fn compile_stage(
        &self,
        stage: &ShaderStage,
    ) -> Result<glow::Shader, String> {
        let kind = match stage.kind {
            ShaderKind::Vertex => glow::VERTEX_SHADER,
            ShaderKind::Fragment => glow::FRAGMENT_SHADER,
        };
        // SAFETY: the context is current while the scene holds its guard.
        unsafe {
            let shader = self.gl.create_shader(kind)?;
            self.gl.shader_source(shader, &stage.source);
            self.gl.compile_shader(shader);
            if self.gl.get_shader_compile_status(shader) {
                Ok(shader)
            } else {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                Err(format!("{}: {log}", stage.name))
            }
        }
    }

    fn array_buffer(
        &self,
        location: u32,
        data: &[f32],
    ) -> Result<glow::Buffer, String> {
        // SAFETY: a vertex array is bound by `upload_mesh`.
        unsafe {
            let buffer = self.gl.create_buffer()?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
            self.gl.vertex_attrib_pointer_f32(
                location,
                3,
                glow::FLOAT,
                false,
                0,
                0,
            );
            self.gl.enable_vertex_attrib_array(location);
            Ok(buffer)
        }
    }
}

impl GlFunctions for GlowFunctions {
    fn version_string(&self) -> String {
        // SAFETY: plain state query.
        unsafe { self.gl.get_parameter_string(glow::VERSION) }
    }

    fn compile_program(
        &self,
        stages: &[ShaderStage],
    ) -> Result<ProgramId, String> {
        let mut shaders = Vec::with_capacity(stages.len());
        for stage in stages {
            match self.compile_stage(stage) {
                Ok(shader) => shaders.push(shader),
                Err(log) => {
                    // SAFETY: deleting shaders created above.
                    unsafe {
                        for shader in shaders {
                            self.gl.delete_shader(shader);
                        }
                    }
                    return Err(log);
                }
            }
        }

        // SAFETY: all handles were created on this context.
        let program = unsafe {
            let program = self.gl.create_program()?;
            for &shader in &shaders {
                self.gl.attach_shader(program, shader);
            }
            self.gl.link_program(program);
            for &shader in &shaders {
                self.gl.detach_shader(program, shader);
                self.gl.delete_shader(shader);
            }
            if !self.gl.get_program_link_status(program) {
                let log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(log);
            }
            program
        };

        let id = ProgramId(self.allocate_id());
        let _ = self.programs.borrow_mut().insert(id, program);
        Ok(id)
    }

    fn delete_program(&self, program: ProgramId) {
        if let Some(p) = self.programs.borrow_mut().remove(&program) {
            // SAFETY: `p` was created on this context.
            unsafe { self.gl.delete_program(p) };
        }
    }

    fn use_program(&self, program: ProgramId) {
        let p = self.program(program);
        // SAFETY: `None` unbinds; `Some` is a live program.
        unsafe { self.gl.use_program(p) };
    }

    fn set_uniform(&self, program: ProgramId, name: &str, value: Uniform) {
        let Some(p) = self.program(program) else {
            return;
        };
        // SAFETY: `p` is live; a missing location is a no-op.
        unsafe {
            let Some(loc) = self.gl.get_uniform_location(p, name) else {
                return;
            };
            let loc = Some(&loc);
            match value {
                Uniform::Float(v) => self.gl.uniform_1_f32(loc, v),
                Uniform::Vec3(v) => self.gl.uniform_3_f32(loc, v.x, v.y, v.z),
                Uniform::Vec4(v) => {
                    self.gl.uniform_4_f32(loc, v.x, v.y, v.z, v.w);
                }
                Uniform::Mat4(m) => {
                    let cols = m.to_cols_array();
                    self.gl.uniform_matrix_4_f32_slice(loc, false, &cols);
                }
            }
        }
    }

    fn viewport(&self, width: u32, height: u32) {
        // SAFETY: plain state change.
        unsafe { self.gl.viewport(0, 0, width as i32, height as i32) };
    }

    fn clear(&self, color: Vec4) {
        // SAFETY: plain state change.
        unsafe {
            self.gl.clear_color(color.x, color.y, color.z, color.w);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn enable_scene_defaults(&self) {
        // SAFETY: plain state change.
        unsafe {
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.enable(glow::BLEND);
            self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            self.gl.disable(glow::CULL_FACE);
        }
    }

    fn upload_mesh(&self, mesh: &MeshData) -> Result<MeshId, String> {
        // SAFETY: handles are created, bound and filled on this context.
        let uploaded = unsafe {
            let vao = self.gl.create_vertex_array()?;
            self.gl.bind_vertex_array(Some(vao));

            let index = self.gl.create_buffer()?;
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index));
            self.gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&mesh.indices),
                glow::STATIC_DRAW,
            );
            let position = self.array_buffer(ATTRIB_POSITION, &mesh.positions)?;
            let normal = self.array_buffer(ATTRIB_NORMAL, &mesh.normals)?;
            let color = self.array_buffer(ATTRIB_COLOR, &mesh.colors)?;

            self.gl.bind_vertex_array(None);
            GlowMesh {
                vao,
                buffers: [index, position, normal, color],
                index_count: mesh.indices.len() as i32,
            }
        };

        let id = MeshId(self.allocate_id());
        let _ = self.meshes.borrow_mut().insert(id, uploaded);
        Ok(id)
    }

    fn draw_mesh(&self, mesh: MeshId) {
        let meshes = self.meshes.borrow();
        let Some(m) = meshes.get(&mesh) else {
            return;
        };
        // SAFETY: `m.vao` is live and holds its own element buffer binding.
        unsafe {
            self.gl.bind_vertex_array(Some(m.vao));
            self.gl.draw_elements(
                glow::TRIANGLES,
                m.index_count,
                glow::UNSIGNED_INT,
                0,
            );
            self.gl.bind_vertex_array(None);
        }
    }

    fn delete_mesh(&self, mesh: MeshId) {
        if let Some(m) = self.meshes.borrow_mut().remove(&mesh) {
            // SAFETY: handles were created on this context.
            unsafe {
                for buffer in m.buffers {
                    self.gl.delete_buffer(buffer);
                }
                self.gl.delete_vertex_array(m.vao);
            }
        }
    }

    fn read_pixels(&self, width: u32, height: u32) -> Vec<u8> {
        let mut pixels = vec![0; width as usize * height as usize * 4];
        // SAFETY: `pixels` holds exactly width * height RGBA8 texels.
        unsafe {
            self.gl.pixel_store_i32(glow::PACK_ALIGNMENT, 1);
            self.gl.read_pixels(
                0,
                0,
                width as i32,
                height as i32,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(&mut pixels),
            );
        }
        pixels
    }
}
