//! Default GLSL sources and the scene's shader program set.
//!
//! Three programs cover every projection: the flat graphics program
//! (perspective and orthographic), the cylindrical graphics program and the
//! text program. Only one graphics program is alive at a time; it is
//! swapped when the projection type moves between flat and cylindrical.

use super::gl::{GlFunctions, ProgramId, ShaderKind, ShaderStage};
use crate::camera::ProjectionType;
use crate::error::SceneError;

/// GL/GLSL dialect the shaders are generated for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum GlVersion {
    /// Desktop OpenGL 4.1 core (the newest macOS supports).
    #[default]
    Gl41,
    /// Desktop OpenGL 4.3 core.
    Gl43,
    /// OpenGL ES 3.1.
    Gles31,
}

impl GlVersion {
    /// Shader preamble: `#version` line plus precision qualifiers for ES.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::Gl41 => "#version 410 core\n",
            Self::Gl43 => "#version 430 core\n",
            Self::Gles31 => "#version 310 es\nprecision mediump float;\n",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Gl41 => "OpenGL 4.1",
            Self::Gl43 => "OpenGL 4.3",
            Self::Gles31 => "OpenGL ES 3.1",
        }
    }
}

const SCENE_VERTEX: &str = r"
uniform mat4 m_matrix;
uniform mat4 v_matrix;
uniform mat4 p_matrix;
uniform float alpha;

layout(location = 0) in vec3 position;
layout(location = 1) in vec3 normalin;
layout(location = 2) in vec3 color;

out VERTEX {
    vec4 normal;
    vec4 color;
    vec3 fragpos;
} vertex;

void main()
{
    vec4 world = v_matrix * m_matrix * vec4(position, 1.0);
    gl_Position = p_matrix * world;
    vertex.color = vec4(color, alpha);
    vertex.fragpos = world.xyz;
    vertex.normal = v_matrix * m_matrix * vec4(normalin, 0.0);
}
";

const CYLINDRICAL_VERTEX: &str = r"
uniform mat4 m_matrix;
uniform mat4 v_matrix;
uniform vec4 cyl_cam_pos;
uniform float cyl_radius;
uniform float cyl_height;
uniform float alpha;

layout(location = 0) in vec3 position;
layout(location = 1) in vec3 normalin;
layout(location = 2) in vec3 color;

out VERTEX {
    vec4 normal;
    vec4 color;
    vec3 fragpos;
} vertex;

const float PI = 3.1415926535897932;

void main()
{
    vec4 world = v_matrix * m_matrix * vec4(position, 1.0);
    vec3 rel = world.xyz - cyl_cam_pos.xyz;

    // Project onto a cylinder of radius cyl_radius around the camera's z axis
    // and unroll it: angle maps to x, height on the cylinder maps to y.
    float rho = max(length(rel.xy), 1e-6);
    float theta = atan(rel.x, rel.y);
    float h = cyl_radius * rel.z / rho;
    float depth = 2.0 * (rho / (rho + 1.0)) - 1.0;

    gl_Position = vec4(theta / PI, h / (0.5 * cyl_height), depth, 1.0);
    vertex.color = vec4(color, alpha);
    vertex.fragpos = world.xyz;
    vertex.normal = v_matrix * m_matrix * vec4(normalin, 0.0);
}
";

const SCENE_FRAGMENT: &str = r"
uniform vec3 light_colour;
uniform float ambient_intensity;
uniform vec3 diffuse_position;
uniform float diffuse_intensity;

in VERTEX {
    vec4 normal;
    vec4 color;
    vec3 fragpos;
} vertex;

out vec4 finalcolor;

void main()
{
    vec3 ambient = ambient_intensity * light_colour;
    vec3 norm = normalize(vertex.normal.xyz);
    vec3 light_dir = normalize(diffuse_position - vertex.fragpos);
    float effect = max(dot(norm, light_dir), 0.0);
    vec3 diffuse = diffuse_intensity * effect * light_colour;
    finalcolor = vec4((ambient + diffuse) * vertex.color.rgb, vertex.color.a);
}
";

const TEXT_VERTEX: &str = r"
uniform mat4 m_matrix;
uniform mat4 v_matrix;
uniform mat4 p_matrix;

layout(location = 0) in vec3 position;
layout(location = 1) in vec2 texcoord;

out vec2 tex_coord;

void main()
{
    gl_Position = p_matrix * v_matrix * m_matrix * vec4(position, 1.0);
    tex_coord = texcoord;
}
";

const TEXT_FRAGMENT: &str = r"
uniform sampler2D text_texture;
uniform vec3 text_colour;
uniform float alpha;

in vec2 tex_coord;
out vec4 finalcolor;

void main()
{
    float coverage = texture(text_texture, tex_coord).r;
    finalcolor = vec4(text_colour, coverage * alpha);
}
";

fn stage(
    kind: ShaderKind,
    name: &'static str,
    body: &str,
    version: GlVersion,
) -> ShaderStage {
    ShaderStage {
        kind,
        name,
        source: format!("{}{body}", version.header()),
    }
}

/// Stages of the flat (perspective/orthographic) graphics program.
#[must_use]
pub fn scene_stages(version: GlVersion) -> Vec<ShaderStage> {
    vec![
        stage(ShaderKind::Vertex, "scene.vert", SCENE_VERTEX, version),
        stage(ShaderKind::Fragment, "scene.frag", SCENE_FRAGMENT, version),
    ]
}

/// Stages of the cylindrical graphics program.
#[must_use]
pub fn cylindrical_stages(version: GlVersion) -> Vec<ShaderStage> {
    vec![
        stage(
            ShaderKind::Vertex,
            "cylindrical.vert",
            CYLINDRICAL_VERTEX,
            version,
        ),
        stage(ShaderKind::Fragment, "scene.frag", SCENE_FRAGMENT, version),
    ]
}

/// Stages of the text program.
#[must_use]
pub fn text_stages(version: GlVersion) -> Vec<ShaderStage> {
    vec![
        stage(ShaderKind::Vertex, "text.vert", TEXT_VERTEX, version),
        stage(ShaderKind::Fragment, "text.frag", TEXT_FRAGMENT, version),
    ]
}

/// Which graphics program is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicsShader {
    /// Nothing loaded yet.
    #[default]
    None,
    /// Flat projection program.
    Projection2d,
    /// Cylindrical projection program.
    Cylindrical,
}

impl GraphicsShader {
    /// The program a projection type renders with.
    #[must_use]
    pub fn for_projection(ptype: ProjectionType) -> Self {
        match ptype {
            ProjectionType::Perspective | ProjectionType::Orthographic => {
                Self::Projection2d
            }
            ProjectionType::Cylindrical => Self::Cylindrical,
        }
    }
}

/// The scene's linked programs.
#[derive(Debug, Default)]
pub struct ShaderPrograms {
    graphics: Option<ProgramId>,
    text: Option<ProgramId>,
    active: GraphicsShader,
    version: GlVersion,
}

impl ShaderPrograms {
    /// An empty set targeting `version`.
    #[must_use]
    pub fn new(version: GlVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    /// The loaded graphics program.
    #[must_use]
    pub fn graphics(&self) -> Option<ProgramId> {
        self.graphics
    }

    /// The loaded text program.
    #[must_use]
    pub fn text(&self) -> Option<ProgramId> {
        self.text
    }

    /// Which graphics program is loaded.
    #[must_use]
    pub fn active(&self) -> GraphicsShader {
        self.active
    }

    /// Dialect the programs are compiled for.
    #[must_use]
    pub fn version(&self) -> GlVersion {
        self.version
    }

    /// Make sure the graphics program for `ptype` is loaded, replacing the
    /// current one only if the required kind differs.
    ///
    /// # Errors
    ///
    /// [`SceneError::ShaderLoad`] if compilation or linking fails; the
    /// previous program has already been deleted at that point.
    pub fn ensure_graphics(
        &mut self,
        gl: &dyn GlFunctions,
        ptype: ProjectionType,
    ) -> Result<ProgramId, SceneError> {
        let wanted = GraphicsShader::for_projection(ptype);
        if let Some(program) = self.graphics.filter(|_| self.active == wanted) {
            return Ok(program);
        }

        if let Some(old) = self.graphics.take() {
            gl.delete_program(old);
        }
        self.active = GraphicsShader::None;

        let (name, stages) = match wanted {
            GraphicsShader::Cylindrical => {
                ("cylindrical", cylindrical_stages(self.version))
            }
            GraphicsShader::Projection2d | GraphicsShader::None => {
                ("scene", scene_stages(self.version))
            }
        };
        let program = compile(gl, name, &stages)?;
        log::debug!("loaded {name} shader program {program:?}");

        self.graphics = Some(program);
        self.active = wanted;
        Ok(program)
    }

    /// Make sure the text program is loaded.
    ///
    /// # Errors
    ///
    /// [`SceneError::ShaderLoad`] if compilation or linking fails.
    pub fn ensure_text(
        &mut self,
        gl: &dyn GlFunctions,
    ) -> Result<ProgramId, SceneError> {
        if let Some(program) = self.text {
            return Ok(program);
        }
        let program = compile(gl, "text", &text_stages(self.version))?;
        log::debug!("loaded text shader program {program:?}");
        self.text = Some(program);
        Ok(program)
    }

    /// Delete every loaded program.
    pub fn release(&mut self, gl: &dyn GlFunctions) {
        let loaded = [self.graphics.take(), self.text.take()];
        for program in loaded.into_iter().flatten() {
            gl.delete_program(program);
        }
        self.active = GraphicsShader::None;
    }
}

fn compile(
    gl: &dyn GlFunctions,
    name: &str,
    stages: &[ShaderStage],
) -> Result<ProgramId, SceneError> {
    gl.compile_program(stages)
        .map_err(|log| SceneError::ShaderLoad {
            name: name.to_owned(),
            log,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::headless::{GlCall, HeadlessGl};

    fn compiles(gl: &HeadlessGl) -> usize {
        gl.calls()
            .iter()
            .filter(|c| matches!(c, GlCall::CompileProgram { .. }))
            .count()
    }

    #[test]
    fn sources_carry_version_header() {
        for stage in scene_stages(GlVersion::Gles31) {
            assert!(stage.source.starts_with("#version 310 es\nprecision"));
        }
        assert!(text_stages(GlVersion::Gl43)[0]
            .source
            .starts_with("#version 430 core"));
    }

    #[test]
    fn graphics_reloads_only_on_kind_change() {
        let gl = HeadlessGl::new();
        let mut programs = ShaderPrograms::new(GlVersion::Gl41);

        let first = programs
            .ensure_graphics(&gl, ProjectionType::Perspective)
            .unwrap();
        let same = programs
            .ensure_graphics(&gl, ProjectionType::Orthographic)
            .unwrap();
        assert_eq!(first, same);
        assert_eq!(compiles(&gl), 1);

        let cyl = programs
            .ensure_graphics(&gl, ProjectionType::Cylindrical)
            .unwrap();
        assert_ne!(cyl, first);
        assert_eq!(programs.active(), GraphicsShader::Cylindrical);
        assert_eq!(compiles(&gl), 2);
        assert!(gl.calls().contains(&GlCall::DeleteProgram(first)));
    }

    #[test]
    fn compile_failure_is_shader_load_error() {
        let gl = HeadlessGl::new();
        gl.fail_compiles(true);
        let mut programs = ShaderPrograms::new(GlVersion::Gl41);
        let err = programs.ensure_text(&gl).unwrap_err();
        assert!(matches!(
            err,
            SceneError::ShaderLoad { ref name, .. } if name == "text"
        ));
        assert_eq!(programs.text(), None);
    }

    #[test]
    fn release_deletes_everything() {
        let gl = HeadlessGl::new();
        let mut programs = ShaderPrograms::new(GlVersion::Gl41);
        let g = programs
            .ensure_graphics(&gl, ProjectionType::Perspective)
            .unwrap();
        let t = programs.ensure_text(&gl).unwrap();
        programs.release(&gl);
        let calls = gl.calls();
        assert!(calls.contains(&GlCall::DeleteProgram(g)));
        assert!(calls.contains(&GlCall::DeleteProgram(t)));
        assert_eq!(programs.graphics(), None);
        assert_eq!(programs.active(), GraphicsShader::None);
    }
}
