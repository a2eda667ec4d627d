//! The scene: camera, models, overlays and the programs that draw them.
//!
//! A [`Scene`] owns everything between raw input and GL calls. The host
//! supplies the GL provider, its context and (optionally) a font service
//! through [`SceneHost`], forwards [`InputEvent`](crate::input::InputEvent)s
//! to [`Scene::handle_event`], and calls [`Scene::render`] whenever an event
//! reports that the view changed.

pub mod command;
mod input;
mod output;
pub mod registry;
mod render;

use std::rc::Rc;

use glam::{Quat, Vec2, Vec3, Vec4};

pub use self::command::SceneCommand;
pub use self::input::InputHooks;
pub use self::registry::{ModelKey, ModelRegistry};
use crate::camera::{CameraState, Projection, ViewSnapshot};
use crate::error::SceneError;
use crate::gpu::{ContextGuard, GlFunctions, HostContext, ShaderPrograms};
use crate::input::InputMapper;
use crate::options::{SceneOptions, BACKGROUND_BLACK, BACKGROUND_WHITE};
use crate::renderer::text::TITLE_FONT_SIZE;
use crate::renderer::{
    CoordArrows, FontService, Renderable, TextFeatures, TextGeometry,
    TextModel,
};

/// Rasterisation resolution of the title text.
const TITLE_RESOLUTION: u32 = 64;

/// What the host provides to a scene.
#[derive(Clone)]
pub struct SceneHost {
    /// GL function provider.
    pub gl: Rc<dyn GlFunctions>,
    /// Window context owner.
    pub context: Rc<dyn HostContext>,
    /// Font service; without one, title and labels are not drawn.
    pub fonts: Option<Rc<dyn FontService>>,
}

/// Windowing-agnostic scene state and render sequencing.
pub struct Scene {
    gl: Rc<dyn GlFunctions>,
    context: Rc<dyn HostContext>,
    fonts: Option<Rc<dyn FontService>>,

    options: SceneOptions,
    camera: CameraState,
    projection: Projection,
    mapper: InputMapper,

    models: ModelRegistry,
    selected: usize,

    programs: ShaderPrograms,
    initialised: bool,
    coord_arrows: Option<CoordArrows>,
    title_text: Option<TextModel>,
    labels: Vec<TextModel>,
    title: String,

    ready_to_finish: bool,
    on_quit: Option<Box<dyn FnMut()>>,
    hooks: Option<Box<dyn InputHooks>>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("title", &self.title)
            .field("camera", &self.camera)
            .field("projection", &self.projection)
            .field("models", &self.models)
            .field("selected", &self.selected)
            .field("initialised", &self.initialised)
            .field("ready_to_finish", &self.ready_to_finish)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Create a scene for a window of `width` x `height` window pixels.
    ///
    /// No GL work happens here; programs and built-in models are created
    /// by [`init_gl`](Self::init_gl) (or the first [`render`](Self::render)).
    #[must_use]
    pub fn new(
        host: SceneHost,
        width: u32,
        height: u32,
        title: impl Into<String>,
        options: SceneOptions,
    ) -> Self {
        let cam = &options.camera;
        let mut camera = CameraState::new(Vec3::from_array(cam.translation));
        camera.cyl_radius = cam.cyl_radius;
        camera.cyl_height = cam.cyl_height;

        let mut projection = Projection::new(cam.fov, cam.z_near, cam.z_far);
        projection.ortho_lb = Vec2::from_array(cam.ortho_lb);
        projection.ortho_rt = Vec2::from_array(cam.ortho_rt);
        projection.compute(width, height);

        let mut mapper = InputMapper::new(width, height);
        mapper.scroll_step = cam.scroll_step;
        mapper.rotation_sensitivity = cam.rotation_sensitivity;

        if let Some(fonts) = &host.fonts {
            fonts.attach();
        }

        Self {
            gl: host.gl,
            context: host.context,
            fonts: host.fonts,
            programs: ShaderPrograms::new(options.display.gl_version),
            options,
            camera,
            projection,
            mapper,
            models: ModelRegistry::new(),
            selected: 0,
            initialised: false,
            coord_arrows: None,
            title_text: None,
            labels: Vec::new(),
            title: title.into(),
            ready_to_finish: false,
            on_quit: None,
            hooks: None,
        }
    }

    /// Load the shader programs, apply GL state defaults, read the view
    /// snapshot (when enabled) and build the coordinate arrows and title.
    /// Calling it again after success does nothing.
    ///
    /// # Errors
    ///
    /// [`SceneError::ShaderLoad`] if a program fails to build.
    pub fn init_gl(&mut self) -> Result<(), SceneError> {
        if self.initialised {
            return Ok(());
        }
        let context = Rc::clone(&self.context);
        let _guard = ContextGuard::acquire(context.as_ref());
        let gl = self.gl.as_ref();

        if self.options.window.log_gl_version {
            log::info!(
                "OpenGL version {} (shaders: {})",
                gl.version_string(),
                self.programs.version().name()
            );
        }
        context.set_swap_interval(self.options.window.swap_interval);

        let _ = self.programs.ensure_graphics(gl, self.projection.ptype)?;
        let _ = self.programs.ensure_text(gl)?;
        gl.enable_scene_defaults();

        if self.options.snapshot.load_on_start {
            let path = &self.options.snapshot.path;
            if let Some(snapshot) = ViewSnapshot::load(path) {
                log::debug!("applying view snapshot from {}", path.display());
                snapshot.apply(&mut self.camera);
            }
        }

        let display = &self.options.display;
        self.coord_arrows = Some(CoordArrows::new(
            display.coord_arrows_length,
            display.coord_arrows_thickness,
            display.coord_arrows_em,
        ));

        let mut title = TextModel::new(TextFeatures::with_size(
            TITLE_FONT_SIZE,
            TITLE_RESOLUTION,
        ));
        title.set_text(self.title.clone(), Vec3::ZERO);
        self.title_text = Some(title);

        self.initialised = true;
        Ok(())
    }

    /// Whether [`init_gl`](Self::init_gl) has completed.
    #[must_use]
    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    // ── Models ───────────────────────────────────────────────────────────

    /// Append a model; returns its index.
    pub fn add_model(&mut self, model: Box<dyn Renderable>) -> usize {
        self.models.add(model)
    }

    /// Append a model; returns its stable key.
    pub fn insert_model(&mut self, model: Box<dyn Renderable>) -> ModelKey {
        self.models.insert(model)
    }

    /// Remove the model registered under `key`, freeing its GPU resources.
    pub fn remove_model(
        &mut self,
        key: ModelKey,
    ) -> Option<Box<dyn Renderable>> {
        let index = self.models.index_of(key)?;
        self.remove_model_at(index)
    }

    /// Remove the model at `index`, freeing its GPU resources. Later models
    /// shift down one index and the selection follows its model.
    pub fn remove_model_at(
        &mut self,
        index: usize,
    ) -> Option<Box<dyn Renderable>> {
        let mut model = self.models.remove(index)?;
        if self.initialised {
            let _guard = ContextGuard::acquire(self.context.as_ref());
            model.release(self.gl.as_ref());
        }
        if index < self.selected {
            self.selected -= 1;
        }
        self.selected = self.selected.min(self.models.len().saturating_sub(1));
        Some(model)
    }

    /// The model registry.
    #[must_use]
    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    /// The model registry, mutably.
    pub fn models_mut(&mut self) -> &mut ModelRegistry {
        &mut self.models
    }

    /// Index of the model that alpha and hide commands act on.
    #[must_use]
    pub fn selected_model(&self) -> usize {
        self.selected
    }

    /// Select a model. Out-of-range indices are ignored.
    pub fn select_model(&mut self, index: usize) -> bool {
        if index < self.models.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    // ── Camera ───────────────────────────────────────────────────────────

    /// Camera state.
    #[must_use]
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    /// Camera state, mutably.
    pub fn camera_mut(&mut self) -> &mut CameraState {
        &mut self.camera
    }

    /// Projection state.
    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Projection state, mutably. The matrices are recomputed before the
    /// next render.
    pub fn projection_mut(&mut self) -> &mut Projection {
        &mut self.projection
    }

    /// Set the scene translation and make it the reset default.
    pub fn set_translation(&mut self, translation: Vec3) {
        self.camera.set_translation(translation);
    }

    /// Set the scene's x/y translation (and defaults), keeping z.
    pub fn set_translation_xy(&mut self, x: f32, y: f32) {
        self.camera.set_translation_xy(x, y);
    }

    /// Set the scene rotation and make it the reset default.
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.camera.set_rotation(rotation);
    }

    /// Whether camera changes from input are refused.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.mapper.is_locked()
    }

    /// Lock or unlock the scene against camera changes.
    pub fn set_locked(&mut self, locked: bool) {
        self.mapper.set_locked(locked);
    }

    /// The input mapper (cursor, window size, gesture).
    #[must_use]
    pub fn mapper(&self) -> &InputMapper {
        &self.mapper
    }

    fn refresh_projection(&mut self) {
        let size = self.mapper.window_size();
        self.projection.compute(size.x, size.y);
    }

    // ── Appearance ───────────────────────────────────────────────────────

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    /// Options, mutably. Camera defaults and the GL version only take
    /// effect in a new scene.
    pub fn options_mut(&mut self) -> &mut SceneOptions {
        &mut self.options
    }

    /// Background clear colour.
    #[must_use]
    pub fn background(&self) -> Vec4 {
        Vec4::from_array(self.options.display.background)
    }

    /// Set the background clear colour.
    pub fn set_background(&mut self, colour: Vec4) {
        self.options.display.background = colour.to_array();
    }

    /// Translucent white background.
    pub fn background_white(&mut self) {
        self.options.display.background = BACKGROUND_WHITE;
    }

    /// Transparent black background.
    pub fn background_black(&mut self) {
        self.options.display.background = BACKGROUND_BLACK;
    }

    /// Switch between directional lighting and flat, fully ambient light.
    pub fn lighting_effects(&mut self, on: bool) {
        self.options.lighting.effects(on);
    }

    /// Show or hide the coordinate arrows.
    pub fn show_coord_arrows(&mut self, show: bool) {
        self.options.display.show_coord_arrows = show;
    }

    /// Scene title, used for the title text and output file names.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        if let Some(text) = &mut self.title_text {
            text.set_text(self.title.clone(), Vec3::ZERO);
        }
    }

    /// Show or hide the title text.
    pub fn show_title(&mut self, show: bool) {
        self.options.display.show_title = show;
    }

    /// Add a text label at `offset` from the text anchor. Centred labels
    /// are shifted left by half their width.
    ///
    /// # Errors
    ///
    /// [`SceneError::TextUnavailable`] before [`init_gl`](Self::init_gl)
    /// or when the scene has no font service.
    pub fn add_label(
        &mut self,
        text: &str,
        offset: Vec3,
        features: TextFeatures,
    ) -> Result<TextGeometry, SceneError> {
        let (Some(_), Some(fonts)) = (self.programs.text(), &self.fonts)
        else {
            return Err(SceneError::TextUnavailable);
        };
        let mut label = TextModel::new(features);
        label.set_text(text, offset);
        let geometry = label.geometry(fonts.as_ref());
        if features.centre_horizontally {
            label.set_text(
                text,
                offset - Vec3::new(geometry.half_width(), 0.0, 0.0),
            );
        }
        self.labels.push(label);
        Ok(geometry)
    }

    /// Labels added so far.
    #[must_use]
    pub fn labels(&self) -> &[TextModel] {
        &self.labels
    }

    /// Remove all labels.
    pub fn clear_labels(&mut self) {
        self.labels.clear();
    }

    // ── Quit signal ──────────────────────────────────────────────────────

    /// Register a callback run each time quitting is requested.
    pub fn on_quit(&mut self, callback: impl FnMut() + 'static) {
        self.on_quit = Some(Box::new(callback));
    }

    /// Whether quitting has been requested.
    #[must_use]
    pub fn ready_to_finish(&self) -> bool {
        self.ready_to_finish
    }

    /// Request that the host finish: sets the flag and runs the callback.
    pub fn signal_to_quit(&mut self) {
        if self.options.window.user_info_logging {
            log::info!("User requested exit.");
        }
        self.ready_to_finish = true;
        if let Some(callback) = &mut self.on_quit {
            callback();
        }
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        if self.initialised {
            let _guard = ContextGuard::acquire(self.context.as_ref());
            let gl = self.gl.as_ref();
            for model in self.models.iter_mut() {
                model.release(gl);
            }
            if let Some(arrows) = &mut self.coord_arrows {
                arrows.release(gl);
            }
            self.programs.release(gl);
        }
        if let Some(fonts) = &self.fonts {
            fonts.detach();
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::rc::Rc;

    use super::{Scene, SceneHost};
    use crate::gpu::headless::HeadlessFonts;
    use crate::gpu::{HeadlessGl, HeadlessHost};
    use crate::options::SceneOptions;
    use crate::renderer::FontService;

    /// A scene over recording doubles, with the snapshot file disabled.
    pub(crate) struct Rig {
        pub(crate) gl: Rc<HeadlessGl>,
        pub(crate) host: Rc<HeadlessHost>,
        pub(crate) fonts: Rc<HeadlessFonts>,
        pub(crate) scene: Scene,
    }

    pub(crate) fn options() -> SceneOptions {
        let mut options = SceneOptions::default();
        options.snapshot.load_on_start = false;
        options.display.pixel_ratio = 1.0;
        options
    }

    pub(crate) fn rig_with(options: SceneOptions, with_fonts: bool) -> Rig {
        let _ = env_logger::builder().is_test(true).try_init();
        let gl = Rc::new(HeadlessGl::new());
        let host = Rc::new(HeadlessHost::new());
        let fonts = Rc::new(HeadlessFonts::new());
        let service: Rc<dyn FontService> = fonts.clone();
        let scene = Scene::new(
            SceneHost {
                gl: gl.clone(),
                context: host.clone(),
                fonts: with_fonts.then_some(service),
            },
            800,
            600,
            "Test scene",
            options,
        );
        Rig {
            gl,
            host,
            fonts,
            scene,
        }
    }

    pub(crate) fn rig() -> Rig {
        rig_with(options(), true)
    }
}
