// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Windowing-agnostic OpenGL scene core.
//!
//! viscene owns the parts of an interactive 3D/2D viewer that do not depend
//! on a window system: camera and projection state, the mapping from mouse,
//! scroll and key events to camera changes, shader programs, a registry of
//! renderable models, and the per-frame render sequence. The host creates
//! the window and GL context and hands them over through two traits.
//!
//! # Key entry points
//!
//! - [`scene::Scene`] - the scene itself: input dispatch, render, export
//! - [`renderer::Renderable`] - what the scene draws; [`renderer::MeshModel`]
//!   covers client triangle meshes
//! - [`gpu::GlFunctions`] and [`gpu::HostContext`] - the host seams
//! - [`options::SceneOptions`] - runtime configuration with TOML presets
//!
//! # Host loop
//!
//! Forward each window event as an [`input::InputEvent`] to
//! [`Scene::handle_event`](scene::Scene::handle_event) and call
//! [`Scene::render`](scene::Scene::render) when it returns `true`. Stop when
//! [`Scene::ready_to_finish`](scene::Scene::ready_to_finish) is set.
//!
//! The `glow` feature provides a [`gpu::GlFunctions`] implementation over a
//! glow context; the `winit` feature adds conversions from winit key,
//! modifier and mouse-button types.

pub mod camera;
pub mod error;
pub mod export;
pub mod gpu;
pub mod input;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod util;

pub use camera::{CameraState, Projection, ProjectionType};
pub use error::SceneError;
pub use input::InputEvent;
pub use options::SceneOptions;
pub use scene::{Scene, SceneCommand, SceneHost};
