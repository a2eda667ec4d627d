//! Input handling: the platform-agnostic event surface, mouse gestures and
//! key bindings.

/// Platform-agnostic input events.
pub mod event;
/// Press-drag-release gesture state.
pub mod gesture;
/// Key chord → command bindings.
pub mod keyboard;
/// Pointer and scroll → camera mutation.
pub mod mapper;

pub use event::{Action, InputEvent, Key, Modifiers, MouseButton};
pub use gesture::{GestureMode, GestureState};
pub use keyboard::{KeyBindings, KeyCommandTag};
pub use mapper::InputMapper;
