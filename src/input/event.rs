/// Platform-agnostic input events.
///
/// The host windowing backend converts its native events into these and
/// feeds them to [`Scene::handle_event`](crate::scene::Scene::handle_event),
/// which returns whether the scene needs to be re-rendered.
///
/// # Example
///
/// ```ignore
/// let needs_render = scene.handle_event(InputEvent::CursorMoved { x, y });
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Keyboard key pressed, released or auto-repeated.
    Key {
        /// Logical key.
        key: Key,
        /// Platform scancode, passed through to input hooks.
        scancode: u32,
        /// Press, release or repeat.
        action: Action,
        /// Modifier state at the time of the event.
        modifiers: Modifiers,
    },
    /// Cursor moved to absolute window position.
    CursorMoved {
        /// Horizontal position in window pixels.
        x: f32,
        /// Vertical position in window pixels (down is positive).
        y: f32,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// Press or release.
        action: Action,
        /// Modifier state at the time of the event.
        modifiers: Modifiers,
    },
    /// Scroll wheel or trackpad scroll.
    Scroll {
        /// Horizontal scroll amount.
        x: f32,
        /// Vertical scroll amount (positive = towards the viewer).
        y: f32,
    },
    /// Window resized.
    Resized {
        /// New width in window pixels.
        width: u32,
        /// New height in window pixels.
        height: u32,
    },
    /// The user asked the window to close.
    CloseRequested,
}

/// Button or key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Pressed down.
    Press,
    /// Released.
    Release,
    /// Held long enough to auto-repeat.
    Repeat,
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    /// Either shift key.
    pub shift: bool,
    /// Either control key.
    pub control: bool,
    /// Either alt/option key.
    pub alt: bool,
    /// Either super/command key.
    pub super_key: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        super_key: false,
    };
    /// Only shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
    /// Only control held.
    pub const CONTROL: Self = Self {
        control: true,
        ..Self::NONE
    };
}

/// Logical keys the scene understands. Everything else arrives as
/// [`Key::Other`] and is only forwarded to input hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A letter key, stored lowercase (`'a'..='z'`).
    Letter(char),
    /// Function key `F1`..`F24`, stored as its number.
    Function(u8),
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Any other key, identified by a host-defined code.
    Other(u32),
}

impl Key {
    /// Key name in the `winit::keyboard::KeyCode` debug format
    /// (`"KeyQ"`, `"F1"`, `"ArrowLeft"`). [`Key::Other`] has no name.
    #[must_use]
    pub fn name(self) -> Option<String> {
        match self {
            Self::Letter(c) => Some(format!("Key{}", c.to_ascii_uppercase())),
            Self::Function(n) => Some(format!("F{n}")),
            Self::ArrowLeft => Some("ArrowLeft".into()),
            Self::ArrowRight => Some("ArrowRight".into()),
            Self::ArrowUp => Some("ArrowUp".into()),
            Self::ArrowDown => Some("ArrowDown".into()),
            Self::Other(_) => None,
        }
    }

    /// Parse a key name produced by [`name`](Self::name).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => return Some(Self::ArrowLeft),
            "ArrowRight" => return Some(Self::ArrowRight),
            "ArrowUp" => return Some(Self::ArrowUp),
            "ArrowDown" => return Some(Self::ArrowDown),
            _ => {}
        }
        if let Some(rest) = name.strip_prefix("Key") {
            let mut chars = rest.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => {
                    Some(Self::Letter(c.to_ascii_lowercase()))
                }
                _ => None,
            };
        }
        name.strip_prefix('F')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=24).contains(n))
            .map(Self::Function)
    }
}

#[cfg(feature = "winit")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Left,
        }
    }
}

#[cfg(feature = "winit")]
impl From<winit::event::ElementState> for Action {
    fn from(state: winit::event::ElementState) -> Self {
        match state {
            winit::event::ElementState::Pressed => Self::Press,
            winit::event::ElementState::Released => Self::Release,
        }
    }
}

#[cfg(feature = "winit")]
impl From<winit::keyboard::ModifiersState> for Modifiers {
    fn from(state: winit::keyboard::ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            control: state.control_key(),
            alt: state.alt_key(),
            super_key: state.super_key(),
        }
    }
}

#[cfg(feature = "winit")]
impl From<winit::keyboard::PhysicalKey> for Key {
    fn from(key: winit::keyboard::PhysicalKey) -> Self {
        match key {
            winit::keyboard::PhysicalKey::Code(code) => {
                Self::from_name(&format!("{code:?}"))
                    .unwrap_or(Self::Other(code as u32))
            }
            winit::keyboard::PhysicalKey::Unidentified(_) => Self::Other(0),
        }
    }
}
