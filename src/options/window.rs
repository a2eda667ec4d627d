use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Window", inline)]
#[serde(default)]
/// Window behaviour that the scene controls on the host's behalf.
pub struct WindowOptions {
    /// Ignore the window's close button.
    #[schemars(title = "Prevent Close")]
    pub prevent_window_close: bool,
    /// Bind Ctrl-q to a quit request. Hosts that own the event loop and
    /// handle quitting themselves turn this off.
    #[schemars(title = "Quit Key")]
    pub handle_quit_key: bool,
    /// Log operator feedback (saved files, lock state, quit requests).
    #[schemars(title = "User Info")]
    pub user_info_logging: bool,
    /// Log the GL version at start-up.
    #[schemars(skip)]
    pub log_gl_version: bool,
    /// Buffer swap interval requested at start-up.
    #[schemars(skip)]
    pub swap_interval: i32,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            prevent_window_close: false,
            handle_quit_key: true,
            user_info_logging: true,
            log_gl_version: false,
            swap_interval: 0,
        }
    }
}
