//! Key chord → [`SceneCommand`] bindings.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::event::{Action, Key, Modifiers};
use crate::scene::command::SceneCommand;

/// Highest function key that selects a model (`F1`..`F10`).
pub const SELECT_KEY_COUNT: u8 = 10;

/// Serializable tag for the key-bindable subset of [`SceneCommand`].
///
/// Serde uses `snake_case` so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// "Ctrl+KeyL" = "toggle_scene_lock"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Ask the host to finish.
    RequestQuit,
    /// Show or hide the coordinate arrows.
    ToggleCoordArrows,
    /// Log the key help.
    ShowHelp,
    /// Lock or unlock the scene against camera changes.
    ToggleSceneLock,
    /// Save the framebuffer as PNG.
    SaveImage,
    /// Save all models as glTF.
    SaveGltf,
    /// Save the view snapshot and log setup code.
    SaveSnapshot,
    /// Restore default translation and rotation.
    ResetView,
    /// Narrow the field of view.
    DecreaseFov,
    /// Widen the field of view.
    IncreaseFov,
    /// Halve the near clip plane.
    DecreaseZNear,
    /// Double the near clip plane.
    IncreaseZNear,
    /// Perspective → orthographic → cylindrical → perspective.
    CycleProjection,
    /// Make the selected model more transparent.
    DecreaseAlpha,
    /// Make the selected model more opaque.
    IncreaseAlpha,
    /// Double the cylindrical projection radius.
    DoubleCylRadius,
    /// Halve the cylindrical projection radius.
    HalveCylRadius,
    /// Double the cylindrical projection height.
    DoubleCylHeight,
    /// Halve the cylindrical projection height.
    HalveCylHeight,
}

impl KeyCommandTag {
    /// Convert to the corresponding [`SceneCommand`].
    #[must_use]
    pub fn to_command(self) -> SceneCommand {
        match self {
            Self::RequestQuit => SceneCommand::RequestQuit,
            Self::ToggleCoordArrows => SceneCommand::ToggleCoordArrows,
            Self::ShowHelp => SceneCommand::ShowHelp,
            Self::ToggleSceneLock => SceneCommand::ToggleSceneLock,
            Self::SaveImage => SceneCommand::SaveImage,
            Self::SaveGltf => SceneCommand::SaveGltf,
            Self::SaveSnapshot => SceneCommand::SaveSnapshot,
            Self::ResetView => SceneCommand::ResetView,
            Self::DecreaseFov => SceneCommand::DecreaseFov,
            Self::IncreaseFov => SceneCommand::IncreaseFov,
            Self::DecreaseZNear => SceneCommand::DecreaseZNear,
            Self::IncreaseZNear => SceneCommand::IncreaseZNear,
            Self::CycleProjection => SceneCommand::CycleProjection,
            Self::DecreaseAlpha => SceneCommand::DecreaseAlpha,
            Self::IncreaseAlpha => SceneCommand::IncreaseAlpha,
            Self::DoubleCylRadius => {
                SceneCommand::ScaleCylRadius { factor: 2.0 }
            }
            Self::HalveCylRadius => {
                SceneCommand::ScaleCylRadius { factor: 0.5 }
            }
            Self::DoubleCylHeight => {
                SceneCommand::ScaleCylHeight { factor: 2.0 }
            }
            Self::HalveCylHeight => {
                SceneCommand::ScaleCylHeight { factor: 0.5 }
            }
        }
    }

    /// Whether holding the key keeps firing the command.
    #[must_use]
    pub fn fires_on_repeat(self) -> bool {
        matches!(
            self,
            Self::DecreaseAlpha
                | Self::IncreaseAlpha
                | Self::DoubleCylRadius
                | Self::HalveCylRadius
                | Self::DoubleCylHeight
                | Self::HalveCylHeight
        )
    }

    /// One-line description for the key help.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::RequestQuit => "Request exit",
            Self::ToggleCoordArrows => "Toggle coordinate arrows",
            Self::ShowHelp => "Output this help",
            Self::ToggleSceneLock => "Toggle the scene lock",
            Self::SaveImage => "Save a PNG image of the scene",
            Self::SaveGltf => "Save 3D models in .gltf format",
            Self::SaveSnapshot => {
                "Log view setup code and save the view snapshot"
            }
            Self::ResetView => "Reset default view",
            Self::DecreaseFov => "Reduce field of view",
            Self::IncreaseFov => "Increase field of view",
            Self::DecreaseZNear => "Reduce zNear cutoff plane",
            Self::IncreaseZNear => "Increase zNear cutoff plane",
            Self::CycleProjection => "Cycle projection",
            Self::DecreaseAlpha => "Decrease opacity of selected model",
            Self::IncreaseAlpha => "Increase opacity of selected model",
            Self::DoubleCylRadius => "Double cylindrical projection radius",
            Self::HalveCylRadius => "Halve cylindrical projection radius",
            Self::DoubleCylHeight => "Double cylindrical projection height",
            Self::HalveCylHeight => "Halve cylindrical projection height",
        }
    }
}

/// Build the chord string for a key with modifiers, e.g. `"Ctrl+KeyQ"` or
/// `"Shift+ArrowUp"`. Modifier order is fixed: `Ctrl`, `Alt`, `Shift`,
/// `Super`. Returns `None` for keys without a name.
#[must_use]
pub fn chord(key: Key, modifiers: Modifiers) -> Option<String> {
    let name = key.name()?;
    let mut out = String::new();
    if modifiers.control {
        out.push_str("Ctrl+");
    }
    if modifiers.alt {
        out.push_str("Alt+");
    }
    if modifiers.shift {
        out.push_str("Shift+");
    }
    if modifiers.super_key {
        out.push_str("Super+");
    }
    out.push_str(&name);
    Some(out)
}

/// Every combination of the modifiers in `held`, largest first in the
/// order Super, Alt, Ctrl, Shift.
fn held_subsets(held: Modifiers) -> impl Iterator<Item = Modifiers> {
    (0u8..16).rev().filter_map(move |bits| {
        let subset = Modifiers {
            shift: bits & 1 != 0,
            control: bits & 2 != 0,
            alt: bits & 4 != 0,
            super_key: bits & 8 != 0,
        };
        let within = (!subset.shift || held.shift)
            && (!subset.control || held.control)
            && (!subset.alt || held.alt)
            && (!subset.super_key || held.super_key);
        within.then_some(subset)
    })
}

/// Maps key chords to [`SceneCommand`]s.
///
/// Chords use the `winit::keyboard::KeyCode` debug names prefixed by the
/// held modifiers (see [`chord`]). Function keys `F1`..`F10` are not
/// rebindable: they select a model, and with shift also toggle its
/// visibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Chord string → command tag.
    pub bindings: HashMap<String, KeyCommandTag>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("Ctrl+KeyQ".into(), KeyCommandTag::RequestQuit),
            ("Ctrl+KeyC".into(), KeyCommandTag::ToggleCoordArrows),
            ("Ctrl+KeyH".into(), KeyCommandTag::ShowHelp),
            ("Ctrl+KeyL".into(), KeyCommandTag::ToggleSceneLock),
            ("Ctrl+KeyS".into(), KeyCommandTag::SaveImage),
            ("Ctrl+KeyM".into(), KeyCommandTag::SaveGltf),
            ("Ctrl+KeyZ".into(), KeyCommandTag::SaveSnapshot),
            ("Ctrl+KeyA".into(), KeyCommandTag::ResetView),
            ("Ctrl+KeyO".into(), KeyCommandTag::DecreaseFov),
            ("Ctrl+KeyP".into(), KeyCommandTag::IncreaseFov),
            ("Ctrl+KeyU".into(), KeyCommandTag::DecreaseZNear),
            ("Ctrl+KeyI".into(), KeyCommandTag::IncreaseZNear),
            ("Ctrl+KeyY".into(), KeyCommandTag::CycleProjection),
            ("Shift+ArrowLeft".into(), KeyCommandTag::DecreaseAlpha),
            ("Shift+ArrowRight".into(), KeyCommandTag::IncreaseAlpha),
            ("Shift+ArrowUp".into(), KeyCommandTag::DoubleCylRadius),
            ("Shift+ArrowDown".into(), KeyCommandTag::HalveCylRadius),
            ("Ctrl+ArrowUp".into(), KeyCommandTag::DoubleCylHeight),
            ("Ctrl+ArrowDown".into(), KeyCommandTag::HalveCylHeight),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command tag bound to a chord string.
    #[must_use]
    pub fn lookup(&self, chord: &str) -> Option<KeyCommandTag> {
        self.bindings.get(chord).copied()
    }

    /// Commands produced by a key event. Releases never produce commands;
    /// repeats only produce commands whose tag
    /// [fires on repeat](KeyCommandTag::fires_on_repeat).
    #[must_use]
    pub fn resolve(
        &self,
        key: Key,
        action: Action,
        modifiers: Modifiers,
    ) -> Vec<SceneCommand> {
        let mut commands = Vec::new();
        if action == Action::Release {
            return commands;
        }

        if let Key::Function(n @ 1..=SELECT_KEY_COUNT) = key {
            if action == Action::Press {
                commands.push(SceneCommand::SelectModel {
                    index: usize::from(n - 1),
                });
                if modifiers.shift {
                    commands.push(SceneCommand::ToggleHideSelected);
                }
            }
            return commands;
        }

        commands.extend(
            self.matching_tags(key, modifiers)
                .into_iter()
                .filter(|tag| action == Action::Press || tag.fires_on_repeat())
                .map(KeyCommandTag::to_command),
        );
        commands
    }

    /// Tags bound to `key` under the held modifiers. A binding for the exact
    /// chord wins; otherwise every binding whose modifiers are all held
    /// matches, so Ctrl+Shift+Up fires both the Ctrl+Up and Shift+Up
    /// bindings.
    fn matching_tags(&self, key: Key, held: Modifiers) -> Vec<KeyCommandTag> {
        if let Some(tag) = chord(key, held).and_then(|c| self.lookup(&c)) {
            return vec![tag];
        }
        let mut tags = Vec::new();
        for subset in held_subsets(held).filter(|m| *m != held) {
            let Some(tag) = chord(key, subset).and_then(|c| self.lookup(&c))
            else {
                continue;
            };
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }

    /// Help text, one line per binding, sorted by chord. `RequestQuit` is
    /// listed only when `include_quit` is set.
    #[must_use]
    pub fn help_lines(&self, include_quit: bool) -> Vec<String> {
        let sorted: BTreeMap<&str, KeyCommandTag> = self
            .bindings
            .iter()
            .filter(|(_, tag)| {
                include_quit || **tag != KeyCommandTag::RequestQuit
            })
            .map(|(chord, tag)| (chord.as_str(), *tag))
            .collect();

        let mut lines = vec![
            "Mouse-primary: rotate mode (use Ctrl to change axis)".to_owned(),
            "Mouse-secondary: translate mode".to_owned(),
        ];
        lines.extend(
            sorted
                .into_iter()
                .map(|(chord, tag)| format!("{chord}: {}", tag.description())),
        );
        lines.push(format!(
            "F1-F{SELECT_KEY_COUNT}: Select model index \
             (with shift: toggle hide)"
        ));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chord_prefixes_modifiers_in_fixed_order() {
        let mods = Modifiers {
            shift: true,
            control: true,
            ..Modifiers::NONE
        };
        assert_eq!(
            chord(Key::ArrowUp, mods).as_deref(),
            Some("Ctrl+Shift+ArrowUp")
        );
        assert_eq!(
            chord(Key::Letter('q'), Modifiers::NONE).as_deref(),
            Some("KeyQ")
        );
        assert_eq!(chord(Key::Other(3), Modifiers::CONTROL), None);
    }

    #[test]
    fn default_bindings_resolve() {
        let kb = KeyBindings::default();
        assert_eq!(
            kb.resolve(Key::Letter('l'), Action::Press, Modifiers::CONTROL),
            vec![SceneCommand::ToggleSceneLock]
        );
        assert_eq!(
            kb.resolve(Key::ArrowUp, Action::Press, Modifiers::SHIFT),
            vec![SceneCommand::ScaleCylRadius { factor: 2.0 }]
        );
        assert!(kb
            .resolve(Key::Letter('l'), Action::Press, Modifiers::NONE)
            .is_empty());
    }

    #[test]
    fn extra_modifiers_fall_back_to_held_subsets() {
        let kb = KeyBindings::default();
        let ctrl_shift = Modifiers {
            shift: true,
            ..Modifiers::CONTROL
        };
        assert_eq!(
            kb.resolve(Key::ArrowUp, Action::Press, ctrl_shift),
            vec![
                SceneCommand::ScaleCylHeight { factor: 2.0 },
                SceneCommand::ScaleCylRadius { factor: 2.0 },
            ]
        );
        assert_eq!(
            kb.resolve(Key::Letter('c'), Action::Press, ctrl_shift),
            vec![SceneCommand::ToggleCoordArrows]
        );
        let ctrl_alt = Modifiers {
            alt: true,
            ..Modifiers::CONTROL
        };
        assert_eq!(
            kb.resolve(Key::Letter('y'), Action::Press, ctrl_alt),
            vec![SceneCommand::CycleProjection]
        );
    }

    #[test]
    fn exact_chord_wins_over_subsets() {
        let mut kb = KeyBindings::default();
        let _ = kb
            .bindings
            .insert("Ctrl+Shift+ArrowUp".to_owned(), KeyCommandTag::ResetView);
        let ctrl_shift = Modifiers {
            shift: true,
            ..Modifiers::CONTROL
        };
        assert_eq!(
            kb.resolve(Key::ArrowUp, Action::Press, ctrl_shift),
            vec![SceneCommand::ResetView]
        );
    }

    #[test]
    fn release_never_fires() {
        let kb = KeyBindings::default();
        assert!(kb
            .resolve(Key::Letter('y'), Action::Release, Modifiers::CONTROL)
            .is_empty());
        assert!(kb
            .resolve(Key::Function(1), Action::Release, Modifiers::NONE)
            .is_empty());
    }

    #[test]
    fn repeat_fires_only_for_continuous_commands() {
        let kb = KeyBindings::default();
        assert_eq!(
            kb.resolve(Key::ArrowLeft, Action::Repeat, Modifiers::SHIFT),
            vec![SceneCommand::DecreaseAlpha]
        );
        assert!(kb
            .resolve(Key::Letter('p'), Action::Repeat, Modifiers::CONTROL)
            .is_empty());
    }

    #[test]
    fn function_keys_select_and_hide() {
        let kb = KeyBindings::default();
        assert_eq!(
            kb.resolve(Key::Function(3), Action::Press, Modifiers::NONE),
            vec![SceneCommand::SelectModel { index: 2 }]
        );
        assert_eq!(
            kb.resolve(Key::Function(1), Action::Press, Modifiers::SHIFT),
            vec![
                SceneCommand::SelectModel { index: 0 },
                SceneCommand::ToggleHideSelected
            ]
        );
        assert!(kb
            .resolve(Key::Function(11), Action::Press, Modifiers::NONE)
            .is_empty());
    }

    #[test]
    fn help_omits_quit_unless_requested() {
        let kb = KeyBindings::default();
        let without = kb.help_lines(false);
        let with = kb.help_lines(true);
        assert!(!without.iter().any(|l| l.starts_with("Ctrl+KeyQ")));
        assert!(with.iter().any(|l| l == "Ctrl+KeyQ: Request exit"));
        assert_eq!(with.len(), without.len() + 1);
    }

    #[test]
    fn bindings_deserialize_from_toml() {
        let kb: KeyBindings = toml::from_str(
            r#"
[bindings]
"Ctrl+KeyR" = "reset_view"
"#,
        )
        .unwrap();
        assert_eq!(kb.lookup("Ctrl+KeyR"), Some(KeyCommandTag::ResetView));
        assert_eq!(kb.lookup("Ctrl+KeyA"), None);
    }
}
