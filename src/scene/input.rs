//! Event dispatch and command execution.

use std::path::Path;

use super::command::SceneCommand;
use super::Scene;
use crate::camera::ViewSnapshot;
use crate::input::{Action, InputEvent, Key, Modifiers, MouseButton};
use crate::util::filename::output_name;

/// Host extensions run after the scene's own key and mouse-button
/// handling.
pub trait InputHooks {
    /// A key event. Return `true` if the host needs a re-render.
    fn key(
        &mut self,
        key: Key,
        scancode: u32,
        action: Action,
        modifiers: Modifiers,
    ) -> bool {
        let _ = (key, scancode, action, modifiers);
        false
    }

    /// A mouse-button event. Return `true` if the host needs a re-render.
    fn mouse_button(
        &mut self,
        button: MouseButton,
        action: Action,
        modifiers: Modifiers,
    ) -> bool {
        let _ = (button, action, modifiers);
        false
    }
}

impl Scene {
    /// Install host input hooks, replacing any previous ones.
    pub fn set_input_hooks(&mut self, hooks: Box<dyn InputHooks>) {
        self.hooks = Some(hooks);
    }

    /// Process a platform-agnostic input event.
    ///
    /// This is the scene's input entry point. Keys resolve through the
    /// configured bindings into [`SceneCommand`]s; pointer and scroll
    /// events drive the camera.
    ///
    /// Returns `true` if the view changed and the host should re-render.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Key {
                key,
                scancode,
                action,
                modifiers,
            } => {
                let commands =
                    self.options.keybindings.resolve(key, action, modifiers);
                let mut needs_render = false;
                for command in commands {
                    if command == SceneCommand::RequestQuit
                        && !self.options.window.handle_quit_key
                    {
                        continue;
                    }
                    needs_render |= self.execute(command);
                }
                if let Some(hooks) = &mut self.hooks {
                    needs_render |= hooks.key(key, scancode, action, modifiers);
                }
                needs_render
            }
            InputEvent::CursorMoved { x, y } => {
                self.mapper
                    .cursor_moved(&mut self.camera, &self.projection, x, y)
            }
            InputEvent::MouseButton {
                button,
                action,
                modifiers,
            } => {
                self.mapper
                    .mouse_button(&mut self.camera, button, action, modifiers);
                self.hooks.as_mut().is_some_and(|hooks| {
                    hooks.mouse_button(button, action, modifiers)
                })
            }
            InputEvent::Scroll { x, y } => {
                let changed = self.mapper.scroll(
                    &mut self.camera,
                    &mut self.projection,
                    x,
                    y,
                );
                self.refresh_projection();
                changed
            }
            InputEvent::Resized { width, height } => {
                let changed = self.mapper.resize(width, height);
                self.refresh_projection();
                changed
            }
            InputEvent::CloseRequested => {
                if self.options.window.prevent_window_close {
                    log::warn!(
                        "window close ignored: this scene must be closed by \
                         its owner"
                    );
                } else {
                    self.signal_to_quit();
                }
                false
            }
        }
    }

    /// Run one command. Commands that move the camera are refused while
    /// the scene is locked.
    ///
    /// Returns `true` if the view changed and the host should re-render.
    pub fn execute(&mut self, command: SceneCommand) -> bool {
        if self.mapper.is_locked() && command.blocked_by_lock() {
            return false;
        }
        match command {
            SceneCommand::RequestQuit => {
                self.signal_to_quit();
                false
            }
            SceneCommand::ToggleCoordArrows => {
                let display = &mut self.options.display;
                display.show_coord_arrows = !display.show_coord_arrows;
                true
            }
            SceneCommand::ShowHelp => {
                let lines = self
                    .options
                    .keybindings
                    .help_lines(self.options.window.handle_quit_key);
                for line in lines {
                    log::info!("{line}");
                }
                false
            }
            SceneCommand::ToggleSceneLock => {
                let locked = !self.mapper.is_locked();
                self.mapper.set_locked(locked);
                let prefix = if locked { "" } else { "un-" };
                log::info!("Scene is now {prefix}locked");
                false
            }
            SceneCommand::SaveImage => {
                let name = output_name(&self.title, "png");
                let size = self.save_image(Path::new(&name), false);
                if size.x >= 0 {
                    log::info!("Saved image to '{name}'");
                }
                false
            }
            SceneCommand::SaveGltf => {
                let name = output_name(&self.title, "gltf");
                match self.save_gltf(Path::new(&name)) {
                    Ok(()) => log::info!("Saved 3D file '{name}'"),
                    Err(e) => log::error!("failed to save '{name}': {e}"),
                }
                false
            }
            SceneCommand::SaveSnapshot => {
                log::info!(
                    "View setup code:\n{}",
                    ViewSnapshot::setup_code(&self.camera)
                );
                let path = self.options.snapshot.path.display().to_string();
                match self.save_snapshot() {
                    Ok(()) => log::info!("Wrote view snapshot to {path}"),
                    Err(e) => {
                        log::error!("failed to write snapshot {path}: {e}");
                    }
                }
                false
            }
            SceneCommand::SelectModel { index } => {
                if self.select_model(index) {
                    log::info!("Selected model index {index}");
                }
                false
            }
            SceneCommand::ToggleHideSelected => {
                self.models.get_mut(self.selected).is_some_and(|model| {
                    model.toggle_hide();
                    true
                })
            }
            SceneCommand::DecreaseAlpha => {
                let step = self.options.display.alpha_step;
                self.models.get_mut(self.selected).is_some_and(|model| {
                    model.dec_alpha(step);
                    true
                })
            }
            SceneCommand::IncreaseAlpha => {
                let step = self.options.display.alpha_step;
                self.models.get_mut(self.selected).is_some_and(|model| {
                    model.inc_alpha(step);
                    true
                })
            }
            SceneCommand::ScaleCylRadius { factor } => {
                self.camera.cyl_radius *= factor;
                log::info!("cyl_radius is now {}", self.camera.cyl_radius);
                true
            }
            SceneCommand::ScaleCylHeight { factor } => {
                self.camera.cyl_height *= factor;
                log::info!("cyl_height is now {}", self.camera.cyl_height);
                true
            }
            SceneCommand::ResetView => {
                self.camera.reset();
                log::info!("Reset to default view");
                true
            }
            SceneCommand::DecreaseFov => {
                let fov = self.projection.decrease_fov();
                log::info!("FOV reduced to {fov}");
                self.refresh_projection();
                true
            }
            SceneCommand::IncreaseFov => {
                let fov = self.projection.increase_fov();
                log::info!("FOV increased to {fov}");
                self.refresh_projection();
                true
            }
            SceneCommand::DecreaseZNear => {
                self.projection.z_near /= 2.0;
                log::info!("zNear reduced to {}", self.projection.z_near);
                self.refresh_projection();
                true
            }
            SceneCommand::IncreaseZNear => {
                self.projection.z_near *= 2.0;
                log::info!("zNear increased to {}", self.projection.z_near);
                self.refresh_projection();
                true
            }
            SceneCommand::CycleProjection => {
                let ptype = self.projection.cycle();
                log::debug!("projection is now {ptype:?}");
                self.refresh_projection();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::{Quat, Vec3};

    use super::*;
    use crate::camera::ProjectionType;
    use crate::renderer::{MeshData, MeshModel, Renderable};
    use crate::scene::test_support::{options, rig, rig_with};

    fn key(c: char, modifiers: Modifiers) -> InputEvent {
        InputEvent::Key {
            key: Key::Letter(c),
            scancode: 0,
            action: Action::Press,
            modifiers,
        }
    }

    fn special(key: Key, action: Action, modifiers: Modifiers) -> InputEvent {
        InputEvent::Key {
            key,
            scancode: 0,
            action,
            modifiers,
        }
    }

    fn model() -> Box<dyn Renderable> {
        Box::new(MeshModel::new(MeshData::new(), Vec3::ZERO))
    }

    #[test]
    fn ctrl_y_cycles_projection_even_when_locked() {
        let mut r = rig();
        r.scene.set_locked(true);
        assert!(r.scene.handle_event(key('y', Modifiers::CONTROL)));
        assert_eq!(r.scene.projection().ptype, ProjectionType::Orthographic);
        assert!(r.scene.handle_event(key('y', Modifiers::CONTROL)));
        assert!(r.scene.handle_event(key('y', Modifiers::CONTROL)));
        assert_eq!(r.scene.projection().ptype, ProjectionType::Perspective);
    }

    #[test]
    fn lock_blocks_camera_keys() {
        let mut r = rig();
        let fov = r.scene.projection().fov;
        assert!(!r.scene.handle_event(key('l', Modifiers::CONTROL)));
        assert!(r.scene.is_locked());
        assert!(!r.scene.handle_event(key('o', Modifiers::CONTROL)));
        assert!(!r.scene.handle_event(key('c', Modifiers::CONTROL)));
        assert_eq!(r.scene.projection().fov, fov);
        assert!(!r.scene.options().display.show_coord_arrows);

        let _ = r.scene.handle_event(key('l', Modifiers::CONTROL));
        assert!(r.scene.handle_event(key('o', Modifiers::CONTROL)));
        assert_eq!(r.scene.projection().fov, fov - 2.0);
    }

    #[test]
    fn lock_blocks_scroll_and_drag() {
        let mut r = rig();
        r.scene.set_locked(true);
        let before = r.scene.camera().clone();
        assert!(!r.scene.handle_event(InputEvent::Scroll { x: 1.0, y: 1.0 }));
        let _ = r.scene.handle_event(InputEvent::MouseButton {
            button: MouseButton::Right,
            action: Action::Press,
            modifiers: Modifiers::NONE,
        });
        assert!(!r
            .scene
            .handle_event(InputEvent::CursorMoved { x: 50.0, y: 50.0 }));
        assert_eq!(r.scene.camera(), &before);
    }

    #[test]
    fn reset_restores_view() {
        let mut r = rig();
        r.scene.set_rotation(Quat::from_rotation_y(0.4));
        let _ = r.scene.handle_event(InputEvent::Scroll { x: 0.5, y: 2.0 });
        r.scene.camera_mut().rotation = Quat::from_rotation_x(1.0);
        assert!(r.scene.handle_event(key('a', Modifiers::CONTROL)));
        let cam = r.scene.camera();
        assert_eq!(cam.translation, cam.translation_default);
        assert_eq!(cam.rotation, cam.rotation_default);
        assert_eq!(cam.cyl_cam_pos, cam.cyl_cam_pos_default);
    }

    #[test]
    fn znear_keys_halve_and_double() {
        let mut r = rig();
        let z = r.scene.projection().z_near;
        assert!(r.scene.handle_event(key('u', Modifiers::CONTROL)));
        assert_eq!(r.scene.projection().z_near, z / 2.0);
        assert!(r.scene.handle_event(key('i', Modifiers::CONTROL)));
        assert!(r.scene.handle_event(key('i', Modifiers::CONTROL)));
        assert_eq!(r.scene.projection().z_near, z * 2.0);
    }

    #[test]
    fn function_keys_select_and_hide() {
        let mut r = rig();
        for _ in 0..3 {
            let _ = r.scene.add_model(model());
        }
        let f3 = special(Key::Function(3), Action::Press, Modifiers::NONE);
        assert!(!r.scene.handle_event(f3));
        assert_eq!(r.scene.selected_model(), 2);

        // F5 does not exist: selection stays, hide applies to model 2.
        let shift_f5 =
            special(Key::Function(5), Action::Press, Modifiers::SHIFT);
        assert!(r.scene.handle_event(shift_f5));
        assert_eq!(r.scene.selected_model(), 2);
        assert!(r.scene.models()[2].is_hidden());
        assert!(!r.scene.models()[0].is_hidden());
    }

    #[test]
    fn alpha_keys_repeat_and_clamp() {
        let mut r = rig();
        let _ = r.scene.add_model(model());
        let left = |action| special(Key::ArrowLeft, action, Modifiers::SHIFT);
        assert!(r.scene.handle_event(left(Action::Press)));
        for _ in 0..20 {
            assert!(r.scene.handle_event(left(Action::Repeat)));
        }
        assert_eq!(r.scene.models()[0].alpha(), 0.0);
        assert!(!r.scene.handle_event(left(Action::Release)));
    }

    #[test]
    fn alpha_and_hide_on_empty_registry_are_noops() {
        let mut r = rig();
        assert!(!r.scene.execute(SceneCommand::IncreaseAlpha));
        assert!(!r.scene.execute(SceneCommand::DecreaseAlpha));
        assert!(!r.scene.execute(SceneCommand::ToggleHideSelected));
    }

    #[test]
    fn cylinder_sizing_works_while_locked() {
        let mut r = rig();
        r.scene.set_locked(true);
        let radius = r.scene.camera().cyl_radius;
        let height = r.scene.camera().cyl_height;
        let up = special(Key::ArrowUp, Action::Repeat, Modifiers::SHIFT);
        assert!(r.scene.handle_event(up));
        assert_eq!(r.scene.camera().cyl_radius, radius * 2.0);
        let down = special(Key::ArrowDown, Action::Press, Modifiers::CONTROL);
        assert!(r.scene.handle_event(down));
        assert_eq!(r.scene.camera().cyl_height, height * 0.5);
    }

    #[test]
    fn quit_key_respects_option() {
        let mut r = rig();
        let _ = r.scene.handle_event(key('q', Modifiers::CONTROL));
        assert!(r.scene.ready_to_finish());

        let mut opts = options();
        opts.window.handle_quit_key = false;
        let mut owned = rig_with(opts, false);
        let _ = owned.scene.handle_event(key('q', Modifiers::CONTROL));
        assert!(!owned.scene.ready_to_finish());
    }

    #[test]
    fn window_close_respects_prevent_option() {
        let mut r = rig();
        assert!(!r.scene.handle_event(InputEvent::CloseRequested));
        assert!(r.scene.ready_to_finish());

        let mut opts = options();
        opts.window.prevent_window_close = true;
        let mut kept = rig_with(opts, false);
        let _ = kept.scene.handle_event(InputEvent::CloseRequested);
        assert!(!kept.scene.ready_to_finish());
    }

    #[test]
    fn resize_recomputes_projection() {
        let mut r = rig();
        let before = r.scene.projection().matrix();
        assert!(r.scene.handle_event(InputEvent::Resized {
            width: 400,
            height: 600
        }));
        assert_ne!(r.scene.projection().matrix(), before);
        assert_eq!(r.scene.mapper().window_size().x, 400);
    }

    struct CountingHooks {
        keys: Rc<Cell<u32>>,
        buttons: Rc<Cell<u32>>,
    }

    impl InputHooks for CountingHooks {
        fn key(&mut self, _: Key, _: u32, _: Action, _: Modifiers) -> bool {
            self.keys.set(self.keys.get() + 1);
            true
        }

        fn mouse_button(
            &mut self,
            _: MouseButton,
            _: Action,
            _: Modifiers,
        ) -> bool {
            self.buttons.set(self.buttons.get() + 1);
            false
        }
    }

    #[test]
    fn hooks_run_after_scene_handling() {
        let mut r = rig();
        let keys = Rc::new(Cell::new(0));
        let buttons = Rc::new(Cell::new(0));
        r.scene.set_input_hooks(Box::new(CountingHooks {
            keys: keys.clone(),
            buttons: buttons.clone(),
        }));
        assert!(r.scene.handle_event(key('x', Modifiers::NONE)));
        let _ = r.scene.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            action: Action::Press,
            modifiers: Modifiers::NONE,
        });
        assert_eq!(keys.get(), 1);
        assert_eq!(buttons.get(), 1);
    }

    #[test]
    fn snapshot_key_writes_configured_path() {
        let path = std::env::temp_dir()
            .join(format!("viscene-key-snap-{}.json", std::process::id()));
        let mut opts = options();
        opts.snapshot.path = path.clone();
        let mut r = rig_with(opts, false);
        r.scene.set_translation(Vec3::new(0.0, 0.0, -3.0));
        let _ = r.scene.handle_event(key('z', Modifiers::CONTROL));
        let snap = ViewSnapshot::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(snap.scenetrans_z, Some(-3.0));
    }
}
