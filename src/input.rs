use bevy::prelude::*;

use crate::audio::UiChirp;
use crate::player::CameraMode;
use crate::station::Settings;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Keybinds>()
            .init_resource::<InputAxes>()
            .add_systems(
                Update,
                (
                    keyboard_axes,
                    camera_mode_toggle,
                    help_toggle,
                    diagnostics_toggle,
                ),
            );
    }
}

#[derive(Resource)]
pub struct Keybinds {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub yaw_left: KeyCode,
    pub yaw_right: KeyCode,
    pub strafe_left: KeyCode,
    pub strafe_right: KeyCode,
    pub ascend: KeyCode,
    pub descend: KeyCode,
    pub camera: KeyCode,
    pub help: KeyCode,
    pub diagnostics: KeyCode,
}

impl Default for Keybinds {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            yaw_left: KeyCode::KeyA,
            yaw_right: KeyCode::KeyD,
            strafe_left: KeyCode::ArrowLeft,
            strafe_right: KeyCode::ArrowRight,
            ascend: KeyCode::Space,
            descend: KeyCode::ShiftLeft,
            camera: KeyCode::KeyV,
            help: KeyCode::KeyH,
            diagnostics: KeyCode::F3,
        }
    }
}

/// Normalized control axes, each held in [-1, 1]. Written by key and HUD
/// button transitions, read once per frame by the movement system.
#[derive(Resource, Clone, Copy, Default)]
pub struct InputAxes {
    pub move_forward: f32,
    pub move_right: f32,
    pub rotate_y: f32,
    pub ascend: f32,
}

impl InputAxes {
    fn clamp_all(&mut self) {
        self.move_forward = self.move_forward.clamp(-1.0, 1.0);
        self.move_right = self.move_right.clamp(-1.0, 1.0);
        self.rotate_y = self.rotate_y.clamp(-1.0, 1.0);
        self.ascend = self.ascend.clamp(-1.0, 1.0);
    }
}

/// Edge-triggered mapping: a press drives the axis to ±1, releasing either
/// key of a pair recenters it. Mirrors keydown/keyup handling so held HUD
/// buttons writing the same axes are not stomped every frame.
fn apply_key_transitions(keys: &ButtonInput<KeyCode>, binds: &Keybinds, axes: &mut InputAxes) {
    if keys.just_pressed(binds.forward) {
        axes.move_forward = 1.0;
    }
    if keys.just_pressed(binds.backward) {
        axes.move_forward = -1.0;
    }
    if keys.just_released(binds.forward) || keys.just_released(binds.backward) {
        axes.move_forward = 0.0;
    }

    if keys.just_pressed(binds.strafe_right) {
        axes.move_right = 1.0;
    }
    if keys.just_pressed(binds.strafe_left) {
        axes.move_right = -1.0;
    }
    if keys.just_released(binds.strafe_left) || keys.just_released(binds.strafe_right) {
        axes.move_right = 0.0;
    }

    if keys.just_pressed(binds.yaw_left) {
        axes.rotate_y = -1.0;
    }
    if keys.just_pressed(binds.yaw_right) {
        axes.rotate_y = 1.0;
    }
    if keys.just_released(binds.yaw_left) || keys.just_released(binds.yaw_right) {
        axes.rotate_y = 0.0;
    }

    if keys.just_pressed(binds.ascend) {
        axes.ascend = 1.0;
    }
    if keys.just_pressed(binds.descend) {
        axes.ascend = -1.0;
    }
    if keys.just_released(binds.ascend) || keys.just_released(binds.descend) {
        axes.ascend = 0.0;
    }

    axes.clamp_all();
}

fn keyboard_axes(
    keys: Res<ButtonInput<KeyCode>>,
    binds: Res<Keybinds>,
    mut axes: ResMut<InputAxes>,
) {
    apply_key_transitions(&keys, &binds, &mut axes);
}

fn camera_mode_toggle(
    keys: Res<ButtonInput<KeyCode>>,
    binds: Res<Keybinds>,
    mode: Res<State<CameraMode>>,
    mut next_mode: ResMut<NextState<CameraMode>>,
    mut chirp: EventWriter<UiChirp>,
) {
    if keys.just_pressed(binds.camera) {
        next_mode.set(mode.get().toggled());
        chirp.send(UiChirp::TOGGLE);
    }
}

fn help_toggle(
    mut settings: ResMut<Settings>,
    keys: Res<ButtonInput<KeyCode>>,
    binds: Res<Keybinds>,
) {
    if keys.just_pressed(binds.help) {
        settings.show_help = !settings.show_help;
    }
}

fn diagnostics_toggle(
    mut settings: ResMut<Settings>,
    keys: Res<ButtonInput<KeyCode>>,
    binds: Res<Keybinds>,
) {
    if keys.just_pressed(binds.diagnostics) {
        settings.show_diagnostics = !settings.show_diagnostics;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes_in_range(axes: &InputAxes) -> bool {
        [axes.move_forward, axes.move_right, axes.rotate_y, axes.ascend]
            .iter()
            .all(|v| (-1.0..=1.0).contains(v))
    }

    #[test]
    fn press_drives_axis_release_recenters() {
        let binds = Keybinds::default();
        let mut axes = InputAxes::default();
        let mut keys = ButtonInput::<KeyCode>::default();

        keys.press(binds.forward);
        apply_key_transitions(&keys, &binds, &mut axes);
        assert_eq!(axes.move_forward, 1.0);

        keys.clear();
        keys.release(binds.forward);
        apply_key_transitions(&keys, &binds, &mut axes);
        assert_eq!(axes.move_forward, 0.0);
    }

    #[test]
    fn ascend_and_descend_share_an_axis() {
        let binds = Keybinds::default();
        let mut axes = InputAxes::default();
        let mut keys = ButtonInput::<KeyCode>::default();

        keys.press(binds.ascend);
        apply_key_transitions(&keys, &binds, &mut axes);
        assert_eq!(axes.ascend, 1.0);

        keys.clear();
        keys.press(binds.descend);
        apply_key_transitions(&keys, &binds, &mut axes);
        assert_eq!(axes.ascend, -1.0);

        // Releasing either key of the pair recenters, as keyup did upstream.
        keys.clear();
        keys.release(binds.descend);
        apply_key_transitions(&keys, &binds, &mut axes);
        assert_eq!(axes.ascend, 0.0);
    }

    #[test]
    fn yaw_keys_turn_not_strafe() {
        let binds = Keybinds::default();
        let mut axes = InputAxes::default();
        let mut keys = ButtonInput::<KeyCode>::default();

        keys.press(binds.yaw_left);
        apply_key_transitions(&keys, &binds, &mut axes);
        assert_eq!(axes.rotate_y, -1.0);
        assert_eq!(axes.move_right, 0.0);
    }

    #[test]
    fn axes_stay_clamped_under_arbitrary_sequences() {
        let binds = Keybinds::default();
        let mut axes = InputAxes::default();
        let mut keys = ButtonInput::<KeyCode>::default();

        // Opposing keys in the same frame: last assignment wins, still in range.
        keys.press(binds.forward);
        keys.press(binds.backward);
        keys.press(binds.yaw_left);
        keys.press(binds.ascend);
        apply_key_transitions(&keys, &binds, &mut axes);
        assert!(axes_in_range(&axes));
        assert_eq!(axes.move_forward, -1.0);

        keys.clear();
        keys.press(binds.strafe_right);
        keys.release(binds.ascend);
        apply_key_transitions(&keys, &binds, &mut axes);
        assert!(axes_in_range(&axes));
        assert_eq!(axes.ascend, 0.0);
    }
}
