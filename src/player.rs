use bevy::prelude::*;

use crate::input::InputAxes;
use crate::station::Settings;
use crate::MainCamera;

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CameraMode {
    #[default]
    ThirdPerson,
    FirstPerson,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::ThirdPerson => CameraMode::FirstPerson,
            CameraMode::FirstPerson => CameraMode::ThirdPerson,
        }
    }
}

#[derive(Component)]
pub struct Player {
    /// Where the integration wants the avatar; the rendered transform
    /// approaches it with exponential smoothing.
    pub target: Vec3,
    pub yaw: f32,
}

/// The visible astronaut meshes, hidden in first person to avoid clipping.
#[derive(Component)]
struct AvatarBody;

// Smoothing rates; higher snaps faster.
const POSITION_SMOOTHING: f32 = 40.0;
const CAMERA_SMOOTHING: f32 = 6.0;

const FIRST_PERSON_OFFSET: Vec3 = Vec3::new(0.0, 0.2, 0.2);
const THIRD_PERSON_OFFSET: Vec3 = Vec3::new(0.0, 2.0, 6.0);

pub struct PlayerPlugin;
impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_player).add_systems(
            Update,
            (
                (player_move, camera_follow).chain(),
                avatar_breathing,
                avatar_visibility,
            ),
        );
    }
}

/// Movement for one frame: the input axes expressed in the player's local
/// frame (+x right, +y up, -z forward), rotated into world space by the yaw.
pub fn movement_delta(axes: &InputAxes, yaw: f32, speed: f32, dt: f32) -> Vec3 {
    let local = Vec3::new(axes.move_right, axes.ascend, -axes.move_forward);
    Quat::from_rotation_y(yaw) * local * speed * dt
}

fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let suit = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        perceptual_roughness: 0.5,
        ..default()
    });
    let helmet = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        perceptual_roughness: 0.2,
        ..default()
    });
    let visor = materials.add(StandardMaterial {
        base_color: Color::srgb(0.83, 0.69, 0.22),
        metallic: 0.9,
        perceptual_roughness: 0.1,
        ..default()
    });

    let start = Vec3::new(0.0, 5.0, 20.0);
    commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_translation(start)),
            Player {
                target: start,
                yaw: 0.0,
            },
        ))
        .with_children(|player| {
            player
                .spawn((SpatialBundle::default(), AvatarBody))
                .with_children(|body| {
                    // Backpack
                    body.spawn(PbrBundle {
                        mesh: meshes.add(Cuboid::new(0.5, 0.7, 0.3)),
                        material: suit.clone(),
                        transform: Transform::from_xyz(0.0, 0.0, -0.25),
                        ..default()
                    });
                    // Torso
                    body.spawn(PbrBundle {
                        mesh: meshes.add(Capsule3d::new(0.25, 0.6)),
                        material: suit.clone(),
                        transform: Transform::from_xyz(0.0, -0.3, 0.0),
                        ..default()
                    });
                    // Helmet
                    body.spawn(PbrBundle {
                        mesh: meshes.add(Sphere::new(0.22).mesh().uv(16, 16)),
                        material: helmet.clone(),
                        transform: Transform::from_xyz(0.0, 0.35, 0.0),
                        ..default()
                    });
                    // Visor
                    body.spawn(PbrBundle {
                        mesh: meshes.add(Sphere::new(0.15).mesh().uv(16, 16)),
                        material: visor.clone(),
                        transform: Transform::from_xyz(0.0, 0.35, 0.15),
                        ..default()
                    });
                });
        });
}

fn player_move(
    time: Res<Time>,
    axes: Res<InputAxes>,
    settings: Res<Settings>,
    mut players: Query<(&mut Player, &mut Transform)>,
) {
    let dt = time.delta_seconds();
    let Ok((mut player, mut transform)) = players.get_single_mut() else {
        return;
    };

    let yaw = player.yaw;
    player.target += movement_delta(&axes, yaw, settings.player_speed, dt);
    player.yaw -= axes.rotate_y * settings.rotation_speed * dt;

    let alpha = (1.0 - (-POSITION_SMOOTHING * dt).exp()).clamp(0.0, 1.0);
    transform.translation = transform.translation.lerp(player.target, alpha);
    transform.rotation = Quat::from_rotation_y(player.yaw);
}

fn camera_follow(
    time: Res<Time>,
    mode: Res<State<CameraMode>>,
    players: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(player) = players.get_single() else {
        return;
    };
    let Ok(mut cam) = cameras.get_single_mut() else {
        return;
    };

    let alpha = (1.0 - (-CAMERA_SMOOTHING * time.delta_seconds()).exp()).clamp(0.0, 1.0);
    match mode.get() {
        CameraMode::FirstPerson => {
            let target = player.translation + player.rotation * FIRST_PERSON_OFFSET;
            cam.translation = cam.translation.lerp(target, alpha);
            cam.rotation = cam.rotation.slerp(player.rotation, alpha);
        }
        CameraMode::ThirdPerson => {
            let target = player.translation + player.rotation * THIRD_PERSON_OFFSET;
            cam.translation = cam.translation.lerp(target, alpha);
            cam.look_at(player.translation, Vec3::Y);
        }
    }
}

fn avatar_breathing(time: Res<Time>, mut bodies: Query<&mut Transform, With<AvatarBody>>) {
    let t = time.elapsed_seconds();
    for mut body in &mut bodies {
        body.translation.y = t.sin() * 0.05;
        body.rotation = Quat::from_rotation_z((t * 0.5).sin() * 0.05);
    }
}

fn avatar_visibility(
    mode: Res<State<CameraMode>>,
    mut bodies: Query<&mut Visibility, With<AvatarBody>>,
) {
    if !mode.is_changed() {
        return;
    }
    let target = match mode.get() {
        CameraMode::ThirdPerson => Visibility::Inherited,
        CameraMode::FirstPerson => Visibility::Hidden,
    };
    for mut visibility in &mut bodies {
        *visibility = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    #[test]
    fn forward_moves_along_facing() {
        let axes = InputAxes {
            move_forward: 1.0,
            ..default()
        };

        let ahead = movement_delta(&axes, 0.0, 5.0, 0.1);
        assert!(ahead.abs_diff_eq(Vec3::new(0.0, 0.0, -0.5), EPS));

        // A quarter turn left carries "forward" onto -X.
        let turned = movement_delta(&axes, FRAC_PI_2, 5.0, 0.1);
        assert!(turned.abs_diff_eq(Vec3::new(-0.5, 0.0, 0.0), EPS));
    }

    #[test]
    fn ascend_is_vertical_regardless_of_yaw() {
        let axes = InputAxes {
            ascend: 1.0,
            ..default()
        };
        let delta = movement_delta(&axes, 1.234, 5.0, 0.1);
        assert!(delta.abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), EPS));
    }

    #[test]
    fn idle_input_is_stationary() {
        let delta = movement_delta(&InputAxes::default(), 0.7, 5.0, 0.1);
        assert!(delta.abs_diff_eq(Vec3::ZERO, EPS));
    }

    #[test]
    fn delta_scales_with_speed_and_dt() {
        let axes = InputAxes {
            move_right: -1.0,
            ..default()
        };
        let slow = movement_delta(&axes, 0.0, 2.0, 0.01);
        let fast = movement_delta(&axes, 0.0, 4.0, 0.02);
        assert!((fast.length() - slow.length() * 4.0).abs() < EPS);
    }

    #[test]
    fn camera_mode_toggle_flips_between_two_values() {
        assert_eq!(CameraMode::ThirdPerson.toggled(), CameraMode::FirstPerson);
        assert_eq!(CameraMode::FirstPerson.toggled(), CameraMode::ThirdPerson);
        assert_eq!(
            CameraMode::default().toggled().toggled(),
            CameraMode::default()
        );
    }
}
