use bevy::color::LinearRgba;
use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::player::Player;

/// Default distance at which a module's info panel comes up.
pub const ACTIVATION_RADIUS: f32 = 8.0;

pub struct ModuleInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description_ja: &'static str,
    pub description_en: &'static str,
    pub position: Vec3,
}

/// The five visitable station sections. Positions are the approximate module
/// centers used for the proximity scan, not the render positions.
pub const MODULES: [ModuleInfo; 5] = [
    ModuleInfo {
        id: "kibo",
        name: "KIBO / JEM",
        description_ja: "日本が開発したISS最大の実験棟。船外実験プラットフォームを持つ。",
        description_en: "Japan's science module for microgravity experiments. Largest single module.",
        position: Vec3::new(0.0, 1.5, 4.0),
    },
    ModuleInfo {
        id: "columbus",
        name: "Columbus",
        description_ja: "欧州宇宙機関(ESA)の科学実験施設。",
        description_en: "European Space Agency's science laboratory.",
        position: Vec3::new(0.0, 1.5, -4.0),
    },
    ModuleInfo {
        id: "destiny",
        name: "Destiny",
        description_ja: "NASAの実験棟。ISSのシステム制御の中枢でもある。",
        description_en: "NASA's primary research laboratory and control center.",
        position: Vec3::new(0.0, 1.5, 0.0),
    },
    ModuleInfo {
        id: "harmony",
        name: "Harmony",
        description_ja: "各国の実験棟をつなぐ結合ノード。",
        description_en: "Utility hub connecting the laboratory modules.",
        position: Vec3::new(4.0, 1.5, 0.0),
    },
    ModuleInfo {
        id: "zarya",
        name: "Zarya",
        description_ja: "ISSの最初のモジュール。電力と推進力を提供。",
        description_en: "The first module of the ISS. Provided power and propulsion.",
        position: Vec3::new(-5.0, 1.5, 0.0),
    },
];

#[derive(Resource, Clone)]
pub struct Settings {
    pub player_speed: f32,
    pub rotation_speed: f32,
    pub activation_radius: f32,
    pub earth_spin: f32,
    pub cloud_spin: f32,
    pub show_help: bool,
    pub show_diagnostics: bool,
    pub show_settings: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_speed: 5.0,
            rotation_speed: 2.0,
            activation_radius: ACTIVATION_RADIUS,
            earth_spin: 0.005,
            cloud_spin: 0.007,
            show_help: true,
            show_diagnostics: false,
            show_settings: false,
        }
    }
}

/// Index into [`MODULES`] of the module the player is currently near, if any.
#[derive(Resource, Default)]
pub struct ActiveModule(pub Option<usize>);

impl ActiveModule {
    pub fn info(&self) -> Option<&'static ModuleInfo> {
        self.0.map(|i| &MODULES[i])
    }
}

/// Marks the translucent marker sphere for one module.
#[derive(Component)]
struct Highlight(usize);

pub struct StationPlugin;
impl Plugin for StationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Settings>()
            .init_resource::<ActiveModule>()
            .add_systems(Startup, spawn_station)
            .add_systems(Update, (module_proximity, update_highlights));
    }
}

/// Scan the five module positions and pick the closest one strictly inside
/// `radius`. Exactly on the boundary counts as outside; equidistant modules
/// resolve to the earlier entry in [`MODULES`].
pub fn nearest_module(pos: Vec3, radius: f32) -> Option<usize> {
    let mut closest = None;
    let mut min_dist = radius;
    for (i, module) in MODULES.iter().enumerate() {
        let dist = pos.distance(module.position);
        if dist < min_dist {
            min_dist = dist;
            closest = Some(i);
        }
    }
    closest
}

fn module_proximity(
    settings: Res<Settings>,
    mut active: ResMut<ActiveModule>,
    player_q: Query<&Transform, With<Player>>,
) {
    let Ok(player) = player_q.get_single() else {
        return;
    };
    let nearest = nearest_module(player.translation, settings.activation_radius);
    if nearest != active.0 {
        match nearest {
            Some(i) => debug!("module activated: {}", MODULES[i].id),
            None => debug!("module deactivated"),
        }
        active.0 = nearest;
    }
}

fn update_highlights(active: Res<ActiveModule>, mut markers: Query<(&Highlight, &mut Visibility)>) {
    if !active.is_changed() {
        return;
    }
    for (marker, mut visibility) in &mut markers {
        *visibility = if active.0 == Some(marker.0) {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

fn spawn_station(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let metallic = materials.add(StandardMaterial {
        base_color: Color::srgb(0.8, 0.8, 0.8),
        perceptual_roughness: 0.3,
        metallic: 0.8,
        ..default()
    });
    let solar = materials.add(StandardMaterial {
        base_color: Color::srgb(0.10, 0.17, 0.30),
        emissive: LinearRgba::rgb(0.01, 0.03, 0.08),
        perceptual_roughness: 0.2,
        metallic: 0.5,
        ..default()
    });
    let white_paint = materials.add(StandardMaterial {
        base_color: Color::srgb(0.93, 0.93, 0.93),
        perceptual_roughness: 0.5,
        ..default()
    });
    let highlight = materials.add(StandardMaterial {
        base_color: Color::srgba(0.0, 1.0, 0.67, 0.15),
        emissive: LinearRgba::rgb(0.0, 2.0, 1.3),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    let panel_mesh = meshes.add(Cuboid::new(2.0, 0.1, 12.0));
    let boom_mesh = meshes.add(Cylinder::new(0.2, 12.2));

    commands
        .spawn(SpatialBundle::default())
        .with_children(|station| {
            // Main truss
            station.spawn(PbrBundle {
                mesh: meshes.add(Cuboid::new(40.0, 1.0, 1.0)),
                material: metallic.clone(),
                ..default()
            });

            // Solar array wings, two paddles per side
            for wing_x in [-18.0, 18.0] {
                for paddle_z in [6.0, -6.0] {
                    station
                        .spawn(SpatialBundle::from_transform(
                            Transform::from_xyz(wing_x, 0.0, paddle_z)
                                .with_rotation(Quat::from_rotation_x(FRAC_PI_4)),
                        ))
                        .with_children(|array| {
                            array.spawn(PbrBundle {
                                mesh: panel_mesh.clone(),
                                material: solar.clone(),
                                ..default()
                            });
                            array.spawn(PbrBundle {
                                mesh: boom_mesh.clone(),
                                material: metallic.clone(),
                                transform: Transform::from_rotation(Quat::from_rotation_x(
                                    FRAC_PI_2,
                                )),
                                ..default()
                            });
                        });
                }
            }

            // Lab modules along the truss; cylinders lie on their sides
            let lengthwise = Quat::from_rotation_z(FRAC_PI_2);
            station.spawn(PbrBundle {
                mesh: meshes.add(Cylinder::new(1.5, 6.0)),
                material: white_paint.clone(),
                transform: Transform::from_xyz(0.0, 1.5, 0.0).with_rotation(lengthwise),
                ..default()
            });
            station.spawn(PbrBundle {
                mesh: meshes.add(Cylinder::new(1.6, 3.0)),
                material: white_paint.clone(),
                transform: Transform::from_xyz(4.0, 1.5, 0.0).with_rotation(lengthwise),
                ..default()
            });
            station.spawn(PbrBundle {
                mesh: meshes.add(Cylinder::new(1.4, 6.0)),
                material: white_paint.clone(),
                transform: Transform::from_xyz(-5.0, 1.5, 0.0).with_rotation(lengthwise),
                ..default()
            });

            // Kibo with its exposed-facility porch
            let crosswise = Quat::from_rotation_x(FRAC_PI_2);
            station
                .spawn(SpatialBundle::from_transform(Transform::from_xyz(
                    4.0, 1.5, 4.0,
                )))
                .with_children(|kibo| {
                    kibo.spawn(PbrBundle {
                        mesh: meshes.add(Cylinder::new(1.8, 6.0)),
                        material: white_paint.clone(),
                        transform: Transform::from_rotation(crosswise),
                        ..default()
                    });
                    kibo.spawn(PbrBundle {
                        mesh: meshes.add(Cuboid::new(3.0, 1.0, 3.0)),
                        material: metallic.clone(),
                        transform: Transform::from_xyz(0.0, 0.0, 4.0),
                        ..default()
                    });
                });

            // Columbus
            station.spawn(PbrBundle {
                mesh: meshes.add(Cylinder::new(1.7, 5.0)),
                material: white_paint.clone(),
                transform: Transform::from_xyz(4.0, 1.5, -3.5).with_rotation(crosswise),
                ..default()
            });

            // Radiator panels
            let radiator_mesh = meshes.add(Cuboid::new(4.0, 8.0, 0.2));
            for (z, tilt) in [(-4.0, 0.2), (4.0, -0.2)] {
                station.spawn(PbrBundle {
                    mesh: radiator_mesh.clone(),
                    material: white_paint.clone(),
                    transform: Transform::from_xyz(-6.0, 4.0, z)
                        .with_rotation(Quat::from_rotation_x(tilt)),
                    ..default()
                });
            }

            // Proximity markers, hidden until their module activates
            let marker_mesh = meshes.add(Sphere::new(2.5).mesh().uv(16, 16));
            for (i, module) in MODULES.iter().enumerate() {
                station.spawn((
                    PbrBundle {
                        mesh: marker_mesh.clone(),
                        material: highlight.clone(),
                        transform: Transform::from_translation(module.position),
                        visibility: Visibility::Hidden,
                        ..default()
                    },
                    Highlight(i),
                ));
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activates_nearest_module_within_radius() {
        let near_kibo = MODULES[0].position + Vec3::new(0.0, 0.0, 1.0);
        assert_eq!(nearest_module(near_kibo, ACTIVATION_RADIUS), Some(0));
    }

    #[test]
    fn moving_away_deactivates() {
        let near_zarya = MODULES[4].position + Vec3::new(-1.0, 0.0, 0.0);
        assert_eq!(nearest_module(near_zarya, ACTIVATION_RADIUS), Some(4));

        let far = near_zarya + Vec3::new(-50.0, 0.0, 0.0);
        assert_eq!(nearest_module(far, ACTIVATION_RADIUS), None);
    }

    #[test]
    fn boundary_distance_does_not_activate() {
        // Straight up from Destiny every other module is > 8 away.
        let pos = MODULES[2].position + Vec3::Y * ACTIVATION_RADIUS;
        assert_eq!(nearest_module(pos, ACTIVATION_RADIUS), None);
    }

    #[test]
    fn just_inside_boundary_activates() {
        let pos = MODULES[2].position + Vec3::Y * (ACTIVATION_RADIUS - 0.01);
        assert_eq!(nearest_module(pos, ACTIVATION_RADIUS), Some(2));
    }

    #[test]
    fn equidistant_modules_prefer_declaration_order() {
        // (0, 1.5, 2) is exactly 2.0 from both Kibo (index 0) and Destiny
        // (index 2); the earlier entry wins.
        let pos = Vec3::new(0.0, 1.5, 2.0);
        assert_eq!(nearest_module(pos, ACTIVATION_RADIUS), Some(0));
    }

    #[test]
    fn module_ids_are_unique() {
        for (i, a) in MODULES.iter().enumerate() {
            for b in MODULES.iter().skip(i + 1) {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
