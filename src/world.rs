use bevy::color::LinearRgba;
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::station::Settings;

const EARTH_RADIUS: f32 = 100.0;
const EARTH_OFFSET: Vec3 = Vec3::new(0.0, -108.0, 0.0);
const AXIAL_TILT_DEG: f32 = 23.5;

const STAR_COUNT: usize = 1500;
const STARFIELD_RADIUS: f32 = 300.0;
const STARFIELD_DEPTH: f32 = 25.0;

const CREW_SIZE: usize = 8;
const CREW_NAMES: [&str; 8] = [
    "User101",
    "Astro_J",
    "Cosmo-9",
    "SPEAKER-2",
    "Voyager",
    "Cmdr_Shepard",
    "Major_Tom",
    "StarWalker",
];

#[derive(Component)]
struct Earth;

#[derive(Component)]
struct CloudLayer;

/// Decorative drifting astronaut.
#[derive(Component)]
pub struct Npc {
    pub name: String,
    phase: f32,
    base_y: f32,
    yaw: f32,
}

pub struct WorldPlugin;
impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 30.0,
        })
        .add_systems(
            Startup,
            (setup_lights, spawn_earth, spawn_starfield, spawn_crew),
        )
        .add_systems(Update, (earth_spin, crew_drift));
    }
}

fn setup_lights(mut commands: Commands) {
    // Sun
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            color: Color::srgb(1.0, 0.98, 0.94),
            illuminance: 30_000.0,
            shadows_enabled: true,
            ..default()
        },
        transform: Transform::from_xyz(50.0, 20.0, 30.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    // Earthshine fill from below
    commands.spawn(PointLightBundle {
        point_light: PointLight {
            color: Color::srgb(0.13, 0.25, 0.38),
            intensity: 800_000.0,
            range: 50.0,
            ..default()
        },
        transform: Transform::from_xyz(0.0, -20.0, 0.0),
        ..default()
    });
}

fn spawn_earth(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let globe = meshes.add(Sphere::new(EARTH_RADIUS).mesh().uv(64, 64));

    let ocean = materials.add(StandardMaterial {
        base_color: Color::srgb(0.12, 0.25, 0.35),
        emissive: LinearRgba::rgb(0.0, 0.004, 0.02),
        perceptual_roughness: 0.8,
        metallic: 0.1,
        ..default()
    });
    let clouds = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.3),
        alpha_mode: AlphaMode::Add,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    commands
        .spawn(SpatialBundle::from_transform(Transform::from_translation(
            EARTH_OFFSET,
        )))
        .with_children(|earth| {
            earth.spawn((
                PbrBundle {
                    mesh: globe.clone(),
                    material: ocean,
                    transform: Transform::from_rotation(Quat::from_rotation_z(
                        AXIAL_TILT_DEG.to_radians(),
                    )),
                    ..default()
                },
                Earth,
            ));
            earth.spawn((
                PbrBundle {
                    mesh: globe,
                    material: clouds,
                    transform: Transform::from_scale(Vec3::splat(1.01)),
                    ..default()
                },
                CloudLayer,
            ));
        });
}

/// Random points inside a spherical shell of `radius` ± `depth`.
fn scatter_shell(rng: &mut impl Rng, count: usize, radius: f32, depth: f32) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let theta = rng.gen::<f32>() * TAU;
            let u: f32 = rng.gen_range(-1.0..1.0);
            let ring = (1.0 - u * u).sqrt();
            let dir = Vec3::new(ring * theta.cos(), u, ring * theta.sin());
            dir * (radius + rng.gen_range(-depth..depth))
        })
        .collect()
}

fn spawn_starfield(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let star_mesh = meshes.add(Sphere::new(1.0).mesh().uv(6, 4));
    let star_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        emissive: LinearRgba::rgb(2.0, 2.0, 2.2),
        unlit: true,
        ..default()
    });

    let mut rng = rand::thread_rng();
    for position in scatter_shell(&mut rng, STAR_COUNT, STARFIELD_RADIUS, STARFIELD_DEPTH) {
        commands.spawn(PbrBundle {
            mesh: star_mesh.clone(),
            material: star_material.clone(),
            transform: Transform::from_translation(position)
                .with_scale(Vec3::splat(rng.gen_range(0.2..0.7))),
            ..default()
        });
    }
}

fn spawn_crew(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let body_mesh = meshes.add(Capsule3d::new(0.3, 0.8));
    let head_mesh = meshes.add(Cuboid::new(0.4, 0.4, 0.4));
    let visor_mesh = meshes.add(Rectangle::new(0.35, 0.3));

    let suit_white = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        ..default()
    });
    let suit_dark = materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 0.2, 0.2),
        ..default()
    });
    let helmet_dark = materials.add(StandardMaterial {
        base_color: Color::BLACK,
        unlit: true,
        ..default()
    });
    let visor_gold = materials.add(StandardMaterial {
        base_color: Color::srgb(0.83, 0.69, 0.22),
        metallic: 1.0,
        perceptual_roughness: 0.0,
        ..default()
    });
    let visor_glow = materials.add(StandardMaterial {
        base_color: Color::srgb(0.0, 1.0, 0.67),
        emissive: LinearRgba::rgb(0.0, 4.0, 2.6),
        unlit: true,
        ..default()
    });

    let mut rng = rand::thread_rng();
    for i in 0..CREW_SIZE {
        let angle = TAU * i as f32 / CREW_SIZE as f32;
        let ring_radius = 10.0 + rng.gen::<f32>() * 5.0;
        let position = Vec3::new(
            angle.cos() * ring_radius,
            (rng.gen::<f32>() - 0.5) * 8.0,
            angle.sin() * ring_radius,
        );
        let futuristic = rng.gen::<f32>() > 0.7;
        let name = format!("{}{:02}", CREW_NAMES[i], rng.gen_range(0..99));

        let suit = if futuristic { &suit_dark } else { &suit_white };
        let helmet = if futuristic { &helmet_dark } else { &suit_white };
        let visor = if futuristic { &visor_glow } else { &visor_gold };

        commands
            .spawn((
                SpatialBundle::from_transform(Transform::from_translation(position)),
                Npc {
                    name,
                    phase: position.x,
                    base_y: position.y,
                    yaw: 0.0,
                },
            ))
            .with_children(|npc| {
                npc.spawn(PbrBundle {
                    mesh: body_mesh.clone(),
                    material: suit.clone(),
                    ..default()
                });
                npc.spawn(PbrBundle {
                    mesh: head_mesh.clone(),
                    material: helmet.clone(),
                    transform: Transform::from_xyz(0.0, 0.7, 0.0),
                    ..default()
                });
                npc.spawn(PbrBundle {
                    mesh: visor_mesh.clone(),
                    material: visor.clone(),
                    transform: Transform::from_xyz(0.0, 0.7, 0.21),
                    ..default()
                });
            });
    }
}

fn earth_spin(
    time: Res<Time>,
    settings: Res<Settings>,
    mut earths: Query<&mut Transform, With<Earth>>,
    mut clouds: Query<&mut Transform, (With<CloudLayer>, Without<Earth>)>,
) {
    let dt = time.delta_seconds();
    for mut transform in &mut earths {
        transform.rotate_local_y(settings.earth_spin * dt);
    }
    for mut transform in &mut clouds {
        transform.rotate_y(settings.cloud_spin * dt);
    }
}

fn crew_drift(time: Res<Time>, mut npcs: Query<(&mut Npc, &mut Transform)>) {
    let t = time.elapsed_seconds();
    let dt = time.delta_seconds();
    for (mut npc, mut transform) in &mut npcs {
        npc.yaw += 0.12 * dt;
        transform.rotation = Quat::from_rotation_y(npc.yaw)
            * Quat::from_rotation_z((t * 0.5 + npc.phase).sin() * 0.1);
        transform.translation.y = npc.base_y + (t * 1.5 + npc.phase).sin() * 0.2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn starfield_scatter_stays_on_shell() {
        let mut rng = StdRng::from_seed([7; 32]);
        let points = scatter_shell(&mut rng, 256, STARFIELD_RADIUS, STARFIELD_DEPTH);
        assert_eq!(points.len(), 256);
        for p in points {
            let r = p.length();
            assert!(r > STARFIELD_RADIUS - STARFIELD_DEPTH - 1e-3);
            assert!(r < STARFIELD_RADIUS + STARFIELD_DEPTH + 1e-3);
        }
    }
}
