// World setup: camera, light, and the static floor the lane rests on.
use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, RigidBody};

use crate::plugins::lane::LaneConfig;

const FLOOR_HALF_EXTENT: f32 = 50.0;
const FLOOR_HALF_THICKNESS: f32 = 0.01;

pub struct ScenePlugin;
impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_scene);
    }
}

fn spawn_scene(
    mut commands: Commands,
    cfg: Res<LaneConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<StandardMaterial>>,
) {
    let focus = cfg.anchor + Vec3::new(0.0, 0.0, -0.2);
    commands.spawn(Camera3dBundle {
        transform: Transform::from_translation(cfg.anchor + Vec3::new(0.0, 0.55, 1.1))
            .looking_at(focus, Vec3::Y),
        projection: PerspectiveProjection { near: 0.01, ..default() }.into(),
        ..default()
    });

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        transform: Transform::from_xyz(1.0, 3.0, 2.0).looking_at(cfg.anchor, Vec3::Y),
        ..default()
    });

    // Top face sits at the anchor height so lane contents rest on it.
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Plane3d::default().mesh().size(FLOOR_HALF_EXTENT * 2.0, FLOOR_HALF_EXTENT * 2.0)),
            material: mats.add(StandardMaterial {
                base_color: Color::srgb(0.55, 0.45, 0.32),
                perceptual_roughness: 0.8,
                ..default()
            }),
            transform: Transform::from_translation(cfg.anchor),
            ..default()
        },
        RigidBody::Fixed,
    ))
    .with_children(|floor| {
        floor.spawn((
            TransformBundle::from_transform(Transform::from_xyz(0.0, -FLOOR_HALF_THICKNESS, 0.0)),
            Collider::cuboid(FLOOR_HALF_EXTENT, FLOOR_HALF_THICKNESS, FLOOR_HALF_EXTENT),
        ));
    });
}
