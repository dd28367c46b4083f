//! World setup systems for camera, lighting, road and HUD

use bevy::prelude::*;

use super::components::{Ground, HudText, MainCamera, SimWorldResource, WORLD_SCALE};
use crate::simulation::Lane;

/// System to setup the world environment (road, lane markings, lighting, camera)
pub fn setup_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim: Res<SimWorldResource>,
) {
    let config = sim.world.config();
    let road_length = (config.wrap_threshold() - config.wrap_reentry()) * WORLD_SCALE;
    let road_width = config.lane_height * Lane::ALL.len() as f32 * WORLD_SCALE;

    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Transform::from_xyz(0.0, 40.0, 0.0).looking_at(Vec3::ZERO, Vec3::NEG_Z),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Ground,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(road_length, road_width))),
        MeshMaterial3d(materials.add(Color::srgb(0.18, 0.22, 0.28))),
    ));

    // Dashed-looking lane dividers between the three lanes
    let divider = materials.add(Color::srgb(0.63, 0.68, 0.75));
    for boundary in [1.0_f32, 2.0] {
        let z = (boundary - 1.5) * config.lane_height * WORLD_SCALE;
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(road_length, 0.02, 0.1))),
            MeshMaterial3d(divider.clone()),
            Transform::from_xyz(0.0, 0.01, z),
        ));
    }

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(10.0),
                padding: UiRect::all(Val::Px(8.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        ))
        .with_children(|parent| {
            for (label, kind) in [
                ("Status", HudText::Status),
                ("Selected", HudText::Selected),
                ("Log empty. Start the simulation.", HudText::LatestEvent),
            ] {
                parent.spawn((
                    Text::new(label),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.9, 0.9, 0.9)),
                    kind,
                ));
            }
        });
}
