//! Systems for syncing Bevy entities with simulation state

use bevy::prelude::*;

use super::components::{EntityMappings, HudText, SimWorldResource, VehicleLink, WORLD_SCALE};
use crate::simulation::{SimConfig, VehicleMode, VehicleState};

/// System to run simulation tick
pub fn tick_simulation(mut sim: ResMut<SimWorldResource>) {
    sim.world.tick();
    sim.flush_events();
}

fn vehicle_translation(vehicle: &VehicleState, config: &SimConfig) -> Vec3 {
    let center_x = (config.wrap_threshold() + config.wrap_reentry()) / 2.0;
    let center_z = config.lane_height * 1.5;
    Vec3::new(
        (vehicle.position - center_x) * WORLD_SCALE,
        0.3,
        (vehicle.lane_offset - center_z) * WORLD_SCALE,
    )
}

fn named_color(name: &str) -> Color {
    match name {
        "blue" => Color::srgb(0.23, 0.51, 0.96),
        "green" => Color::srgb(0.13, 0.77, 0.37),
        "purple" => Color::srgb(0.66, 0.33, 0.97),
        "yellow" => Color::srgb(0.92, 0.70, 0.03),
        "red" => Color::srgb(0.94, 0.27, 0.27),
        "orange" => Color::srgb(0.98, 0.45, 0.09),
        "white" => Color::srgb(0.95, 0.95, 0.95),
        "black" => Color::srgb(0.1, 0.1, 0.1),
        _ => Color::srgb(0.6, 0.6, 0.6),
    }
}

fn vehicle_color(vehicle: &VehicleState) -> Color {
    match vehicle.mode {
        VehicleMode::Normal => named_color(&vehicle.display_color),
        VehicleMode::Alert => Color::srgb(1.0, 0.6, 0.0),
        VehicleMode::Braking => Color::srgb(1.0, 0.0, 0.0),
    }
}

/// System to sync vehicle visuals from simulation state
pub fn sync_vehicles(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim: Res<SimWorldResource>,
    mut mappings: ResMut<EntityMappings>,
    mut vehicle_query: Query<(
        Entity,
        &VehicleLink,
        &mut Transform,
        &MeshMaterial3d<StandardMaterial>,
    )>,
) {
    let snapshot = sim.world.snapshot();
    let config = sim.world.config();

    for (entity, link, mut transform, material) in vehicle_query.iter_mut() {
        if let Some(vehicle) = snapshot.vehicle(&link.0) {
            transform.translation = vehicle_translation(vehicle, config);
            transform.scale = if sim.selected.as_ref() == Some(&vehicle.id) {
                Vec3::splat(1.3)
            } else {
                Vec3::ONE
            };
            if let Some(material) = materials.get_mut(&material.0) {
                material.base_color = vehicle_color(vehicle);
            }
        } else {
            // Vehicle no longer exists in simulation, despawn
            commands.entity(entity).despawn();
            mappings.vehicles.remove(&link.0);
        }
    }

    for vehicle in &snapshot.vehicles {
        if mappings.vehicles.contains_key(&vehicle.id) {
            continue;
        }
        let entity = commands
            .spawn((
                VehicleLink(vehicle.id.clone()),
                Mesh3d(meshes.add(Cuboid::new(2.0, 0.5, 1.2))),
                MeshMaterial3d(materials.add(vehicle_color(vehicle))),
                Transform::from_translation(vehicle_translation(vehicle, config)),
            ))
            .id();
        mappings.vehicles.insert(vehicle.id.clone(), entity);
    }
}

/// System to refresh the HUD lines
pub fn update_hud_text(sim: Res<SimWorldResource>, mut text_query: Query<(&HudText, &mut Text)>) {
    let (normal, braking, alert) = sim.world.mode_counts();

    for (kind, mut text) in text_query.iter_mut() {
        match kind {
            HudText::Status => {
                **text = format!(
                    "{} | tick {} | normal {} / alert {} / braking {}",
                    if sim.world.is_running() { "RUNNING" } else { "PAUSED" },
                    sim.world.tick_count(),
                    normal,
                    alert,
                    braking
                );
            }
            HudText::Selected => {
                **text = match &sim.selected {
                    Some(id) => format!("Selected: {} (B to brake)", id),
                    None => "Selected: none".to_string(),
                };
            }
            HudText::LatestEvent => {
                if let Some(entry) = sim.log.latest() {
                    **text = entry.to_string();
                }
            }
        }
    }
}
