//! Input handling systems

use bevy::prelude::*;

use super::components::SimWorldResource;

/// Keyboard commands: pause, select, brake, reset, exit
pub fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut sim: ResMut<SimWorldResource>,
    mut exit: MessageWriter<AppExit>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }

    if keyboard.just_pressed(KeyCode::Space) {
        sim.world.toggle_run();
    }

    if keyboard.just_pressed(KeyCode::Tab) {
        let ids: Vec<_> = sim.world.vehicles().iter().map(|v| v.id.clone()).collect();
        if !ids.is_empty() {
            let next = sim
                .selected
                .as_ref()
                .and_then(|id| ids.iter().position(|candidate| candidate == id))
                .map(|index| (index + 1) % ids.len())
                .unwrap_or(0);
            sim.selected = Some(ids[next].clone());
        }
    }

    // Braking is only offered while the simulation runs
    if keyboard.just_pressed(KeyCode::KeyB) && sim.world.is_running() {
        if let Some(id) = sim.selected.clone() {
            sim.world.trigger_brake(&id);
        }
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        sim.world.reset();
        sim.repair_selection();
    }

    sim.flush_events();
}
