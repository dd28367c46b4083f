//! UI module that visualizes the simulation state using Bevy
//!
//! This module is purely for visualization - all simulation logic is in the `simulation` module.
//! The UI reads snapshots from `SimWorld` and turns key presses into commands.

mod components;
mod input;
mod sync;
mod world;

use bevy::prelude::*;

pub use components::{EntityMappings, SimWorldResource};

use crate::simulation::SimConfig;
use input::handle_input;
use sync::{sync_vehicles, tick_simulation, update_hud_text};
use world::setup_world;

/// Plugin to register all UI systems
pub struct V2vSimUIPlugin {
    pub config: SimConfig,
}

impl Plugin for V2vSimUIPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimWorldResource::new(self.config.clone()))
            .insert_resource(Time::<Fixed>::from_hz(f64::from(self.config.tick_rate_hz)))
            .init_resource::<EntityMappings>()
            .add_systems(Startup, setup_world)
            .add_systems(FixedUpdate, tick_simulation)
            .add_systems(Update, (handle_input, sync_vehicles, update_hud_text).chain());
    }
}
