//! UI components and resources for linking Bevy entities to simulation state

use bevy::prelude::*;
use std::collections::HashMap;

use crate::simulation::{EventLog, SimConfig, SimWorld, VehicleId};

/// World units per simulation distance unit
pub const WORLD_SCALE: f32 = 0.05;

/// Resource wrapper for the simulation world and its log
#[derive(Resource)]
pub struct SimWorldResource {
    pub world: SimWorld,
    pub log: EventLog,
    /// Vehicle the brake key acts on
    pub selected: Option<VehicleId>,
}

impl SimWorldResource {
    pub fn new(config: SimConfig) -> Self {
        let log = EventLog::new(config.event_log_capacity);
        let world = SimWorld::with_config(config).unwrap_or_else(|err| {
            warn!("Invalid settings ({}), falling back to defaults", err);
            SimWorld::new()
        });
        let selected = world.vehicles().first().map(|v| v.id.clone());
        Self {
            world,
            log,
            selected,
        }
    }

    /// Keep the selection valid after the vehicle set was replaced
    pub fn repair_selection(&mut self) {
        let still_present = self
            .selected
            .as_ref()
            .is_some_and(|id| self.world.vehicle(id).is_some());
        if !still_present {
            self.selected = self.world.vehicles().first().map(|v| v.id.clone());
        }
    }

    /// Move simulation events into the log
    pub fn flush_events(&mut self) {
        let tick = self.world.tick_count();
        let events = self.world.drain_events();
        self.log.record_all(tick, events);
    }
}

impl Default for SimWorldResource {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

/// Marker component for ground plane
#[derive(Component)]
pub struct Ground;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Links a Bevy entity to a simulation vehicle
#[derive(Component)]
pub struct VehicleLink(pub VehicleId);

/// Resource to track Bevy entities mapped to simulation vehicles
#[derive(Resource, Default)]
pub struct EntityMappings {
    pub vehicles: HashMap<VehicleId, Entity>,
}

/// Marker for HUD text elements
#[derive(Component)]
pub enum HudText {
    Status,
    Selected,
    LatestEvent,
}
