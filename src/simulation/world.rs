//! Main simulation world that ties everything together
//!
//! This is the entry point for running the V2V simulation
//! without any Bevy dependencies. `SimWorld` is the only writer of the
//! vehicle set; everything else reads snapshots or sends commands.

use std::error::Error;
use std::fmt;

use log::{debug, info, warn};

use super::broadcast::recipients_in_range;
use super::clock::SimulationClock;
use super::config::{ConfigError, SimConfig};
use super::events::SimEvent;
use super::kinematics::integrate;
use super::scenario::{
    build_vehicles, default_vehicles, first_duplicate_id, ScenarioError, VehicleConfig,
};
use super::state_machine::{apply_brake, evaluate_tick, receive_warning, ModeUpdate, WarningOutcome};
use super::types::{Lane, VehicleId, VehicleMode};
use super::vehicle::VehicleState;

/// A discrete user action
#[derive(Debug, Clone, PartialEq)]
pub enum SimCommand {
    Brake(VehicleId),
    ToggleRun,
    Reset,
    LoadScenario(Vec<VehicleConfig>),
}

/// Read-only copy of the world handed to renderers and loggers
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub running: bool,
    pub vehicles: Vec<VehicleState>,
}

impl WorldSnapshot {
    pub fn vehicle(&self, id: &VehicleId) -> Option<&VehicleState> {
        self.vehicles.iter().find(|v| &v.id == id)
    }
}

/// Why a world could not be built from the given parts
#[derive(Debug, Clone, PartialEq)]
pub enum WorldError {
    Config(ConfigError),
    /// Two vehicles in the initial set share an id
    DuplicateVehicle(VehicleId),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid simulation settings: {err}"),
            Self::DuplicateVehicle(id) => write!(f, "duplicate vehicle id `{id}`"),
        }
    }
}

impl Error for WorldError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::DuplicateVehicle(_) => None,
        }
    }
}

impl From<ConfigError> for WorldError {
    fn from(err: ConfigError) -> Self {
        WorldError::Config(err)
    }
}

/// The main simulation world
pub struct SimWorld {
    config: SimConfig,

    /// Authoritative vehicle set, in scenario order
    vehicles: Vec<VehicleState>,

    clock: SimulationClock,

    /// Events emitted since the last drain
    outbox: Vec<SimEvent>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(config: SimConfig, vehicles: Vec<VehicleState>) -> Self {
        Self {
            config,
            vehicles,
            clock: SimulationClock::new(true),
            outbox: Vec::new(),
        }
    }

    /// World with default constants and the built-in scenario, running
    pub fn new() -> Self {
        let config = SimConfig::default();
        let vehicles = default_vehicles(&config);
        Self::new_internal(config, vehicles)
    }

    /// World with custom constants and the built-in scenario
    pub fn with_config(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let vehicles = default_vehicles(&config);
        Ok(Self::new_internal(config, vehicles))
    }

    /// World starting from an explicit vehicle set (e.g. a hand-built test layout).
    ///
    /// Vehicle ids must be unique.
    pub fn with_vehicles(
        config: SimConfig,
        vehicles: Vec<VehicleState>,
    ) -> Result<Self, WorldError> {
        config.validate()?;
        if let Some(id) = first_duplicate_id(&vehicles) {
            return Err(WorldError::DuplicateVehicle(id.clone()));
        }
        Ok(Self::new_internal(config, vehicles))
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn vehicles(&self) -> &[VehicleState] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: &VehicleId) -> Option<&VehicleState> {
        self.vehicles.iter().find(|v| &v.id == id)
    }

    fn vehicle_mut(&mut self, id: &VehicleId) -> Option<&mut VehicleState> {
        self.vehicles.iter_mut().find(|v| &v.id == id)
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Ticks executed so far (paused frames don't count)
    pub fn tick_count(&self) -> u64 {
        self.clock.ticks()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.clock.ticks(),
            running: self.clock.is_running(),
            vehicles: self.vehicles.clone(),
        }
    }

    /// Take every event emitted since the previous call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn emit(&mut self, event: SimEvent) {
        self.outbox.push(event);
    }

    /// Apply one command. Only scenario loads can fail.
    pub fn apply(&mut self, command: SimCommand) -> Result<(), ScenarioError> {
        match command {
            SimCommand::Brake(id) => {
                self.trigger_brake(&id);
            }
            SimCommand::ToggleRun => {
                self.toggle_run();
            }
            SimCommand::Reset => self.reset(),
            SimCommand::LoadScenario(records) => {
                self.load_scenario(&records)?;
            }
        }
        Ok(())
    }

    /// Sudden brake on `id` followed by a warning broadcast.
    ///
    /// Returns the ids that received the warning. Unknown ids are ignored.
    pub fn trigger_brake(&mut self, id: &VehicleId) -> Vec<VehicleId> {
        let Some(sender) = self.vehicle_mut(id) else {
            debug!("Brake requested for unknown vehicle {}", id);
            return Vec::new();
        };
        apply_brake(sender);
        let sender = sender.clone();

        info!("Vehicle {} braked at position {:.1}", sender.id, sender.position);
        self.emit(SimEvent::BrakeInitiated {
            vehicle: sender.id.clone(),
        });

        let recipients =
            recipients_in_range(&sender, &self.vehicles, self.config.communication_range);

        for recipient_id in &recipients {
            let config = &self.config;
            let Some(recipient) = self.vehicles.iter_mut().find(|v| &v.id == recipient_id) else {
                continue;
            };
            match receive_warning(recipient, config) {
                WarningOutcome::Alerted => debug!(
                    "{} -> {}: alert, target speed now {:.2}",
                    sender.id, recipient.id, recipient.target_speed
                ),
                WarningOutcome::IgnoredWhileBraking => {
                    debug!("{} -> {}: already braking", sender.id, recipient.id)
                }
            }
            self.emit(SimEvent::WarningDelivered {
                from: sender.id.clone(),
                to: recipient_id.clone(),
            });
        }

        recipients
    }

    /// Flip run/pause and return the new state
    pub fn toggle_run(&mut self) -> bool {
        let running = self.clock.toggle();
        info!("Simulation {}", if running { "resumed" } else { "paused" });
        self.emit(SimEvent::RunToggled { running });
        running
    }

    /// Pause without toggling; no event when already paused
    pub fn pause(&mut self) {
        if self.clock.is_running() {
            self.toggle_run();
        }
    }

    /// Resume without toggling; no event when already running
    pub fn resume(&mut self) {
        if !self.clock.is_running() {
            self.toggle_run();
        }
    }

    /// Replace the vehicle set with the built-in scenario
    pub fn reset(&mut self) {
        self.vehicles = default_vehicles(&self.config);
        info!("Simulation reset to the default scenario");
        self.emit(SimEvent::Reset);
    }

    /// Validate `records` and swap them in as the new vehicle set.
    ///
    /// On any error the current set is left untouched and a single
    /// failure event is emitted.
    pub fn load_scenario(&mut self, records: &[VehicleConfig]) -> Result<usize, ScenarioError> {
        match build_vehicles(records, &self.config) {
            Ok(vehicles) => {
                let count = vehicles.len();
                if count == 0 {
                    warn!("Loaded an empty scenario; the highway is now empty");
                }
                self.vehicles = vehicles;
                info!("Loaded scenario with {} vehicles", count);
                self.emit(SimEvent::ScenarioLoaded { vehicles: count });
                Ok(count)
            }
            Err(err) => Err(self.reject_scenario(err)),
        }
    }

    /// Apply the outcome of a generation request
    pub fn apply_generated(
        &mut self,
        result: Result<Vec<VehicleConfig>, ScenarioError>,
    ) -> Result<usize, ScenarioError> {
        match result {
            Ok(records) => self.load_scenario(&records),
            Err(err) => Err(self.reject_scenario(err)),
        }
    }

    /// Note that a generation request went out
    pub fn note_generation_request(&mut self, prompt: &str) {
        self.emit(SimEvent::GenerationRequested {
            prompt: prompt.to_string(),
        });
    }

    fn reject_scenario(&mut self, err: ScenarioError) -> ScenarioError {
        warn!("Scenario rejected, keeping current vehicles: {}", err);
        self.emit(SimEvent::ScenarioFailed {
            reason: err.to_string(),
        });
        err
    }

    /// Main simulation tick. Returns false if the clock is paused.
    pub fn tick(&mut self) -> bool {
        if self.clock.advance().is_none() {
            return false;
        }

        let mut cleared = Vec::new();
        for vehicle in &mut self.vehicles {
            integrate(vehicle, &self.config);
            if evaluate_tick(vehicle) == ModeUpdate::AlertCleared {
                cleared.push(vehicle.id.clone());
            }
        }

        for vehicle in cleared {
            debug!("Alert expired for {}", vehicle);
            self.emit(SimEvent::AlertCleared { vehicle });
        }
        true
    }

    /// Number of vehicles in each mode: (normal, braking, alert)
    pub fn mode_counts(&self) -> (usize, usize, usize) {
        self.vehicles
            .iter()
            .fold((0, 0, 0), |(n, b, a), v| match v.mode {
                VehicleMode::Normal => (n + 1, b, a),
                VehicleMode::Braking => (n, b + 1, a),
                VehicleMode::Alert => (n, b, a + 1),
            })
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        let (normal, braking, alert) = self.mode_counts();
        println!("=== V2V Simulation Summary ===");
        println!(
            "Tick: {} ({})",
            self.clock.ticks(),
            if self.clock.is_running() { "running" } else { "paused" }
        );
        println!(
            "Vehicles: {} (normal={}, braking={}, alert={})",
            self.vehicles.len(),
            normal,
            braking,
            alert
        );
        println!("--- Vehicles ---");
        for v in &self.vehicles {
            let timer = if v.is_alerted() {
                format!(" timer={}", v.alert_timer)
            } else {
                String::new()
            };
            println!(
                "  {:<4} {} pos={:>7.1} speed={:.2} target={:.2} {}{} [{}]",
                v.id, v.lane, v.position, v.speed, v.target_speed, v.mode, timer, v.display_color
            );
        }
    }

    /// Draw the highway in the terminal, top lane first
    pub fn draw_map(&self) {
        const COLUMNS: usize = 100;
        let start = self.config.wrap_reentry();
        let span = self.config.wrap_threshold() - start;

        let to_column = |position: f32| -> usize {
            let ratio = ((position - start) / span).clamp(0.0, 1.0);
            ((ratio * (COLUMNS - 1) as f32).round() as usize).min(COLUMNS - 1)
        };

        println!("\n=== Highway Map ===");
        println!("Legend: >=Normal, !=Alert, X=Braking, -=Lane");
        let border: String = "=".repeat(COLUMNS);
        println!("{}", border);
        for lane in Lane::ALL.iter().rev() {
            let mut row = vec!['-'; COLUMNS];
            for v in self.vehicles.iter().filter(|v| v.lane == *lane) {
                row[to_column(v.position)] = match v.mode {
                    VehicleMode::Normal => '>',
                    VehicleMode::Alert => '!',
                    VehicleMode::Braking => 'X',
                };
            }
            let line: String = row.into_iter().collect();
            println!("{} {}", line, lane.number());
        }
        println!("{}", border);
        println!();
    }
}
