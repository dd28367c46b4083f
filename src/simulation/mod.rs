//! Standalone V2V simulation module
//!
//! This module contains all the core simulation logic that can run
//! independently of the Bevy game engine. It can be tested via console
//! without needing to boot up the viewer.

mod broadcast;
mod clock;
mod config;
mod events;
#[cfg(feature = "gemini")]
mod gemini;
mod generator;
mod kinematics;
mod scenario;
mod state_machine;
mod stats;
mod types;
mod vehicle;
mod world;

pub use broadcast::recipients_in_range;
pub use clock::{frame_budget, FramePacer, SimulationClock};
pub use config::{ConfigError, SimConfig};
pub use events::{EventLog, LogEntry, SimEvent};
#[cfg(feature = "gemini")]
pub use gemini::GeminiScenarioGenerator;
pub use generator::{
    generate_scenario, GenerationError, PendingScenario, PresetScenarioGenerator,
    ScenarioGenerator, GENERATED_VEHICLES_MAX, GENERATED_VEHICLES_MIN, PRESET_PROMPTS,
};
pub use kinematics::{converge_speed, integrate};
pub use scenario::{
    build_vehicles, default_vehicles, first_duplicate_id, load_scenario_file,
    parse_scenario_json, ScenarioError, VehicleConfig, SCENARIO_SPEED_RANGE, SCENARIO_X_RANGE,
};
pub use state_machine::{apply_brake, evaluate_tick, receive_warning, ModeUpdate, WarningOutcome};
pub use stats::RunStats;
pub use types::{
    Lane, VehicleId, VehicleMode, ACCELERATION_STEP, ALERT_DURATION_TICKS, ALERT_SPEED_FACTOR,
    COMMUNICATION_RANGE, DEFAULT_TICK_RATE_HZ, EVENT_LOG_CAPACITY, HIGHWAY_LENGTH, LANE_HEIGHT,
    SCENARIO_SPEED_DIVISOR, WRAP_MARGIN,
};
pub use vehicle::VehicleState;
pub use world::{SimCommand, SimWorld, WorldError, WorldSnapshot};
