//! Scenario configuration records and conversion into vehicles
//!
//! External collaborators (scenario files, text-generation services) hand
//! the engine a list of loosely typed records. Every record is validated
//! before any vehicle is built, so a single bad record rejects the whole
//! scenario.

use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::config::SimConfig;
use super::generator::GenerationError;
use super::types::{Lane, VehicleId};
use super::vehicle::VehicleState;

/// Valid range for a record's `x` (percent of highway length)
pub const SCENARIO_X_RANGE: (f64, f64) = (0.0, 100.0);

/// Valid range for a record's `speed`
pub const SCENARIO_SPEED_RANGE: (f64, f64) = (1.0, 10.0);

/// One vehicle as described by a scenario source.
///
/// All fields are optional at the serde level so a missing field is reported
/// by name instead of as a generic parse failure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Start position, 0..=100 percent of the highway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// 1 (bottom), 2 or 3 (top)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane: Option<f64>,
    /// 1..=10, scaled down to internal units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl VehicleConfig {
    pub fn new(id: &str, x: f64, lane: u8, speed: f64, color: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            x: Some(x),
            lane: Some(f64::from(lane)),
            speed: Some(speed),
            color: Some(color.to_string()),
        }
    }
}

/// Why a scenario was rejected
#[derive(Debug)]
pub enum ScenarioError {
    /// The document is not a JSON array of objects
    Malformed(String),
    /// A record lacks a required field
    MissingField { index: usize, field: &'static str },
    /// A record's field is outside its allowed range
    OutOfRange {
        index: usize,
        field: &'static str,
        value: f64,
    },
    /// Two records share an id
    DuplicateId(String),
    /// The generation service failed or returned unusable data
    Generation(GenerationError),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "malformed scenario: {msg}"),
            Self::MissingField { index, field } => {
                write!(f, "vehicle #{index} is missing required field `{field}`")
            }
            Self::OutOfRange {
                index,
                field,
                value,
            } => write!(f, "vehicle #{index} has out-of-range `{field}`: {value}"),
            Self::DuplicateId(id) => write!(f, "duplicate vehicle id `{id}`"),
            Self::Generation(err) => write!(f, "scenario generation failed: {err}"),
        }
    }
}

impl Error for ScenarioError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Generation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GenerationError> for ScenarioError {
    fn from(err: GenerationError) -> Self {
        ScenarioError::Generation(err)
    }
}

/// Parse a JSON document that must be an array of vehicle records
pub fn parse_scenario_json(text: &str) -> Result<Vec<VehicleConfig>, ScenarioError> {
    let value: serde_json::Value = serde_json::from_str(text.trim())
        .map_err(|err| ScenarioError::Malformed(format!("invalid JSON: {err}")))?;

    if !value.is_array() {
        return Err(ScenarioError::Malformed(
            "expected a JSON array of vehicles".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|err| ScenarioError::Malformed(format!("invalid vehicle record: {err}")))
}

/// Read and parse a scenario file
pub fn load_scenario_file(path: &Path) -> anyhow::Result<Vec<VehicleConfig>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
    parse_scenario_json(&text)
        .with_context(|| format!("Failed to parse scenario file {}", path.display()))
}

fn required<T: Clone>(value: &Option<T>, index: usize, field: &'static str) -> Result<T, ScenarioError> {
    value
        .clone()
        .ok_or(ScenarioError::MissingField { index, field })
}

fn in_range(
    value: f64,
    (min, max): (f64, f64),
    index: usize,
    field: &'static str,
) -> Result<f64, ScenarioError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(value)
    } else {
        Err(ScenarioError::OutOfRange {
            index,
            field,
            value,
        })
    }
}

fn build_vehicle(
    index: usize,
    record: &VehicleConfig,
    config: &SimConfig,
) -> Result<VehicleState, ScenarioError> {
    let id = required(&record.id, index, "id")?;
    if id.trim().is_empty() {
        return Err(ScenarioError::MissingField { index, field: "id" });
    }
    let x = in_range(required(&record.x, index, "x")?, SCENARIO_X_RANGE, index, "x")?;
    let lane_number = required(&record.lane, index, "lane")?;
    let speed = in_range(
        required(&record.speed, index, "speed")?,
        SCENARIO_SPEED_RANGE,
        index,
        "speed",
    )?;
    let color = required(&record.color, index, "color")?;

    let lane = if lane_number.fract() == 0.0 {
        Lane::from_number(lane_number as i64)
    } else {
        None
    };
    let lane = lane.ok_or(ScenarioError::OutOfRange {
        index,
        field: "lane",
        value: lane_number,
    })?;

    Ok(VehicleState::new(
        VehicleId::new(id.trim()),
        x as f32 * config.scenario_x_scale(),
        lane,
        config.lane_height,
        speed as f32 / config.scenario_speed_divisor,
        color.trim().to_lowercase(),
    ))
}

/// Convert records into a full vehicle set, or reject the whole list
pub fn build_vehicles(
    records: &[VehicleConfig],
    config: &SimConfig,
) -> Result<Vec<VehicleState>, ScenarioError> {
    let vehicles = records
        .iter()
        .enumerate()
        .map(|(index, record)| build_vehicle(index, record, config))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(id) = first_duplicate_id(&vehicles) {
        return Err(ScenarioError::DuplicateId(id.0.clone()));
    }
    Ok(vehicles)
}

/// First id that appears more than once in `vehicles`
pub fn first_duplicate_id(vehicles: &[VehicleState]) -> Option<&VehicleId> {
    let mut seen = HashSet::new();
    vehicles
        .iter()
        .map(|v| &v.id)
        .find(|id| !seen.insert(*id))
}

/// The built-in four-vehicle layout used at startup and on reset
pub fn default_vehicles(config: &SimConfig) -> Vec<VehicleState> {
    let layout = [
        ("V1", 100.0, Lane::One, 1.5, "blue"),
        ("V2", 400.0, Lane::One, 1.5, "green"),
        ("V3", 250.0, Lane::Two, 1.8, "purple"),
        ("V4", 50.0, Lane::Three, 2.0, "yellow"),
    ];

    layout
        .into_iter()
        .map(|(id, position, lane, speed, color)| {
            VehicleState::new(
                VehicleId::new(id),
                position,
                lane,
                config.lane_height,
                speed,
                color,
            )
        })
        .collect()
}
