//! Core types for the V2V simulation
//!
//! These are standalone types that don't depend on Bevy.

use std::fmt;

/// A unique identifier for a vehicle, stable for the lifetime of a scenario
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub String);

impl VehicleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Behavioral mode of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VehicleMode {
    /// Cruising toward the lane default speed
    #[default]
    Normal,
    /// Stopped by a sudden brake; stays here until reset or reload
    Braking,
    /// Slowing down after receiving a peer's brake warning
    Alert,
}

impl fmt::Display for VehicleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VehicleMode::Normal => "NORMAL",
            VehicleMode::Braking => "BRAKING",
            VehicleMode::Alert => "ALERT",
        };
        f.pad(label)
    }
}

/// One of the three highway lanes. Lane 1 is the bottom lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    One,
    Two,
    Three,
}

/// Lookup row for a lane: lateral offset in lane-height units and cruise speed
struct LaneProfile {
    offset_in_lanes: f32,
    cruise_speed: f32,
}

const LANE_ONE: LaneProfile = LaneProfile {
    offset_in_lanes: 2.5,
    cruise_speed: 1.5,
};
const LANE_TWO: LaneProfile = LaneProfile {
    offset_in_lanes: 1.5,
    cruise_speed: 1.8,
};
const LANE_THREE: LaneProfile = LaneProfile {
    offset_in_lanes: 0.5,
    cruise_speed: 2.0,
};

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::One, Lane::Two, Lane::Three];

    /// Map a 1-based lane number to a lane
    pub fn from_number(number: i64) -> Option<Lane> {
        match number {
            1 => Some(Lane::One),
            2 => Some(Lane::Two),
            3 => Some(Lane::Three),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Lane::One => 1,
            Lane::Two => 2,
            Lane::Three => 3,
        }
    }

    fn profile(self) -> &'static LaneProfile {
        match self {
            Lane::One => &LANE_ONE,
            Lane::Two => &LANE_TWO,
            Lane::Three => &LANE_THREE,
        }
    }

    /// Speed a vehicle in this lane returns to once an alert expires
    pub fn cruise_speed(self) -> f32 {
        self.profile().cruise_speed
    }

    /// Lateral offset of the lane center, measured from the top edge of the road
    pub fn offset(self, lane_height: f32) -> f32 {
        self.profile().offset_in_lanes * lane_height
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lane {}", self.number())
    }
}

/// Length of the simulated highway segment in distance units
pub const HIGHWAY_LENGTH: f32 = 1200.0;

/// How far past the end a vehicle may travel before it re-enters at the start
pub const WRAP_MARGIN: f32 = 50.0;

/// Speed change applied per tick while converging on the target speed
pub const ACCELERATION_STEP: f32 = 0.05;

/// Maximum longitudinal distance over which a brake warning is delivered
pub const COMMUNICATION_RANGE: f32 = 250.0;

/// Number of ticks a vehicle stays in ALERT after a warning
pub const ALERT_DURATION_TICKS: u32 = 100;

/// Fraction of current speed a warned vehicle slows to
pub const ALERT_SPEED_FACTOR: f32 = 0.5;

/// Height of one lane, used to derive lateral offsets
pub const LANE_HEIGHT: f32 = 80.0;

/// Scenario speeds (1..=10) are divided by this to get internal speed units
pub const SCENARIO_SPEED_DIVISOR: f32 = 5.0;

/// Number of entries kept by the rolling event log
pub const EVENT_LOG_CAPACITY: usize = 100;

/// Default tick rate for realtime pacing
pub const DEFAULT_TICK_RATE_HZ: f32 = 60.0;
