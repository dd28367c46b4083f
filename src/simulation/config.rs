//! Simulation configuration and validation
//!
//! [`SimConfig`] collects every tunable constant the engine uses. Defaults
//! come from [`super::types`]; the CLI overrides individual fields.

use std::error::Error;
use std::fmt;

use super::clock::frame_budget;
use super::types::{
    ACCELERATION_STEP, ALERT_DURATION_TICKS, ALERT_SPEED_FACTOR, COMMUNICATION_RANGE,
    DEFAULT_TICK_RATE_HZ, EVENT_LOG_CAPACITY, HIGHWAY_LENGTH, LANE_HEIGHT,
    SCENARIO_SPEED_DIVISOR, WRAP_MARGIN,
};

/// Tunable parameters for a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Length of the highway segment. Default: 1200.
    pub highway_length: f32,
    /// Overrun allowed past the end before wrapping. Default: 50.
    /// Wrapped vehicles re-enter at `-wrap_margin`.
    pub wrap_margin: f32,
    /// Per-tick speed change toward the target. Default: 0.05.
    pub acceleration_step: f32,
    /// Brake warning range along the travel axis. Default: 250.
    pub communication_range: f32,
    /// Ticks an alerted vehicle stays in ALERT. Default: 100.
    pub alert_duration_ticks: u32,
    /// Fraction of current speed an alerted vehicle targets. Default: 0.5.
    pub alert_speed_factor: f32,
    /// Height of one lane. Default: 80.
    pub lane_height: f32,
    /// Divisor from scenario speed (1..=10) to internal units. Default: 5.
    pub scenario_speed_divisor: f32,
    /// Rolling event log size. Default: 100.
    pub event_log_capacity: usize,
    /// Ticks per second when pacing in realtime. Default: 60.
    pub tick_rate_hz: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            highway_length: HIGHWAY_LENGTH,
            wrap_margin: WRAP_MARGIN,
            acceleration_step: ACCELERATION_STEP,
            communication_range: COMMUNICATION_RANGE,
            alert_duration_ticks: ALERT_DURATION_TICKS,
            alert_speed_factor: ALERT_SPEED_FACTOR,
            lane_height: LANE_HEIGHT,
            scenario_speed_divisor: SCENARIO_SPEED_DIVISOR,
            event_log_capacity: EVENT_LOG_CAPACITY,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        }
    }
}

impl SimConfig {
    /// Position past which a vehicle wraps back to the start
    pub fn wrap_threshold(&self) -> f32 {
        self.highway_length + self.wrap_margin
    }

    /// Position a wrapped vehicle re-enters at
    pub fn wrap_reentry(&self) -> f32 {
        -self.wrap_margin
    }

    /// Scale factor from scenario `x` percentage to absolute position
    pub fn scenario_x_scale(&self) -> f32 {
        self.highway_length / 100.0
    }

    /// Check structural invariants before a world is built from this config
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("highway_length", self.highway_length)?;
        positive("acceleration_step", self.acceleration_step)?;
        positive("communication_range", self.communication_range)?;
        positive("lane_height", self.lane_height)?;
        positive("scenario_speed_divisor", self.scenario_speed_divisor)?;
        positive("tick_rate_hz", self.tick_rate_hz)?;
        if frame_budget(self.tick_rate_hz).is_none() {
            return Err(ConfigError::RateTooLow {
                value: self.tick_rate_hz,
            });
        }

        if !self.wrap_margin.is_finite() || self.wrap_margin < 0.0 {
            return Err(ConfigError::NotPositive {
                field: "wrap_margin",
                value: self.wrap_margin,
            });
        }
        if self.alert_duration_ticks == 0 {
            return Err(ConfigError::ZeroCount {
                field: "alert_duration_ticks",
            });
        }
        if self.event_log_capacity == 0 {
            return Err(ConfigError::ZeroCount {
                field: "event_log_capacity",
            });
        }
        if !(self.alert_speed_factor > 0.0 && self.alert_speed_factor <= 1.0) {
            return Err(ConfigError::FactorOutOfRange {
                value: self.alert_speed_factor,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

/// Invalid [`SimConfig`] value
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A length, rate or step was zero, negative or not finite.
    NotPositive { field: &'static str, value: f32 },
    /// A count that must be at least one was zero.
    ZeroCount { field: &'static str },
    /// The alert speed factor must lie in (0, 1].
    FactorOutOfRange { value: f32 },
    /// The tick rate is so low that one frame cannot be timed.
    RateTooLow { value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "{field} must be positive and finite, got {value}")
            }
            Self::ZeroCount { field } => write!(f, "{field} must be at least 1"),
            Self::FactorOutOfRange { value } => {
                write!(f, "alert_speed_factor must be in (0, 1], got {value}")
            }
            Self::RateTooLow { value } => {
                write!(f, "tick_rate_hz {value} is too low to pace frames")
            }
        }
    }
}

impl Error for ConfigError {}
