//! Behavioral mode transitions for a single vehicle
//!
//! NORMAL -> BRAKING on an explicit brake command (no automatic exit).
//! NORMAL/ALERT -> ALERT on a peer's brake warning.
//! ALERT -> NORMAL once the alert timer runs out.

use super::config::SimConfig;
use super::types::VehicleMode;
use super::vehicle::VehicleState;

/// What a brake warning did to its recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningOutcome {
    /// Recipient entered (or re-entered) ALERT
    Alerted,
    /// Recipient is stopped after its own brake and stays BRAKING
    IgnoredWhileBraking,
}

/// Result of evaluating a vehicle's mode at the end of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeUpdate {
    Unchanged,
    /// ALERT expired and the vehicle is back to NORMAL
    AlertCleared,
}

/// Sudden brake: full stop right now, not through the integrator
pub fn apply_brake(vehicle: &mut VehicleState) {
    vehicle.mode = VehicleMode::Braking;
    vehicle.target_speed = 0.0;
    vehicle.speed = 0.0;
    vehicle.alert_timer = 0;
}

/// React to a brake warning from a peer.
///
/// The new target is a fraction of the *current* speed, so a vehicle warned
/// again while still slowing compounds the reduction.
pub fn receive_warning(vehicle: &mut VehicleState, config: &SimConfig) -> WarningOutcome {
    if vehicle.is_braking() {
        return WarningOutcome::IgnoredWhileBraking;
    }

    vehicle.mode = VehicleMode::Alert;
    vehicle.alert_timer = config.alert_duration_ticks;
    vehicle.target_speed = vehicle.speed * config.alert_speed_factor;
    WarningOutcome::Alerted
}

/// Count down an active alert and restore cruising once it runs out
pub fn evaluate_tick(vehicle: &mut VehicleState) -> ModeUpdate {
    if vehicle.mode != VehicleMode::Alert {
        return ModeUpdate::Unchanged;
    }

    vehicle.alert_timer = vehicle.alert_timer.saturating_sub(1);
    if vehicle.alert_timer == 0 {
        vehicle.mode = VehicleMode::Normal;
        vehicle.target_speed = vehicle.cruise_speed;
        return ModeUpdate::AlertCleared;
    }

    ModeUpdate::Unchanged
}
