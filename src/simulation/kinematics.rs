//! Per-tick vehicle movement
//!
//! Speed converges linearly on the target speed, then the vehicle advances
//! by its new speed. The highway is a loop: vehicles that run past the end
//! re-enter just before the start.

use super::config::SimConfig;
use super::vehicle::VehicleState;

/// Move `speed` one step of size `step` toward `target` without overshooting
pub fn converge_speed(speed: f32, target: f32, step: f32) -> f32 {
    let next = if speed < target {
        (speed + step).min(target)
    } else if speed > target {
        (speed - step).max(target)
    } else {
        speed
    };
    next.max(0.0)
}

/// Advance one vehicle by a single tick. Only `vehicle` is touched.
pub fn integrate(vehicle: &mut VehicleState, config: &SimConfig) {
    vehicle.speed = converge_speed(vehicle.speed, vehicle.target_speed, config.acceleration_step);
    vehicle.position += vehicle.speed;

    if vehicle.position > config.wrap_threshold() {
        vehicle.position = config.wrap_reentry();
    }
}
