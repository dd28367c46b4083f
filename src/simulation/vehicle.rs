//! Vehicle record for the V2V simulation
//!
//! Standalone implementation that doesn't depend on Bevy.

use super::types::{Lane, VehicleId, VehicleMode};

/// One vehicle's kinematic and behavioral state
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleState {
    pub id: VehicleId,
    /// Distance along the highway axis
    pub position: f32,
    pub lane: Lane,
    /// Fixed lateral offset derived from the lane when the vehicle was placed
    pub lane_offset: f32,
    pub speed: f32,
    pub target_speed: f32,
    /// Lane default the vehicle returns to when an alert expires
    pub cruise_speed: f32,
    pub mode: VehicleMode,
    /// Countdown while in ALERT; ignored in other modes
    pub alert_timer: u32,
    /// Opaque color tag for whoever draws the vehicle
    pub display_color: String,
}

impl VehicleState {
    /// Create a cruising vehicle. `speed` is also its initial target.
    pub fn new(
        id: VehicleId,
        position: f32,
        lane: Lane,
        lane_height: f32,
        speed: f32,
        display_color: impl Into<String>,
    ) -> Self {
        let speed = speed.max(0.0);
        Self {
            id,
            position,
            lane,
            lane_offset: lane.offset(lane_height),
            speed,
            target_speed: speed,
            cruise_speed: lane.cruise_speed(),
            mode: VehicleMode::Normal,
            alert_timer: 0,
            display_color: display_color.into(),
        }
    }

    pub fn is_braking(&self) -> bool {
        self.mode == VehicleMode::Braking
    }

    pub fn is_alerted(&self) -> bool {
        self.mode == VehicleMode::Alert
    }

    /// Longitudinal distance to another vehicle; lanes are ignored
    pub fn distance_to(&self, other: &VehicleState) -> f32 {
        (self.position - other.position).abs()
    }
}
