//! Proximity broadcast of brake warnings
//!
//! Idealized radio: instantaneous, lossless, and range-checked along the
//! travel axis only.

use super::types::VehicleId;
use super::vehicle::VehicleState;

/// Ids of every vehicle within `range` of `sender`, in vehicle-set order.
///
/// The sender is never its own recipient. Distances are measured from one
/// view of the set, so every recipient is decided before any is notified.
pub fn recipients_in_range(
    sender: &VehicleState,
    vehicles: &[VehicleState],
    range: f32,
) -> Vec<VehicleId> {
    vehicles
        .iter()
        .filter(|other| other.id != sender.id)
        .filter(|other| sender.distance_to(other) <= range)
        .map(|other| other.id.clone())
        .collect()
}
