//! Proximity broadcast range checks

use v2v_sim::simulation::{recipients_in_range, Lane, VehicleId, VehicleState};

fn at(id: &str, position: f32, lane: Lane) -> VehicleState {
    VehicleState::new(VehicleId::new(id), position, lane, 80.0, 1.5, "blue")
}

#[test]
fn test_only_vehicles_within_range_are_notified() {
    let vehicles = vec![
        at("A", 0.0, Lane::One),
        at("B", 100.0, Lane::One),
        at("C", 260.0, Lane::One),
        at("D", 300.0, Lane::One),
    ];

    let notified = recipients_in_range(&vehicles[0], &vehicles, 250.0);
    assert_eq!(notified, vec![VehicleId::new("B")]);
}

#[test]
fn test_range_boundary_is_inclusive() {
    let vehicles = vec![at("A", 500.0, Lane::One), at("B", 750.0, Lane::Two)];
    let notified = recipients_in_range(&vehicles[0], &vehicles, 250.0);
    assert_eq!(notified, vec![VehicleId::new("B")]);
}

#[test]
fn test_range_ignores_lane_and_direction() {
    let vehicles = vec![
        at("A", 500.0, Lane::Two),
        at("behind", 300.0, Lane::Three),
        at("ahead", 700.0, Lane::One),
        at("far", 900.0, Lane::Two),
    ];

    let notified = recipients_in_range(&vehicles[0], &vehicles, 250.0);
    assert_eq!(
        notified,
        vec![VehicleId::new("behind"), VehicleId::new("ahead")]
    );
}

#[test]
fn test_sender_is_never_its_own_recipient() {
    let vehicles = vec![at("A", 0.0, Lane::One)];
    assert!(recipients_in_range(&vehicles[0], &vehicles, 250.0).is_empty());
}
