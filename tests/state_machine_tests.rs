//! Mode transitions: brake, warning, alert decay

use v2v_sim::simulation::{
    apply_brake, evaluate_tick, receive_warning, Lane, ModeUpdate, SimConfig, VehicleId,
    VehicleMode, VehicleState, WarningOutcome,
};

fn vehicle(lane: Lane, speed: f32) -> VehicleState {
    VehicleState::new(VehicleId::new("T1"), 0.0, lane, 80.0, speed, "green")
}

#[test]
fn test_brake_stops_instantly() {
    let mut car = vehicle(Lane::Two, 1.8);
    apply_brake(&mut car);

    assert_eq!(car.mode, VehicleMode::Braking);
    assert_eq!(car.speed, 0.0);
    assert_eq!(car.target_speed, 0.0);
}

#[test]
fn test_braking_has_no_automatic_exit() {
    let mut car = vehicle(Lane::One, 1.5);
    apply_brake(&mut car);

    for _ in 0..500 {
        assert_eq!(evaluate_tick(&mut car), ModeUpdate::Unchanged);
    }
    assert_eq!(car.mode, VehicleMode::Braking);
}

#[test]
fn test_warning_halves_current_speed() {
    let config = SimConfig::default();
    let mut car = vehicle(Lane::One, 1.5);

    assert_eq!(receive_warning(&mut car, &config), WarningOutcome::Alerted);
    assert_eq!(car.mode, VehicleMode::Alert);
    assert_eq!(car.alert_timer, 100);
    assert_eq!(car.target_speed, 0.75);
}

#[test]
fn test_rewarning_compounds_against_current_speed() {
    let config = SimConfig::default();
    let mut car = vehicle(Lane::One, 2.0);

    receive_warning(&mut car, &config);
    assert_eq!(car.target_speed, 1.0);

    for _ in 0..10 {
        evaluate_tick(&mut car);
    }
    car.speed = 1.2;

    receive_warning(&mut car, &config);
    assert_eq!(car.mode, VehicleMode::Alert);
    assert_eq!(car.alert_timer, 100, "timer restarts");
    assert_eq!(car.target_speed, 0.6);
}

#[test]
fn test_braking_vehicle_ignores_warning() {
    let config = SimConfig::default();
    let mut car = vehicle(Lane::One, 1.5);
    apply_brake(&mut car);

    assert_eq!(
        receive_warning(&mut car, &config),
        WarningOutcome::IgnoredWhileBraking
    );
    assert_eq!(car.mode, VehicleMode::Braking);
    assert_eq!(car.target_speed, 0.0);
}

#[test]
fn test_alert_decays_after_exactly_duration_ticks() {
    let config = SimConfig::default();
    // Starts faster than its lane default so the reset target is observable
    let mut car = vehicle(Lane::Two, 3.0);
    receive_warning(&mut car, &config);

    for tick in 1..config.alert_duration_ticks {
        assert_eq!(evaluate_tick(&mut car), ModeUpdate::Unchanged, "tick {}", tick);
        assert_eq!(car.mode, VehicleMode::Alert);
        assert_eq!(car.alert_timer, config.alert_duration_ticks - tick);
    }

    assert_eq!(evaluate_tick(&mut car), ModeUpdate::AlertCleared);
    assert_eq!(car.mode, VehicleMode::Normal);
    assert_eq!(car.target_speed, Lane::Two.cruise_speed());
    assert_ne!(car.target_speed, 3.0);
}

#[test]
fn test_normal_vehicle_is_unaffected_by_tick_evaluation() {
    let mut car = vehicle(Lane::Three, 2.0);
    assert_eq!(evaluate_tick(&mut car), ModeUpdate::Unchanged);
    assert_eq!(car.mode, VehicleMode::Normal);
    assert_eq!(car.target_speed, 2.0);
}

#[test]
fn test_lane_table() {
    assert_eq!(Lane::One.cruise_speed(), 1.5);
    assert_eq!(Lane::Two.cruise_speed(), 1.8);
    assert_eq!(Lane::Three.cruise_speed(), 2.0);
    assert_eq!(Lane::One.offset(80.0), 200.0);
    assert_eq!(Lane::Two.offset(80.0), 120.0);
    assert_eq!(Lane::Three.offset(80.0), 40.0);
    assert_eq!(Lane::from_number(0), None);
    assert_eq!(Lane::from_number(4), None);
}
