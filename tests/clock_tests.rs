use std::time::{Duration, Instant};

use v2v_sim::simulation::{FramePacer, SimulationClock};

#[test]
fn test_clock_counts_only_running_frames() {
    let mut clock = SimulationClock::default();
    assert_eq!(clock.advance(), Some(1));
    assert_eq!(clock.advance(), Some(2));

    clock.stop();
    assert_eq!(clock.advance(), None);
    assert_eq!(clock.ticks(), 2);

    clock.start();
    assert_eq!(clock.advance(), Some(3));
}

#[test]
fn test_clock_toggle() {
    let mut clock = SimulationClock::new(false);
    assert!(!clock.is_running());
    assert!(clock.toggle());
    assert!(!clock.toggle());
    assert_eq!(clock.ticks(), 0);
}

#[test]
fn test_pacer_budget() {
    let pacer = FramePacer::new(50.0);
    let budget = pacer.budget().as_secs_f64();
    assert!((budget - 0.02).abs() < 1e-6, "budget {budget}");

    // Nonsense rates fall back to one frame per second
    assert_eq!(FramePacer::new(0.0).budget(), Duration::from_secs(1));
    assert_eq!(FramePacer::new(f32::NAN).budget(), Duration::from_secs(1));
}

#[test]
fn test_pacer_sleeps_out_the_frame() {
    let mut pacer = FramePacer::new(100.0);
    pacer.wait_for_next_frame();

    let start = Instant::now();
    pacer.wait_for_next_frame();
    pacer.wait_for_next_frame();
    assert!(start.elapsed() >= Duration::from_millis(15));
}

#[test]
fn test_unrepresentable_rate_falls_back() {
    use v2v_sim::simulation::{frame_budget, SimConfig};

    assert!(frame_budget(1e-30).is_none());
    assert_eq!(FramePacer::new(1e-30).budget(), Duration::from_secs(1));

    let config = SimConfig {
        tick_rate_hz: 1e-30,
        ..SimConfig::default()
    };
    assert!(config.validate().is_err());
}
