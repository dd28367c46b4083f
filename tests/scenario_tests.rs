//! Scenario documents, generators, and the event log

use std::io::Write;
use std::sync::Arc;

use v2v_sim::simulation::{
    generate_scenario, load_scenario_file, parse_scenario_json, EventLog, GenerationError,
    PendingScenario, PresetScenarioGenerator, RunStats, ScenarioError, ScenarioGenerator,
    SimEvent, SimWorld, VehicleId, GENERATED_VEHICLES_MAX, GENERATED_VEHICLES_MIN,
    PRESET_PROMPTS,
};

/// Generator that always answers with the same document
struct FixedGenerator(&'static str);

impl ScenarioGenerator for FixedGenerator {
    fn name(&self) -> &str {
        "fixed"
    }

    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.0.to_string())
    }
}

/// Generator whose service is always down
struct FailingGenerator;

impl ScenarioGenerator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Api("503 Service Unavailable".to_string()))
    }
}

#[test]
fn test_parse_scenario_document() {
    let records = parse_scenario_json(
        r#"[
            {"id": "V1", "x": 10, "lane": 1, "speed": 5, "color": "blue"},
            {"id": "V2", "x": 55.5, "lane": 3.0, "speed": 7.5, "color": "red"}
        ]"#,
    )
    .expect("valid document");

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].lane, Some(3.0));

    let mut world = SimWorld::new();
    assert_eq!(world.load_scenario(&records).expect("valid records"), 2);
}

#[test]
fn test_missing_field_is_named() {
    let records =
        parse_scenario_json(r#"[{"id": "V1", "x": 10, "lane": 1, "color": "blue"}]"#)
            .expect("parses; validation happens on load");

    let mut world = SimWorld::new();
    let err = world.load_scenario(&records).expect_err("speed is missing");
    assert!(err.to_string().contains("speed"), "{}", err);
}

#[test]
fn test_non_array_document_is_malformed() {
    assert!(matches!(
        parse_scenario_json(r#"{"id": "V1"}"#),
        Err(ScenarioError::Malformed(_))
    ));
    assert!(matches!(
        parse_scenario_json("not json"),
        Err(ScenarioError::Malformed(_))
    ));
    assert!(matches!(
        parse_scenario_json(r#"[{"id": "V1", "x": "far"}]"#),
        Err(ScenarioError::Malformed(_))
    ));
}

#[test]
fn test_load_scenario_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"[{{"id": "T1", "x": 25, "lane": 2, "speed": 9, "color": "Purple"}}]"#
    )
    .expect("write scenario");

    let records = load_scenario_file(file.path()).expect("loads");
    let mut world = SimWorld::new();
    world.load_scenario(&records).expect("valid");

    let t1 = world.vehicle(&VehicleId::new("T1")).expect("T1 exists");
    assert_eq!(t1.position, 300.0);
    assert_eq!(t1.display_color, "purple");
}

#[test]
fn test_missing_scenario_file_reports_path() {
    let err = load_scenario_file(std::path::Path::new("/definitely/not/here.json"))
        .expect_err("file does not exist");
    assert!(format!("{:#}", err).contains("here.json"));
}

#[test]
fn test_generator_non_array_is_generation_failure() {
    let err = generate_scenario(&FixedGenerator(r#"{"vehicles": []}"#), "anything")
        .expect_err("not an array");
    assert!(matches!(
        err,
        ScenarioError::Generation(GenerationError::InvalidResponse(_))
    ));
}

#[test]
fn test_empty_prompt_is_rejected() {
    let err = generate_scenario(&FixedGenerator("[]"), "   ").expect_err("empty prompt");
    assert!(matches!(
        err,
        ScenarioError::Generation(GenerationError::EmptyPrompt)
    ));
}

#[test]
fn test_generation_failure_keeps_world() {
    let mut world = SimWorld::new();
    let before = world.snapshot();

    let result = generate_scenario(&FailingGenerator, "two cars");
    assert!(world.apply_generated(result).is_err());

    assert_eq!(world.snapshot(), before);
    let events = world.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], SimEvent::ScenarioFailed { .. }));
}

#[test]
fn test_preset_generator_respects_bounds() {
    let generator = PresetScenarioGenerator::new(42);
    for prompt in PRESET_PROMPTS {
        let records = generate_scenario(&generator, prompt).expect("preset output is valid");
        assert!(records.len() >= GENERATED_VEHICLES_MIN);
        assert!(records.len() <= GENERATED_VEHICLES_MAX);

        let mut world = SimWorld::new();
        assert_eq!(world.load_scenario(&records).expect("loads"), records.len());
    }
}

#[test]
fn test_preset_generator_is_reproducible() {
    let prompt = "Heavy traffic with all cars moving slowly.";
    let first = generate_scenario(&PresetScenarioGenerator::new(9), prompt).expect("valid");
    let second = generate_scenario(&PresetScenarioGenerator::new(9), prompt).expect("valid");
    assert_eq!(first, second);
}

#[test]
fn test_pending_scenario_applies_atomically() {
    let mut world = SimWorld::new();
    let request = PendingScenario::spawn(
        Arc::new(FixedGenerator(
            r#"[{"id": "G1", "x": 0, "lane": 1, "speed": 5, "color": "blue"},
                {"id": "G2", "x": 90, "lane": 2, "speed": 5, "color": "red"}]"#,
        )),
        "two cars",
    );
    assert_eq!(request.prompt(), "two cars");

    // The world keeps running while the request is out
    for _ in 0..5 {
        world.tick();
    }
    assert!(world.vehicle(&VehicleId::new("V1")).is_some());

    let count = world.apply_generated(request.wait()).expect("valid scenario");
    assert_eq!(count, 2);
    assert!(world.vehicle(&VehicleId::new("V1")).is_none());
    assert!(world.vehicle(&VehicleId::new("G2")).is_some());
}

#[test]
fn test_pending_scenario_poll() {
    let mut request = PendingScenario::spawn(Arc::new(FailingGenerator), "anything");
    let result = loop {
        if let Some(result) = request.try_take() {
            break result;
        }
        std::thread::yield_now();
    };
    assert!(matches!(
        result,
        Err(ScenarioError::Generation(GenerationError::Api(_)))
    ));
}

#[test]
fn test_event_log_is_bounded_and_newest_first() {
    let mut log = EventLog::new(3);
    for n in 0..5 {
        log.record(n, SimEvent::ScenarioLoaded { vehicles: n as usize });
    }

    assert_eq!(log.len(), 3);
    assert_eq!(log.capacity(), 3);
    let ticks: Vec<u64> = log.entries().map(|entry| entry.tick).collect();
    assert_eq!(ticks, vec![4, 3, 2]);
}

#[test]
fn test_event_log_reset_clears_history() {
    let mut log = EventLog::new(10);
    log.record(1, SimEvent::BrakeInitiated { vehicle: VehicleId::new("V1") });
    log.record(2, SimEvent::Reset);

    assert_eq!(log.len(), 1);
    assert_eq!(
        log.latest().map(|entry| entry.event.to_string()),
        Some("SYSTEM: Simulation reset to initial state.".to_string())
    );
}

#[test]
fn test_event_messages() {
    let warning = SimEvent::WarningDelivered {
        from: VehicleId::new("V1"),
        to: VehicleId::new("V3"),
    };
    assert_eq!(warning.to_string(), "V2V: V1 -> V3 [BRAKE_WARNING]");
    assert_eq!(warning.vehicle(), Some(&VehicleId::new("V3")));

    let brake = SimEvent::BrakeInitiated { vehicle: VehicleId::new("V1") };
    assert_eq!(brake.to_string(), "EVENT: Vehicle V1 initiated a SUDDEN BRAKE.");
}

#[test]
fn test_run_stats_follow_events() {
    let mut world = SimWorld::new();
    let mut stats = RunStats::default();

    world.trigger_brake(&VehicleId::new("V1"));
    world.reset();
    stats.observe_all(&world.drain_events());

    assert_eq!(stats.brakes_initiated, 1);
    assert_eq!(stats.warnings_delivered, 2);
    assert_eq!(stats.resets, 1);
    assert_eq!(stats.warnings_per_brake(), 2.0);
}

#[test]
fn test_event_log_capacity_is_at_least_one() {
    let mut log = EventLog::new(0);
    assert_eq!(log.capacity(), 1);

    log.record(1, SimEvent::RunToggled { running: false });
    log.record(2, SimEvent::RunToggled { running: true });
    assert_eq!(log.len(), 1);

    log.clear();
    assert!(log.is_empty());
}
