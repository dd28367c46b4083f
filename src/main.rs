use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use v2v_sim::simulation::{
    load_scenario_file, EventLog, FramePacer, PendingScenario, PresetScenarioGenerator, RunStats,
    ScenarioGenerator, SimConfig, SimWorld, VehicleId, PRESET_PROMPTS,
};

#[derive(Parser)]
#[command(name = "v2v_sim")]
#[command(about = "V2V brake warning simulation on a three-lane highway")]
struct Cli {
    /// Run with the Bevy viewer
    #[arg(long)]
    ui: bool,

    /// Number of frames to run in headless mode
    #[arg(long, default_value = "600")]
    ticks: u64,

    /// Frames per second when pacing in realtime
    #[arg(long, default_value = "60")]
    rate: f32,

    /// Sleep between frames to match --rate instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Brake warning range along the highway
    #[arg(long)]
    range: Option<f32>,

    /// How many ticks a warned vehicle stays alerted
    #[arg(long)]
    alert_ticks: Option<u32>,

    /// JSON file with the vehicle layout to start from
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Describe a scenario and let a generator build it
    #[arg(long)]
    prompt: Option<String>,

    /// Use one of the built-in scenario prompts (1-based, see --list-presets)
    #[arg(
        long,
        conflicts_with = "prompt",
        value_parser = clap::value_parser!(u8).range(1..=PRESET_PROMPTS.len() as i64)
    )]
    preset: Option<u8>,

    /// Print the built-in scenario prompts and exit
    #[arg(long)]
    list_presets: bool,

    /// Seed for the offline scenario generator
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Brake a vehicle on a given frame, as FRAME:ID (repeatable)
    #[arg(long = "brake", value_parser = parse_brake_at)]
    brakes: Vec<(u64, VehicleId)>,

    /// Toggle pause on a given frame (repeatable)
    #[arg(long = "pause-at")]
    pause_at: Vec<u64>,

    /// Print a summary every N frames
    #[arg(long, default_value = "120")]
    summary_every: u64,

    /// API key for the Gemini scenario generator
    #[cfg(feature = "gemini")]
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_key: Option<String>,
}

fn parse_brake_at(value: &str) -> Result<(u64, VehicleId), String> {
    let (frame, id) = value
        .split_once(':')
        .ok_or_else(|| format!("expected FRAME:ID, got `{value}`"))?;
    let frame = frame
        .trim()
        .parse::<u64>()
        .map_err(|err| format!("invalid frame `{frame}`: {err}"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err("vehicle id is empty".to_string());
    }
    Ok((frame, VehicleId::new(id)))
}

impl Cli {
    /// Prompt to send to the generator, from --prompt or --preset
    fn scenario_prompt(&self) -> Option<String> {
        self.prompt.clone().or_else(|| {
            self.preset
                .and_then(|n| PRESET_PROMPTS.get(usize::from(n) - 1))
                .map(|prompt| prompt.to_string())
        })
    }

    fn sim_config(&self) -> SimConfig {
        let mut config = SimConfig {
            tick_rate_hz: self.rate,
            ..SimConfig::default()
        };
        if let Some(range) = self.range {
            config.communication_range = range;
        }
        if let Some(alert_ticks) = self.alert_ticks {
            config.alert_duration_ticks = alert_ticks;
        }
        config
    }

    fn generator(&self) -> Arc<dyn ScenarioGenerator> {
        #[cfg(feature = "gemini")]
        {
            if let Some(key) = &self.gemini_key {
                match v2v_sim::simulation::GeminiScenarioGenerator::new(key.clone()) {
                    Ok(generator) => return Arc::new(generator),
                    Err(err) => {
                        warn!("Gemini client unavailable, using offline generator: {}", err)
                    }
                }
            }
        }
        Arc::new(PresetScenarioGenerator::new(self.seed))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.list_presets {
        for (n, prompt) in PRESET_PROMPTS.iter().enumerate() {
            println!("{}: {}", n + 1, prompt);
        }
        return Ok(());
    }

    let config = cli.sim_config();
    config.validate().context("Invalid simulation settings")?;

    if cli.ui {
        #[cfg(feature = "ui")]
        {
            run_with_ui(config);
            return Ok(());
        }
        #[cfg(not(feature = "ui"))]
        {
            anyhow::bail!("UI feature is not enabled. Rebuild with --features ui");
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn,v2v_sim=info"))
        .init();
    run_headless(&cli, config)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli, config: SimConfig) -> Result<()> {
    println!("Running V2V simulation in headless mode...");
    println!(
        "Frames: {}, Rate: {} Hz{}",
        cli.ticks,
        config.tick_rate_hz,
        if cli.realtime { " (realtime)" } else { "" }
    );
    println!();

    let mut log = EventLog::new(config.event_log_capacity);
    let mut stats = RunStats::default();
    let mut pacer = FramePacer::new(config.tick_rate_hz);
    let mut world = SimWorld::with_config(config).context("Failed to build simulation world")?;

    if let Some(path) = &cli.scenario {
        let records = load_scenario_file(path)?;
        world
            .load_scenario(&records)
            .with_context(|| format!("Scenario {} was rejected", path.display()))?;
    }

    let mut pending = cli.scenario_prompt().map(|prompt| {
        world.note_generation_request(&prompt);
        PendingScenario::spawn(cli.generator(), prompt)
    });

    println!("Initial state:");
    world.print_summary();
    world.draw_map();

    for frame in 1..=cli.ticks {
        if cli.realtime {
            pacer.wait_for_next_frame();
        }

        if let Some(result) = pending.as_mut().and_then(|request| request.try_take()) {
            pending = None;
            if let Err(err) = world.apply_generated(result) {
                warn!("Generated scenario discarded: {}", err);
            }
        }

        for (_, id) in cli.brakes.iter().filter(|(at, _)| *at == frame) {
            world.trigger_brake(id);
        }
        if cli.pause_at.contains(&frame) {
            world.toggle_run();
        }

        // Commands are stamped with the ticks completed before this frame's tick
        record_events(&mut world, &mut stats, &mut log);
        world.tick();
        record_events(&mut world, &mut stats, &mut log);

        if cli.summary_every > 0 && frame % cli.summary_every == 0 {
            println!("--- After frame {} ---", frame);
            world.print_summary();
            world.draw_map();
        }
    }

    if let Some(request) = pending.take() {
        info!("Waiting for scenario generation: {:?}", request.prompt());
        if let Err(err) = world.apply_generated(request.wait()) {
            warn!("Generated scenario discarded: {}", err);
        }
        record_events(&mut world, &mut stats, &mut log);
    }

    println!("=== Final State ===");
    world.print_summary();
    world.draw_map();

    println!(
        "--- Event Log (newest first, keeping {} entries) ---",
        log.capacity()
    );
    for entry in log.entries().take(20) {
        println!("  {}", entry);
    }
    println!();

    let (normal, braking, alert) = world.mode_counts();
    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks run: {}", world.tick_count());
    info!("Brakes initiated: {}", stats.brakes_initiated);
    info!("Warnings delivered: {}", stats.warnings_delivered);
    info!("Alerts cleared: {}", stats.alerts_cleared);
    info!("Scenarios loaded: {}", stats.scenarios_loaded);
    info!("Scenario failures: {}", stats.scenario_failures);
    info!("Vehicles: normal={} braking={} alert={}", normal, braking, alert);
    Ok(())
}

/// Move pending world events into the run totals and the rolling log
fn record_events(world: &mut SimWorld, stats: &mut RunStats, log: &mut EventLog) {
    let events = world.drain_events();
    stats.observe_all(&events);
    log.record_all(world.tick_count(), events);
}

#[cfg(feature = "ui")]
fn run_with_ui(config: SimConfig) {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;

    println!("Starting V2V Sim viewer...");
    println!();
    println!("Controls:");
    println!("  Space  - Pause/resume");
    println!("  Tab    - Select next vehicle");
    println!("  B      - Sudden brake on the selected vehicle");
    println!("  R      - Reset to the default scenario");
    println!("  ESC    - Exit");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,v2v_sim=info".to_string(),
                    level: bevy::log::Level::INFO,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "V2V Sim".into(),
                        resolution: (1280, 480).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(v2v_sim::ui::V2vSimUIPlugin { config })
        .run();
}
