//! Natural-language scenario generation
//!
//! A [`ScenarioGenerator`] turns a prompt into a JSON array of vehicle
//! records. The engine only sees the parsed [`VehicleConfig`] list, so
//! providers can be swapped or stubbed freely.

use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use super::scenario::{parse_scenario_json, ScenarioError, VehicleConfig};

/// Sample prompts offered to users who don't want to type one
pub const PRESET_PROMPTS: [&str; 4] = [
    "A fast car approaching a slow-moving truck in the same lane.",
    "Two cars side-by-side with another one trying to merge between them.",
    "Heavy traffic with all cars moving slowly.",
    "A single car speeding on an empty highway at night.",
];

/// Smallest and largest scenario a generator is asked to produce
pub const GENERATED_VEHICLES_MIN: usize = 3;
pub const GENERATED_VEHICLES_MAX: usize = 7;

/// Failure inside a scenario generator
#[derive(Debug)]
pub enum GenerationError {
    /// Nothing to generate from
    EmptyPrompt,
    /// The request never got a usable HTTP response
    #[cfg(feature = "gemini")]
    Http(reqwest::Error),
    /// The service answered with an error
    Api(String),
    /// The service answered, but not with a JSON array of vehicles
    InvalidResponse(String),
    /// The background request ended without reporting a result
    Disconnected,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPrompt => write!(f, "prompt is empty"),
            #[cfg(feature = "gemini")]
            Self::Http(err) => write!(f, "request failed: {err}"),
            Self::Api(msg) => write!(f, "service error: {msg}"),
            Self::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
            Self::Disconnected => write!(f, "generation request was dropped"),
        }
    }
}

impl Error for GenerationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            #[cfg(feature = "gemini")]
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "gemini")]
impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Http(err)
    }
}

/// Something that can describe a highway layout from a prompt
pub trait ScenarioGenerator: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Return the raw response document, expected to be a JSON array
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Run a generator and parse its answer.
///
/// Any failure, including a response that is not a vehicle array, comes
/// back as [`ScenarioError::Generation`].
pub fn generate_scenario(
    generator: &dyn ScenarioGenerator,
    prompt: &str,
) -> Result<Vec<VehicleConfig>, ScenarioError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(GenerationError::EmptyPrompt.into());
    }

    debug!("Requesting scenario from {} for prompt {:?}", generator.name(), prompt);
    let document = generator.generate(prompt)?;
    parse_scenario_json(&document).map_err(|err| match err {
        ScenarioError::Malformed(msg) => GenerationError::InvalidResponse(msg).into(),
        other => other,
    })
}

/// Offline generator that builds plausible layouts from keywords in the prompt.
///
/// Seeded for reproducible runs and tests.
pub struct PresetScenarioGenerator {
    rng: Mutex<StdRng>,
}

const PALETTE: [&str; 6] = ["blue", "red", "green", "yellow", "purple", "orange"];

impl PresetScenarioGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn layout(prompt: &str) -> (std::ops::RangeInclusive<usize>, std::ops::Range<f64>) {
        let prompt = prompt.to_lowercase();
        if prompt.contains("heavy") || prompt.contains("slow") || prompt.contains("jam") {
            (6..=GENERATED_VEHICLES_MAX, 1.0..3.5)
        } else if prompt.contains("fast") || prompt.contains("speeding") {
            (GENERATED_VEHICLES_MIN..=4, 6.0..10.0)
        } else {
            (GENERATED_VEHICLES_MIN..=GENERATED_VEHICLES_MAX, 3.0..8.0)
        }
    }
}

impl ScenarioGenerator for PresetScenarioGenerator {
    fn name(&self) -> &str {
        "preset"
    }

    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let (count_range, speed_range) = Self::layout(prompt);
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| GenerationError::Api("generator state poisoned".to_string()))?;

        let count = rng.random_range(count_range);
        let vehicles: Vec<VehicleConfig> = (1..=count)
            .map(|n| {
                let lane: u8 = rng.random_range(1..=3);
                let x = (rng.random_range(0.0..100.0_f64) * 10.0).round() / 10.0;
                let speed = (rng.random_range(speed_range.clone()) * 10.0).round() / 10.0;
                let color = PALETTE.choose(&mut *rng).copied().unwrap_or("blue");
                VehicleConfig::new(&format!("V{n}"), x, lane, speed, color)
            })
            .collect();

        serde_json::to_string(&vehicles)
            .map_err(|err| GenerationError::InvalidResponse(err.to_string()))
    }
}

/// A generation request running on a background thread.
///
/// The simulation keeps ticking while the request is out; the caller polls
/// [`PendingScenario::try_take`] at a tick boundary and applies the result
/// in one step.
pub struct PendingScenario {
    prompt: String,
    receiver: Receiver<Result<Vec<VehicleConfig>, ScenarioError>>,
    handle: Option<JoinHandle<()>>,
}

impl PendingScenario {
    pub fn spawn(generator: Arc<dyn ScenarioGenerator>, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        let (sender, receiver) = crossbeam_channel::bounded(1);
        let request = prompt.clone();

        let handle = thread::spawn(move || {
            let result = generate_scenario(generator.as_ref(), &request);
            if let Err(err) = &result {
                warn!("Scenario generation with {} failed: {}", generator.name(), err);
            }
            // The receiver may already be gone if the caller gave up.
            let _ = sender.send(result);
        });

        Self {
            prompt,
            receiver,
            handle: Some(handle),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The result, if the request has finished
    pub fn try_take(&mut self) -> Option<Result<Vec<VehicleConfig>, ScenarioError>> {
        let result = match self.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(GenerationError::Disconnected.into()),
        };
        self.join();
        Some(result)
    }

    /// Block until the request finishes
    pub fn wait(mut self) -> Result<Vec<VehicleConfig>, ScenarioError> {
        let result = self
            .receiver
            .recv()
            .unwrap_or_else(|_| Err(GenerationError::Disconnected.into()));
        self.join();
        result
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Scenario generation thread panicked");
            }
        }
    }
}
