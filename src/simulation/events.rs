//! Simulation events and the rolling log that collects them
//!
//! The engine only emits [`SimEvent`]s. Storage belongs to the caller, which
//! usually keeps an [`EventLog`].

use std::collections::VecDeque;
use std::fmt;

use super::types::VehicleId;

/// Something worth telling a human about
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// A vehicle performed a sudden brake
    BrakeInitiated { vehicle: VehicleId },
    /// A brake warning reached a vehicle in range
    WarningDelivered { from: VehicleId, to: VehicleId },
    /// An alerted vehicle's timer ran out and it resumed cruising
    AlertCleared { vehicle: VehicleId },
    /// The clock was started or paused
    RunToggled { running: bool },
    /// The world went back to the built-in scenario
    Reset,
    /// A natural-language scenario request was sent to a generator
    GenerationRequested { prompt: String },
    /// A scenario replaced the vehicle set
    ScenarioLoaded { vehicles: usize },
    /// A scenario was rejected and the previous set kept
    ScenarioFailed { reason: String },
}

impl SimEvent {
    /// The vehicle this event is mostly about, if any
    pub fn vehicle(&self) -> Option<&VehicleId> {
        match self {
            SimEvent::BrakeInitiated { vehicle } | SimEvent::AlertCleared { vehicle } => {
                Some(vehicle)
            }
            SimEvent::WarningDelivered { to, .. } => Some(to),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SimEvent::ScenarioFailed { .. })
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::BrakeInitiated { vehicle } => {
                write!(f, "EVENT: Vehicle {vehicle} initiated a SUDDEN BRAKE.")
            }
            SimEvent::WarningDelivered { from, to } => {
                write!(f, "V2V: {from} -> {to} [BRAKE_WARNING]")
            }
            SimEvent::AlertCleared { vehicle } => {
                write!(f, "V2V: {vehicle} alert expired, resuming cruise speed.")
            }
            SimEvent::RunToggled { running: true } => write!(f, "SYSTEM: Simulation resumed."),
            SimEvent::RunToggled { running: false } => write!(f, "SYSTEM: Simulation paused."),
            SimEvent::Reset => write!(f, "SYSTEM: Simulation reset to initial state."),
            SimEvent::GenerationRequested { prompt } => {
                write!(f, "AI: Generating new scenario from prompt: \"{prompt}\"")
            }
            SimEvent::ScenarioLoaded { vehicles } => {
                write!(f, "SCENARIO: Loaded successfully with {vehicles} vehicles.")
            }
            SimEvent::ScenarioFailed { reason } => {
                write!(f, "SCENARIO: ERROR - could not load scenario: {reason}")
            }
        }
    }
}

/// A recorded event with the tick it was observed on
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Ticks completed when the event was recorded
    pub tick: u64,
    pub event: SimEvent,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>6}] {}", self.tick, self.event)
    }
}

/// Bounded rolling log, newest entry first
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record one event. A reset wipes older history first.
    pub fn record(&mut self, tick: u64, event: SimEvent) {
        if event == SimEvent::Reset {
            self.clear();
        }
        self.entries.push_front(LogEntry { tick, event });
        self.entries.truncate(self.capacity);
    }

    pub fn record_all(&mut self, tick: u64, events: impl IntoIterator<Item = SimEvent>) {
        for event in events {
            self.record(tick, event);
        }
    }

    /// Entries from newest to oldest
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
