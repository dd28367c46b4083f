//! Running totals over the events of a simulation run

use super::events::SimEvent;

/// Counters fed from emitted events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub brakes_initiated: u32,
    pub warnings_delivered: u32,
    pub alerts_cleared: u32,
    pub scenarios_loaded: u32,
    pub scenario_failures: u32,
    pub resets: u32,
}

impl RunStats {
    pub fn observe(&mut self, event: &SimEvent) {
        match event {
            SimEvent::BrakeInitiated { .. } => self.brakes_initiated += 1,
            SimEvent::WarningDelivered { .. } => self.warnings_delivered += 1,
            SimEvent::AlertCleared { .. } => self.alerts_cleared += 1,
            SimEvent::ScenarioLoaded { .. } => self.scenarios_loaded += 1,
            SimEvent::ScenarioFailed { .. } => self.scenario_failures += 1,
            SimEvent::Reset => self.resets += 1,
            SimEvent::RunToggled { .. } | SimEvent::GenerationRequested { .. } => {}
        }
    }

    pub fn observe_all<'a>(&mut self, events: impl IntoIterator<Item = &'a SimEvent>) {
        for event in events {
            self.observe(event);
        }
    }

    /// Average number of vehicles reached per brake
    pub fn warnings_per_brake(&self) -> f32 {
        if self.brakes_initiated == 0 {
            0.0
        } else {
            self.warnings_delivered as f32 / self.brakes_initiated as f32
        }
    }
}
