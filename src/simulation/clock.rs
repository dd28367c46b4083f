//! Run/pause gate and realtime pacing for simulation ticks

use std::thread;
use std::time::{Duration, Instant};

/// Decides whether a frame advances the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationClock {
    running: bool,
    ticks: u64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SimulationClock {
    pub fn new(running: bool) -> Self {
        Self { running, ticks: 0 }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of ticks actually executed
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Flip between running and paused, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// Claim the next tick. Returns its number, or `None` while paused.
    ///
    /// Called once per frame no matter how late the frame is; missed frames
    /// are not replayed.
    pub fn advance(&mut self) -> Option<u64> {
        if !self.running {
            return None;
        }
        self.ticks += 1;
        Some(self.ticks)
    }
}

const FALLBACK_BUDGET: Duration = Duration::from_secs(1);

/// Time allotted to one frame at `rate_hz`, if that is a usable duration
pub fn frame_budget(rate_hz: f32) -> Option<Duration> {
    if !(rate_hz.is_finite() && rate_hz > 0.0) {
        return None;
    }
    Duration::try_from_secs_f32(1.0 / rate_hz).ok()
}

/// Sleeps out the remainder of each frame's budget.
///
/// A frame that overruns is not made up for: the next frame simply starts
/// late.
#[derive(Debug)]
pub struct FramePacer {
    budget: Duration,
    frame_start: Option<Instant>,
}

impl FramePacer {
    /// Pacer for `rate_hz` frames per second. Rates whose frame budget has no
    /// `Duration` representation fall back to one frame per second.
    pub fn new(rate_hz: f32) -> Self {
        Self {
            budget: frame_budget(rate_hz).unwrap_or(FALLBACK_BUDGET),
            frame_start: None,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Block until the current frame's budget is spent, then start a new frame
    pub fn wait_for_next_frame(&mut self) {
        if let Some(start) = self.frame_start {
            let elapsed = start.elapsed();
            if let Some(remaining) = self.budget.checked_sub(elapsed) {
                thread::sleep(remaining);
            }
        }
        self.frame_start = Some(Instant::now());
    }
}
