//! V2V Highway Simulation Library
//!
//! A vehicle-to-vehicle brake warning simulation that can run headless or
//! with a Bevy viewer.

pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
