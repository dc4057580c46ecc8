//! Simulation run configuration.

use crate::error::SimError;
use crate::time::SimTime;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one simulation run.
///
/// `halt_at` is always `start_at + duration`, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// The simulated instant the run starts at. Must be after time zero: the
    /// clock is seeded one tick earlier so the start movement is admissible.
    pub start_at: SimTime,
    /// How much simulated time the run covers.
    pub duration: Duration,
}

impl SimulationConfig {
    pub fn new(start_at: SimTime, duration: Duration) -> Self {
        Self { start_at, duration }
    }

    /// The simulated instant the run halts at.
    pub fn halt_at(&self) -> SimTime {
        self.start_at + self.duration
    }

    pub(crate) fn validate(&self) -> Result<(), SimError> {
        if self.start_at == SimTime::zero() {
            return Err(SimError::Configuration(
                "start_at must be after time zero".to_owned(),
            ));
        }
        if self.duration.is_zero() {
            return Err(SimError::Configuration(
                "duration must be non-zero".to_owned(),
            ));
        }
        Ok(())
    }
}
