//! Result records produced by a run.
//!
//! These append-only logs are owned by the environment, populated only during
//! `run`, and read by reporting collaborators afterward.

use crate::entity::Entity;
use crate::movement::Movement;
use crate::time::SimTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a movement was ignored instead of executed.
///
/// These are expected, common, and fully recoverable: the simulation proceeds
/// normally and the caller can inspect the ignored log after the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// Rejected at admission: the movement would occur at or before the
    /// current simulated time.
    OccursInPast,
    /// The movement would occur after the halt time: rejected at admission,
    /// or shifted past the halt instant by collision resolution and still
    /// pending when the halt closed the queue.
    OccursAfterHalt,
    /// Discovered at execution: the source stock had nothing to move. The
    /// destination stock is never touched in this case.
    FromStockIsEmpty,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            IgnoreReason::OccursInPast => "occurs in the past",
            IgnoreReason::OccursAfterHalt => "occurs after halt",
            IgnoreReason::FromStockIsEmpty => "from stock is empty",
        };
        f.write_str(reason)
    }
}

/// A movement the engine executed, together with the entity it moved.
#[derive(Debug, Clone)]
pub struct CompletedMovement {
    pub movement: Movement,
    pub moved: Entity,
}

/// A movement the engine discarded, with the reason.
#[derive(Debug, Clone)]
pub struct IgnoredMovement {
    pub movement: Movement,
    pub reason: IgnoreReason,
}

/// One collaborator-produced CPU utilization sample.
///
/// The kernel never interprets these; it only keeps them in append order for
/// reporting layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuUtilization {
    pub calculated_at: SimTime,
    pub percentage: f64,
}
