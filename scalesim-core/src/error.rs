//! Error types for the simulation kernel.
//!
//! Two disjoint taxonomies: admission-time rejections are *not* errors (they
//! are recorded as [`crate::results::IgnoredMovement`]), while execution-time
//! stock contract violations are fatal to the run and surface here.

use crate::time::SimTime;
use crate::types::{EntityKind, EntityName, MovementKind, StockName};
use thiserror::Error;

/// Top-level error type for simulation operations.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Queue(#[from] QueueError),

    /// A stock rejected an entity the kernel handed it while executing a
    /// movement. The model scheduled an impossible transfer; the run aborts.
    #[error("movement '{movement}' at {at} failed: {source}")]
    MovementFailed {
        movement: MovementKind,
        at: SimTime,
        source: StockError,
    },
}

/// A stock contract violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    #[error("stock '{stock}' stocks {stocks} entities, rejected '{entity}' of kind {offered}")]
    KindMismatch {
        stock: StockName,
        stocks: EntityKind,
        offered: EntityKind,
        entity: EntityName,
    },
}

/// Misuse of the movement priority queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Enqueue attempted after the queue was closed.
    #[error("movement queue is closed")]
    Closed,

    /// The queue ran dry before the halt movement executed. In a well-formed
    /// run the halt movement is always pending, so this is a model defect.
    #[error("movement queue drained before halt")]
    Drained,
}
