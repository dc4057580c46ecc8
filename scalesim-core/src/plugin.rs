//! The autoscaler decision boundary.
//!
//! Autoscaler decisions are made by an out-of-process recommendation service
//! reached through this event/stat/recommend contract. The kernel does not
//! implement the boundary; it only passes a dispatcher handle through to the
//! collaborators that drive it.

use crate::time::SimTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One metrics sample forwarded to the recommendation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSample {
    pub at: SimTime,
    pub metric: String,
    pub value: f64,
}

/// Per-container resource sizing recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecommendation {
    pub container: String,
    pub lower_bound_millicores: u32,
    pub upper_bound_millicores: u32,
}

/// Failure while talking to the recommendation service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    #[error("autoscaler plugin unavailable: {0}")]
    Unavailable(String),
    #[error("autoscaler plugin protocol error: {0}")]
    Protocol(String),
}

/// Contract for the out-of-process autoscaler recommendation service.
///
/// Implementations live outside the kernel; [`NopPlugin`] is provided for
/// tests and demos that do not exercise the boundary.
pub trait AutoscalerPlugin {
    /// Notify the service of a lifecycle event on a simulated object.
    fn event(&self, at: SimTime, kind: &str, object: &str) -> Result<(), PluginError>;

    /// Forward a batch of metrics samples.
    fn stat(&self, samples: &[StatSample]) -> Result<(), PluginError>;

    /// Ask for the desired replica count at `at`.
    fn horizontal_recommendation(&self, at: SimTime) -> Result<u32, PluginError>;

    /// Ask for per-container resource sizing at `at`.
    fn vertical_recommendation(&self, at: SimTime)
        -> Result<Vec<ResourceRecommendation>, PluginError>;
}

/// A dispatcher that accepts everything and recommends nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopPlugin;

impl AutoscalerPlugin for NopPlugin {
    fn event(&self, _at: SimTime, _kind: &str, _object: &str) -> Result<(), PluginError> {
        Ok(())
    }

    fn stat(&self, _samples: &[StatSample]) -> Result<(), PluginError> {
        Ok(())
    }

    fn horizontal_recommendation(&self, _at: SimTime) -> Result<u32, PluginError> {
        Ok(0)
    }

    fn vertical_recommendation(
        &self,
        _at: SimTime,
    ) -> Result<Vec<ResourceRecommendation>, PluginError> {
        Ok(Vec::new())
    }
}
