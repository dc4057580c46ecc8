//! Discrete-event simulation kernel for modeling replica autoscaling.
//!
//! This crate provides the engine used to model autoscaling behavior of a
//! replica-based compute cluster (launch and terminate delays, request
//! queueing, periodic autoscaler decisions) without running real
//! infrastructure.
//!
//! # Architecture Overview
//!
//! The kernel is a stock-and-flow model driven by a time-ordered queue:
//!
//! - [`Entity`]: an identity-bearing, kind-tagged token.
//! - Stocks ([`FifoStock`], [`SetStock`]): named, kind-checked containers,
//!   plugged into movements through the [`SourceStock`]/[`SinkStock`]
//!   capability traits.
//! - [`Movement`]: a scheduled, timed transfer of one entity between stocks.
//! - [`MovementPriorityQueue`]: strict time order with deterministic
//!   collision resolution; no two pending movements ever share an instant.
//! - [`HaltingSink`]: the sink whose `add` closes the queue; termination is
//!   expressed through the ordinary movement mechanism.
//! - [`Environment`]: admission control and the dequeue/execute run loop.
//!
//! Domain models (replicas, requests, traffic, the autoscaler itself) are
//! collaborators: they implement the stock traits, schedule movements through
//! [`ScheduleHandle`], and read the result logs after the run. The autoscaler
//! decision boundary is out of process, reached through the
//! [`AutoscalerPlugin`] contract the environment passes through.
//!
//! # Time Model
//!
//! All timing uses [`SimTime`], simulated time with nanosecond resolution.
//! The clock advances only when a movement executes; collaborators may not
//! read a wall clock. Execution is strictly single-threaded: a movement's
//! execution may schedule any number of further movements, which simply take
//! their place in the total order.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use scalesim_core::{
//!     CancellationToken, Environment, NopPlugin, SimTime, SimulationConfig,
//! };
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! let config = SimulationConfig::new(SimTime::from_secs(1), Duration::from_secs(60));
//! let mut env = Environment::new(config, Rc::new(NopPlugin), CancellationToken::new()).unwrap();
//!
//! // Collaborators build stocks and schedule movements here.
//!
//! env.run().unwrap();
//! for completed in env.completed() {
//!     println!("{} at {}", completed.movement.kind(), completed.movement.occurs_at());
//! }
//! ```

pub mod config;
pub mod entity;
pub mod environment;
pub mod error;
pub mod halting;
pub mod logging;
pub mod movement;
pub mod plugin;
pub mod queue;
pub mod results;
pub mod stock;
pub mod time;
pub mod types;

pub use config::SimulationConfig;
pub use entity::{Entity, EntityFactory};
pub use environment::{Environment, ScheduleHandle};
pub use error::{QueueError, SimError, StockError};
pub use halting::HaltingSink;
pub use logging::{init_simulation_logging, init_simulation_logging_with_level};
pub use movement::Movement;
pub use plugin::{AutoscalerPlugin, NopPlugin, PluginError, ResourceRecommendation, StatSample};
pub use queue::{MovementPriorityQueue, Scheduled};
pub use results::{CompletedMovement, CpuUtilization, IgnoreReason, IgnoredMovement};
pub use stock::{FifoStock, SetStock, SinkStock, SourceStock, Stock, ThroughStock};
pub use time::{SimTime, TICK};
pub use types::{EntityKind, EntityName, MovementKind, StockName};

pub use tokio_util::sync::CancellationToken;
