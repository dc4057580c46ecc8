//! # scalesim: discrete-event autoscaling simulator
//!
//! Facade crate re-exporting the simulation kernel.
//!
//! ```toml
//! [dependencies]
//! scalesim = "0.1"
//! ```
//!
//! The kernel lives in [`scalesim_core`]; domain models (replicas, requests,
//! traffic patterns, autoscaler adapters) are built on top of it as
//! collaborators that implement the stock traits and schedule movements.

pub use scalesim_core as core;

pub mod prelude {
    //! Commonly used types and traits.

    pub use scalesim_core::{
        AutoscalerPlugin, CancellationToken, Entity, EntityFactory, Environment, FifoStock,
        Movement, NopPlugin, ScheduleHandle, SetStock, SimTime, SimulationConfig, SinkStock,
        SourceStock, Stock, ThroughStock,
    };
}
