//! A minimal autoscaling model on top of the kernel: a request backlog, a
//! pool of active replicas, and launch movements driven by the horizontal
//! recommendations of a (stubbed) autoscaler plugin.
//!
//! Run with logging:
//!
//! ```bash
//! RUST_LOG=debug cargo run --example autoscaler_loop
//! ```

use scalesim_core::{
    init_simulation_logging, AutoscalerPlugin, CancellationToken, Environment, EntityFactory,
    FifoStock, Movement, PluginError, ResourceRecommendation, SetStock, SimTime, SimulationConfig,
    SinkStock, StatSample, Stock,
};
use std::rc::Rc;
use std::time::Duration;

/// A stand-in for the out-of-process recommendation service: always wants one
/// replica per 10 concurrent requests.
struct RatioPlugin;

impl AutoscalerPlugin for RatioPlugin {
    fn event(&self, _at: SimTime, _kind: &str, _object: &str) -> Result<(), PluginError> {
        Ok(())
    }

    fn stat(&self, _samples: &[StatSample]) -> Result<(), PluginError> {
        Ok(())
    }

    fn horizontal_recommendation(&self, _at: SimTime) -> Result<u32, PluginError> {
        Ok(3)
    }

    fn vertical_recommendation(
        &self,
        _at: SimTime,
    ) -> Result<Vec<ResourceRecommendation>, PluginError> {
        Ok(Vec::new())
    }
}

fn main() {
    init_simulation_logging();

    let config = SimulationConfig::new(SimTime::from_secs(1), Duration::from_secs(120));
    let mut env = Environment::new(config, Rc::new(RatioPlugin), CancellationToken::new())
        .expect("valid configuration");

    let mut entities = EntityFactory::new(2024);

    // Cold replicas wait in a FIFO launch pipeline; active ones live in an
    // identity set so they can later be retired by reference.
    let launching = Rc::new(FifoStock::new("Launching", "Replica"));
    let active = Rc::new(SetStock::new("ActiveReplicas", "Replica"));
    for _ in 0..5 {
        launching
            .add(entities.sequenced("replica", "Replica"))
            .expect("replica pipeline stocks replicas");
    }

    // Ask the autoscaler boundary how many replicas it wants, then schedule
    // one launch movement per desired replica, 10s apart.
    let dispatcher = env.plugin_dispatcher();
    let desired = dispatcher
        .horizontal_recommendation(env.current_time())
        .expect("plugin reachable");
    for i in 0..desired {
        let at = SimTime::from_secs(10 + u64::from(i) * 10);
        env.add_to_schedule(Movement::new(
            "launch_replica",
            at,
            launching.clone(),
            active.clone(),
        ));
    }

    // Requests arrive into a backlog and are drained by completed serves.
    let arrivals = Rc::new(FifoStock::new("Arrivals", "Request"));
    let backlog = Rc::new(FifoStock::new("Backlog", "Request"));
    for _ in 0..4 {
        arrivals
            .add(entities.sequenced("request", "Request"))
            .expect("arrival stock stocks requests");
    }
    for secs in [15, 15, 16, 40] {
        env.add_to_schedule(Movement::new(
            "request_arrival",
            SimTime::from_secs(secs),
            arrivals.clone(),
            backlog.clone(),
        ));
    }

    env.run().expect("well-formed model");

    println!("completed movements:");
    for completed in env.completed() {
        println!(
            "  {} {} {} -> {}",
            completed.movement.occurs_at(),
            completed.movement.kind(),
            completed.movement.from_stock().name(),
            completed.movement.to_stock().name(),
        );
    }
    println!("ignored movements: {}", env.ignored().len());
    println!("active replicas after run: {}", active.count());
}
