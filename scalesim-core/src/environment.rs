//! The simulation environment: admission control, the run loop, and the
//! completed/ignored result logs.
//!
//! Data flows one direction at setup (collaborators schedule movements) and
//! one direction at execution: [`Environment::run`] pops movements, mutates
//! stocks, and may trigger collaborators' `add`/`remove` implementations,
//! which themselves schedule further movements, a chain reaction bounded by
//! the queue's total order. Producers and the single consumer execute
//! strictly interleaved on one control thread, so the engine is a
//! single-threaded actor system driven entirely by simulated time.

use crate::config::SimulationConfig;
use crate::entity::EntityFactory;
use crate::error::SimError;
use crate::halting::HaltingSink;
use crate::movement::Movement;
use crate::plugin::AutoscalerPlugin;
use crate::queue::MovementPriorityQueue;
use crate::results::{CompletedMovement, CpuUtilization, IgnoreReason, IgnoredMovement};
use crate::stock::{FifoStock, SinkStock, SourceStock, Stock};
use crate::time::SimTime;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

const SCENARIO_KIND: &str = "Scenario";

/// Cloneable scheduling endpoint.
///
/// Collaborator stocks hold one of these so they can call
/// [`add_to_schedule`](ScheduleHandle::add_to_schedule) while `run` holds the
/// environment, and so they can timestamp their own derived decisions from
/// the simulated clock, the only time source they may use.
#[derive(Clone)]
pub struct ScheduleHandle {
    queue: Rc<RefCell<MovementPriorityQueue>>,
    clock: Rc<Cell<SimTime>>,
    halt_at: SimTime,
    ignored: Rc<RefCell<Vec<IgnoredMovement>>>,
}

impl ScheduleHandle {
    /// The current simulated time. Monotonically non-decreasing over a run.
    pub fn current_time(&self) -> SimTime {
        self.clock.get()
    }

    /// The fixed instant the run halts at.
    pub fn halt_time(&self) -> SimTime {
        self.halt_at
    }

    /// Submit a movement for execution. Returns whether it was admitted.
    ///
    /// Rejections are not errors: the movement is recorded in the ignored log
    /// with [`IgnoreReason::OccursInPast`] or [`IgnoreReason::OccursAfterHalt`]
    /// and the simulation proceeds normally. A timestamp collision is not a
    /// rejection either; the movement is deterministically nudged to the next
    /// free instant.
    pub fn add_to_schedule(&self, movement: Movement) -> bool {
        let now = self.clock.get();

        if movement.occurs_at() <= now {
            trace!(
                kind = %movement.kind(),
                occurs_at = %movement.occurs_at(),
                now = %now,
                "ignored movement scheduled in the past"
            );
            self.ignored.borrow_mut().push(IgnoredMovement {
                movement,
                reason: IgnoreReason::OccursInPast,
            });
            return false;
        }

        if movement.occurs_at() > self.halt_at {
            trace!(
                kind = %movement.kind(),
                occurs_at = %movement.occurs_at(),
                halt_at = %self.halt_at,
                "ignored movement scheduled after halt"
            );
            self.ignored.borrow_mut().push(IgnoredMovement {
                movement,
                reason: IgnoreReason::OccursAfterHalt,
            });
            return false;
        }

        match self.queue.borrow_mut().enqueue(movement) {
            Ok(scheduled) => {
                trace!(occurs_at = %scheduled.occurs_at, shifted = scheduled.shifted, "admitted movement");
                true
            }
            Err(err) => {
                // Unreachable through admission: once the queue closes the
                // clock sits at halt_at, so every submission is rejected above.
                warn!(error = %err, "enqueue refused by closed queue");
                false
            }
        }
    }
}

/// The run loop and its bookkeeping: simulated clock, admission control, and
/// the append-only result logs.
pub struct Environment {
    start_at: SimTime,
    halt_at: SimTime,
    clock: Rc<Cell<SimTime>>,
    queue: Rc<RefCell<MovementPriorityQueue>>,
    completed: Vec<CompletedMovement>,
    ignored: Rc<RefCell<Vec<IgnoredMovement>>>,
    cpu_utilizations: Vec<CpuUtilization>,
    plugin: Rc<dyn AutoscalerPlugin>,
    context: CancellationToken,
    before_scenario: Rc<FifoStock>,
    running_scenario: Rc<FifoStock>,
    halted_scenario: Rc<HaltingSink>,
}

impl Environment {
    /// Build an environment and admit the two reserved scenario movements:
    /// `start_scenario` at `start_at` and `halt_scenario` at `halt_at`,
    /// the latter targeting the halting sink.
    ///
    /// The clock is seeded one tick before `start_at`, which is what makes
    /// the start movement immediately admissible.
    ///
    /// # Errors
    ///
    /// [`SimError::Configuration`] for a degenerate time window.
    pub fn new(
        config: SimulationConfig,
        plugin: Rc<dyn AutoscalerPlugin>,
        context: CancellationToken,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let start_at = config.start_at;
        let halt_at = config.halt_at();

        let queue = Rc::new(RefCell::new(MovementPriorityQueue::new()));
        let before_scenario = Rc::new(FifoStock::new("BeforeScenario", SCENARIO_KIND));
        let running_scenario = Rc::new(FifoStock::new("RunningScenario", SCENARIO_KIND));
        let halted_scenario = Rc::new(HaltingSink::new(
            "HaltedScenario",
            SCENARIO_KIND,
            Rc::clone(&queue),
        ));

        let mut factory = EntityFactory::new(start_at.as_nanos());
        let scenario = factory.entity("scenario", SCENARIO_KIND);
        before_scenario
            .add(scenario)
            .expect("scenario stocks share the scenario kind");

        let environment = Self {
            start_at,
            halt_at,
            clock: Rc::new(Cell::new(start_at.prev_tick())),
            queue,
            completed: Vec::new(),
            ignored: Rc::new(RefCell::new(Vec::new())),
            cpu_utilizations: Vec::new(),
            plugin,
            context,
            before_scenario,
            running_scenario,
            halted_scenario,
        };

        let handle = environment.schedule_handle();
        let started = handle.add_to_schedule(Movement::new(
            "start_scenario",
            start_at,
            environment.before_scenario.clone(),
            environment.running_scenario.clone(),
        ));
        let halted = handle.add_to_schedule(Movement::new(
            "halt_scenario",
            halt_at,
            environment.running_scenario.clone(),
            environment.halted_scenario.clone(),
        ));
        debug_assert!(started && halted, "reserved scenario movements must admit");

        debug!(start_at = %start_at, halt_at = %halt_at, "environment constructed");
        Ok(environment)
    }

    /// A cloneable scheduling endpoint for collaborators.
    pub fn schedule_handle(&self) -> ScheduleHandle {
        ScheduleHandle {
            queue: Rc::clone(&self.queue),
            clock: Rc::clone(&self.clock),
            halt_at: self.halt_at,
            ignored: Rc::clone(&self.ignored),
        }
    }

    /// Submit a movement for execution. See [`ScheduleHandle::add_to_schedule`].
    pub fn add_to_schedule(&self, movement: Movement) -> bool {
        self.schedule_handle().add_to_schedule(movement)
    }

    /// Drive simulated time forward until the halt movement closes the queue.
    ///
    /// Each iteration pops the earliest movement, advances the clock to its
    /// instant (the only place simulated time changes), resolves the entity
    /// to move (the pre-bound one if any, otherwise whatever the source
    /// yields) and either executes the transfer or records the movement as
    /// ignored when the source is empty.
    ///
    /// # Errors
    ///
    /// A sink rejecting an entity at execution time is a model defect, not a
    /// recoverable condition: the loop aborts and the error is surfaced. The
    /// logs accumulated up to the failure point stay readable through
    /// [`completed`](Self::completed) and [`ignored`](Self::ignored).
    #[instrument(skip(self), fields(start_at = %self.start_at, halt_at = %self.halt_at))]
    pub fn run(&mut self) -> Result<(), SimError> {
        info!("starting simulation run");
        loop {
            let next = self.queue.borrow_mut().dequeue();
            let movement = match next {
                Ok(Some(movement)) => movement,
                Ok(None) => {
                    // Collision shifts can push a movement admitted at the
                    // halt instant past it; account for anything still
                    // pending when the halt closed the queue.
                    let stranded = self.queue.borrow_mut().drain_pending();
                    for movement in stranded {
                        trace!(
                            kind = %movement.kind(),
                            at = %movement.occurs_at(),
                            "ignored movement stranded past halt"
                        );
                        self.ignored.borrow_mut().push(IgnoredMovement {
                            movement,
                            reason: IgnoreReason::OccursAfterHalt,
                        });
                    }
                    break;
                }
                Err(err) => return Err(err.into()),
            };

            self.clock.set(movement.occurs_at());
            trace!(
                kind = %movement.kind(),
                at = %movement.occurs_at(),
                from = %movement.from_stock().name(),
                to = %movement.to_stock().name(),
                "executing movement"
            );

            let entity = match movement.bound_entity() {
                Some(entity) => Some(entity.clone()),
                None => movement.from_stock().remove(),
            };

            let Some(entity) = entity else {
                trace!(kind = %movement.kind(), "ignored movement from empty stock");
                self.ignored.borrow_mut().push(IgnoredMovement {
                    movement,
                    reason: IgnoreReason::FromStockIsEmpty,
                });
                continue;
            };

            if let Err(source) = movement.to_stock().add(entity.clone()) {
                return Err(SimError::MovementFailed {
                    movement: movement.kind().clone(),
                    at: movement.occurs_at(),
                    source,
                });
            }
            self.completed.push(CompletedMovement {
                movement,
                moved: entity,
            });
        }
        info!(
            final_time = %self.clock.get(),
            completed = self.completed.len(),
            ignored = self.ignored.borrow().len(),
            "simulation halted"
        );
        Ok(())
    }

    /// The current simulated time.
    pub fn current_time(&self) -> SimTime {
        self.clock.get()
    }

    /// The fixed instant the run halts at.
    pub fn halt_time(&self) -> SimTime {
        self.halt_at
    }

    /// Cancellation context for the autoscaler RPC boundary. Pass-through:
    /// the kernel's own loop termination is governed solely by the halting
    /// sink.
    pub fn context(&self) -> CancellationToken {
        self.context.clone()
    }

    /// Pass-through handle to the autoscaler recommendation boundary.
    pub fn plugin_dispatcher(&self) -> Rc<dyn AutoscalerPlugin> {
        Rc::clone(&self.plugin)
    }

    /// Append one collaborator-produced metrics sample. Uninterpreted.
    pub fn append_cpu_utilization(&mut self, sample: CpuUtilization) {
        self.cpu_utilizations.push(sample);
    }

    /// The metrics side log, in append order.
    pub fn cpu_utilizations(&self) -> &[CpuUtilization] {
        &self.cpu_utilizations
    }

    /// Movements executed so far, in execution order.
    pub fn completed(&self) -> &[CompletedMovement] {
        &self.completed
    }

    /// Movements discarded so far, in the order they were discarded.
    pub fn ignored(&self) -> Vec<IgnoredMovement> {
        self.ignored.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::NopPlugin;
    use std::time::Duration;

    fn environment(start_secs: u64, duration_secs: u64) -> Environment {
        Environment::new(
            SimulationConfig::new(
                SimTime::from_secs(start_secs),
                Duration::from_secs(duration_secs),
            ),
            Rc::new(NopPlugin),
            CancellationToken::new(),
        )
        .unwrap()
    }

    #[test]
    fn clock_starts_one_tick_before_start() {
        let env = environment(100, 50);
        assert_eq!(env.current_time(), SimTime::from_secs(100).prev_tick());
        assert_eq!(env.halt_time(), SimTime::from_secs(150));
    }

    #[test]
    fn bare_run_executes_exactly_the_bookends() {
        let mut env = environment(100, 50);
        env.run().unwrap();

        let kinds: Vec<&str> = env
            .completed()
            .iter()
            .map(|c| c.movement.kind().as_str())
            .collect();
        assert_eq!(kinds, ["start_scenario", "halt_scenario"]);
        assert!(env.ignored().is_empty());
        assert_eq!(env.current_time(), env.halt_time());
    }

    #[test]
    fn cpu_utilization_log_is_append_only() {
        let mut env = environment(100, 50);
        env.append_cpu_utilization(CpuUtilization {
            calculated_at: SimTime::from_secs(110),
            percentage: 42.0,
        });
        env.append_cpu_utilization(CpuUtilization {
            calculated_at: SimTime::from_secs(120),
            percentage: 17.5,
        });

        let log = env.cpu_utilizations();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].calculated_at, SimTime::from_secs(110));
    }

    #[test]
    fn plugin_and_context_pass_through() {
        let env = environment(100, 50);
        let dispatcher = env.plugin_dispatcher();
        assert_eq!(
            dispatcher.horizontal_recommendation(SimTime::from_secs(110)).unwrap(),
            0
        );
        assert!(!env.context().is_cancelled());
    }
}
