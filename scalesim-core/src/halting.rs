//! The sink that ends the simulation.

use crate::entity::Entity;
use crate::error::StockError;
use crate::queue::MovementPriorityQueue;
use crate::stock::{FifoStock, SinkStock, SourceStock, Stock};
use crate::types::{EntityKind, StockName};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// A sink stock whose `add` closes the movement queue.
///
/// Simulation termination is expressed through the ordinary movement
/// mechanism: the reserved halt movement targets this sink, and when the
/// engine executes it in due time, adding the entity here is what stops the
/// run loop. No other termination flag exists in the kernel.
#[derive(Debug)]
pub struct HaltingSink {
    delegate: FifoStock,
    queue: Rc<RefCell<MovementPriorityQueue>>,
}

impl HaltingSink {
    pub fn new(
        name: impl Into<StockName>,
        kind_stocked: impl Into<EntityKind>,
        queue: Rc<RefCell<MovementPriorityQueue>>,
    ) -> Self {
        Self {
            delegate: FifoStock::new(name, kind_stocked),
            queue,
        }
    }
}

impl Stock for HaltingSink {
    fn name(&self) -> &StockName {
        self.delegate.name()
    }

    fn kind_stocked(&self) -> &EntityKind {
        self.delegate.kind_stocked()
    }

    fn count(&self) -> usize {
        self.delegate.count()
    }

    fn entities_in_stock(&self) -> Vec<Entity> {
        self.delegate.entities_in_stock()
    }
}

impl SourceStock for HaltingSink {
    fn remove(&self) -> Option<Entity> {
        self.delegate.remove()
    }
}

impl SinkStock for HaltingSink {
    fn add(&self, entity: Entity) -> Result<(), StockError> {
        self.queue.borrow_mut().close();
        debug!(stock = %self.name(), entity = %entity, "halting sink closed the movement queue");
        self.delegate.add(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityFactory;

    #[test]
    fn add_closes_the_queue_then_delegates() {
        let queue = Rc::new(RefCell::new(MovementPriorityQueue::new()));
        let sink = HaltingSink::new("HaltedScenario", "Scenario", Rc::clone(&queue));
        let mut factory = EntityFactory::new(1);

        assert!(!queue.borrow().is_closed());
        sink.add(factory.entity("scenario", "Scenario")).unwrap();
        assert!(queue.borrow().is_closed());
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn kind_checking_is_delegated() {
        let queue = Rc::new(RefCell::new(MovementPriorityQueue::new()));
        let sink = HaltingSink::new("HaltedScenario", "Scenario", Rc::clone(&queue));
        let mut factory = EntityFactory::new(1);

        let err = sink.add(factory.entity("request-0", "Request")).unwrap_err();
        assert!(matches!(err, StockError::KindMismatch { .. }));
        // The close still happened; closing is a one-way latch wired to Add.
        assert!(queue.borrow().is_closed());
        assert_eq!(sink.count(), 0);
    }
}
