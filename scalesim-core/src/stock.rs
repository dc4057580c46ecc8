//! Stocks: named, kind-checked containers of entities.
//!
//! A stock is a type-checked gate, not a generic bag: every `add` rejects an
//! entity whose kind differs from the stock's. The capability traits are
//! composable: a *source* only supports removal, a *sink* only addition. A
//! *through* stock supports both, which is the common case for an
//! intermediate holding area.
//!
//! Two backends are provided, with a deliberate selection rule:
//!
//! - [`FifoStock`] preserves arrival order with O(1) append and pop. Use it
//!   wherever first-in-first-out fairness or insertion-order reporting
//!   matters: request backlogs, launch and terminate pipelines.
//! - [`SetStock`] is an identity-indexed set with O(1) average add and
//!   targeted removal, unordered iteration. Use it wherever membership
//!   changes by identity in no particular order, e.g. the pool of currently
//!   active replicas.
//!
//! Methods take `&self` and backends use interior mutability: stocks are
//! shared via `Rc` between movements and collaborators, and the kernel is
//! strictly single-threaded (one logical thread drives the whole run), so no
//! locking is required.

use crate::entity::Entity;
use crate::error::StockError;
use crate::types::{EntityKind, StockName};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use uuid::Uuid;

/// Read-only surface every stock exposes.
pub trait Stock {
    fn name(&self) -> &StockName;

    /// The kind every entity in this stock must carry.
    fn kind_stocked(&self) -> &EntityKind;

    /// Number of entities currently held. Always equals
    /// `entities_in_stock().len()`.
    fn count(&self) -> usize;

    /// A snapshot of the current contents, not a live view.
    fn entities_in_stock(&self) -> Vec<Entity>;
}

/// A stock entities can be removed from.
///
/// Generative sources may mint a fresh entity on every call instead of
/// draining a finite container.
pub trait SourceStock: Stock {
    /// Remove and return an entity chosen by backend policy, or `None` if the
    /// stock is empty. The FIFO backend returns the oldest inserted entity;
    /// the set backend returns an arbitrary one.
    fn remove(&self) -> Option<Entity>;
}

/// A stock entities can be added to.
pub trait SinkStock: Stock {
    /// Add an entity. On success it is immediately visible in `count()` and
    /// `entities_in_stock()`.
    ///
    /// # Errors
    ///
    /// [`StockError::KindMismatch`] if the entity's kind differs from
    /// [`Stock::kind_stocked`].
    fn add(&self, entity: Entity) -> Result<(), StockError>;
}

/// The common case: an intermediate holding area supporting both operations.
pub trait ThroughStock: SourceStock + SinkStock {}

impl<T: SourceStock + SinkStock> ThroughStock for T {}

fn check_kind(name: &StockName, stocked: &EntityKind, entity: &Entity) -> Result<(), StockError> {
    if entity.kind() != stocked {
        return Err(StockError::KindMismatch {
            stock: name.clone(),
            stocks: stocked.clone(),
            offered: entity.kind().clone(),
            entity: entity.name().clone(),
        });
    }
    Ok(())
}

/// Ordered stock backend: preserves arrival order, removes oldest first.
#[derive(Debug)]
pub struct FifoStock {
    name: StockName,
    kind_stocked: EntityKind,
    contents: RefCell<VecDeque<Entity>>,
}

impl FifoStock {
    pub fn new(name: impl Into<StockName>, kind_stocked: impl Into<EntityKind>) -> Self {
        Self {
            name: name.into(),
            kind_stocked: kind_stocked.into(),
            contents: RefCell::new(VecDeque::new()),
        }
    }
}

impl Stock for FifoStock {
    fn name(&self) -> &StockName {
        &self.name
    }

    fn kind_stocked(&self) -> &EntityKind {
        &self.kind_stocked
    }

    fn count(&self) -> usize {
        self.contents.borrow().len()
    }

    fn entities_in_stock(&self) -> Vec<Entity> {
        self.contents.borrow().iter().cloned().collect()
    }
}

impl SourceStock for FifoStock {
    fn remove(&self) -> Option<Entity> {
        self.contents.borrow_mut().pop_front()
    }
}

impl SinkStock for FifoStock {
    fn add(&self, entity: Entity) -> Result<(), StockError> {
        check_kind(&self.name, &self.kind_stocked, &entity)?;
        self.contents.borrow_mut().push_back(entity);
        Ok(())
    }
}

/// Identity-indexed stock backend: O(1) average add and targeted removal,
/// unordered iteration.
#[derive(Debug)]
pub struct SetStock {
    name: StockName,
    kind_stocked: EntityKind,
    contents: RefCell<HashMap<Uuid, Entity>>,
}

impl SetStock {
    pub fn new(name: impl Into<StockName>, kind_stocked: impl Into<EntityKind>) -> Self {
        Self {
            name: name.into(),
            kind_stocked: kind_stocked.into(),
            contents: RefCell::new(HashMap::new()),
        }
    }

    /// Remove one specific entity if present, else `None`. Used when the
    /// caller already holds the exact entity to retract, e.g. retiring one
    /// named replica out of the active pool.
    pub fn remove_entity(&self, target: &Entity) -> Option<Entity> {
        self.contents.borrow_mut().remove(&target.id())
    }
}

impl Stock for SetStock {
    fn name(&self) -> &StockName {
        &self.name
    }

    fn kind_stocked(&self) -> &EntityKind {
        &self.kind_stocked
    }

    fn count(&self) -> usize {
        self.contents.borrow().len()
    }

    fn entities_in_stock(&self) -> Vec<Entity> {
        self.contents.borrow().values().cloned().collect()
    }
}

impl SourceStock for SetStock {
    fn remove(&self) -> Option<Entity> {
        let mut contents = self.contents.borrow_mut();
        let id = contents.keys().next().copied()?;
        contents.remove(&id)
    }
}

impl SinkStock for SetStock {
    fn add(&self, entity: Entity) -> Result<(), StockError> {
        check_kind(&self.name, &self.kind_stocked, &entity)?;
        self.contents.borrow_mut().insert(entity.id(), entity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityFactory;

    fn factory() -> EntityFactory {
        EntityFactory::new(7)
    }

    #[test]
    fn fifo_preserves_arrival_order() {
        let mut factory = factory();
        let stock = FifoStock::new("backlog", "Request");

        let first = factory.sequenced("request", "Request");
        let second = factory.sequenced("request", "Request");
        let third = factory.sequenced("request", "Request");
        stock.add(first.clone()).unwrap();
        stock.add(second).unwrap();
        stock.add(third).unwrap();

        assert_eq!(stock.count(), 3);
        assert_eq!(stock.remove(), Some(first));
        assert_eq!(stock.count(), 2);
        assert_eq!(stock.count(), stock.entities_in_stock().len());
    }

    #[test]
    fn fifo_rejects_kind_mismatch() {
        let mut factory = factory();
        let stock = FifoStock::new("backlog", "Request");
        let replica = factory.entity("replica-0", "Replica");

        let err = stock.add(replica).unwrap_err();
        assert!(matches!(err, StockError::KindMismatch { .. }));
        assert_eq!(stock.count(), 0);
    }

    #[test]
    fn empty_stocks_remove_none() {
        let fifo = FifoStock::new("empty", "Request");
        let set = SetStock::new("empty", "Replica");
        assert_eq!(fifo.remove(), None);
        assert_eq!(set.remove(), None);
    }

    #[test]
    fn set_removes_by_identity() {
        let mut factory = factory();
        let stock = SetStock::new("active", "Replica");

        let a = factory.sequenced("replica", "Replica");
        let b = factory.sequenced("replica", "Replica");
        let c = factory.sequenced("replica", "Replica");
        for entity in [&a, &b, &c] {
            stock.add(entity.clone()).unwrap();
        }

        // Retract the middle one by reference, out of order.
        assert_eq!(stock.remove_entity(&b), Some(b.clone()));
        assert_eq!(stock.remove_entity(&b), None);
        assert_eq!(stock.count(), 2);

        let remaining = stock.entities_in_stock();
        assert!(remaining.contains(&a));
        assert!(remaining.contains(&c));
    }

    #[test]
    fn set_untargeted_remove_yields_some_member() {
        let mut factory = factory();
        let stock = SetStock::new("active", "Replica");
        let a = factory.sequenced("replica", "Replica");
        let b = factory.sequenced("replica", "Replica");
        stock.add(a.clone()).unwrap();
        stock.add(b.clone()).unwrap();

        let removed = stock.remove().unwrap();
        assert!(removed == a || removed == b);
        assert_eq!(stock.count(), 1);
    }

    #[test]
    fn set_dedupes_on_identity() {
        let mut factory = factory();
        let stock = SetStock::new("active", "Replica");
        let a = factory.sequenced("replica", "Replica");
        stock.add(a.clone()).unwrap();
        stock.add(a.clone()).unwrap();
        assert_eq!(stock.count(), 1);
    }
}
