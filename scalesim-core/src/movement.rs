//! Movements: scheduled, timed transfers of one entity between stocks.

use crate::entity::Entity;
use crate::stock::{SinkStock, SourceStock};
use crate::time::SimTime;
use crate::types::MovementKind;
use std::fmt;
use std::rc::Rc;

/// A record describing the timed transfer of one entity from a source stock
/// to a sink stock.
///
/// Movements are created fresh for every scheduling decision and never reused
/// or edited after enqueue; the one exception is `notes`, an append-only
/// audit trail that never drives control flow. `occurs_at` is the sole
/// ordering key and may be rewritten only by the queue's collision
/// resolution, before the movement is committed to the heap.
#[derive(Clone)]
pub struct Movement {
    kind: MovementKind,
    occurs_at: SimTime,
    from: Rc<dyn SourceStock>,
    to: Rc<dyn SinkStock>,
    bound_entity: Option<Entity>,
    notes: Vec<String>,
}

impl Movement {
    pub fn new(
        kind: impl Into<MovementKind>,
        occurs_at: SimTime,
        from: Rc<dyn SourceStock>,
        to: Rc<dyn SinkStock>,
    ) -> Self {
        Self {
            kind: kind.into(),
            occurs_at,
            from,
            to,
            bound_entity: None,
            notes: Vec::new(),
        }
    }

    /// Bind a specific entity known at schedule time, so the engine does not
    /// re-derive which entity moves by draining the source at execution.
    #[must_use]
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.bound_entity = Some(entity);
        self
    }

    pub fn kind(&self) -> &MovementKind {
        &self.kind
    }

    pub fn occurs_at(&self) -> SimTime {
        self.occurs_at
    }

    pub fn from_stock(&self) -> &Rc<dyn SourceStock> {
        &self.from
    }

    pub fn to_stock(&self) -> &Rc<dyn SinkStock> {
        &self.to
    }

    pub fn bound_entity(&self) -> Option<&Entity> {
        self.bound_entity.as_ref()
    }

    /// Append an audit note. Notes are kept in append order.
    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Rewrite the execution instant. Collision resolution only.
    pub(crate) fn shift_to(&mut self, occurs_at: SimTime) {
        self.occurs_at = occurs_at;
    }
}

impl PartialEq for Movement {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.occurs_at == other.occurs_at
            && Rc::ptr_eq(&self.from, &other.from)
            && Rc::ptr_eq(&self.to, &other.to)
            && self.bound_entity == other.bound_entity
            && self.notes == other.notes
    }
}

impl fmt::Debug for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Movement")
            .field("kind", &self.kind)
            .field("occurs_at", &self.occurs_at)
            .field("from", self.from.name())
            .field("to", self.to.name())
            .field("bound_entity", &self.bound_entity)
            .field("notes", &self.notes)
            .finish()
    }
}
