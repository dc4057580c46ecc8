//! Time-ordered queue over pending movements.
//!
//! [`MovementPriorityQueue`] hands movements out one at a time, earliest
//! first, to a single consumer, and guarantees that no two pending movements
//! ever share an execution instant: a movement submitted for an occupied
//! instant is nudged forward one tick at a time until a free instant is
//! found, preserving relative submission order among colliding movements.
//! Collisions are therefore never an error path and no admitted movement is
//! ever silently dropped over timing.
//!
//! The kernel is single-threaded, so this is a plain binary heap plus a hash
//! set for O(1) occupancy checks; pop order is governed by the earliest-first
//! comparator, never by the occupancy key.

use crate::error::QueueError;
use crate::movement::Movement;
use crate::time::SimTime;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use tracing::trace;

/// Outcome of a successful enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    /// The instant the movement will actually execute at.
    pub occurs_at: SimTime,
    /// Whether collision resolution moved it off the requested instant.
    pub shifted: bool,
}

#[derive(Debug)]
struct PendingMovement {
    // Insertion sequence keeps the ordering total; committed instants are
    // unique, so it never decides pop order.
    sequence: u64,
    movement: Movement,
}

impl PartialEq for PendingMovement {
    fn eq(&self, other: &Self) -> bool {
        self.movement.occurs_at() == other.movement.occurs_at() && self.sequence == other.sequence
    }
}

impl Eq for PendingMovement {}

impl PartialOrd for PendingMovement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingMovement {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior in BinaryHeap.
        (other.movement.occurs_at(), other.sequence).cmp(&(self.movement.occurs_at(), self.sequence))
    }
}

/// Strict time-order over not-yet-executed movements, with deterministic
/// collision resolution and a one-way close latch.
#[derive(Debug, Default)]
pub struct MovementPriorityQueue {
    heap: BinaryHeap<PendingMovement>,
    occupied: HashSet<SimTime>,
    next_sequence: u64,
    closed: bool,
}

impl MovementPriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a movement, resolving timestamp collisions by probing forward
    /// one tick at a time from the requested instant. Reports the final
    /// instant and whether a shift occurred.
    ///
    /// # Errors
    ///
    /// [`QueueError::Closed`] if the queue has been closed.
    pub fn enqueue(&mut self, mut movement: Movement) -> Result<Scheduled, QueueError> {
        if self.closed {
            return Err(QueueError::Closed);
        }

        let requested = movement.occurs_at();
        let mut occurs_at = requested;
        while self.occupied.contains(&occurs_at) {
            occurs_at = occurs_at.next_tick();
        }

        let shifted = occurs_at != requested;
        if shifted {
            trace!(
                kind = %movement.kind(),
                requested = %requested,
                scheduled = %occurs_at,
                "shifted movement off an occupied instant"
            );
            movement.shift_to(occurs_at);
            movement.add_note(format!("collision shift: {requested} -> {occurs_at}"));
        }

        self.occupied.insert(occurs_at);
        self.heap.push(PendingMovement {
            sequence: self.next_sequence,
            movement,
        });
        self.next_sequence += 1;

        Ok(Scheduled { occurs_at, shifted })
    }

    /// Remove and return the earliest pending movement.
    ///
    /// Returns `Ok(None)` once the queue is closed; the queue is not
    /// reusable after that.
    ///
    /// # Errors
    ///
    /// [`QueueError::Drained`] if the queue is open but empty.
    pub fn dequeue(&mut self) -> Result<Option<Movement>, QueueError> {
        if self.closed {
            return Ok(None);
        }
        match self.heap.pop() {
            Some(pending) => {
                self.occupied.remove(&pending.movement.occurs_at());
                Ok(Some(pending.movement))
            }
            None => Err(QueueError::Drained),
        }
    }

    /// Close the queue. One-way latch.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Remove and return every pending movement, earliest first, bypassing
    /// the closed latch. Lets the engine account for movements stranded in
    /// the queue when the halt movement closed it, so that every admitted
    /// movement ends up in exactly one result log.
    pub fn drain_pending(&mut self) -> Vec<Movement> {
        let mut stranded = Vec::with_capacity(self.heap.len());
        while let Some(pending) = self.heap.pop() {
            self.occupied.remove(&pending.movement.occurs_at());
            stranded.push(pending.movement);
        }
        stranded
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::FifoStock;
    use std::rc::Rc;

    fn movement(kind: &str, at: SimTime) -> Movement {
        let from = Rc::new(FifoStock::new("from", "Request"));
        let to = Rc::new(FifoStock::new("to", "Request"));
        Movement::new(kind, at, from, to)
    }

    #[test]
    fn dequeues_earliest_first() {
        let mut queue = MovementPriorityQueue::new();
        queue.enqueue(movement("late", SimTime::from_secs(30))).unwrap();
        queue.enqueue(movement("early", SimTime::from_secs(10))).unwrap();
        queue.enqueue(movement("middle", SimTime::from_secs(20))).unwrap();

        let order: Vec<String> = std::iter::from_fn(|| queue.dequeue().ok().flatten())
            .map(|m| m.kind().to_string())
            .collect();
        assert_eq!(order, ["early", "middle", "late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn colliding_instants_shift_forward_in_submission_order() {
        let mut queue = MovementPriorityQueue::new();
        let at = SimTime::from_secs(5);

        let first = queue.enqueue(movement("a", at)).unwrap();
        assert_eq!(first, Scheduled { occurs_at: at, shifted: false });

        let second = queue.enqueue(movement("b", at)).unwrap();
        assert_eq!(second, Scheduled { occurs_at: at.next_tick(), shifted: true });

        // A third collider probes past both occupied instants.
        let third = queue.enqueue(movement("c", at)).unwrap();
        assert_eq!(third.occurs_at, at.next_tick().next_tick());

        let a = queue.dequeue().unwrap().unwrap();
        assert_eq!(a.kind().as_str(), "a");
        assert!(a.notes().is_empty());

        let b = queue.dequeue().unwrap().unwrap();
        assert_eq!(b.kind().as_str(), "b");
        assert_eq!(b.occurs_at(), at.next_tick());
        assert_eq!(b.notes().len(), 1);
    }

    #[test]
    fn vacated_instants_become_free_again() {
        let mut queue = MovementPriorityQueue::new();
        let at = SimTime::from_secs(5);
        queue.enqueue(movement("a", at)).unwrap();
        queue.dequeue().unwrap().unwrap();

        // The instant was vacated by execution, so no shift happens.
        let again = queue.enqueue(movement("b", at)).unwrap();
        assert!(!again.shifted);
    }

    #[test]
    fn drained_open_queue_is_an_error() {
        let mut queue = MovementPriorityQueue::new();
        assert_eq!(queue.dequeue(), Err(QueueError::Drained));
    }

    #[test]
    fn drain_pending_empties_a_closed_queue_in_time_order() {
        let mut queue = MovementPriorityQueue::new();
        queue.enqueue(movement("late", SimTime::from_secs(9))).unwrap();
        queue.enqueue(movement("early", SimTime::from_secs(3))).unwrap();
        queue.close();

        let stranded: Vec<String> = queue
            .drain_pending()
            .into_iter()
            .map(|m| m.kind().to_string())
            .collect();
        assert_eq!(stranded, ["early", "late"]);
        assert!(queue.is_empty());

        // Vacated instants are released too.
        assert_eq!(queue.drain_pending().len(), 0);
    }

    #[test]
    fn close_is_a_one_way_latch() {
        let mut queue = MovementPriorityQueue::new();
        queue.enqueue(movement("pending", SimTime::from_secs(1))).unwrap();
        assert!(!queue.is_closed());

        queue.close();
        assert!(queue.is_closed());
        // Closed queues dequeue nothing, even with movements still pending.
        assert_eq!(queue.dequeue().unwrap().map(|m| m.kind().to_string()), None);
        assert!(matches!(
            queue.enqueue(movement("late", SimTime::from_secs(2))),
            Err(QueueError::Closed)
        ));
    }
}
