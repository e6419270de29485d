use std::collections::VecDeque;

use crate::containers::KeyedVec;
use crate::propagation::Priority;
use crate::propagation::PropagatorId;
use crate::quince_assert_moderate;
use crate::quince_assert_simple;

/// The largest number of priority levels, bounded by the width of the not-empty mask.
pub(crate) const MAX_PRIORITIES: u8 = u32::BITS as u8;

/// One FIFO queue per priority, plus a bitmask telling which queues are non-empty.
///
/// Popping always serves the lowest non-empty priority, found with a single bit scan. Within a
/// priority, propagators leave in the order they arrived. A propagator is in at most one queue
/// at a time; enqueueing it again is a no-op.
#[derive(Debug, Clone)]
pub(crate) struct PriorityQueueBank {
    queues: Vec<VecDeque<PropagatorId>>,
    not_empty: u32,
    is_enqueued: KeyedVec<PropagatorId, bool>,
    num_enqueued: usize,
}

impl Default for PriorityQueueBank {
    fn default() -> Self {
        Self::new(7)
    }
}

impl PriorityQueueBank {
    pub(crate) fn new(num_priorities: u8) -> PriorityQueueBank {
        quince_assert_simple!(num_priorities >= 1 && num_priorities <= MAX_PRIORITIES);
        PriorityQueueBank {
            queues: vec![VecDeque::new(); num_priorities as usize],
            not_empty: 0,
            is_enqueued: KeyedVec::default(),
            num_enqueued: 0,
        }
    }

    pub(crate) fn num_priorities(&self) -> usize {
        self.queues.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.not_empty == 0
    }

    pub(crate) fn len(&self) -> usize {
        self.num_enqueued
    }

    pub(crate) fn is_enqueued(&self, propagator: PropagatorId) -> bool {
        self.is_enqueued
            .get(propagator)
            .copied()
            .unwrap_or_default()
    }

    /// Appends the propagator to the queue of its priority. Returns `false` if it was already
    /// queued.
    pub(crate) fn enqueue(&mut self, propagator: PropagatorId, priority: Priority) -> bool {
        quince_assert_moderate!(priority.index() < self.queues.len());

        if self.is_enqueued(propagator) {
            return false;
        }

        self.is_enqueued.accomodate(propagator, false);
        self.is_enqueued[propagator] = true;
        self.num_enqueued += 1;

        self.queues[priority.index()].push_back(propagator);
        self.not_empty |= 1 << priority.index();
        true
    }

    /// The lowest priority with a non-empty queue.
    pub(crate) fn next_not_empty(&self) -> Option<usize> {
        if self.not_empty == 0 {
            None
        } else {
            Some(self.not_empty.trailing_zeros() as usize)
        }
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let priority = self.next_not_empty()?;
        let queue = &mut self.queues[priority];
        let propagator = queue.pop_front()?;

        if queue.is_empty() {
            self.not_empty &= !(1 << priority);
        }
        self.is_enqueued[propagator] = false;
        self.num_enqueued -= 1;

        Some(propagator)
    }

    /// Takes the propagator out of whichever queue it is in.
    pub(crate) fn remove(&mut self, propagator: PropagatorId) {
        if !self.is_enqueued(propagator) {
            return;
        }

        for (priority, queue) in self.queues.iter_mut().enumerate() {
            if let Some(position) = queue.iter().position(|&queued| queued == propagator) {
                let _ = queue.remove(position);
                if queue.is_empty() {
                    self.not_empty &= !(1 << priority);
                }
                break;
            }
        }

        self.is_enqueued[propagator] = false;
        self.num_enqueued -= 1;
    }

    pub(crate) fn clear(&mut self) {
        while let Some(priority) = self.next_not_empty() {
            for propagator in self.queues[priority].drain(..) {
                self.is_enqueued[propagator] = false;
            }
            self.not_empty &= !(1 << priority);
        }

        self.num_enqueued = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_priorities_are_served_first() {
        let mut queue = PriorityQueueBank::default();

        let _ = queue.enqueue(PropagatorId(1), Priority::CUBIC);
        let _ = queue.enqueue(PropagatorId(0), Priority::BINARY);
        let _ = queue.enqueue(PropagatorId(3), Priority::VERY_SLOW);
        let _ = queue.enqueue(PropagatorId(4), Priority::UNARY);

        assert_eq!(Some(0), queue.next_not_empty());
        assert_eq!(Some(PropagatorId(4)), queue.pop());
        assert_eq!(Some(PropagatorId(0)), queue.pop());
        assert_eq!(Some(PropagatorId(1)), queue.pop());
        assert_eq!(Some(PropagatorId(3)), queue.pop());
        assert_eq!(None, queue.pop());
        assert!(queue.is_empty());
    }

    #[test]
    fn same_priority_is_first_in_first_out() {
        let mut queue = PriorityQueueBank::new(2);

        let _ = queue.enqueue(PropagatorId(5), Priority::BINARY);
        let _ = queue.enqueue(PropagatorId(2), Priority::BINARY);
        let _ = queue.enqueue(PropagatorId(9), Priority::BINARY);

        assert_eq!(Some(PropagatorId(5)), queue.pop());
        assert_eq!(Some(PropagatorId(2)), queue.pop());
        assert_eq!(Some(PropagatorId(9)), queue.pop());
    }

    #[test]
    fn enqueueing_twice_is_idempotent() {
        let mut queue = PriorityQueueBank::default();

        assert!(queue.enqueue(PropagatorId(0), Priority::LINEAR));
        assert!(!queue.enqueue(PropagatorId(0), Priority::LINEAR));
        assert_eq!(1, queue.len());

        let _ = queue.pop();
        assert!(!queue.is_enqueued(PropagatorId(0)));
        assert!(queue.enqueue(PropagatorId(0), Priority::LINEAR));
    }

    #[test]
    fn popping_the_last_element_clears_the_bit() {
        let mut queue = PriorityQueueBank::default();
        let _ = queue.enqueue(PropagatorId(0), Priority::TERNARY);
        let _ = queue.enqueue(PropagatorId(1), Priority::QUADRATIC);

        let _ = queue.pop();
        assert_eq!(Some(Priority::QUADRATIC.index()), queue.next_not_empty());
    }

    #[test]
    fn removal_and_clear_forget_membership() {
        let mut queue = PriorityQueueBank::default();
        let _ = queue.enqueue(PropagatorId(0), Priority::UNARY);
        let _ = queue.enqueue(PropagatorId(1), Priority::UNARY);
        let _ = queue.enqueue(PropagatorId(2), Priority::CUBIC);

        queue.remove(PropagatorId(0));
        assert_eq!(2, queue.len());
        assert_eq!(Some(PropagatorId(1)), queue.pop());

        queue.clear();
        assert!(queue.is_empty());
        assert!(!queue.is_enqueued(PropagatorId(2)));
        assert_eq!(None, queue.pop());
    }
}
