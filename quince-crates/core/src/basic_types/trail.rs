use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::quince_assert_simple;

/// An append-only sequence of values partitioned into levels.
///
/// Level `0` is the root; [`Trail::new_checkpoint`] opens the next level. Backtracking with
/// [`Trail::synchronise`] hands back the values of the abandoned levels, most recent first, so
/// the caller can undo them.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_checkpoint: usize,
    /// At index i is the position where the i-th level ends (exclusive) on the trail
    trail_delimiter: Vec<usize>,
    trail: Vec<T>,
}

// Implemented by hand to avoid imposing `Default` on `T`.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_checkpoint: 0,
            trail_delimiter: Vec::new(),
            trail: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.current_checkpoint += 1;
        self.trail_delimiter.push(self.trail.len());
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    /// The position on the trail at which `checkpoint` starts.
    pub(crate) fn checkpoint_start(&self, checkpoint: usize) -> usize {
        quince_assert_simple!(checkpoint <= self.current_checkpoint);
        if checkpoint == 0 {
            0
        } else {
            self.trail_delimiter[checkpoint - 1]
        }
    }

    pub(crate) fn values_at_checkpoint(&self, checkpoint: usize) -> &[T] {
        let start = self.checkpoint_start(checkpoint);
        let end = if checkpoint == self.current_checkpoint {
            self.trail.len()
        } else {
            self.trail_delimiter[checkpoint]
        };

        &self.trail[start..end]
    }

    /// Returns to `new_checkpoint`, yielding the removed values in reverse order of insertion.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> Rev<Drain<'_, T>> {
        quince_assert_simple!(new_checkpoint < self.current_checkpoint);

        let new_trail_len = self.trail_delimiter[new_checkpoint];

        self.current_checkpoint = new_checkpoint;
        self.trail_delimiter.truncate(new_checkpoint);
        self.trail.drain(new_trail_len..).rev()
    }

    pub(crate) fn push(&mut self, elem: T) {
        self.trail.push(elem)
    }

    pub(crate) fn clear(&mut self) {
        self.current_checkpoint = 0;
        self.trail_delimiter.clear();
        self.trail.clear();
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.trail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_pushed_at_the_root_survive_every_backtrack() {
        let mut trail = Trail::default();
        trail.push('a');

        trail.new_checkpoint();
        trail.push('b');
        trail.new_checkpoint();
        trail.push('c');

        let _ = trail.synchronise(0);

        assert_eq!(&['a'], trail.deref());
        assert_eq!(0, trail.get_checkpoint());
    }

    #[test]
    fn synchronise_yields_the_undone_values_most_recent_first() {
        let mut trail = Trail::default();
        trail.new_checkpoint();
        trail.push(10);
        trail.push(11);
        trail.new_checkpoint();
        trail.push(20);

        let undone = trail.synchronise(0).collect::<Vec<_>>();

        assert_eq!(vec![20, 11, 10], undone);
        assert!(trail.is_empty());
    }

    #[test]
    fn empty_levels_are_tracked() {
        let mut trail = Trail::default();
        trail.push(1);
        trail.new_checkpoint();
        trail.new_checkpoint();
        trail.push(2);

        assert_eq!(&[1], trail.values_at_checkpoint(0));
        assert!(trail.values_at_checkpoint(1).is_empty());
        assert_eq!(&[2], trail.values_at_checkpoint(2));
        assert_eq!(1, trail.checkpoint_start(2));

        let _ = trail.synchronise(1);
        assert_eq!(&[1], trail.deref());
        assert_eq!(1, trail.get_checkpoint());
    }

    #[test]
    fn clear_returns_to_the_root() {
        let mut trail = Trail::default();
        trail.new_checkpoint();
        trail.push(4);
        trail.clear();

        assert_eq!(0, trail.get_checkpoint());
        assert!(trail.is_empty());
    }
}
