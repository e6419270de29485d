use super::KeyedVec;
use super::StorageKey;
use crate::quince_assert_moderate;
use crate::quince_assert_simple;

const NOT_PRESENT: usize = usize::MAX;

/// A binary min-heap over dense keys, ordered by a comparator supplied on every call.
///
/// Next to the heap array the structure keeps, for every key, its slot in the heap (or a
/// sentinel when the key is absent). This allows [`IndexHeap::decrease`] and
/// [`IndexHeap::increase`] to percolate a key from where it currently is after its ordering
/// value changed, without removing and re-inserting it.
///
/// The comparator `less(a, b)` must be a strict weak ordering and must stay consistent between
/// calls for every key whose value did not change. Typically it reads an activity table owned by
/// the caller, which is why the heap does not store it.
#[derive(Debug, Clone)]
pub struct IndexHeap<Key> {
    heap: Vec<Key>,
    positions: KeyedVec<Key, usize>,
}

impl<Key> Default for IndexHeap<Key> {
    fn default() -> Self {
        IndexHeap {
            heap: Vec::new(),
            positions: KeyedVec::default(),
        }
    }
}

impl<Key: StorageKey> IndexHeap<Key> {
    pub fn new() -> IndexHeap<Key> {
        IndexHeap::default()
    }

    /// Creates a heap whose position table already covers the keys `0..num_keys`.
    pub fn with_capacity(num_keys: usize) -> IndexHeap<Key> {
        let mut heap = IndexHeap {
            heap: Vec::with_capacity(num_keys),
            positions: KeyedVec::default(),
        };
        heap.positions.resize(num_keys, NOT_PRESENT);
        heap
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, key: Key) -> bool {
        self.positions
            .get(key)
            .is_some_and(|&position| position != NOT_PRESENT)
    }

    /// The minimum key, without removing it.
    pub fn peek_min(&self) -> Option<Key> {
        self.heap.first().copied()
    }

    /// Iterate over the keys in heap order (not sorted).
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.heap.iter().copied()
    }

    pub fn insert(&mut self, key: Key, less: impl Fn(Key, Key) -> bool) {
        quince_assert_simple!(!self.contains(key), "the key is already in the heap");
        self.positions.accomodate(key, NOT_PRESENT);

        self.positions[key] = self.heap.len();
        self.heap.push(key);
        self.sift_up(self.heap.len() - 1, &less);
    }

    /// Removes and returns the minimum key.
    pub fn remove_min(&mut self, less: impl Fn(Key, Key) -> bool) -> Option<Key> {
        let min = *self.heap.first()?;
        self.remove_at(0, &less);
        Some(min)
    }

    /// Removes an arbitrary key; does nothing if the key is absent.
    pub fn remove(&mut self, key: Key, less: impl Fn(Key, Key) -> bool) {
        if self.contains(key) {
            let position = self.positions[key];
            self.remove_at(position, &less);
        }
    }

    /// Restores the heap after the ordering value of `key` moved towards the minimum.
    pub fn decrease(&mut self, key: Key, less: impl Fn(Key, Key) -> bool) {
        quince_assert_simple!(self.contains(key));
        let position = self.positions[key];
        self.sift_up(position, &less);
    }

    /// Restores the heap after the ordering value of `key` moved away from the minimum.
    pub fn increase(&mut self, key: Key, less: impl Fn(Key, Key) -> bool) {
        quince_assert_simple!(self.contains(key));
        let position = self.positions[key];
        self.sift_down(position, &less);
    }

    /// Inserts `key` if absent, otherwise re-positions it in whichever direction is needed.
    pub fn update(&mut self, key: Key, less: impl Fn(Key, Key) -> bool) {
        if !self.contains(key) {
            self.insert(key, less);
        } else {
            let position = self.positions[key];
            let position = self.sift_up(position, &less);
            let _ = self.sift_down(position, &less);
        }
    }

    /// Replaces the content of the heap by `keys`, heapifying bottom-up in linear time.
    pub fn build(&mut self, keys: impl IntoIterator<Item = Key>, less: impl Fn(Key, Key) -> bool) {
        self.clear();

        for key in keys {
            quince_assert_simple!(!self.contains(key), "duplicate key in build");
            self.positions.accomodate(key, NOT_PRESENT);
            self.positions[key] = self.heap.len();
            self.heap.push(key);
        }

        for position in (0..self.heap.len() / 2).rev() {
            let _ = self.sift_down(position, &less);
        }

        quince_assert_moderate!(self.is_heap(&less));
    }

    pub fn clear(&mut self) {
        for &key in self.heap.iter() {
            self.positions[key] = NOT_PRESENT;
        }
        self.heap.clear();
    }

    fn remove_at(&mut self, position: usize, less: &impl Fn(Key, Key) -> bool) {
        let removed = self.heap[position];
        self.positions[removed] = NOT_PRESENT;
        let Some(last) = self.heap.pop() else {
            return;
        };

        if position < self.heap.len() {
            self.heap[position] = last;
            self.positions[last] = position;
            let position = self.sift_up(position, less);
            let _ = self.sift_down(position, less);
        }
    }

    /// Moves the key at `position` towards the root; returns its final position.
    fn sift_up(&mut self, mut position: usize, less: &impl Fn(Key, Key) -> bool) -> usize {
        let key = self.heap[position];

        while position > 0 {
            let parent = (position - 1) / 2;
            if !less(key, self.heap[parent]) {
                break;
            }
            self.heap[position] = self.heap[parent];
            self.positions[self.heap[position]] = position;
            position = parent;
        }

        self.heap[position] = key;
        self.positions[key] = position;
        position
    }

    /// Moves the key at `position` towards the leaves; returns its final position.
    fn sift_down(&mut self, mut position: usize, less: &impl Fn(Key, Key) -> bool) -> usize {
        let key = self.heap[position];

        loop {
            let left = 2 * position + 1;
            if left >= self.heap.len() {
                break;
            }
            let right = left + 1;
            let child = if right < self.heap.len() && less(self.heap[right], self.heap[left]) {
                right
            } else {
                left
            };

            if !less(self.heap[child], key) {
                break;
            }
            self.heap[position] = self.heap[child];
            self.positions[self.heap[position]] = position;
            position = child;
        }

        self.heap[position] = key;
        self.positions[key] = position;
        position
    }

    fn is_heap(&self, less: &impl Fn(Key, Key) -> bool) -> bool {
        (1..self.heap.len())
            .all(|position| !less(self.heap[position], self.heap[(position - 1) / 2]))
            && self
                .heap
                .iter()
                .enumerate()
                .all(|(position, &key)| self.positions[key] == position)
    }
}
