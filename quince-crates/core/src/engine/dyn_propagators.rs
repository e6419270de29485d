use crate::containers::KeyedVec;
use crate::propagation::PropagatorId;
use crate::quince_assert_advanced;

/// The propagators added during search, each stamped with a world index.
///
/// An entry whose stamp is at least the current world was (re-)added in a world that is either
/// the current one or one that has since been abandoned; such a propagator must be propagated
/// from scratch before anything else. [`DynPropagators::descending`] yields those entries and
/// re-stamps them with the current world.
///
/// Stamps are kept non-decreasing from the first to the last entry, so the scan in
/// [`DynPropagators::descending`] can stop at the first entry stamped below the current world.
#[derive(Debug, Clone, Default)]
pub(crate) struct DynPropagators {
    elements: Vec<PropagatorId>,
    stamps: Vec<usize>,
    positions: KeyedVec<PropagatorId, Option<usize>>,
}

impl DynPropagators {
    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    pub(crate) fn contains(&self, propagator: PropagatorId) -> bool {
        self.positions
            .get(propagator)
            .is_some_and(|position| position.is_some())
    }

    /// Appends `propagator` stamped with `world`.
    ///
    /// If a later world is still recorded at the end of the registry, the new entry takes that
    /// stamp instead; it is reported by the next scan either way.
    pub(crate) fn add(&mut self, propagator: PropagatorId, world: usize) {
        quince_assert_advanced!(!self.contains(propagator));

        let stamp = self.stamps.last().map_or(world, |&last| last.max(world));

        self.positions.accomodate(propagator, None);
        self.positions[propagator] = Some(self.elements.len());
        self.elements.push(propagator);
        self.stamps.push(stamp);
    }

    /// Moves `propagator` to the end of the registry with a fresh stamp.
    pub(crate) fn add_or_update(&mut self, propagator: PropagatorId, world: usize) {
        self.remove(propagator);
        self.add(propagator, world);
    }

    /// Removes `propagator` if present, preserving the order of the remaining entries.
    pub(crate) fn remove(&mut self, propagator: PropagatorId) {
        let Some(position) = self.positions.get(propagator).copied().flatten() else {
            return;
        };

        let _ = self.elements.remove(position);
        let _ = self.stamps.remove(position);
        self.positions[propagator] = None;

        for (shifted, &moved) in self.elements.iter().enumerate().skip(position) {
            self.positions[moved] = Some(shifted);
        }
    }

    /// Calls `accept` on every entry stamped with `world` or later, from the last entry backwards,
    /// and re-stamps those entries with `world`.
    pub(crate) fn descending(&mut self, world: usize, mut accept: impl FnMut(PropagatorId)) {
        for index in (0..self.elements.len()).rev() {
            if self.stamps[index] < world {
                break;
            }
            accept(self.elements[index]);
            self.stamps[index] = world;
        }
    }

    pub(crate) fn clear(&mut self) {
        for &propagator in self.elements.iter() {
            self.positions[propagator] = None;
        }
        self.elements.clear();
        self.stamps.clear();
    }
}
