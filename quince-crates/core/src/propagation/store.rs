use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

use super::Propagator;
use super::PropagatorId;
use crate::containers::KeyedVec;
use crate::variables::VariableStore;

/// The owner of the propagators of a model.
///
/// Propagators live here for the lifetime of the model; the engine refers to them by
/// [`PropagatorId`] only.
pub struct PropagatorStore<V> {
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator<V>>>,
}

/// A typed wrapper around a [`PropagatorId`] that allows retrieving concrete propagators from the
/// [`PropagatorStore`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PropagatorHandle<P> {
    id: PropagatorId,
    propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    /// Get a type-erased handle to the propagator.
    pub fn id(self) -> PropagatorId {
        self.id
    }
}

impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}

impl<V> Default for PropagatorStore<V> {
    fn default() -> Self {
        PropagatorStore {
            propagators: KeyedVec::default(),
        }
    }
}

impl<V: VariableStore + 'static> PropagatorStore<V> {
    pub fn new() -> PropagatorStore<V> {
        PropagatorStore::default()
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    pub fn contains(&self, id: PropagatorId) -> bool {
        self.propagators.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = PropagatorId> {
        self.propagators.keys()
    }

    pub fn add<P: Propagator<V>>(&mut self, propagator: P) -> PropagatorHandle<P> {
        let id = self.propagators.push(Box::new(propagator));
        PropagatorHandle {
            id,
            propagator: PhantomData,
        }
    }

    /// Get a reference to the propagator identified by the given handle.
    pub fn get<P: Propagator<V>>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self[handle.id].downcast_ref()
    }

    pub fn get_mut<P: Propagator<V>>(&mut self, handle: PropagatorHandle<P>) -> Option<&mut P> {
        self[handle.id].downcast_mut()
    }
}

impl<V: VariableStore + 'static> Index<PropagatorId> for PropagatorStore<V> {
    type Output = dyn Propagator<V>;

    fn index(&self, index: PropagatorId) -> &Self::Output {
        self.propagators[index].as_ref()
    }
}

impl<V: VariableStore + 'static> IndexMut<PropagatorId> for PropagatorStore<V> {
    fn index_mut(&mut self, index: PropagatorId) -> &mut Self::Output {
        self.propagators[index].as_mut()
    }
}

impl<V: VariableStore + 'static> Debug for PropagatorStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.propagators.iter().map(|propagator| propagator.name()))
            .finish()
    }
}
