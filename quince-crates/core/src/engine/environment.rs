use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// A reversible integer cell of an [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailedInteger {
    id: u32,
}

impl StorageKey for TrailedInteger {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}

#[derive(Debug, Clone, Copy)]
struct TrailedChange {
    old_value: i64,
    reference: TrailedInteger,
}

/// Backtrackable memory organised in worlds.
///
/// [`Environment::world_push`] opens a new world; [`Environment::world_pop`] abandons it and
/// restores every [`TrailedInteger`] to the value it had when the world was opened. The current
/// world index is what the engine uses to stamp propagators added during search.
#[derive(Default, Debug, Clone)]
pub struct Environment {
    trail: Trail<TrailedChange>,
    values: KeyedVec<TrailedInteger, i64>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment::default()
    }

    /// The depth of the current world; the root world has index `0`.
    pub fn world_index(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub fn world_push(&mut self) {
        self.trail.new_checkpoint()
    }

    /// Abandons the current world. Does nothing at the root.
    pub fn world_pop(&mut self) {
        let world = self.world_index();
        if world > 0 {
            self.world_pop_until(world - 1);
        }
    }

    /// Abandons every world deeper than `world`.
    pub fn world_pop_until(&mut self, world: usize) {
        if world >= self.world_index() {
            return;
        }
        self.trail
            .synchronise(world)
            .for_each(|change| self.values[change.reference] = change.old_value)
    }

    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.values.push(initial_value)
    }

    pub fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.values[trailed_integer]
    }

    pub fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let old_value = self.values[trailed_integer];
        if old_value == value {
            return;
        }
        self.trail.push(TrailedChange {
            old_value,
            reference: trailed_integer,
        });
        self.values[trailed_integer] = value;
    }

    pub fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.assign(trailed_integer, self.values[trailed_integer] + addition);
    }
}
