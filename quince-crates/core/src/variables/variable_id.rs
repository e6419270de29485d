use crate::containers::StorageKey;

/// Identifies a variable within a [`super::VariableStore`].
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VariableId(u32);

impl VariableId {
    pub const fn new(id: u32) -> Self {
        VariableId(id)
    }

    pub fn unpack(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableId(index as u32)
    }
}

/// The kind of domain a variable has. The engine treats every kind the same way.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum VariableKind {
    Integer,
    Boolean,
    Set,
    Real,
    Graph,
}
