//! Index-keyed containers shared by the engine and the Boolean core.
mod index_heap;
mod keyed_vec;

pub use index_heap::IndexHeap;
pub use keyed_vec::KeyedVec;
pub use keyed_vec::StorageKey;
