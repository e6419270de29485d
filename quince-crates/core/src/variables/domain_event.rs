use enumset::EnumSet;
use enumset::EnumSetType;

use super::VariableKind;

/// A fine-grained change to the domain of a variable.
#[derive(Debug, Hash, EnumSetType)]
pub enum DomainEvent {
    /// The domain became a singleton.
    Instantiate,
    IncreaseLowerBound,
    DecreaseUpperBound,
    /// A value strictly inside the bounds was removed.
    Removal,
    /// Set variables: an element was added to the kernel.
    AddToKernel,
    /// Set variables: an element was removed from the envelope.
    RemoveFromEnvelope,
    AddNode,
    RemoveNode,
    AddEdge,
    RemoveEdge,
}

/// The accumulated events of a variable, or the events a propagator subscribes to.
pub type EventMask = EnumSet<DomainEvent>;

impl DomainEvent {
    /// Every event a variable of the given kind can raise.
    pub fn events_of(kind: VariableKind) -> EventMask {
        match kind {
            VariableKind::Integer | VariableKind::Real => {
                DomainEvent::Instantiate
                    | DomainEvent::IncreaseLowerBound
                    | DomainEvent::DecreaseUpperBound
                    | DomainEvent::Removal
            }
            VariableKind::Boolean => EnumSet::only(DomainEvent::Instantiate),
            VariableKind::Set => {
                DomainEvent::Instantiate
                    | DomainEvent::AddToKernel
                    | DomainEvent::RemoveFromEnvelope
            }
            VariableKind::Graph => {
                DomainEvent::Instantiate
                    | DomainEvent::AddNode
                    | DomainEvent::RemoveNode
                    | DomainEvent::AddEdge
                    | DomainEvent::RemoveEdge
            }
        }
    }
}
