//! Write-side aggregates.

use std::string;

use crate::event::EventType;

/// Consistency boundary around a domain entity responsible for handling
/// commands and applying events.
///
/// An aggregate is never persisted directly: its current state is always
/// the deterministic fold of its ordered event history, starting from the
/// "nonexistent" state returned by [`new`](Aggregate::new). Two aggregates
/// with identical histories yield identical state.
pub trait Aggregate: TypeId {
    /// The ID type of the aggregate.
    type ID: string::ToString + Send + Sync;

    /// The event type resulted by a command.
    type Event: EventType + Send + Sync;

    /// Create a new instance from a given ID.
    ///
    /// The aggregate should be initialised with the state it has before
    /// any event exists for it.
    fn new(id: Self::ID) -> Self;

    /// Returns a reference to the aggregate ID.
    fn id(&self) -> &Self::ID;

    /// Applies an event to update internal state.
    ///
    /// Must be pure with respect to everything but `self`.
    fn apply(&mut self, event: Self::Event);
}

/// Unique type identifier
pub trait TypeId {
    /// Returns a unique identifier for the given type
    fn type_id() -> &'static str;
}
