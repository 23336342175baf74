//! Events and event handling.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{aggregate::Aggregate, Error};

/// An event with store-assigned metadata.
///
/// Envelopes are immutable once appended. Identity is the
/// `(aggregate_id, sequence)` pair; global ordering across aggregates is
/// the store's append order, exposed as [`id`](EventEnvelope::id).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EventEnvelope<E> {
    /// Auto-incrementing event id, the store's append order.
    pub id: u64,
    /// Event timestamp.
    pub created_at: DateTime<Utc>,
    /// Aggregate type identifier.
    pub aggregate_type: String,
    /// Aggregate instance identifier.
    pub aggregate_id: String,
    /// Incrementing number unique where each aggregate instance starts from 0.
    pub sequence: u64,
    /// Event data
    pub event: E,
}

/// An aggregate event envelope.
pub type AggregateEventEnvelope<A> = EventEnvelope<<A as Aggregate>::Event>;

/// A unique identifier for an event type.
///
/// # Example
///
/// ```
/// # use foldcast::event::EventType;
/// #
/// enum CustomerEvent {
///     Created { name: String },
///     Deactivated,
/// }
///
/// impl EventType for CustomerEvent {
///     fn event_type(&self) -> &'static str {
///         use CustomerEvent::*;
///
///         match self {
///             Created { .. } => "CUSTOMER_CREATED",
///             Deactivated => "CUSTOMER_DEACTIVATED",
///         }
///     }
/// }
/// ```
pub trait EventType {
    /// Unique identifier for the active event variant.
    fn event_type(&self) -> &'static str;
}

/// Handles stored events delivered by the event bus or replayed from the
/// event store.
///
/// A handler error is fatal to the delivery that triggered it: it
/// propagates through [`publish`](crate::event_bus::EventBus::publish)
/// back to the write path, so a broken read model cannot silently
/// diverge from the log.
#[async_trait]
pub trait EventHandler<E>: Send + Sync {
    /// Handle a single stored event.
    async fn handle(&self, event: EventEnvelope<E>) -> Result<(), Error>;
}

/// A type which implements `IntoEvents` is used to convert into
/// a list of `Self::Event`.
///
/// Types returned from aggregate command methods typically implement this
/// trait, letting a command produce one or more events.
pub trait IntoEvents {
    /// Event type.
    type Event;

    /// Converts type into `Vec<Self::Event>`.
    fn into_events(self) -> Vec<Self::Event>;
}

impl<E> IntoEvents for Vec<E> {
    type Event = E;

    fn into_events(self) -> Vec<Self::Event> {
        self
    }
}

impl<E> IntoEvents for Option<E> {
    type Event = E;

    fn into_events(self) -> Vec<Self::Event> {
        self.map(|event| vec![event]).unwrap_or_default()
    }
}
