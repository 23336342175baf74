//! Event store

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    aggregate::Aggregate,
    event::{AggregateEventEnvelope, EventEnvelope},
};

/// Append-only, ordered persistence for events; the single source of truth.
///
/// Appending is the only mutation: no event is ever edited or removed.
/// Implementations assign each saved event a global id (the append order)
/// and a per-aggregate sequence number starting from 0.
#[async_trait]
pub trait EventStore {
    /// The error type.
    type Error;

    /// Load events for a given aggregate.
    ///
    /// With `Some(id)`, returns the ordered history of that aggregate
    /// instance, oldest first; empty if the aggregate has never emitted
    /// events. With `None`, returns every stored event for the aggregate
    /// type in append order, which is the full history used for
    /// projection rebuilds. Each call re-reads the history as of the
    /// call, so the result can be iterated any number of times.
    async fn load_events<A>(
        &self,
        id: Option<&<A as Aggregate>::ID>,
    ) -> Result<Vec<AggregateEventEnvelope<A>>, Self::Error>
    where
        A: Aggregate,
        <A as Aggregate>::Event: DeserializeOwned;

    /// Load an event by its global id.
    async fn load_event_by_id<A>(
        &self,
        id: u64,
    ) -> Result<Option<AggregateEventEnvelope<A>>, Self::Error>
    where
        A: Aggregate,
        <A as Aggregate>::Event: DeserializeOwned,
    {
        Ok(self.load_events_by_id::<A>(&[id]).await?.into_iter().next())
    }

    /// Load events by global ids.
    async fn load_events_by_id<A>(
        &self,
        ids: &[u64],
    ) -> Result<Vec<AggregateEventEnvelope<A>>, Self::Error>
    where
        A: Aggregate,
        <A as Aggregate>::Event: DeserializeOwned;

    /// Loads an aggregate by replaying all events.
    ///
    /// Returns `None` when no events exist for the given id.
    async fn load_aggregate<A>(&self, id: <A as Aggregate>::ID) -> Result<Option<A>, Self::Error>
    where
        A: Aggregate,
        <A as Aggregate>::Event: DeserializeOwned,
    {
        let events = self.load_events::<A>(Some(&id)).await?;
        if events.is_empty() {
            return Ok(None);
        }

        let mut aggregate = <A as Aggregate>::new(id);
        for EventEnvelope { event, .. } in events {
            aggregate.apply(event);
        }

        Ok(Some(aggregate))
    }

    /// Loads an aggregates latest sequence.
    async fn load_aggregate_sequence<A>(
        &self,
        id: &<A as Aggregate>::ID,
    ) -> Result<Option<u64>, Self::Error>
    where
        A: Aggregate;

    /// Saves events for a given aggregate instance.
    ///
    /// Returns the assigned global ids, in the order the events were
    /// given. On failure nothing is committed.
    async fn save_events<A>(
        &self,
        id: &<A as Aggregate>::ID,
        events: &[<A as Aggregate>::Event],
    ) -> Result<Vec<u64>, Self::Error>
    where
        A: Aggregate,
        <A as Aggregate>::Event: Serialize;
}
