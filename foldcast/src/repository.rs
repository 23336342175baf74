//! Aggregate repository

use std::{marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::{
    aggregate::{Aggregate, TypeId},
    event::{AggregateEventEnvelope, IntoEvents},
    event_bus::EventBus,
    event_store::EventStore,
    Error,
};

/// Write-side access to aggregates of one type.
///
/// The repository loads an aggregate's event history, folds it into
/// current state, runs command logic against that state, then appends
/// newly produced events to the store and publishes them on the bus
/// before [`execute`](Repository::execute) returns.
///
/// Command validation is computed entirely from the folded aggregate
/// state, never from a read-side projection, keeping the source of truth
/// single and the write path independent of projection staleness.
pub struct Repository<A, S>
where
    A: Aggregate,
{
    store: Arc<S>,
    bus: Arc<EventBus<<A as Aggregate>::Event>>,
    aggregate: PhantomData<A>,
}

impl<A, S> Repository<A, S>
where
    A: Aggregate + Send + Sync,
    S: EventStore + Send + Sync,
    <S as EventStore>::Error: Into<Error>,
    <A as Aggregate>::ID: Clone,
    <A as Aggregate>::Event: Clone + DeserializeOwned + Serialize,
{
    /// Creates a repository over the given store and bus.
    pub fn new(store: Arc<S>, bus: Arc<EventBus<<A as Aggregate>::Event>>) -> Self {
        Repository {
            store,
            bus,
            aggregate: PhantomData,
        }
    }

    /// Loads an aggregate as the fold of its stored history.
    ///
    /// Pure and side-effect free. Returns `None` when no events exist
    /// for the given id.
    pub async fn load(&self, id: <A as Aggregate>::ID) -> Result<Option<A>, Error> {
        self.store.load_aggregate::<A>(id).await.map_err(Into::into)
    }

    /// Executes a command against the current folded state.
    ///
    /// The command closure receives the aggregate as reconstructed from
    /// history (or the initial state if no events exist) and returns the
    /// events that logically occurred, or a domain error. On success the
    /// events are appended in order and each stored envelope is published
    /// on the bus before this method returns. On a domain error no events
    /// are appended.
    pub async fn execute<C, R, E>(
        &self,
        id: <A as Aggregate>::ID,
        command: C,
    ) -> Result<Vec<AggregateEventEnvelope<A>>, Error>
    where
        C: FnOnce(&A) -> Result<R, E> + Send,
        R: IntoEvents<Event = <A as Aggregate>::Event> + Send,
        E: Into<Error>,
    {
        let aggregate = self
            .store
            .load_aggregate::<A>(id.clone())
            .await
            .map_err(Into::into)?
            .unwrap_or_else(|| <A as Aggregate>::new(id));

        let events = command(&aggregate).map_err(Into::into)?.into_events();
        if events.is_empty() {
            return Ok(vec![]);
        }

        let event_ids = self
            .store
            .save_events::<A>(aggregate.id(), &events)
            .await
            .map_err(Into::into)?;

        debug!(
            aggregate_type = <A as TypeId>::type_id(),
            aggregate_id = %aggregate.id().to_string(),
            count = event_ids.len(),
            "appended events"
        );

        let envelopes = self
            .store
            .load_events_by_id::<A>(&event_ids)
            .await
            .map_err(Into::into)?;

        for envelope in &envelopes {
            self.bus.publish(envelope).await?;
        }

        Ok(envelopes)
    }
}
