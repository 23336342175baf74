//! Read models

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::{
    aggregate::Aggregate,
    event::EventHandler,
    event_bus::EventBus,
    event_store::EventStore,
    Error,
};

/// Minimal storage contract available to read models.
///
/// Records are JSON values keyed by collection name and record id. The
/// adapter is swappable: projection logic must not assume any particular
/// storage technology, only these operations. No transactional
/// guarantees are assumed beyond per-call atomicity.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Returns the record under `collection`/`id`, if present.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<serde_json::Value>, Error>;

    /// Inserts a new record under `collection`/`id`.
    async fn insert(
        &self,
        collection: &str,
        id: &str,
        record: serde_json::Value,
    ) -> Result<(), Error>;

    /// Replaces the record under `collection`/`id`.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        record: serde_json::Value,
    ) -> Result<(), Error>;
}

/// A queryable view derived by folding events into a persistence
/// adapter.
///
/// Projection records are derived and mutable, fully reconstructible
/// from the event log: a projection may be discarded and rebuilt at any
/// time without loss of truth.
#[async_trait]
pub trait Projection<A>: EventHandler<<A as Aggregate>::Event>
where
    A: Aggregate,
{
    /// Unique name for this projection.
    fn projection_type() -> &'static str
    where
        Self: Sized;

    /// Attaches the projection to the live event flow and rebuilds it
    /// from history.
    ///
    /// Subscribes to the bus first, then replays the store's full
    /// history through the same handler, so that in a synchronous
    /// single-writer host no event is lost and none double-applied for
    /// events committed concurrently with startup.
    async fn subscribe_and_replay<S>(
        self: Arc<Self>,
        bus: &EventBus<<A as Aggregate>::Event>,
        store: &S,
    ) -> Result<(), Error>
    where
        Self: Sized + 'static,
        S: EventStore + Send + Sync,
        <S as EventStore>::Error: Into<Error>,
        <A as Aggregate>::Event: Clone + DeserializeOwned,
    {
        let handler: Arc<dyn EventHandler<<A as Aggregate>::Event>> = self.clone();
        bus.subscribe(handler)?;

        let history = store.load_events::<A>(None).await.map_err(Into::into)?;
        trace!(
            projection_type = Self::projection_type(),
            events = history.len(),
            "replaying history"
        );

        for event in history {
            self.handle(event).await?;
        }

        Ok(())
    }
}
