use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    event::{EventEnvelope, EventHandler},
    event_bus::EventBus,
    event_store::EventStore,
    projection::{PersistenceAdapter, Projection},
    Error,
};

use super::{Customer, CustomerEvent};

/// Collection the customer read model writes to.
pub const CUSTOMERS_COLLECTION: &str = "customers";

/// Denormalized customer row, keyed by aggregate id.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CustomerRecord {
    /// Current display name.
    pub name: String,
    /// Deactivation is a flag, not a delete.
    pub active: bool,
}

/// Query-optimized list of customers, derived by folding customer events
/// into a persistence adapter.
///
/// Each handler re-derives the record from the full event payload rather
/// than incrementing, so re-delivery of an already-applied tail of
/// history leaves the view unchanged. A duplicate creation, by contrast,
/// signals a write-side defect and fails loudly.
pub struct CustomerProjection {
    adapter: Arc<dyn PersistenceAdapter>,
}

impl CustomerProjection {
    /// Creates a projection over the given adapter, not yet subscribed.
    pub fn new(adapter: Arc<dyn PersistenceAdapter>) -> Self {
        CustomerProjection { adapter }
    }

    /// Builds the projection, subscribes it to the bus, and rebuilds it
    /// from the store's history.
    pub async fn attach<S>(
        bus: &EventBus<CustomerEvent>,
        store: &S,
        adapter: Arc<dyn PersistenceAdapter>,
    ) -> Result<Arc<Self>, Error>
    where
        S: EventStore + Send + Sync,
        <S as EventStore>::Error: Into<Error>,
    {
        let projection = Arc::new(CustomerProjection::new(adapter));
        projection.clone().subscribe_and_replay(bus, store).await?;

        Ok(projection)
    }

    async fn record(&self, id: &str) -> Result<Option<CustomerRecord>, Error> {
        self.adapter
            .get(CUSTOMERS_COLLECTION, id)
            .await?
            .map(|value| serde_json::from_value(value).map_err(Error::DeserializeRecord))
            .transpose()
    }

    async fn handle_created(&self, id: &str, name: String) -> Result<(), Error> {
        if self.record(id).await?.is_some() {
            return Err(Error::projection_invariant(format!(
                "customer '{}' already exists",
                id
            )));
        }

        let record = CustomerRecord { name, active: true };
        self.adapter
            .insert(
                CUSTOMERS_COLLECTION,
                id,
                serde_json::to_value(&record).map_err(Error::SerializeRecord)?,
            )
            .await
    }

    async fn handle_updated(&self, id: &str, name: String) -> Result<(), Error> {
        let mut record = self.record(id).await?.ok_or_else(|| {
            Error::projection_invariant(format!("customer '{}' not found", id))
        })?;

        record.name = name;
        self.adapter
            .update(
                CUSTOMERS_COLLECTION,
                id,
                serde_json::to_value(&record).map_err(Error::SerializeRecord)?,
            )
            .await
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<(), Error> {
        let mut record = self.record(id).await?.ok_or_else(|| {
            Error::projection_invariant(format!("customer '{}' not found", id))
        })?;

        record.active = active;
        self.adapter
            .update(
                CUSTOMERS_COLLECTION,
                id,
                serde_json::to_value(&record).map_err(Error::SerializeRecord)?,
            )
            .await
    }
}

#[async_trait]
impl EventHandler<CustomerEvent> for CustomerProjection {
    async fn handle(&self, event: EventEnvelope<CustomerEvent>) -> Result<(), Error> {
        use CustomerEvent::*;

        match event.event {
            // Registration has not passed the uniqueness check performed
            // by the registration service; only post-validation creation
            // events are folded here.
            Registered { .. } => Ok(()),
            Created { name } => self.handle_created(&event.aggregate_id, name).await,
            Updated { name } => self.handle_updated(&event.aggregate_id, name).await,
            Deactivated => self.set_active(&event.aggregate_id, false).await,
            Reactivated => self.set_active(&event.aggregate_id, true).await,
        }
    }
}

impl Projection<Customer> for CustomerProjection {
    fn projection_type() -> &'static str {
        "customer_list"
    }
}
