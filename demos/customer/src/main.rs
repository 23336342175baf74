//! End-to-end customer registry demo: commands flow through the handler
//! into the repository, events land in the in-memory store and fan out
//! to the customer read model, which folds them into an in-memory
//! persistence adapter.

use std::sync::Arc;

use anyhow::Result;
use foldcast::command::{CommandHandler, CommandMessage};
use foldcast::event_bus::EventBus;
use foldcast::repository::Repository;
use foldcast::tests_cfg::customer::{
    CustomerCommandHandler, CustomerProjection, CUSTOMERS_COLLECTION,
};
use foldcast_inmemory::{InMemoryAdapter, InMemoryEventStore};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const CUSTOMER_ID: &str = "1234-5678-9012-3456";

fn message(name: &str, payload: serde_json::Value) -> CommandMessage {
    CommandMessage {
        name: name.to_string(),
        aggregate_id: CUSTOMER_ID.to_string(),
        payload,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store = Arc::new(InMemoryEventStore::default());
    let bus = Arc::new(EventBus::new());
    let adapter = Arc::new(InMemoryAdapter::default());

    // Subscribe the read model before any command runs; with history
    // already in the store this would also replay it.
    let _projection = CustomerProjection::attach(&bus, store.as_ref(), adapter.clone()).await?;

    let handler = CustomerCommandHandler::new(Repository::new(store.clone(), bus.clone()));

    handler
        .handle(message(
            "CreateCustomer",
            json!({ "name": "Test Customer" }),
        ))
        .await?;

    match handler
        .handle(message(
            "CreateCustomer",
            json!({ "name": "Test Customer" }),
        ))
        .await
    {
        Ok(_) => println!("duplicate create unexpectedly succeeded"),
        Err(err) => println!("duplicate create rejected: {}", err),
    }

    handler
        .handle(message("DeactivateCustomer", serde_json::Value::Null))
        .await?;
    handler
        .handle(message("ReactivateCustomer", serde_json::Value::Null))
        .await?;

    println!("\nevent log:");
    store.print();

    println!("\ncustomer read model:");
    adapter.print(CUSTOMERS_COLLECTION);

    Ok(())
}
