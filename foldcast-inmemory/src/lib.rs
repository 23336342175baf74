//! An in memory implementation of [EventStore](foldcast::event_store::EventStore),
//! along with an in memory [PersistenceAdapter](foldcast::projection::PersistenceAdapter)
//! for read models.
//!
//! This is useful for testing, but is not recommended
//! for production as the data does not persist to disk.
//!
//! Events are stored in a `Vec<EventRecord>`; read-model records in a
//! map of collections.

#![deny(missing_docs)]

pub use adapter::InMemoryAdapter;
pub use error::Error;
pub use event_store::InMemoryEventStore;

mod adapter;
mod error;
mod event_store;
