//! # foldcast
//!
//! A minimal event sourcing & CQRS core.
//!
//! Commands mutate an [`Aggregate`](aggregate::Aggregate) whose state
//! changes are recorded as an immutable event log held by an
//! [`EventStore`](event_store::EventStore). Read models subscribe to the
//! [`EventBus`](event_bus::EventBus) and maintain denormalized views
//! through a [`PersistenceAdapter`](projection::PersistenceAdapter),
//! rebuilding from history with
//! [`Projection::subscribe_and_replay`](projection::Projection::subscribe_and_replay).
//!
//! The write path is strictly ordered: a command's resulting events are
//! appended to the store, and fanned out to every registered subscriber,
//! before the command handler returns.

#![deny(missing_docs)]

/// Aggregates
pub mod aggregate;

/// Command handling
pub mod command;

/// Errors
pub mod error;

/// Events
pub mod event;

/// Event bus
pub mod event_bus;

/// Event store
pub mod event_store;

/// Read models
pub mod projection;

/// Aggregate repository
pub mod repository;

/// Tests config
#[cfg(feature = "tests-cfg")]
pub mod tests_cfg;

pub use error::Error;
