//! Command handling

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Validates a command and routes it to the matching repository
/// operation.
///
/// Handlers are stateless between invocations, holding only references
/// to their collaborators. [`handle`](CommandHandler::handle) returns
/// once the resulting events have been appended to the store and fanned
/// out to every registered subscriber; domain and store failures
/// propagate to the caller unchanged.
#[async_trait]
pub trait CommandHandler<C> {
    /// Value returned by a successfully handled command.
    type Output;

    /// Handles one command to completion.
    async fn handle(&self, command: C) -> Result<Self::Output, Error>;
}

/// A command as a plain structured message.
///
/// This is the shape commands take across a process boundary: a type
/// tag, the target aggregate, and command-specific fields as a JSON
/// payload. Converting a message into a domain command enum fails with
/// [`Error::UnsupportedCommand`] when the name is not recognized; inside
/// the core, dispatch is over closed enums checked exhaustively at
/// compile time.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CommandMessage {
    /// Command type tag, e.g. `"CreateCustomer"`.
    pub name: String,
    /// Aggregate instance the command targets.
    pub aggregate_id: String,
    /// Command-specific fields.
    #[serde(default)]
    pub payload: serde_json::Value,
}
