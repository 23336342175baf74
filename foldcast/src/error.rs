//! Errors

use std::borrow::Cow;

use thiserror::Error;
use tracing::{metadata::LevelFilter, Level};

/// Error enum covering the write path, the read-model path and the
/// serialization boundary.
///
/// No error is swallowed anywhere in the write path: every failure
/// surfaces to the original command caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Unable to deserialize a command payload.
    #[error("deserialize command error: {0}")]
    DeserializeCommand(serde_json::Error),
    /// Unable to deserialize a stored event.
    #[error("deserialize event error: {0}")]
    DeserializeEvent(serde_json::Error),
    /// Unable to deserialize a read-model record.
    #[error("deserialize record error: {0}")]
    DeserializeRecord(serde_json::Error),
    /// A command violated an aggregate invariant.
    ///
    /// Displays the domain message verbatim.
    #[error("{0}")]
    DomainRuleViolation(Cow<'static, str>),
    /// The event stream implied a state impossible under correct domain
    /// rules, e.g. an update for a record that was never created.
    #[error("projection invariant violation: {0}")]
    ProjectionInvariantViolation(Cow<'static, str>),
    /// Read write lock error.
    #[error("could not get read/write lock")]
    RwPoison,
    /// Unable to serialize an event.
    #[error("serialize event error: {0}")]
    SerializeEvent(serde_json::Error),
    /// Unable to serialize a read-model record.
    #[error("serialize record error: {0}")]
    SerializeRecord(serde_json::Error),
    /// Underlying event persistence failed; the event is not committed.
    #[error("event store unavailable: {0}")]
    StoreUnavailable(Cow<'static, str>),
    /// Command name not recognized at the wire boundary.
    #[error("unsupported command '{0}'")]
    UnsupportedCommand(String),
}

impl Error {
    /// A command violated an aggregate invariant.
    ///
    /// Returns the [Error::DomainRuleViolation] variant.
    ///
    /// Typically used in aggregate command handlers to indicate
    /// the failure of a command due to business rules.
    pub fn domain_rule<M>(msg: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self::DomainRuleViolation(msg.into())
    }

    /// The event stream implied an impossible read-model state.
    ///
    /// Returns the [Error::ProjectionInvariantViolation] variant.
    pub fn projection_invariant<M>(msg: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self::ProjectionInvariantViolation(msg.into())
    }

    /// Event persistence is unreachable.
    ///
    /// Returns the [Error::StoreUnavailable] variant.
    pub fn store_unavailable<M>(msg: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self::StoreUnavailable(msg.into())
    }

    /// Recommended log level for the current error.
    pub fn level(&self) -> LevelFilter {
        use Error::*;

        match self {
            DeserializeCommand(_) => LevelFilter::WARN,
            DeserializeEvent(_) => LevelFilter::ERROR,
            DeserializeRecord(_) => LevelFilter::ERROR,
            DomainRuleViolation(_) => LevelFilter::WARN,
            ProjectionInvariantViolation(_) => LevelFilter::ERROR,
            RwPoison => LevelFilter::ERROR,
            SerializeEvent(_) => LevelFilter::ERROR,
            SerializeRecord(_) => LevelFilter::ERROR,
            StoreUnavailable(_) => LevelFilter::ERROR,
            UnsupportedCommand(_) => LevelFilter::WARN,
        }
    }

    /// Log the error based on the recommended level.
    pub fn log(&self) {
        use tracing::{debug, error, info, trace, warn};

        let level = self.level();
        if level == Level::ERROR {
            error!(error = %self);
        } else if level == Level::WARN {
            warn!(error = %self);
        } else if level == Level::INFO {
            info!(error = %self);
        } else if level == Level::DEBUG {
            debug!(error = %self);
        } else if level == Level::TRACE {
            trace!(error = %self);
        }
    }
}
