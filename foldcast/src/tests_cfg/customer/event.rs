use serde::{Deserialize, Serialize};

use crate::event::{EventType, IntoEvents};

/// Facts recorded about a customer.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum CustomerEvent {
    /// Registration intent, emitted before the uniqueness check performed
    /// by a separate collaborator service has passed. Never folded by the
    /// customer read model.
    Registered {
        /// Requested display name.
        name: String,
    },
    /// The customer passed validation and exists from here on.
    Created {
        /// Display name at creation.
        name: String,
    },
    /// The customer's display name changed.
    Updated {
        /// New display name.
        name: String,
    },
    /// The customer was switched inactive.
    Deactivated,
    /// The customer was switched active again.
    Reactivated,
}

impl EventType for CustomerEvent {
    fn event_type(&self) -> &'static str {
        use CustomerEvent::*;

        match self {
            Registered { .. } => "CUSTOMER_REGISTERED",
            Created { .. } => "CUSTOMER_CREATED",
            Updated { .. } => "CUSTOMER_UPDATED",
            Deactivated => "CUSTOMER_DEACTIVATED",
            Reactivated => "CUSTOMER_REACTIVATED",
        }
    }
}

impl IntoEvents for CustomerEvent {
    type Event = Self;

    fn into_events(self) -> Vec<Self::Event> {
        vec![self]
    }
}
