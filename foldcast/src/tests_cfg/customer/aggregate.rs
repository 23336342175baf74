use thiserror::Error;

use crate::aggregate::{Aggregate, TypeId};
use crate::Error as CoreError;

use super::{CustomerCommands, CustomerEvent};

/// Write-side customer entity.
///
/// State is the fold of the customer's event history; before any event
/// exists the customer is in the "nonexistent" state (`created == false`).
#[derive(Clone, Debug, PartialEq)]
pub struct Customer {
    id: String,
    name: String,
    active: bool,
    created: bool,
}

impl Customer {
    /// Current display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the customer is currently active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a creation event has been applied.
    pub fn is_created(&self) -> bool {
        self.created
    }
}

impl CustomerCommands for Customer {
    type Error = CustomerError;

    fn create(&self, name: String) -> Result<CustomerEvent, CustomerError> {
        if self.created {
            return Err(CustomerError::AlreadyCreated);
        }

        Ok(CustomerEvent::Created { name })
    }

    fn change_name(&self, name: String) -> Result<CustomerEvent, CustomerError> {
        if !self.created {
            return Err(CustomerError::NotCreated);
        }

        Ok(CustomerEvent::Updated { name })
    }

    fn deactivate(&self) -> Result<CustomerEvent, CustomerError> {
        if !self.created {
            return Err(CustomerError::NotCreated);
        }

        Ok(CustomerEvent::Deactivated)
    }

    fn reactivate(&self) -> Result<CustomerEvent, CustomerError> {
        if !self.created {
            return Err(CustomerError::NotCreated);
        }

        Ok(CustomerEvent::Reactivated)
    }
}

/// Command failures for the customer aggregate.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CustomerError {
    /// A creation command targeted an id that already exists.
    #[error("can not create same customer more than once")]
    AlreadyCreated,
    /// A command other than creation targeted a nonexistent customer.
    #[error("customer does not exist")]
    NotCreated,
}

impl From<CustomerError> for CoreError {
    fn from(err: CustomerError) -> Self {
        CoreError::domain_rule(err.to_string())
    }
}

impl Aggregate for Customer {
    type ID = String;
    type Event = CustomerEvent;

    fn new(id: Self::ID) -> Self {
        Customer {
            id,
            name: String::new(),
            active: false,
            created: false,
        }
    }

    fn id(&self) -> &Self::ID {
        &self.id
    }

    fn apply(&mut self, event: CustomerEvent) {
        use CustomerEvent::*;

        match event {
            // A registration is an intent, not yet a customer.
            Registered { .. } => {}
            Created { name } => {
                self.created = true;
                self.active = true;
                self.name = name;
            }
            Updated { name } => {
                self.name = name;
            }
            Deactivated => {
                self.active = false;
            }
            Reactivated => {
                self.active = true;
            }
        }
    }
}

impl TypeId for Customer {
    fn type_id() -> &'static str {
        "customer"
    }
}

#[cfg(test)]
mod tests {
    use crate::aggregate::Aggregate;

    use super::{Customer, CustomerEvent};

    fn fold(events: Vec<CustomerEvent>) -> Customer {
        let mut customer = Customer::new("customer-1".to_string());
        for event in events {
            customer.apply(event);
        }
        customer
    }

    #[test]
    fn identical_histories_yield_identical_state() {
        let history = || {
            vec![
                CustomerEvent::Created {
                    name: "Ada".to_string(),
                },
                CustomerEvent::Updated {
                    name: "Ada L.".to_string(),
                },
                CustomerEvent::Deactivated,
                CustomerEvent::Reactivated,
            ]
        };

        assert_eq!(fold(history()), fold(history()));
    }

    #[test]
    fn registration_does_not_create() {
        let customer = fold(vec![CustomerEvent::Registered {
            name: "Ada".to_string(),
        }]);

        assert!(!customer.is_created());
        assert!(!customer.is_active());
    }
}
