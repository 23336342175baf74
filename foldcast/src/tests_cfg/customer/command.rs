use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    command::{CommandHandler, CommandMessage},
    event::AggregateEventEnvelope,
    event_store::EventStore,
    repository::Repository,
    Error,
};

use super::{Customer, CustomerEvent};

/// Commands a customer aggregate accepts.
pub trait CustomerCommands {
    /// Domain error type.
    type Error;

    /// Bring a customer into existence. Requires the nonexistent state.
    fn create(&self, name: String) -> Result<CustomerEvent, Self::Error>;

    /// Change the display name. Requires an existing customer.
    fn change_name(&self, name: String) -> Result<CustomerEvent, Self::Error>;

    /// Switch the customer inactive. Requires an existing customer.
    fn deactivate(&self) -> Result<CustomerEvent, Self::Error>;

    /// Switch the customer active again. Requires an existing customer.
    fn reactivate(&self) -> Result<CustomerEvent, Self::Error>;
}

/// Customer commands in typed form: intent, not yet validated against
/// current state.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum CustomerCommand {
    /// Create a new customer.
    CreateCustomer {
        /// Target aggregate id.
        id: String,
        /// Display name.
        name: String,
    },
    /// Change an existing customer's name.
    UpdateCustomer {
        /// Target aggregate id.
        id: String,
        /// New display name.
        name: String,
    },
    /// Switch an existing customer inactive.
    DeactivateCustomer {
        /// Target aggregate id.
        id: String,
    },
    /// Switch an existing customer active.
    ReactivateCustomer {
        /// Target aggregate id.
        id: String,
    },
}

impl TryFrom<CommandMessage> for CustomerCommand {
    type Error = Error;

    fn try_from(message: CommandMessage) -> Result<Self, Error> {
        #[derive(Deserialize)]
        struct NamePayload {
            name: String,
        }

        let CommandMessage {
            name,
            aggregate_id,
            payload,
        } = message;

        match name.as_str() {
            "CreateCustomer" => {
                let NamePayload { name } =
                    serde_json::from_value(payload).map_err(Error::DeserializeCommand)?;
                Ok(CustomerCommand::CreateCustomer {
                    id: aggregate_id,
                    name,
                })
            }
            "UpdateCustomer" => {
                let NamePayload { name } =
                    serde_json::from_value(payload).map_err(Error::DeserializeCommand)?;
                Ok(CustomerCommand::UpdateCustomer {
                    id: aggregate_id,
                    name,
                })
            }
            "DeactivateCustomer" => Ok(CustomerCommand::DeactivateCustomer { id: aggregate_id }),
            "ReactivateCustomer" => Ok(CustomerCommand::ReactivateCustomer { id: aggregate_id }),
            _ => Err(Error::UnsupportedCommand(name)),
        }
    }
}

/// Routes customer commands to the repository.
pub struct CustomerCommandHandler<S> {
    repository: Repository<Customer, S>,
}

impl<S> CustomerCommandHandler<S>
where
    S: EventStore + Send + Sync,
    <S as EventStore>::Error: Into<Error>,
{
    /// Creates a handler over the given repository.
    pub fn new(repository: Repository<Customer, S>) -> Self {
        CustomerCommandHandler { repository }
    }
}

#[async_trait]
impl<S> CommandHandler<CustomerCommand> for CustomerCommandHandler<S>
where
    S: EventStore + Send + Sync,
    <S as EventStore>::Error: Into<Error>,
{
    type Output = Vec<AggregateEventEnvelope<Customer>>;

    async fn handle(&self, command: CustomerCommand) -> Result<Self::Output, Error> {
        use CustomerCommand::*;

        match command {
            CreateCustomer { id, name } => {
                self.repository
                    .execute(id, |customer: &Customer| customer.create(name))
                    .await
            }
            UpdateCustomer { id, name } => {
                self.repository
                    .execute(id, |customer: &Customer| customer.change_name(name))
                    .await
            }
            DeactivateCustomer { id } => {
                self.repository
                    .execute(id, |customer: &Customer| customer.deactivate())
                    .await
            }
            ReactivateCustomer { id } => {
                self.repository
                    .execute(id, |customer: &Customer| customer.reactivate())
                    .await
            }
        }
    }
}

#[async_trait]
impl<S> CommandHandler<CommandMessage> for CustomerCommandHandler<S>
where
    S: EventStore + Send + Sync,
    <S as EventStore>::Error: Into<Error>,
{
    type Output = Vec<AggregateEventEnvelope<Customer>>;

    async fn handle(&self, message: CommandMessage) -> Result<Self::Output, Error> {
        let command = CustomerCommand::try_from(message)?;
        CommandHandler::<CustomerCommand>::handle(self, command).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{command::CommandMessage, Error};

    use super::CustomerCommand;

    #[test]
    fn unknown_command_name_is_unsupported() {
        let message = CommandMessage {
            name: "FreezeCustomer".to_string(),
            aggregate_id: "customer-1".to_string(),
            payload: serde_json::Value::Null,
        };

        let err = CustomerCommand::try_from(message).unwrap_err();
        assert!(matches!(err, Error::UnsupportedCommand(name) if name == "FreezeCustomer"));
    }

    #[test]
    fn create_message_parses_payload() {
        let message = CommandMessage {
            name: "CreateCustomer".to_string(),
            aggregate_id: "customer-1".to_string(),
            payload: json!({ "name": "Ada" }),
        };

        assert_eq!(
            CustomerCommand::try_from(message).unwrap(),
            CustomerCommand::CreateCustomer {
                id: "customer-1".to_string(),
                name: "Ada".to_string(),
            }
        );
    }

    #[test]
    fn create_message_without_name_is_malformed() {
        let message = CommandMessage {
            name: "CreateCustomer".to_string(),
            aggregate_id: "customer-1".to_string(),
            payload: serde_json::Value::Null,
        };

        let err = CustomerCommand::try_from(message).unwrap_err();
        assert!(matches!(err, Error::DeserializeCommand(_)));
    }
}
