use foldcast::tests_cfg::customer::{Customer, CustomerCommands, CustomerError, CustomerEvent};
use foldcast_testing::*;

const CUSTOMER_ID: &str = "1234-5678-9012-3456";

#[test]
fn create_customer() {
    Customer::given_no_events(CUSTOMER_ID.to_string())
        // Create customer
        .when(|customer| customer.create("Test Customer".to_string()))
        // Then ok
        .then_ok(CustomerEvent::Created {
            name: "Test Customer".to_string(),
        })
        .apply()
        // Create customer again
        .when(|customer| customer.create("Test Customer".to_string()))
        // Then error
        .then_err(CustomerError::AlreadyCreated);
}

#[test]
fn change_name() {
    Customer::given_no_events(CUSTOMER_ID.to_string())
        // Rename before creation
        .when(|customer| customer.change_name("Renamed".to_string()))
        // Then error
        .then_err(CustomerError::NotCreated)
        // Create customer
        .when(|customer| customer.create("Test Customer".to_string()))
        .then_ok(CustomerEvent::Created {
            name: "Test Customer".to_string(),
        })
        .apply()
        // Rename after creation
        .when(|customer| customer.change_name("Renamed".to_string()))
        // Then ok
        .then_ok(CustomerEvent::Updated {
            name: "Renamed".to_string(),
        });
}

#[test]
fn deactivate_and_reactivate() {
    Customer::given_no_events(CUSTOMER_ID.to_string())
        // Deactivate before creation
        .when(|customer| customer.deactivate())
        // Then error
        .then_err(CustomerError::NotCreated)
        // Create customer
        .when(|customer| customer.create("Test Customer".to_string()))
        .then_ok(CustomerEvent::Created {
            name: "Test Customer".to_string(),
        })
        .apply()
        // Deactivate
        .when(|customer| customer.deactivate())
        .then_ok(CustomerEvent::Deactivated)
        .apply()
        // Reactivate
        .when(|customer| customer.reactivate())
        .then_ok(CustomerEvent::Reactivated)
        .apply()
        // Reactivation restores the active flag
        .when(|customer| Ok::<_, CustomerError>(customer.is_active()))
        .then_ok(true);
}

#[test]
fn registration_leaves_customer_nonexistent() {
    Customer::given(
        CUSTOMER_ID.to_string(),
        CustomerEvent::Registered {
            name: "Test Customer".to_string(),
        },
    )
    // A registered-but-unvalidated customer cannot be renamed
    .when(|customer| customer.change_name("Renamed".to_string()))
    .then_err(CustomerError::NotCreated);
}
