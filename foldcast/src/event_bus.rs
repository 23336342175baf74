//! Event bus

use std::sync::{Arc, RwLock};

use tracing::trace;

use crate::{
    event::{EventEnvelope, EventHandler},
    Error,
};

/// Synchronous in-process publish/subscribe fan-out for stored events.
///
/// Publishing invokes every subscriber in subscription order and returns
/// only once all of them have returned, giving the write path a strict
/// happens-before guarantee: when a command completes, all registered
/// read models have observed every resulting event. The first subscriber
/// error aborts the fan-out and propagates to the publisher.
///
/// The bus itself neither buffers nor persists events; replaying history
/// is the read model's responsibility via
/// [`EventStore::load_events`](crate::event_store::EventStore::load_events).
pub struct EventBus<E> {
    subscribers: RwLock<Vec<Arc<dyn EventHandler<E>>>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        EventBus {
            subscribers: RwLock::new(Vec::new()),
        }
    }
}

impl<E> EventBus<E> {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler invoked for every subsequently published event.
    pub fn subscribe(&self, handler: Arc<dyn EventHandler<E>>) -> Result<(), Error> {
        self.subscribers
            .write()
            .map_err(|_| Error::RwPoison)?
            .push(handler);

        Ok(())
    }
}

impl<E> EventBus<E>
where
    E: Clone + Send + Sync,
{
    /// Publishes one stored event to all subscribers, in subscription
    /// order, blocking until each has returned.
    pub async fn publish(&self, event: &EventEnvelope<E>) -> Result<(), Error> {
        let subscribers = self
            .subscribers
            .read()
            .map_err(|_| Error::RwPoison)?
            .clone();

        trace!(
            id = event.id,
            aggregate_id = %event.aggregate_id,
            subscribers = subscribers.len(),
            "publishing event"
        );

        for handler in subscribers {
            handler.handle(event.clone()).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::EventBus;
    use crate::{
        event::{EventEnvelope, EventHandler},
        Error,
    };

    #[derive(Clone, Debug)]
    struct Pinged;

    fn envelope(id: u64) -> EventEnvelope<Pinged> {
        EventEnvelope {
            id,
            created_at: Utc::now(),
            aggregate_type: "ping".to_string(),
            aggregate_id: "ping-1".to_string(),
            sequence: id,
            event: Pinged,
        }
    }

    struct Recorder {
        name: &'static str,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl EventHandler<Pinged> for Recorder {
        async fn handle(&self, _event: EventEnvelope<Pinged>) -> Result<(), Error> {
            self.calls.lock().unwrap().push(self.name);
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl EventHandler<Pinged> for Failing {
        async fn handle(&self, _event: EventEnvelope<Pinged>) -> Result<(), Error> {
            Err(Error::projection_invariant("broken on purpose"))
        }
    }

    #[tokio::test]
    async fn delivers_in_subscription_order() -> Result<(), Error> {
        let bus: EventBus<Pinged> = EventBus::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe(Arc::new(Recorder {
            name: "first",
            calls: calls.clone(),
        }))?;
        bus.subscribe(Arc::new(Recorder {
            name: "second",
            calls: calls.clone(),
        }))?;

        bus.publish(&envelope(0)).await?;
        bus.publish(&envelope(1)).await?;

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["first", "second", "first", "second"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn subscriber_failure_propagates_to_publisher() -> Result<(), Error> {
        let bus: EventBus<Pinged> = EventBus::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe(Arc::new(Failing))?;
        bus.subscribe(Arc::new(Recorder {
            name: "after",
            calls: calls.clone(),
        }))?;

        let err = bus.publish(&envelope(0)).await.unwrap_err();
        assert!(matches!(err, Error::ProjectionInvariantViolation(_)));

        // Fail-fast: subscribers after the failing one are not invoked.
        assert!(calls.lock().unwrap().is_empty());

        Ok(())
    }
}
