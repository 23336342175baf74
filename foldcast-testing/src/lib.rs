//! Given/when/then testing utilities for [foldcast](https://docs.rs/foldcast)
//! aggregates.
//!
//! An aggregate is *given* a history of events, a command is run *when*,
//! and the result is asserted *then*, with `apply` folding the produced
//! events back into the aggregate so scenarios chain naturally.
//!
//! # Example
//!
//! ```
//! use foldcast::tests_cfg::customer::{
//!     Customer, CustomerCommands, CustomerError, CustomerEvent,
//! };
//! use foldcast_testing::*;
//!
//! Customer::given_no_events("customer-123".to_string())
//!     // Create customer
//!     .when(|customer| customer.create("Lina Baker".to_string()))
//!     // Then ok
//!     .then_ok(CustomerEvent::Created {
//!         name: "Lina Baker".to_string(),
//!     })
//!     .apply()
//!     // Create customer again
//!     .when(|customer| customer.create("Lina Baker".to_string()))
//!     // Then error
//!     .then_err(CustomerError::AlreadyCreated);
//! ```

#![deny(missing_docs)]

use std::fmt;

use foldcast::aggregate::Aggregate;
use foldcast::event::IntoEvents;

/// An aggregate given events.
pub struct GivenTest<A>(A);

/// An aggregate when a command is performed.
pub struct WhenTest<A, R> {
    aggregate: A,
    result: R,
}

/// Given events for an aggregate.
pub trait Given: Aggregate + Sized {
    /// Given a single event for an aggregate.
    fn given(
        id: impl Into<<Self as Aggregate>::ID>,
        event: impl Into<<Self as Aggregate>::Event>,
    ) -> GivenTest<Self> {
        Self::given_events(id, vec![event.into()])
    }

    /// Given events for an aggregate.
    fn given_events(
        id: impl Into<<Self as Aggregate>::ID>,
        events: impl Into<Vec<<Self as Aggregate>::Event>>,
    ) -> GivenTest<Self> {
        let mut aggregate = Self::new(id.into());
        for event in events.into() {
            aggregate.apply(event);
        }
        GivenTest(aggregate)
    }

    /// Given no events for an aggregate.
    fn given_no_events(id: impl Into<<Self as Aggregate>::ID>) -> GivenTest<Self> {
        let aggregate = Self::new(id.into());
        GivenTest(aggregate)
    }
}

impl<A> Given for A where A: Aggregate + Sized {}

impl<A> GivenTest<A>
where
    A: Aggregate,
{
    /// When a command is applied.
    pub fn when<F, R>(mut self, f: F) -> WhenTest<A, R>
    where
        F: FnOnce(&mut A) -> R,
    {
        let result = f(&mut self.0);
        WhenTest {
            aggregate: self.0,
            result,
        }
    }

    /// Given previous events, the aggregate should equal the given state.
    pub fn should_eq<S>(self, state: S) -> Self
    where
        A: fmt::Debug + PartialEq<S>,
        S: fmt::Debug,
    {
        assert_eq!(self.0, state);
        self
    }

    /// Given previous events, the aggregate's state should be unchanged.
    pub fn should_be_unchanged(self) -> Self
    where
        A: fmt::Debug + PartialEq<A>,
        <A as Aggregate>::ID: Clone,
    {
        assert_eq!(self.0, A::new(self.0.id().clone()));
        self
    }
}

impl<A, R> WhenTest<A, R>
where
    A: Aggregate,
{
    /// Get the inner result from the previous when() action.
    pub fn into_result(self) -> R {
        self.result
    }

    /// Get the inner aggregate.
    pub fn into_state(self) -> A {
        self.aggregate
    }

    /// Then the result of the previous when() action should equal the given parameter.
    pub fn then<T>(self, result: T) -> WhenTest<A, R>
    where
        R: fmt::Debug + PartialEq<T>,
        T: fmt::Debug,
    {
        assert_eq!(self.result, result);
        self
    }
}

impl<A, R> WhenTest<A, R>
where
    A: Aggregate,
    R: IntoEvents<Event = <A as Aggregate>::Event>,
{
    /// Apply the events produced by the previous when() action.
    pub fn apply(self) -> GivenTest<A> {
        let WhenTest {
            mut aggregate,
            result,
        } = self;
        for event in result.into_events() {
            aggregate.apply(event);
        }
        GivenTest(aggregate)
    }
}

impl<A, R, E> WhenTest<A, Result<R, E>>
where
    A: Aggregate,
{
    /// Then the result of the previous when() action should be Ok(T), with T being equal the given parameter.
    pub fn then_ok<T>(self, result: T) -> WhenTest<A, R>
    where
        T: fmt::Debug,
        R: fmt::Debug,
        E: fmt::Debug,
        Result<R, E>: PartialEq<Result<T, E>>,
    {
        assert_eq!(self.result, Result::<T, E>::Ok(result));
        WhenTest {
            aggregate: self.aggregate,
            result: self.result.unwrap(),
        }
    }

    /// Then the result of the previous when() action should be Err(E), with E being equal the given parameter.
    pub fn then_err<T>(self, result: T) -> GivenTest<A>
    where
        T: fmt::Debug,
        R: fmt::Debug,
        E: fmt::Debug,
        Result<R, E>: PartialEq<Result<R, T>>,
    {
        assert_eq!(self.result, Result::<R, T>::Err(result));
        GivenTest(self.aggregate)
    }
}
