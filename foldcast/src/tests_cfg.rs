//! Fixture domains used in tests and examples.

pub mod customer;
