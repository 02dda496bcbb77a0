//! Persisted record types.
//!
//! The wire types are generated from the schema; this module binds them to the
//! [`Record`](eventhub_framework::Record) contract so the projector can store them.

pub mod event;

pub use crate::proto::Event;
