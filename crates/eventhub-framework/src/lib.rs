//! # EventHub Framework
//!
//! This crate provides the domain-independent building blocks of the EventHub service:
//! a **schema-driven document projector** for persisting typed records, and a
//! **lifecycle orchestrator** that boots and drains a process deterministically.
//!
//! Nothing in here knows about events, gRPC, or MongoDB. The application crate plugs
//! its record types and its hooks into these abstractions.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into two layers:
//!
//! 1. **Record Layer** ([`Record`], [`project`]) - How a typed record becomes a storage document
//! 2. **Lifecycle Layer** ([`LifecycleHook`], [`Lifecycle`]) - When components start and stop
//!
//! ## Core Abstractions
//!
//! ### [`Record`] + [`project`] - Persisting Without Mapping Tables
//!
//! A record's fields are described by its derived `Serialize` implementation, generated
//! from the schema. [`project`] walks those fields in declaration order, drops the
//! identity field, and lowercases the first character of every key:
//!
//! ```rust
//! use eventhub_framework::{project, Record};
//! use serde::Serialize;
//!
//! #[derive(Debug, Serialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Event {
//!     id: String,
//!     name: String,
//!     timestamp: String,
//! }
//!
//! impl Record for Event {
//!     const COLLECTION: &'static str = "eventhub";
//!     fn identity(&self) -> &str { &self.id }
//!     fn assign_identity(&mut self, id: String) { self.id = id; }
//! }
//!
//! let event = Event { id: String::new(), name: "Launch".into(), timestamp: "T".into() };
//! let doc = project(&event).unwrap();
//! assert_eq!(doc, bson::doc! { "name": "Launch", "timestamp": "T" });
//! ```
//!
//! Adding a field to the schema adds it to the persisted document. There is no table
//! to keep in lock-step.
//!
//! ### [`Lifecycle`] - Deterministic Boot and Drain
//!
//! Components register a [`LifecycleHook`] together with the [`LifecycleState`] the
//! system is in while that hook starts. Start hooks run in registration order, stop
//! hooks in reverse:
//!
//! ```rust
//! use eventhub_framework::mock::{Journal, MockHook};
//! use eventhub_framework::{Lifecycle, LifecycleState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let journal = Journal::new();
//!     let mut lifecycle = Lifecycle::new();
//!     lifecycle
//!         .append(LifecycleState::Connecting, MockHook::new("store", &journal))
//!         .append(LifecycleState::Listening, MockHook::new("listener", &journal))
//!         .append(LifecycleState::Serving, MockHook::new("server", &journal));
//!
//!     lifecycle.start().await.unwrap();
//!     lifecycle.stop().await.unwrap();
//!
//!     journal.verify(&[
//!         "start:store", "start:listener", "start:server",
//!         "stop:server", "stop:listener", "stop:store",
//!     ]);
//! }
//! ```
//!
//! ## Failure Policy
//!
//! - **Start failure**: fatal. Already-started hooks are stopped in reverse order and
//!   the error is returned so the binary can exit non-zero.
//! - **Stop failure**: logged; the remaining stop hooks still run.
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MockHook`](mock::MockHook) and a shared
//! [`Journal`](mock::Journal) to assert ordering without sockets or databases.

pub mod error;
pub mod hook;
pub mod lifecycle;
pub mod mock;
pub mod projection;
pub mod record;
pub mod state;
pub mod tracing;

// Re-export core types for convenience
pub use error::{HookError, LifecycleError, ProjectionError};
pub use hook::LifecycleHook;
pub use lifecycle::Lifecycle;
pub use projection::{project, storage_key};
pub use record::Record;
pub use state::LifecycleState;

// Re-export bson so dependents agree on the document type
pub use bson;
