//! Process orchestration.
//!
//! This module turns the components of the service into [`LifecycleHook`]s and wires
//! them into one [`Lifecycle`]:
//!
//! | Order | State | Start | Stop |
//! |-------|-------|-------|------|
//! | 1 | `Connecting` | connect to the store, ping it | disconnect |
//! | 2 | `Listening` | bind the TCP listener | release the address |
//! | 3 | `Serving` | spawn the RPC server | stop accepting, drain in-flight calls |
//!
//! # Main Components
//!
//! - [`EventSystem`] - builds the lifecycle from a [`Config`](crate::config::Config) and a store
//! - [`shutdown_signal`] - resolves on SIGINT or SIGTERM
//!
//! [`LifecycleHook`]: eventhub_framework::LifecycleHook
//! [`Lifecycle`]: eventhub_framework::Lifecycle

mod event_system;
mod hooks;
mod signal;

pub use event_system::EventSystem;
pub use hooks::{ListenerHook, ListenerSlot, ServerHook, StoreHook};
pub use signal::shutdown_signal;
