//! # EventHub
//!
//! A gRPC service that accepts event records and persists them as documents in MongoDB.
//!
//! ## Module Tour
//!
//! ### 1. The Contract ([`proto`], [`model`])
//! The wire schema in `proto/eventhub.proto` is compiled at build time. The generated
//! [`Event`](model::Event) type derives `Serialize`, which is what the projector in
//! [`eventhub_framework`] uses to build the stored document. The model module only adds
//! the [`Record`](eventhub_framework::Record) binding.
//!
//! ### 2. The Gateway ([`store`])
//! [`DocumentStore`](store::DocumentStore) is the seam between the RPC handler and the
//! database. [`MongoStore`](store::MongoStore) talks to a real cluster,
//! [`MemoryStore`](store::MemoryStore) keeps documents in process for tests and
//! local runs.
//!
//! ### 3. The Handler ([`service`])
//! [`EventService`](service::EventService) implements the `EventManager` RPC surface.
//! `NewEvent` persists; every other method reports `UNIMPLEMENTED`.
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! [`EventSystem`](lifecycle::EventSystem) wires the store, the listener and the server
//! into a [`Lifecycle`](eventhub_framework::Lifecycle): connect, bind, serve, and the
//! reverse on shutdown.
//!
//! ## Running
//!
//! ```bash
//! MONGO_USERNAME=svc MONGO_PW=... MONGO_URL=cluster0.example.mongodb.net \
//!     RUST_LOG=info cargo run --bin eventhub
//!
//! # Without a database
//! cargo run --bin eventhub -- --in-memory
//! ```

pub mod config;
pub mod lifecycle;
pub mod model;
pub mod service;
pub mod store;

/// Code generated from `proto/eventhub.proto`.
pub mod proto {
    tonic::include_proto!("eventhub");
}
