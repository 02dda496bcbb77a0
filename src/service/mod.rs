//! The `EventManager` RPC surface.

mod error;
mod event_manager;

pub use error::ServiceError;
pub use event_manager::EventService;
