//! # Framework Errors
//!
//! This module defines the error types produced by the generic machinery: the
//! projector and the lifecycle orchestrator. Application layers wrap these in their
//! own enums via `#[from]`.

use crate::state::LifecycleState;
use std::time::Duration;

/// Errors raised while projecting a record into a storage document.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("Record could not be serialized: {0}")]
    Serialize(#[from] bson::ser::Error),
    #[error("Record serialized to {0}, expected a document")]
    NotADocument(String),
    #[error("Fields collapse to the same storage key: {0}")]
    DuplicateKey(String),
}

/// Type alias for boxed hook errors.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the lifecycle orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Lifecycle already started (state: {0})")]
    AlreadyStarted(LifecycleState),
    #[error("Start hook '{hook}' failed: {source}")]
    Start {
        hook: String,
        #[source]
        source: HookError,
    },
    #[error("Hook '{hook}' timed out after {timeout:?}")]
    Timeout { hook: String, timeout: Duration },
    #[error("{failed} stop hook(s) failed")]
    Stop { failed: usize },
}
