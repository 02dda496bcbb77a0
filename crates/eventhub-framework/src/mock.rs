//! # Mock Hooks & Testing Guide
//!
//! `MockHook` implements [`LifecycleHook`] without touching any real resource. Every
//! `start` and `stop` call is written to a shared [`Journal`], so a test can assert the
//! exact order in which the [`Lifecycle`](crate::Lifecycle) drove its hooks.
//!
//! ## When to use Mocks vs Real Hooks
//!
//! | Feature | MockHook | Real Hook |
//! |---------|----------|-----------|
//! | **Speed** | Instant | Binds sockets, opens connections |
//! | **Determinism** | 100% Deterministic | Subject to the network |
//! | **Error Injection** | Easy (`fail_start`, `fail_stop`) | Hard |
//! | **Use Case** | Ordering and failure policy | End-to-end boot |
//!
//! ## Example
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
//!         .append(LifecycleState::Serving, MockHook::new("server", &journal).fail_stop("boom"));
//!
//!     lifecycle.start().await.unwrap();
//!     assert!(lifecycle.stop().await.is_err());
//!
//!     journal.verify(&["start:store", "start:server", "stop:server", "stop:store"]);
//! }
//! ```
//!
//! The [`Journal`] is not tied to hooks: any test double (an in-memory store, a fake
//! server) can record into the same journal to assert cross-component ordering.

use crate::error::HookError;
use crate::hook::LifecycleHook;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// An append-only, shareable log of events.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.into());
    }

    /// A snapshot of all entries so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Position of the first entry equal to `entry`.
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == entry)
    }

    /// Panics unless the journal holds exactly `expected`, in order.
    pub fn verify(&self, expected: &[&str]) {
        let entries = self.entries();
        if entries != expected {
            panic!("Journal mismatch.\n  expected: {expected:?}\n  actual:   {entries:?}");
        }
    }
}

/// A lifecycle hook that records its calls and fails on request.
pub struct MockHook {
    name: String,
    journal: Journal,
    start_error: Option<String>,
    stop_error: Option<String>,
    start_delay: Option<Duration>,
}

impl MockHook {
    /// Creates a hook that succeeds and records `start:<name>` / `stop:<name>`.
    pub fn new(name: impl Into<String>, journal: &Journal) -> Self {
        Self {
            name: name.into(),
            journal: journal.clone(),
            start_error: None,
            stop_error: None,
            start_delay: None,
        }
    }

    /// Makes `start` fail with `message` (after recording the call).
    pub fn fail_start(mut self, message: impl Into<String>) -> Self {
        self.start_error = Some(message.into());
        self
    }

    /// Makes `stop` fail with `message` (after recording the call).
    pub fn fail_stop(mut self, message: impl Into<String>) -> Self {
        self.stop_error = Some(message.into());
        self
    }

    /// Sleeps for `delay` before `start` records anything.
    pub fn start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = Some(delay);
        self
    }
}

#[async_trait]
impl LifecycleHook for MockHook {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&mut self) -> Result<(), HookError> {
        if let Some(delay) = self.start_delay {
            tokio::time::sleep(delay).await;
        }
        self.journal.record(format!("start:{}", self.name));
        match &self.start_error {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }

    async fn stop(&mut self) -> Result<(), HookError> {
        self.journal.record(format!("stop:{}", self.name));
        match &self.stop_error {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }
}
