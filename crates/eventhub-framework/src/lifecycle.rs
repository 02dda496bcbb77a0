//! # Lifecycle Orchestrator
//!
//! This module defines the `Lifecycle`, the small object that owns every
//! [`LifecycleHook`] of a process and runs them deterministically.
//!
//! ## Ordering
//!
//! - **Start** hooks run in registration order. Each hook is registered together with
//!   the [`LifecycleState`] the system enters while it starts, so the observable state
//!   follows the boot sequence (e.g. `Connecting` while the store connects,
//!   `Listening` while the listener binds, `Serving` once the server loop runs).
//! - **Stop** hooks run in reverse registration order, so dependents are torn down
//!   before their dependencies.
//!
//! ## Failure Policy
//!
//! - A start failure (or start timeout) is fatal. Hooks that already started are
//!   stopped in reverse order, the state becomes `Stopped`, and the error is returned.
//! - A stop failure (or stop timeout) is logged and counted. The remaining stop hooks
//!   still run.

use crate::error::LifecycleError;
use crate::hook::LifecycleHook;
use crate::state::LifecycleState;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Default upper bound for a single start hook.
pub const DEFAULT_START_TIMEOUT: Duration = Duration::from_secs(15);

/// Default upper bound for a single stop hook.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(30);

struct Registered {
    state: LifecycleState,
    hook: Box<dyn LifecycleHook>,
}

/// Ordered start/stop orchestration for a set of hooks.
///
/// # Usage Pattern
///
/// 1.  **Register**: `append` each hook with the state it starts in.
/// 2.  **Start**: `start()` boots everything or fails without leaving half-started hooks.
/// 3.  **Stop**: `stop()` drains in reverse order.
///
/// ```rust
/// use eventhub_framework::{HookError, Lifecycle, LifecycleHook, LifecycleState};
/// use async_trait::async_trait;
///
/// struct Noop(&'static str);
///
/// #[async_trait]
/// impl LifecycleHook for Noop {
///     fn name(&self) -> &str { self.0 }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let mut lifecycle = Lifecycle::new();
///     lifecycle
///         .append(LifecycleState::Connecting, Noop("store"))
///         .append(LifecycleState::Serving, Noop("server"));
///
///     lifecycle.start().await.unwrap();
///     assert_eq!(lifecycle.state(), LifecycleState::Serving);
///
///     lifecycle.stop().await.unwrap();
///     assert_eq!(lifecycle.state(), LifecycleState::Stopped);
/// }
/// ```
pub struct Lifecycle {
    hooks: Vec<Registered>,
    started: usize,
    state: watch::Sender<LifecycleState>,
    start_timeout: Duration,
    stop_timeout: Duration,
}

impl Lifecycle {
    /// Creates an empty lifecycle in the `Uninitialized` state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(LifecycleState::Uninitialized);
        Self {
            hooks: Vec::new(),
            started: 0,
            state,
            start_timeout: DEFAULT_START_TIMEOUT,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }

    /// Overrides the per-hook start and stop timeouts.
    pub fn with_timeouts(mut self, start: Duration, stop: Duration) -> Self {
        self.start_timeout = start;
        self.stop_timeout = stop;
        self
    }

    /// Registers a hook. `state` is entered right before the hook's `start` runs.
    pub fn append(&mut self, state: LifecycleState, hook: impl LifecycleHook) -> &mut Self {
        self.hooks.push(Registered {
            state,
            hook: Box::new(hook),
        });
        self
    }

    /// The current state.
    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// A receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Runs every start hook in registration order.
    ///
    /// On failure the already-started hooks are stopped in reverse order and the
    /// lifecycle ends in `Stopped`.
    pub async fn start(&mut self) -> Result<(), LifecycleError> {
        let current = self.state();
        if current != LifecycleState::Uninitialized {
            return Err(LifecycleError::AlreadyStarted(current));
        }

        let start_timeout = self.start_timeout;
        for index in 0..self.hooks.len() {
            let Registered { state, hook } = &mut self.hooks[index];
            self.state.send_replace(*state);

            let name = hook.name().to_owned();
            info!(hook = %name, state = %state, "Starting");

            let outcome = match timeout(start_timeout, hook.start()).await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(source)) => Err(LifecycleError::Start {
                    hook: name.clone(),
                    source,
                }),
                Err(_) => Err(LifecycleError::Timeout {
                    hook: name.clone(),
                    timeout: start_timeout,
                }),
            };

            if let Err(e) = outcome {
                error!(hook = %name, error = %e, "Start failed, rolling back");
                self.unwind().await;
                self.state.send_replace(LifecycleState::Stopped);
                return Err(e);
            }
            self.started = index + 1;
        }

        info!(hooks = self.started, state = %self.state(), "Started");
        Ok(())
    }

    /// Runs the stop hooks of every started hook in reverse order.
    ///
    /// Calling `stop` on a lifecycle that never started, or that already stopped, is a
    /// no-op that leaves it in `Stopped`.
    pub async fn stop(&mut self) -> Result<(), LifecycleError> {
        let current = self.state();
        if current.is_terminal() {
            return Ok(());
        }
        if current == LifecycleState::Uninitialized {
            self.state.send_replace(LifecycleState::Stopped);
            return Ok(());
        }

        self.state.send_replace(LifecycleState::Draining);
        info!(hooks = self.started, "Draining");

        let failed = self.unwind().await;
        self.state.send_replace(LifecycleState::Stopped);

        if failed > 0 {
            warn!(failed, "Stopped with failures");
            return Err(LifecycleError::Stop { failed });
        }
        info!("Stopped");
        Ok(())
    }

    /// Starts, waits for `shutdown` to resolve, then stops.
    pub async fn run<F>(mut self, shutdown: F) -> Result<(), LifecycleError>
    where
        F: Future<Output = ()>,
    {
        self.start().await?;
        shutdown.await;
        info!("Shutdown signal received");
        self.stop().await
    }

    // Stops started hooks in reverse; returns how many failed.
    async fn unwind(&mut self) -> usize {
        let stop_timeout = self.stop_timeout;
        let mut failed = 0;

        for Registered { hook, .. } in self.hooks[..self.started].iter_mut().rev() {
            let name = hook.name().to_owned();
            match timeout(stop_timeout, hook.stop()).await {
                Ok(Ok(())) => info!(hook = %name, "Stopped hook"),
                Ok(Err(e)) => {
                    failed += 1;
                    error!(hook = %name, error = %e, "Stop hook failed");
                }
                Err(_) => {
                    failed += 1;
                    error!(hook = %name, timeout = ?stop_timeout, "Stop hook timed out");
                }
            }
        }

        self.started = 0;
        failed
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Journal, MockHook};

    fn lifecycle(journal: &Journal) -> Lifecycle {
        let mut lifecycle = Lifecycle::new();
        lifecycle
            .append(LifecycleState::Connecting, MockHook::new("store", journal))
            .append(LifecycleState::Listening, MockHook::new("listener", journal))
            .append(LifecycleState::Serving, MockHook::new("server", journal));
        lifecycle
    }

    #[tokio::test]
    async fn starts_in_order_and_stops_in_reverse() {
        let journal = Journal::new();
        let mut lifecycle = lifecycle(&journal);

        lifecycle.start().await.unwrap();
        assert_eq!(lifecycle.state(), LifecycleState::Serving);
        lifecycle.stop().await.unwrap();
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);

        journal.verify(&[
            "start:store",
            "start:listener",
            "start:server",
            "stop:server",
            "stop:listener",
            "stop:store",
        ]);
    }

    #[tokio::test]
    async fn failed_start_rolls_back_started_hooks() {
        let journal = Journal::new();
        let mut lifecycle = Lifecycle::new();
        lifecycle
            .append(LifecycleState::Connecting, MockHook::new("store", &journal))
            .append(
                LifecycleState::Listening,
                MockHook::new("listener", &journal).fail_start("address in use"),
            )
            .append(LifecycleState::Serving, MockHook::new("server", &journal));

        let err = lifecycle.start().await.unwrap_err();
        assert!(matches!(err, LifecycleError::Start { ref hook, .. } if hook == "listener"));
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);

        journal.verify(&["start:store", "start:listener", "stop:store"]);
    }

    #[tokio::test]
    async fn failed_start_never_reaches_serving() {
        let journal = Journal::new();
        let mut lifecycle = Lifecycle::new();
        lifecycle
            .append(
                LifecycleState::Connecting,
                MockHook::new("store", &journal).fail_start("ping failed"),
            )
            .append(LifecycleState::Serving, MockHook::new("server", &journal));

        let mut states = lifecycle.subscribe();
        let watcher = tokio::spawn(async move {
            let mut seen = vec![*states.borrow_and_update()];
            while states.changed().await.is_ok() {
                seen.push(*states.borrow_and_update());
            }
            seen
        });

        assert!(lifecycle.start().await.is_err());
        drop(lifecycle);

        let seen = watcher.await.unwrap();
        assert!(!seen.contains(&LifecycleState::Serving));
        assert_eq!(seen.last(), Some(&LifecycleState::Stopped));
        journal.verify(&["start:store"]);
    }

    #[tokio::test]
    async fn stop_failure_does_not_block_later_hooks() {
        let journal = Journal::new();
        let mut lifecycle = Lifecycle::new();
        lifecycle
            .append(LifecycleState::Connecting, MockHook::new("store", &journal))
            .append(
                LifecycleState::Serving,
                MockHook::new("server", &journal).fail_stop("drain failed"),
            );

        lifecycle.start().await.unwrap();
        let err = lifecycle.stop().await.unwrap_err();

        assert!(matches!(err, LifecycleError::Stop { failed: 1 }));
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
        journal.verify(&["start:store", "start:server", "stop:server", "stop:store"]);
    }

    #[tokio::test]
    async fn start_timeout_is_fatal() {
        let journal = Journal::new();
        let mut lifecycle = Lifecycle::new()
            .with_timeouts(Duration::from_millis(20), Duration::from_secs(1));
        lifecycle.append(
            LifecycleState::Connecting,
            MockHook::new("store", &journal).start_delay(Duration::from_secs(5)),
        );

        let err = lifecycle.start().await.unwrap_err();
        assert!(matches!(err, LifecycleError::Timeout { ref hook, .. } if hook == "store"));
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn start_twice_is_rejected() {
        let journal = Journal::new();
        let mut lifecycle = lifecycle(&journal);
        lifecycle.start().await.unwrap();

        let err = lifecycle.start().await.unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::AlreadyStarted(LifecycleState::Serving)
        ));
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let journal = Journal::new();
        let mut lifecycle = lifecycle(&journal);
        lifecycle.start().await.unwrap();
        lifecycle.stop().await.unwrap();
        lifecycle.stop().await.unwrap();

        assert_eq!(journal.entries().len(), 6);
    }

    #[tokio::test]
    async fn stop_without_start_runs_no_hooks() {
        let journal = Journal::new();
        let mut lifecycle = lifecycle(&journal);
        lifecycle.stop().await.unwrap();

        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
        assert!(journal.entries().is_empty());
    }

    #[tokio::test]
    async fn run_stops_after_shutdown_signal() {
        let journal = Journal::new();
        let lifecycle = lifecycle(&journal);
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(lifecycle.run(async {
            let _ = rx.await;
        }));
        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();

        assert_eq!(journal.entries().len(), 6);
        assert_eq!(journal.entries().last().unwrap(), "stop:store");
    }
}
