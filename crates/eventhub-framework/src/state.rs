//! Lifecycle states.

use std::fmt;

/// The states a [`Lifecycle`](crate::Lifecycle) moves through.
///
/// ```text
/// Uninitialized -> Connecting -> Listening -> Serving -> Draining -> Stopped
/// ```
///
/// A failed start jumps straight to `Stopped` after rolling back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    Uninitialized,
    Connecting,
    Listening,
    Serving,
    Draining,
    Stopped,
}

impl LifecycleState {
    /// Whether the system has finished (or abandoned) its shutdown.
    pub fn is_terminal(self) -> bool {
        self == LifecycleState::Stopped
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Connecting => "connecting",
            LifecycleState::Listening => "listening",
            LifecycleState::Serving => "serving",
            LifecycleState::Draining => "draining",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
