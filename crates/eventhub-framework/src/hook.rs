//! # LifecycleHook Trait
//!
//! A `LifecycleHook` is one component's participation in process startup and shutdown:
//! a store connection, a listener, a server loop. The [`Lifecycle`](crate::Lifecycle)
//! owns an ordered list of hooks and decides *when* they run; the hook only knows
//! *what* to do.
//!
//! # Provided Methods
//! Both [`LifecycleHook::start`] and [`LifecycleHook::stop`] have default
//! implementations that do nothing (`Ok(())`). A hook that only needs teardown
//! implements `stop`, and vice versa.

use crate::error::HookError;
use async_trait::async_trait;

/// One component's start/stop pair.
///
/// # Example
///
/// ```rust
/// use eventhub_framework::{HookError, LifecycleHook};
/// use async_trait::async_trait;
///
/// struct Banner;
///
/// #[async_trait]
/// impl LifecycleHook for Banner {
///     fn name(&self) -> &str {
///         "banner"
///     }
///
///     async fn start(&mut self) -> Result<(), HookError> {
///         println!("hello");
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait LifecycleHook: Send + 'static {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Called once at boot, in registration order.
    async fn start(&mut self) -> Result<(), HookError> {
        Ok(())
    }

    /// Called once at shutdown, in reverse registration order.
    ///
    /// Only called for hooks whose `start` completed.
    async fn stop(&mut self) -> Result<(), HookError> {
        Ok(())
    }
}
