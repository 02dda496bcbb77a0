use super::hooks::{ListenerHook, ListenerSlot, ServerHook, StoreHook};
use crate::config::Config;
use crate::service::EventService;
use crate::store::DocumentStore;
use eventhub_framework::{Lifecycle, LifecycleError, LifecycleState};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// The running EventHub service: store, listener and RPC server behind one lifecycle.
///
/// `EventSystem` is responsible for:
/// - **Wiring**: the handler gets the shared store, the server gets the bound listener
/// - **Ordering**: connect before bind, bind before serve, and the reverse on shutdown
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(MemoryStore::new());
/// let mut system = EventSystem::new(&config, store);
///
/// system.start().await?;
/// println!("listening on {:?}", system.local_addr());
///
/// system.shutdown().await?;
/// ```
pub struct EventSystem {
    lifecycle: Lifecycle,
    listener: ListenerSlot,
}

impl EventSystem {
    /// Builds the lifecycle. Nothing is started until [`start`](Self::start).
    pub fn new<S: DocumentStore>(config: &Config, store: Arc<S>) -> Self {
        let listener = ListenerSlot::new();
        let service = EventService::new(store.clone());

        let mut lifecycle =
            Lifecycle::new().with_timeouts(config.start_timeout(), config.stop_timeout());
        lifecycle
            .append(LifecycleState::Connecting, StoreHook::new(store))
            .append(
                LifecycleState::Listening,
                ListenerHook::new(config.listen_addr(), listener.clone()),
            )
            .append(
                LifecycleState::Serving,
                ServerHook::new(
                    service,
                    listener.clone(),
                    config.request_timeout(),
                    config.drain_timeout(),
                ),
            );

        Self { lifecycle, listener }
    }

    /// Connects, binds and starts serving.
    ///
    /// On failure every component that already started is stopped again and the
    /// system ends in `Stopped`.
    pub async fn start(&mut self) -> Result<(), LifecycleError> {
        self.lifecycle.start().await?;
        info!(addr = ?self.local_addr(), "EventHub is serving");
        Ok(())
    }

    /// Stops accepting calls, drains in-flight ones, then disconnects the store.
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down EventHub...");
        self.lifecycle.stop().await?;
        info!("EventHub shutdown complete");
        Ok(())
    }

    /// Starts, serves until `signal` resolves, then shuts down.
    pub async fn run<F>(mut self, signal: F) -> Result<(), LifecycleError>
    where
        F: Future<Output = ()>,
    {
        self.start().await?;
        signal.await;
        self.shutdown().await
    }

    /// The bound address, once the listener has started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.lifecycle.subscribe()
    }
}
