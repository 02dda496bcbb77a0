//! The lifecycle hooks of the service.
//!
//! The listener and the server are separate hooks so that the address is bound (and
//! observable) before the server loop starts, and released only after it has drained.
//! They share the bound socket through a [`ListenerSlot`].

use crate::service::EventService;
use crate::store::DocumentStore;
use async_trait::async_trait;
use eventhub_framework::{HookError, LifecycleHook};
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tracing::{debug, info, warn};

// =============================================================================
// STORE
// =============================================================================

/// Connects the document store on start and disconnects it on stop.
pub struct StoreHook<S> {
    store: Arc<S>,
}

impl<S: DocumentStore> StoreHook<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: DocumentStore> LifecycleHook for StoreHook<S> {
    fn name(&self) -> &str {
        "store"
    }

    async fn start(&mut self) -> Result<(), HookError> {
        self.store.connect().await?;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), HookError> {
        self.store.disconnect().await?;
        Ok(())
    }
}

// =============================================================================
// LISTENER
// =============================================================================

/// A bound listener handed from the [`ListenerHook`] to the [`ServerHook`].
///
/// The bound address stays readable after the server has taken the socket.
#[derive(Clone, Default)]
pub struct ListenerSlot {
    listener: Arc<Mutex<Option<TcpListener>>>,
    addr: Arc<OnceLock<SocketAddr>>,
}

impl ListenerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The address the listener was bound to, once bound.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.addr.get().copied()
    }

    fn put(&self, listener: TcpListener, addr: SocketAddr) {
        let _ = self.addr.set(addr);
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(listener);
    }

    fn take(&self) -> Option<TcpListener> {
        self.listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Binds the listen address on start.
pub struct ListenerHook {
    addr: String,
    slot: ListenerSlot,
}

impl ListenerHook {
    pub fn new(addr: impl Into<String>, slot: ListenerSlot) -> Self {
        Self {
            addr: addr.into(),
            slot,
        }
    }
}

#[async_trait]
impl LifecycleHook for ListenerHook {
    fn name(&self) -> &str {
        "listener"
    }

    async fn start(&mut self) -> Result<(), HookError> {
        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|e| format!("failed to bind {}: {e}", self.addr))?;
        let addr = listener.local_addr()?;
        self.slot.put(listener, addr);
        info!(%addr, "Bound listener");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), HookError> {
        // Present only if the server never took it.
        if let Some(listener) = self.slot.take() {
            drop(listener);
            info!(addr = ?self.slot.local_addr(), "Released listener");
        }
        Ok(())
    }
}

// =============================================================================
// SERVER
// =============================================================================

type ServeHandle = JoinHandle<Result<(), tonic::transport::Error>>;

/// Runs the RPC server on the bound listener.
///
/// Stop cancels the accept loop, which closes the listening socket at once, then
/// waits for in-flight calls to finish. Every call is cut off by `request_timeout`,
/// so the drain ends within it; `drain_timeout` only guards against a stuck
/// connection, and a drain that overruns it is aborted and reported as a failure.
pub struct ServerHook<S> {
    service: EventService<S>,
    slot: ListenerSlot,
    request_timeout: Duration,
    drain_timeout: Duration,
    running: Option<(CancellationToken, ServeHandle)>,
}

impl<S: DocumentStore> ServerHook<S> {
    pub fn new(
        service: EventService<S>,
        slot: ListenerSlot,
        request_timeout: Duration,
        drain_timeout: Duration,
    ) -> Self {
        Self {
            service,
            slot,
            request_timeout,
            drain_timeout,
            running: None,
        }
    }
}

const ACCEPT_BACKLOG: usize = 64;

// Owns the listener so that cancelling the token closes the socket, even while the
// server is still draining.
fn accept_until_cancelled(
    listener: TcpListener,
    token: CancellationToken,
) -> ReceiverStream<io::Result<TcpStream>> {
    let (tx, rx) = mpsc::channel(ACCEPT_BACKLOG);
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                () = token.cancelled() => break,
                accepted = listener.accept() => {
                    if tx.send(accepted.map(|(stream, _)| stream)).await.is_err() {
                        break;
                    }
                }
            }
        }
        debug!("Accept loop stopped");
    });
    ReceiverStream::new(rx)
}

#[async_trait]
impl<S: DocumentStore> LifecycleHook for ServerHook<S> {
    fn name(&self) -> &str {
        "server"
    }

    async fn start(&mut self) -> Result<(), HookError> {
        let listener = self.slot.take().ok_or("no bound listener to serve on")?;
        let token = CancellationToken::new();

        let serve = Server::builder()
            .timeout(self.request_timeout)
            .add_service(self.service.clone().into_server())
            .serve_with_incoming_shutdown(
                accept_until_cancelled(listener, token.clone()),
                token.clone().cancelled_owned(),
            );

        self.running = Some((token, tokio::spawn(serve)));
        info!(addr = ?self.slot.local_addr(), "Serving");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), HookError> {
        let Some((token, mut handle)) = self.running.take() else {
            return Ok(());
        };

        token.cancel();
        info!(timeout = ?self.drain_timeout, "Draining in-flight calls");
        match timeout(self.drain_timeout, &mut handle).await {
            Ok(Ok(Ok(()))) => {
                info!("Server drained");
                Ok(())
            }
            Ok(Ok(Err(e))) => {
                warn!(error = %e, "Server exited with an error");
                Err(e.into())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => {
                handle.abort();
                warn!(timeout = ?self.drain_timeout, "Drain overran, aborted pending calls");
                Err(format!("drain did not finish within {:?}", self.drain_timeout).into())
            }
        }
    }
}
