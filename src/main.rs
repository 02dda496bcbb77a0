//! # eventhub
//!
//! Server binary: parses the configuration, installs logging, and runs the
//! [`EventSystem`] until SIGINT or SIGTERM.
//!
//! Exits non-zero when boot fails (bad configuration, unreachable store, address in
//! use) or when shutdown could not complete cleanly.

use anyhow::{Context, Result};
use clap::Parser;
use eventhub::config::Config;
use eventhub::lifecycle::{shutdown_signal, EventSystem};
use eventhub::store::{MemoryStore, MongoStore};
use eventhub_framework::tracing::setup_tracing;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    setup_tracing(config.log_json);

    config.validate().context("Invalid configuration")?;
    info!(
        addr = %config.listen_addr(),
        store = ?config.store,
        in_memory = config.in_memory,
        "Starting EventHub"
    );

    let system = if config.in_memory {
        warn!("Using the in-memory store; events are lost on exit");
        EventSystem::new(&config, Arc::new(MemoryStore::new()))
    } else {
        EventSystem::new(&config, Arc::new(MongoStore::new(config.store.clone())))
    };

    if let Err(e) = system.run(shutdown_signal()).await {
        error!(error = %e, "EventHub stopped with an error");
        return Err(e).context("EventHub failed");
    }
    Ok(())
}
