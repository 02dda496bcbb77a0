//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate once per
//! process.
//!
//! ## Configuration
//!
//! - Log level comes from `RUST_LOG`, falling back to `info`.
//! - The default format is compact and hides the module prefix (`with_target(false)`);
//!   structured fields carry the context instead.
//! - `json = true` switches to one JSON object per line for log shippers.
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Full records at the RPC boundary
//! RUST_LOG=debug cargo run
//!
//! # Only lifecycle transitions
//! RUST_LOG=eventhub_framework::lifecycle=info cargo run
//! ```
//!
//! With `RUST_LOG=info` a boot and one create look like:
//!
//! ```text
//! INFO Starting hook="store" state=connecting
//! INFO Connected to MongoDB
//! INFO Starting hook="listener" state=listening
//! INFO Bound listener addr=127.0.0.1:50051
//! INFO Starting hook="server" state=serving
//! INFO Started hooks=3 state=serving
//! INFO NewEvent: Inserted new event id=65f1... event=Event { id: "65f1...", name: "A", .. }
//! ```

use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn setup_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // Don't fail when a test harness already installed a subscriber.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}
