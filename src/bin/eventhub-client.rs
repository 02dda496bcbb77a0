//! # eventhub-client
//!
//! Sends one `NewEvent` call to a running server and prints the stored event.
//!
//! ```bash
//! eventhub-client --name "Launch" --description "Product launch"
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use eventhub::proto::event_manager_client::EventManagerClient;
use eventhub::proto::Event;
use eventhub_framework::tracing::setup_tracing;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::info;

/// Create an event on an EventHub server.
#[derive(Parser, Debug)]
#[command(name = "eventhub-client", about = "Create an event on an EventHub server")]
struct Cli {
    /// Server address, `host:port` or a full URI.
    #[arg(long, default_value = "localhost:50051")]
    addr: String,

    /// Event name.
    #[arg(long, default_value = "Sample event")]
    name: String,

    /// Event description.
    #[arg(long, default_value = "")]
    description: String,

    /// Event timestamp. Defaults to the current Unix time in seconds.
    #[arg(long)]
    timestamp: Option<String>,

    /// Deadline for the call, in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

fn endpoint(addr: &str) -> String {
    if addr.contains("://") {
        addr.to_owned()
    } else {
        format!("http://{addr}")
    }
}

fn now() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(false);

    let endpoint = endpoint(&cli.addr);
    let mut client = EventManagerClient::connect(endpoint.clone())
        .await
        .with_context(|| format!("Failed to connect to {endpoint}"))?;

    let event = Event::new(
        cli.name,
        cli.description,
        cli.timestamp.unwrap_or_else(now),
    );
    let mut request = tonic::Request::new(event);
    request.set_timeout(Duration::from_secs(cli.timeout_secs));

    let created = client
        .new_event(request)
        .await
        .context("NewEvent failed")?
        .into_inner();

    info!(id = %created.id, "Created event");
    println!("{created:?}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["eventhub-client"]);
        assert_eq!(cli.addr, "localhost:50051");
        assert_eq!(cli.timeout_secs, 10);
        assert!(cli.timestamp.is_none());
    }

    #[test]
    fn endpoint_adds_scheme() {
        assert_eq!(endpoint("localhost:50051"), "http://localhost:50051");
        assert_eq!(endpoint("https://events.example.com"), "https://events.example.com");
    }

    #[test]
    fn now_is_unix_seconds() {
        assert!(now().parse::<u64>().unwrap() > 1_600_000_000);
    }
}
