//! crewcache - a terminal front-end for the cached SpaceX crew roster.
//!
//! Wires the core components together, drives the affinity queue, and
//! renders the sorted roster. Network and cache failures print as
//! transient one-line notices; a parsing failure prints a persistent
//! block, since it usually means this client is out of date.

use std::io;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crewcache_core::api::SpaceXClient;
use crewcache_core::cache::FileStore;
use crewcache_core::{
    ChannelAlerts, Config, CrewRepository, ErrorKind, RosterService, Scheduler,
};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let force_refresh = args.iter().any(|a| a == "--refresh" || a == "-r");

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });

    let client = match &config.api_base_url {
        Some(base) => SpaceXClient::with_base_url(base.clone())?,
        None => SpaceXClient::new()?,
    };
    let store = Arc::new(FileStore::new(config.cache_dir()?)?);

    let (sched, mut queue) = Scheduler::new(tokio::runtime::Handle::current());
    let repo = match config.cache_ttl() {
        Some(ttl) => CrewRepository::with_ttl(sched.clone(), Arc::new(client), store, ttl),
        None => CrewRepository::new(sched.clone(), Arc::new(client), store),
    };

    let (alerts, mut alerts_rx) = ChannelAlerts::new();
    let service = RosterService::new(sched, Arc::new(repo), Arc::new(alerts));

    info!(force_refresh, "crewcache starting");

    // Show progress whenever the repository raises its busy flag.
    let mut busy_rx = service.busy_changes();
    let busy_watcher = tokio::spawn(async move {
        while busy_rx.changed().await.is_ok() {
            if *busy_rx.borrow() {
                eprintln!("Refreshing crew roster...");
            }
        }
    });

    service.load(force_refresh).await;
    queue.drain();
    busy_watcher.abort();

    let mut failed = false;
    while let Ok(error) = alerts_rx.try_recv() {
        failed = true;
        match error.kind() {
            ErrorKind::Parsing => {
                eprintln!("----------------------------------------------------------");
                eprintln!("The roster data could not be read:");
                eprintln!("  {}", error.message());
                eprintln!("This usually means crewcache itself is out of date.");
                eprintln!("Please update to the latest release.");
                eprintln!("----------------------------------------------------------");
            }
            ErrorKind::Network | ErrorKind::Cache => {
                eprintln!("warning: {}", error);
            }
        }
    }

    let crew = service.snapshot();
    if crew.is_empty() {
        if failed {
            anyhow::bail!("crew roster unavailable");
        }
        println!("No crew records available.");
        return Ok(());
    }

    println!(
        "{:<28} {:<14} {:<10} {:>8}",
        "NAME", "AGENCY", "STATUS", "LAUNCHES"
    );
    for member in &crew {
        println!(
            "{:<28} {:<14} {:<10} {:>8}",
            member.name,
            member.agency,
            member.status.to_string(),
            member.launches.len()
        );
    }

    Ok(())
}
