//! Fire-and-forget failure notifications.
//!
//! An `AlertSink` receives each crew-fetch failure exactly once, as a
//! one-way non-blocking dispatch: callers never await or depend on the
//! delivery. `Parsing` failures are surfaced more persistently than
//! `Network`/`Cache` ones - a payload the client can no longer read
//! usually means the app itself needs an update, not that the user
//! should retry.

use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::error::{CrewError, ErrorKind};

/// One-way failure sink. Implementations must not block.
pub trait AlertSink: Send + Sync {
    fn notify(&self, error: &CrewError);
}

/// Logs failures through `tracing`, with parsing failures at error
/// level so they stand out in any log pipeline.
pub struct TracingAlerts;

impl AlertSink for TracingAlerts {
    fn notify(&self, error: &CrewError) {
        match error.kind() {
            ErrorKind::Parsing => {
                error!(message = error.message(), "Crew payload unreadable; an app update may be required");
            }
            ErrorKind::Network | ErrorKind::Cache => {
                warn!(kind = %error.kind(), message = error.message(), "Crew refresh failed");
            }
        }
    }
}

/// Forwards failures into an unbounded channel for a presentation layer
/// to drain and render. Sending never blocks; if the consumer is gone
/// the notification is dropped.
pub struct ChannelAlerts {
    tx: mpsc::UnboundedSender<CrewError>,
}

impl ChannelAlerts {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CrewError>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AlertSink for ChannelAlerts {
    fn notify(&self, error: &CrewError) {
        let _ = self.tx.send(error.clone());
    }
}
