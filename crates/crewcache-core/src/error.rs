//! Error model for crew fetching.
//!
//! Every failure that can leave the repository boundary is one of three
//! kinds: the remote was unreachable or answered badly (`Network`), the
//! payload was present but structurally invalid (`Parsing`), or the
//! durable store itself failed (`Cache`). Consumers match exhaustively;
//! a `Parsing` failure means the client is likely out of date and is
//! surfaced more persistently than a transient network blip.

use thiserror::Error;

/// Failure classification for the notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Parsing,
    Cache,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::Parsing => write!(f, "parsing"),
            ErrorKind::Cache => write!(f, "cache"),
        }
    }
}

/// A typed crew-fetch failure. Exactly one variant holds; there is no
/// partial-success representation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrewError {
    #[error("network error: {0}")]
    Network(String),

    #[error("parsing error: {0}")]
    Parsing(String),

    #[error("cache error: {0}")]
    Cache(String),
}

impl CrewError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CrewError::Network(_) => ErrorKind::Network,
            CrewError::Parsing(_) => ErrorKind::Parsing,
            CrewError::Cache(_) => ErrorKind::Cache,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CrewError::Network(msg) | CrewError::Parsing(msg) | CrewError::Cache(msg) => msg,
        }
    }
}
