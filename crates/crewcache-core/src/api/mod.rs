//! Remote client for the SpaceX REST API.
//!
//! This module provides the `CrewApi` port and the `SpaceXClient`
//! implementation that fetches the raw crew roster payload. No retry or
//! backoff lives here; retries are the caller's prerogative.

pub mod client;
pub mod error;

pub use client::{CrewApi, SpaceXClient};
pub use error::ApiError;
