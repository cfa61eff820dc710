//! Data models for the crew roster.
//!
//! - `CrewMember`: one roster entry as served by the remote API
//! - `CrewStatus`: the closed set of status literals
//! - `CrewDetail`: the biography projection of a member

pub mod crew;

pub use crew::{CrewDetail, CrewMember, CrewStatus};
