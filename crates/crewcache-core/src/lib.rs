//! crewcache core - synchronize the SpaceX crew roster with a local
//! durable cache and present it as an observable, sorted collection.
//!
//! The pieces, leaves first:
//!
//! - [`error`]: the three-kind failure model (network, parsing, cache)
//! - [`models`]: crew records and the status enumeration
//! - [`api`]: the remote client port and its reqwest implementation
//! - [`cache`]: the durable blob store with per-entry expiration
//! - [`sched`]: explicit background/affinity execution contexts
//! - [`repository`]: cache-or-fetch orchestration with a busy flag
//! - [`projection`]: the keyed, always-sorted incremental view
//! - [`alerts`]: fire-and-forget failure notification sinks
//! - [`roster`]: the service tying fetch outcomes to the projection

pub mod alerts;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod projection;
pub mod repository;
pub mod roster;
pub mod sched;

pub use alerts::{AlertSink, ChannelAlerts, TracingAlerts};
pub use config::Config;
pub use error::{CrewError, ErrorKind};
pub use models::{CrewDetail, CrewMember, CrewStatus};
pub use projection::{CrewProjection, RosterChange};
pub use repository::{CrewRepository, FetchResult};
pub use roster::RosterService;
pub use sched::{AffinityQueue, Scheduler};
