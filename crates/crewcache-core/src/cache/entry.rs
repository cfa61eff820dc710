use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One persisted cache record: the serialized payload and the wall-clock
/// instant it stops being valid.
///
/// An entry is valid for reads iff `now < expires_at`. Expiration uses
/// wall-clock time with no allowance for clock skew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub payload: String,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Stamp a payload with `expires_at = now + ttl`.
    pub fn new(payload: String, ttl: Duration) -> Self {
        Self {
            payload,
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
