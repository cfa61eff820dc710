use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CrewError;

/// Membership status as reported by the remote API.
///
/// The wire values are the case-sensitive literals `"active"`,
/// `"inactive"`, `"retired"`, `"unknown"`. Anything else fails the
/// whole payload; an unrecognized status is never coerced to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrewStatus {
    Active,
    Inactive,
    Retired,
    Unknown,
}

impl std::fmt::Display for CrewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrewStatus::Active => write!(f, "Active"),
            CrewStatus::Inactive => write!(f, "Inactive"),
            CrewStatus::Retired => write!(f, "Retired"),
            CrewStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One crew roster entry.
///
/// Identity is `id`: two records with the same `id` but different other
/// fields are an update, not a duplicate. `image` and `wikipedia` must
/// be absolute URIs; `Url` parsing rejects relative references, so a
/// bad link fails the payload at the parsing layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub agency: String,
    pub image: Url,
    pub wikipedia: Url,
    pub launches: Vec<String>,
    pub status: CrewStatus,
    pub id: String,
}

impl CrewMember {
    /// Parse a serialized roster. Any structural deviation - missing
    /// field, wrong type, relative URI, unrecognized status - fails the
    /// entire payload as `Parsing`.
    pub fn roster_from_json(json: &str) -> Result<Vec<CrewMember>, CrewError> {
        serde_json::from_str(json).map_err(|e| CrewError::Parsing(e.to_string()))
    }

    /// Serialize a roster for persistence.
    pub fn roster_to_json(roster: &[CrewMember]) -> Result<String, CrewError> {
        serde_json::to_string(roster).map_err(|e| CrewError::Parsing(e.to_string()))
    }

    /// Total-order sort key: ascending by name, id as the tie-break so
    /// equal names still order deterministically.
    pub fn sort_key(&self) -> (&str, &str) {
        (self.name.as_str(), self.id.as_str())
    }
}

/// Biography projection of a crew member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewDetail {
    pub name: String,
    pub image: Url,
    pub wikipedia: Url,
}

impl From<&CrewMember> for CrewDetail {
    fn from(member: &CrewMember) -> Self {
        Self {
            name: member.name.clone(),
            image: member.image.clone(),
            wikipedia: member.wikipedia.clone(),
        }
    }
}
