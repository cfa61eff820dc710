//! Keyed, always-sorted view over the crew roster.
//!
//! `CrewProjection` owns a deduplicated mapping from crew id to record,
//! materialized as a sequence sorted ascending by `(name, id)`. Batches
//! of records are applied as upserts, and each application yields the
//! incremental changes (inserts, in-place updates, moves) a consumer
//! needs to redraw only the affected rows instead of rebuilding the
//! whole list.
//!
//! Writes must stay on a single context at a time; the roster service
//! serializes them on the affinity queue. Removal is out of scope -
//! the roster only grows or updates.

use crate::models::CrewMember;

/// One incremental change to the ordered view.
///
/// Indices describe the view at the moment the change applies, in
/// order: a `Moved` record is removed from `from` and re-inserted at
/// `to` (as positioned after the removal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterChange {
    /// A record with a new id entered the view at `index`.
    Inserted { index: usize, member: CrewMember },
    /// An existing record changed but kept its position.
    Updated { index: usize, member: CrewMember },
    /// An existing record changed and re-sorted to a new position.
    Moved {
        from: usize,
        to: usize,
        member: CrewMember,
    },
}

/// The keyed, sorted projection. Ids are unique; an upsert with a known
/// id replaces the prior record entirely.
#[derive(Debug, Default)]
pub struct CrewProjection {
    members: Vec<CrewMember>,
}

impl CrewProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a batch of records, returning the incremental changes in
    /// application order. Applying the same batch twice is a no-op the
    /// second time: identical records produce no change events.
    pub fn apply_batch<I>(&mut self, batch: I) -> Vec<RosterChange>
    where
        I: IntoIterator<Item = CrewMember>,
    {
        let mut changes = Vec::new();
        for member in batch {
            if let Some(change) = self.upsert(member) {
                changes.push(change);
            }
        }
        changes
    }

    fn upsert(&mut self, member: CrewMember) -> Option<RosterChange> {
        match self.members.iter().position(|m| m.id == member.id) {
            Some(old_index) => {
                if self.members[old_index] == member {
                    return None;
                }
                self.members.remove(old_index);
                let new_index = self.insertion_point(&member);
                self.members.insert(new_index, member.clone());
                if new_index == old_index {
                    Some(RosterChange::Updated {
                        index: new_index,
                        member,
                    })
                } else {
                    Some(RosterChange::Moved {
                        from: old_index,
                        to: new_index,
                        member,
                    })
                }
            }
            None => {
                let index = self.insertion_point(&member);
                self.members.insert(index, member.clone());
                Some(RosterChange::Inserted { index, member })
            }
        }
    }

    fn insertion_point(&self, member: &CrewMember) -> usize {
        match self
            .members
            .binary_search_by(|m| m.sort_key().cmp(&member.sort_key()))
        {
            Ok(index) | Err(index) => index,
        }
    }

    /// The live ordered view, sorted ascending by `(name, id)`.
    pub fn ordered(&self) -> &[CrewMember] {
        &self.members
    }

    /// Owned copy of the ordered view.
    pub fn snapshot(&self) -> Vec<CrewMember> {
        self.members.clone()
    }

    pub fn get(&self, id: &str) -> Option<&CrewMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CrewStatus;

    fn member(id: &str, name: &str) -> CrewMember {
        CrewMember {
            name: name.to_string(),
            agency: "NASA".to_string(),
            image: "https://example.com/img.png".parse().unwrap(),
            wikipedia: "https://example.com/wiki".parse().unwrap(),
            launches: vec![],
            status: CrewStatus::Active,
            id: id.to_string(),
        }
    }

    fn names(projection: &CrewProjection) -> Vec<&str> {
        projection.ordered().iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_batch_is_sorted_by_name() {
        let mut projection = CrewProjection::new();
        let changes = projection.apply_batch(vec![member("1", "Zed"), member("2", "Ann")]);

        assert_eq!(names(&projection), vec!["Ann", "Zed"]);
        assert_eq!(changes.len(), 2);
        assert!(matches!(changes[0], RosterChange::Inserted { index: 0, .. }));
        // Ann lands in front of the already-present Zed.
        assert!(matches!(changes[1], RosterChange::Inserted { index: 0, .. }));
    }

    #[test]
    fn test_update_reevaluates_sort_position() {
        let mut projection = CrewProjection::new();
        projection.apply_batch(vec![member("1", "Zed"), member("2", "Ann")]);

        let changes = projection.apply_batch(vec![member("1", "Aaa")]);

        assert_eq!(names(&projection), vec!["Aaa", "Ann"]);
        assert_eq!(
            changes,
            vec![RosterChange::Moved {
                from: 1,
                to: 0,
                member: member("1", "Aaa"),
            }]
        );
    }

    #[test]
    fn test_identical_batch_is_idempotent() {
        let mut projection = CrewProjection::new();
        let batch = vec![member("1", "Zed"), member("2", "Ann")];
        projection.apply_batch(batch.clone());

        let changes = projection.apply_batch(batch);

        assert!(changes.is_empty());
        assert_eq!(projection.len(), 2);
        assert_eq!(names(&projection), vec!["Ann", "Zed"]);
    }

    #[test]
    fn test_update_in_place_keeps_position() {
        let mut projection = CrewProjection::new();
        projection.apply_batch(vec![member("1", "Ann"), member("2", "Zed")]);

        let mut updated = member("1", "Ann");
        updated.agency = "ESA".to_string();
        let changes = projection.apply_batch(vec![updated.clone()]);

        assert_eq!(
            changes,
            vec![RosterChange::Updated {
                index: 0,
                member: updated,
            }]
        );
        assert_eq!(projection.get("1").unwrap().agency, "ESA");
    }

    #[test]
    fn test_equal_names_tie_break_on_id() {
        let mut projection = CrewProjection::new();
        projection.apply_batch(vec![member("b", "Ann"), member("a", "Ann")]);

        let ids: Vec<&str> = projection.ordered().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_upsert_replaces_whole_record() {
        let mut projection = CrewProjection::new();
        let mut original = member("1", "Ann");
        original.launches = vec!["l1".to_string()];
        projection.apply_batch(vec![original]);

        // The replacement has no launches; nothing merges over.
        projection.apply_batch(vec![member("1", "Ann")]);
        assert!(projection.get("1").unwrap().launches.is_empty());
        assert_eq!(projection.len(), 1);
    }
}
