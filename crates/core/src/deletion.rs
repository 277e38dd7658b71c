//! Deletion guard: a node may only be removed once nothing hangs off it.
//!
//! Deletes never cascade. Children are checked before dependent content so
//! the message points at the structural problem first.

use std::collections::{HashMap, HashSet};

use crate::error::CoreError;
use crate::tree::NodeKind;
use crate::types::DbId;

/// What the store knows about a node that is about to be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionCandidate {
    pub id: DbId,
    /// Display name (category name, menu item title).
    pub name: String,
    pub child_count: i64,
    pub dependent_count: i64,
}

/// Reject deletion of a node that still has children or dependents.
pub fn check_deletable(kind: &NodeKind, candidate: &DeletionCandidate) -> Result<(), CoreError> {
    let label = kind.label(&candidate.name);
    if candidate.child_count > 0 {
        return Err(CoreError::HasChildren(format!(
            "{label} has {}",
            kind.children
        )));
    }
    if candidate.dependent_count > 0 {
        let noun = if candidate.dependent_count == 1 {
            kind.dependent
        } else {
            kind.dependents
        };
        return Err(CoreError::HasDependents(format!(
            "{label} has {} {noun}",
            candidate.dependent_count
        )));
    }
    Ok(())
}

/// Outcome of splitting a bulk delete request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeletePlan {
    /// Ids that passed the guard, in request order.
    pub deletable: Vec<DbId>,
    /// One human-readable reason per refused id, in request order.
    pub blocked: Vec<String>,
}

/// Split `requested` ids into deletable ones and named refusals.
///
/// `found` holds the candidates the store could load; requested ids with no
/// candidate are reported as not found. Repeated ids are considered once.
pub fn partition_bulk(
    kind: &NodeKind,
    requested: &[DbId],
    found: Vec<DeletionCandidate>,
) -> BulkDeletePlan {
    let mut by_id: HashMap<DbId, DeletionCandidate> =
        found.into_iter().map(|c| (c.id, c)).collect();
    let mut seen = HashSet::with_capacity(requested.len());
    let mut plan = BulkDeletePlan::default();

    for &id in requested {
        if !seen.insert(id) {
            continue;
        }
        match by_id.remove(&id) {
            Some(candidate) => match check_deletable(kind, &candidate) {
                Ok(()) => plan.deletable.push(id),
                Err(err) => plan.blocked.push(err.to_string()),
            },
            None => plan.blocked.push(format!("{} {id} not found", kind.name)),
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::tree::{CATEGORY, MENU_ITEM};

    fn candidate(id: DbId, name: &str, child_count: i64, dependent_count: i64) -> DeletionCandidate {
        DeletionCandidate {
            id,
            name: name.to_string(),
            child_count,
            dependent_count,
        }
    }

    #[test]
    fn test_leaf_without_dependents_is_deletable() {
        assert!(check_deletable(&CATEGORY, &candidate(1, "Design", 0, 0)).is_ok());
    }

    #[test]
    fn test_children_block_deletion() {
        let err = check_deletable(&CATEGORY, &candidate(1, "Programming", 1, 0)).unwrap_err();
        assert_matches!(err, CoreError::HasChildren(_));
        assert_eq!(err.to_string(), "Category 'Programming' has child categories");
    }

    #[test]
    fn test_dependents_block_deletion() {
        let err = check_deletable(&CATEGORY, &candidate(1, "Programming", 0, 3)).unwrap_err();
        assert_matches!(err, CoreError::HasDependents(_));
        assert_eq!(err.to_string(), "Category 'Programming' has 3 courses");
    }

    #[test]
    fn test_single_dependent_is_singular() {
        let err = check_deletable(&CATEGORY, &candidate(1, "Programming", 0, 1)).unwrap_err();
        assert_eq!(err.to_string(), "Category 'Programming' has 1 course");
    }

    #[test]
    fn test_children_are_reported_before_dependents() {
        let err = check_deletable(&CATEGORY, &candidate(1, "Programming", 2, 5)).unwrap_err();
        assert_matches!(err, CoreError::HasChildren(_));
    }

    #[test]
    fn test_menu_item_message() {
        let err = check_deletable(&MENU_ITEM, &candidate(7, "Reports", 1, 0)).unwrap_err();
        assert_eq!(err.to_string(), "Menu item 'Reports' has child items");
    }

    #[test]
    fn test_bulk_partial_success() {
        let plan = partition_bulk(
            &CATEGORY,
            &[1, 2, 3],
            vec![
                candidate(1, "Design", 0, 0),
                candidate(2, "Programming", 1, 0),
                candidate(3, "Music", 0, 0),
            ],
        );
        assert_eq!(plan.deletable, vec![1, 3]);
        assert_eq!(plan.blocked, vec!["Category 'Programming' has child categories"]);
    }

    #[test]
    fn test_bulk_reports_missing_and_ignores_repeats() {
        let plan = partition_bulk(
            &CATEGORY,
            &[1, 42, 1],
            vec![candidate(1, "Design", 0, 0)],
        );
        assert_eq!(plan.deletable, vec![1]);
        assert_eq!(plan.blocked, vec!["Category 42 not found"]);
    }

    #[test]
    fn test_bulk_empty_request() {
        let plan = partition_bulk(&CATEGORY, &[], vec![]);
        assert!(plan.deletable.is_empty());
        assert!(plan.blocked.is_empty());
    }
}
