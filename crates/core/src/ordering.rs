//! Sibling ordering: create-time sequence numbers and batch reorder planning.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::hierarchy::check_reparent;
use crate::tree::ParentMap;
use crate::types::{nullable_patch, DbId};

/// Sort order for a node appended to a sibling group whose current
/// maximum is `current_max` (`None` when the group is empty).
pub fn next_sibling_order(current_max: Option<i32>) -> i32 {
    match current_max {
        Some(max) => max.saturating_add(1),
        None => 0,
    }
}

/// One entry of a reorder batch.
///
/// `parent_id` is optional: when the key is absent only the order changes;
/// when present (`null` or an id) the node is also moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub id: DbId,
    pub order: i32,
    #[serde(
        default,
        deserialize_with = "nullable_patch",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<DbId>>,
}

impl ReorderEntry {
    pub fn moves(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Validate a reorder batch against the current links of one collection.
///
/// The batch fails as a whole if it is empty, lists an id twice, or names
/// an id that is not in `parents`. Moves are checked in batch order against
/// a working copy of `parents`, so the combined result is acyclic even when
/// several entries move nodes relative to each other.
pub fn plan_reorder(
    parents: &ParentMap,
    entries: &[ReorderEntry],
    entity: &'static str,
) -> Result<(), CoreError> {
    if entries.is_empty() {
        return Err(CoreError::Validation(
            "Reorder batch must contain at least one entry".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.id) {
            return Err(CoreError::Validation(format!(
                "{entity} {} appears more than once in the reorder batch",
                entry.id
            )));
        }
        if !parents.contains_key(&entry.id) {
            return Err(CoreError::NotFound {
                entity,
                id: entry.id,
            });
        }
    }

    let mut working = parents.clone();
    for entry in entries.iter().filter(|e| e.moves()) {
        let new_parent = entry.parent_id.flatten();
        check_reparent(&working, entry.id, new_parent)
            .map_err(|v| v.into_error(&format!("{entity} {}", entry.id)))?;
        working.insert(entry.id, new_parent);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn entry(id: DbId, order: i32) -> ReorderEntry {
        ReorderEntry {
            id,
            order,
            parent_id: None,
        }
    }

    fn move_entry(id: DbId, order: i32, parent: Option<DbId>) -> ReorderEntry {
        ReorderEntry {
            id,
            order,
            parent_id: Some(parent),
        }
    }

    fn parents() -> ParentMap {
        ParentMap::from([(1, None), (2, Some(1)), (3, Some(2)), (4, None)])
    }

    #[test]
    fn test_next_sibling_order() {
        assert_eq!(next_sibling_order(None), 0);
        assert_eq!(next_sibling_order(Some(0)), 1);
        assert_eq!(next_sibling_order(Some(41)), 42);
        assert_eq!(next_sibling_order(Some(i32::MAX)), i32::MAX);
    }

    #[test]
    fn test_order_only_batch() {
        let batch = vec![entry(1, 1), entry(4, 0), entry(3, 7)];
        assert!(plan_reorder(&parents(), &batch, "Category").is_ok());
    }

    #[test]
    fn test_unknown_id_rejects_batch() {
        let batch = vec![entry(1, 0), entry(99, 1)];
        assert_matches!(
            plan_reorder(&parents(), &batch, "Category"),
            Err(CoreError::NotFound { entity: "Category", id: 99 })
        );
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert_matches!(
            plan_reorder(&parents(), &[], "Category"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let batch = vec![entry(1, 0), entry(1, 1)];
        assert_matches!(
            plan_reorder(&parents(), &batch, "Menu item"),
            Err(CoreError::Validation(ref msg)) if msg.contains("Menu item 1")
        );
    }

    #[test]
    fn test_cyclic_move_rejects_batch() {
        let batch = vec![entry(4, 0), move_entry(1, 0, Some(3))];
        assert_matches!(
            plan_reorder(&parents(), &batch, "Category"),
            Err(CoreError::CircularReference(_))
        );
    }

    #[test]
    fn test_moves_are_checked_cumulatively() {
        // Each move is fine against the stored state, but together they
        // would make 1 and 4 each other's parent.
        let batch = vec![move_entry(1, 0, Some(4)), move_entry(4, 0, Some(1))];
        assert_matches!(
            plan_reorder(&parents(), &batch, "Category"),
            Err(CoreError::CircularReference(_))
        );
    }

    #[test]
    fn test_move_to_root_and_regroup() {
        let batch = vec![move_entry(3, 0, None), move_entry(2, 1, Some(3))];
        assert!(plan_reorder(&parents(), &batch, "Category").is_ok());
    }

    #[test]
    fn test_entry_parent_is_optional_in_json() {
        let order_only: ReorderEntry = serde_json::from_str(r#"{"id": 1, "order": 2}"#).unwrap();
        assert!(!order_only.moves());

        let to_root: ReorderEntry =
            serde_json::from_str(r#"{"id": 1, "order": 2, "parent_id": null}"#).unwrap();
        assert_eq!(to_root.parent_id, Some(None));
    }
}
