//! Cycle guard for parent reassignment.
//!
//! A node may not be moved underneath itself or any of its descendants.
//! The check walks upward from the proposed parent; if the walk meets the
//! node being moved, the move would close a loop.

use crate::error::CoreError;
use crate::tree::ParentMap;
use crate::types::DbId;

/// Why a proposed parent was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReparentViolation {
    /// The proposed parent is the node itself.
    SelfParent,
    /// The proposed parent is a descendant of the node.
    Descendant { parent: DbId },
    /// The proposed parent does not exist in the collection.
    MissingParent(DbId),
    /// The stored links already contain a loop reachable from the proposed parent.
    CorruptHierarchy,
}

impl ReparentViolation {
    /// Convert into a [`CoreError`], naming the node via `label`
    /// (e.g. `"Category 'Programming'"`).
    pub fn into_error(self, label: &str) -> CoreError {
        match self {
            ReparentViolation::SelfParent => {
                CoreError::CircularReference(format!("{label} cannot be its own parent"))
            }
            ReparentViolation::Descendant { parent } => CoreError::CircularReference(format!(
                "{label} cannot be moved under {parent}, which is one of its descendants"
            )),
            ReparentViolation::MissingParent(parent) => {
                CoreError::Validation(format!("Parent {parent} of {label} does not exist"))
            }
            ReparentViolation::CorruptHierarchy => CoreError::Internal(format!(
                "Hierarchy above the new parent of {label} contains a loop"
            )),
        }
    }
}

/// Validate moving `subject` under `new_parent` (`None` = make it a root).
///
/// `parents` must hold every node of the collection. The upward walk is
/// capped at `parents.len()` steps; exceeding it means the stored links
/// already loop and the move is refused rather than followed forever.
pub fn check_reparent(
    parents: &ParentMap,
    subject: DbId,
    new_parent: Option<DbId>,
) -> Result<(), ReparentViolation> {
    let Some(start) = new_parent else {
        return Ok(());
    };
    if start == subject {
        return Err(ReparentViolation::SelfParent);
    }
    if !parents.contains_key(&start) {
        return Err(ReparentViolation::MissingParent(start));
    }

    let mut current = start;
    for _ in 0..parents.len() {
        if current == subject {
            return Err(ReparentViolation::Descendant { parent: start });
        }
        match parents.get(&current).copied().flatten() {
            Some(next) => current = next,
            None => return Ok(()),
        }
    }

    Err(ReparentViolation::CorruptHierarchy)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::tree::ancestors;

    /// A -> B -> C (C's parent is B, B's parent is A), plus a separate root D.
    fn chain() -> ParentMap {
        ParentMap::from([(1, None), (2, Some(1)), (3, Some(2)), (4, None)])
    }

    #[test]
    fn test_rejects_moving_root_under_grandchild() {
        assert_eq!(
            check_reparent(&chain(), 1, Some(3)),
            Err(ReparentViolation::Descendant { parent: 3 })
        );
    }

    #[test]
    fn test_rejects_moving_under_direct_child() {
        assert_eq!(
            check_reparent(&chain(), 2, Some(3)),
            Err(ReparentViolation::Descendant { parent: 3 })
        );
    }

    #[test]
    fn test_rejects_self_parent() {
        assert_eq!(
            check_reparent(&chain(), 1, Some(1)),
            Err(ReparentViolation::SelfParent)
        );
    }

    #[test]
    fn test_accepts_valid_moves() {
        let parents = chain();
        assert!(check_reparent(&parents, 3, Some(1)).is_ok());
        assert!(check_reparent(&parents, 3, None).is_ok());
        assert!(check_reparent(&parents, 1, Some(4)).is_ok());
        assert!(check_reparent(&parents, 4, Some(3)).is_ok());
    }

    #[test]
    fn test_rejects_missing_parent() {
        assert_eq!(
            check_reparent(&chain(), 2, Some(99)),
            Err(ReparentViolation::MissingParent(99))
        );
    }

    #[test]
    fn test_corrupt_links_fail_safe() {
        let parents = ParentMap::from([(1, None), (2, Some(3)), (3, Some(2))]);
        assert_eq!(
            check_reparent(&parents, 1, Some(2)),
            Err(ReparentViolation::CorruptHierarchy)
        );
    }

    #[test]
    fn test_errors_name_the_node() {
        let err = ReparentViolation::SelfParent.into_error("Category 'Programming'");
        assert_matches!(err, CoreError::CircularReference(ref msg) if msg.contains("'Programming'"));

        let err = ReparentViolation::Descendant { parent: 3 }.into_error("Menu item 'Home'");
        assert_matches!(err, CoreError::CircularReference(ref msg) if msg.contains("'Home'"));

        let err = ReparentViolation::MissingParent(9).into_error("Category 'Design'");
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn test_accepted_moves_never_create_cycles() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..50 {
            let size: DbId = rng.random_range(2..30);
            let mut parents = ParentMap::new();
            for id in 1..=size {
                // Parents always have smaller ids, so the start state is acyclic.
                let parent = if id > 1 && rng.random_bool(0.7) {
                    Some(rng.random_range(1..id))
                } else {
                    None
                };
                parents.insert(id, parent);
            }

            for _ in 0..200 {
                let subject = rng.random_range(1..=size);
                let target = if rng.random_bool(0.1) {
                    None
                } else {
                    Some(rng.random_range(1..=size))
                };
                if check_reparent(&parents, subject, target).is_ok() {
                    parents.insert(subject, target);
                }
            }

            for &id in parents.keys() {
                assert!(
                    !ancestors(&parents, id).contains(&id),
                    "node {id} became its own ancestor"
                );
            }
        }
    }
}
