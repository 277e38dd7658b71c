//! Flat-to-nested tree materialization shared by categories and menu items.
//!
//! Rows are stored flat with a `parent_id` back-reference. [`build_forest`]
//! indexes children by parent once and then walks down from the roots, so
//! the cost is one sort per sibling group rather than a rescan per node.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::DbId;

/// A record participating in a parent-referencing hierarchy.
pub trait TreeNode {
    fn id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
    fn sort_order(&self) -> i32;
}

/// Display vocabulary for one kind of tree node, used in user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeKind {
    /// Singular entity name, e.g. `"Category"`.
    pub name: &'static str,
    /// How direct children are described, e.g. `"child categories"`.
    pub children: &'static str,
    /// One unit of dependent content, e.g. `"course"`.
    pub dependent: &'static str,
    /// Plural of [`NodeKind::dependent`], e.g. `"courses"`.
    pub dependents: &'static str,
}

impl NodeKind {
    /// `Category 'Programming'`
    pub fn label(&self, title: &str) -> String {
        format!("{} '{title}'", self.name)
    }
}

pub const CATEGORY: NodeKind = NodeKind {
    name: "Category",
    children: "child categories",
    dependent: "course",
    dependents: "courses",
};

pub const MENU_ITEM: NodeKind = NodeKind {
    name: "Menu item",
    children: "child items",
    dependent: "dependent record",
    dependents: "dependent records",
};

/// A node together with its ordered children.
///
/// Serializes as the node's own fields plus a `children` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeBranch<T> {
    #[serde(flatten)]
    pub node: T,
    pub children: Vec<TreeBranch<T>>,
}

impl<T> TreeBranch<T> {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes in this branch, including itself.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeBranch::size).sum::<usize>()
    }
}

/// `id -> parent_id` for every node of one collection.
pub type ParentMap = HashMap<DbId, Option<DbId>>;

/// Collect the parent links of a flat node list.
pub fn parent_map<T: TreeNode>(nodes: &[T]) -> ParentMap {
    nodes.iter().map(|n| (n.id(), n.parent_id())).collect()
}

/// Build an ordered forest from a flat collection.
///
/// Siblings are ordered by `(sort_order, id)`, so the output does not depend
/// on input order. `max_depth` limits how many levels are materialized
/// (`Some(2)` yields roots and their direct children); `None` is unbounded.
/// Nodes whose parent is not part of `nodes` cannot be reached from a root
/// and are left out.
pub fn build_forest<T: TreeNode>(nodes: Vec<T>, max_depth: Option<usize>) -> Vec<TreeBranch<T>> {
    let mut by_parent: HashMap<Option<DbId>, Vec<T>> = HashMap::new();
    for node in nodes {
        by_parent.entry(node.parent_id()).or_default().push(node);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by_key(|n| (n.sort_order(), n.id()));
    }

    attach(&mut by_parent, None, 1, max_depth)
}

/// Take the sibling group under `parent` out of the index and recurse.
///
/// Removing each group as it is consumed means a group is visited at most
/// once, even if the stored links are corrupt.
fn attach<T: TreeNode>(
    by_parent: &mut HashMap<Option<DbId>, Vec<T>>,
    parent: Option<DbId>,
    depth: usize,
    max_depth: Option<usize>,
) -> Vec<TreeBranch<T>> {
    let Some(siblings) = by_parent.remove(&parent) else {
        return Vec::new();
    };

    siblings
        .into_iter()
        .map(|node| {
            let children = if max_depth.is_some_and(|max| depth >= max) {
                Vec::new()
            } else {
                attach(by_parent, Some(node.id()), depth + 1, max_depth)
            };
            TreeBranch { node, children }
        })
        .collect()
}

/// Ancestor chain of `id`, nearest parent first.
///
/// The walk is capped at the number of known nodes and stops at the first
/// link pointing outside the map.
pub fn ancestors(parents: &ParentMap, id: DbId) -> Vec<DbId> {
    let mut chain = Vec::new();
    let mut current = parents.get(&id).copied().flatten();

    while let Some(ancestor) = current {
        if chain.len() >= parents.len() {
            break;
        }
        chain.push(ancestor);
        current = parents.get(&ancestor).copied().flatten();
    }

    chain
}
