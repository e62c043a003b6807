//! Category tree traversal
//!
//! Categories form a tree through the nullable `parent_id` column. The tree is
//! loaded as a flat list of `(id, parent_id)` edges and kept as an adjacency
//! list (parent → children) so descendant sets can be computed in one pass
//! without recursive SQL.
//!
//! The database does not guarantee the parent chain is acyclic. Traversal
//! tracks visited nodes, so corrupted data cannot make it loop; the
//! back-office write path uses [`CategoryTree::would_create_cycle`] to refuse
//! such edits in the first place.
//!
//! # Example
//!
//! ```
//! use pcshop_shared::catalog::tree::CategoryTree;
//!
//! // 1 = Laptops, 2 = Gaming Laptops (child of 1), 3 = Monitors
//! let tree = CategoryTree::from_edges([(1, None), (2, Some(1)), (3, None)]);
//!
//! assert_eq!(tree.descendants(1, true), vec![1, 2]);
//! assert_eq!(tree.descendants(1, false), vec![2]);
//! ```

use std::collections::{HashMap, HashSet, VecDeque};

/// Adjacency-list view over the category parent relation
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    children: HashMap<i64, Vec<i64>>,
    parents: HashMap<i64, Option<i64>>,
}

impl CategoryTree {
    /// Builds the tree from `(id, parent_id)` pairs
    ///
    /// Children are kept in ascending id order so traversal output is stable.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (i64, Option<i64>)>,
    {
        let mut tree = Self::default();

        for (id, parent_id) in edges {
            tree.parents.insert(id, parent_id);
            if let Some(parent) = parent_id {
                tree.children.entry(parent).or_default().push(id);
            }
        }

        for kids in tree.children.values_mut() {
            kids.sort_unstable();
        }

        tree
    }

    /// Number of categories known to the tree
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Whether the tree holds no categories
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Whether `id` is a known category
    pub fn contains(&self, id: i64) -> bool {
        self.parents.contains_key(&id)
    }

    /// Direct children of `id`
    pub fn children(&self, id: i64) -> &[i64] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All categories transitively reachable below `id` (breadth-first)
    ///
    /// With `include_self` the root is the first element. Each id appears at
    /// most once even if the stored data contains a cycle.
    pub fn descendants(&self, id: i64, include_self: bool) -> Vec<i64> {
        let mut visited = HashSet::from([id]);
        let mut queue = VecDeque::from([id]);
        let mut out = Vec::new();

        if include_self {
            out.push(id);
        }

        while let Some(current) = queue.pop_front() {
            for &child in self.children(current) {
                if visited.insert(child) {
                    out.push(child);
                    queue.push_back(child);
                }
            }
        }

        out
    }

    /// Checks whether re-parenting `id` under `new_parent` would form a cycle
    ///
    /// True when `new_parent` is `id` itself or one of its descendants.
    pub fn would_create_cycle(&self, id: i64, new_parent: Option<i64>) -> bool {
        match new_parent {
            None => false,
            Some(parent) if parent == id => true,
            Some(parent) => self.descendants(id, false).contains(&parent),
        }
    }
}
