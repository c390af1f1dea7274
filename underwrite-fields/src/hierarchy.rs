//! Assembly of the two-level group tree used for section navigation.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::materialize::GroupMaterializer;
use crate::registry::GroupRegistry;
use crate::types::GroupDef;

/// Top-level groups in order, each with its ordered children.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupHierarchy {
    pub top_level: Vec<GroupDef>,
    /// Keyed by top-level id, in top-level order. Every top-level group has an
    /// entry, possibly empty.
    pub children: IndexMap<String, Vec<GroupDef>>,
}

impl GroupHierarchy {
    /// Build the tree from static groups followed by dynamic instances.
    ///
    /// Groups without a parent are top-level. Groups whose parent is a
    /// top-level id become its children; any other group is dropped. An id
    /// already seen is dropped too, so a static group wins over an instance
    /// that collides with it. Both levels are stable-sorted by `order`.
    /// Templates are not filtered here: callers pass static groups without them.
    pub fn build(
        static_groups: impl IntoIterator<Item = GroupDef>,
        dynamic_groups: impl IntoIterator<Item = GroupDef>,
    ) -> Self {
        let mut seen = HashSet::new();
        let (mut top_level, nested): (Vec<_>, Vec<_>) = static_groups
            .into_iter()
            .chain(dynamic_groups)
            .filter(|g| {
                let first = seen.insert(g.id.clone());
                if !first {
                    debug!(group = %g.id, "dropping group with duplicate id");
                }
                first
            })
            .partition(|g| g.parent_group.is_none());

        let mut buckets: HashMap<String, Vec<GroupDef>> = top_level
            .iter()
            .map(|g| (g.id.clone(), Vec::new()))
            .collect();

        for group in nested {
            let parent = group.parent_group.as_deref().unwrap_or_default();
            match buckets.get_mut(parent) {
                Some(bucket) => bucket.push(group),
                None => debug!(group = %group.id, %parent, "dropping group with unknown parent"),
            }
        }

        sort_by_order(&mut top_level);
        let children = top_level
            .iter()
            .map(|g| {
                let mut bucket = buckets.remove(&g.id).unwrap_or_default();
                sort_by_order(&mut bucket);
                (g.id.clone(), bucket)
            })
            .collect();

        Self {
            top_level,
            children,
        }
    }

    /// Children of a top-level group; empty for unknown ids.
    pub fn children_of(&self, id: &str) -> &[GroupDef] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Depth-first walk: each top-level group (depth 0) followed by its
    /// children (depth 1).
    pub fn walk(&self) -> impl Iterator<Item = (usize, &GroupDef)> {
        self.top_level.iter().flat_map(move |parent| {
            std::iter::once((0, parent))
                .chain(self.children_of(&parent.id).iter().map(|child| (1, child)))
        })
    }

    /// Total number of groups in the tree.
    pub fn len(&self) -> usize {
        self.top_level.len() + self.children.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty()
    }
}

fn sort_by_order(groups: &mut [GroupDef]) {
    groups.sort_by(|a, b| a.order.total_cmp(&b.order));
}

impl GroupRegistry {
    /// Navigation tree for a data document: static groups plus the instances
    /// of every template group.
    pub fn hierarchy(&self, materializer: &GroupMaterializer, data: &Value) -> GroupHierarchy {
        let dynamic = materializer.materialize(self.templates(), data);
        GroupHierarchy::build(self.static_groups().cloned(), dynamic)
    }
}
