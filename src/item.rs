//! Work item model.
//!
//! A `WorkItem` is the schedulable unit of the pipeline: a named piece of
//! work with an integer cost in ticks, a group membership, and outgoing
//! dependency edges. Items live in the registry's flat arena; edges are
//! arena indices, so the graph carries no shared ownership.

use serde::Serialize;

use crate::types::{GroupId, ItemId, Tick};

/// A single unit of work in the pipeline graph.
///
/// Identity is the name string, unique within a registry. Dependency edges
/// are append-only and duplicate-free; there is no removal operation.
#[derive(Clone, Debug, Serialize)]
pub struct WorkItem {
    /// Unique name within the registry.
    pub name: String,
    /// Execution cost in ticks. Zero-cost items complete at admission and
    /// never occupy a core; they model aggregate targets.
    pub cost: Tick,
    /// Group this item belongs to (ungrouped items carry the sentinel group).
    pub group: GroupId,
    /// Outgoing dependency edges in insertion order.
    dependencies: Vec<ItemId>,
}

impl WorkItem {
    /// Creates a work item with no dependencies.
    pub fn new(name: impl Into<String>, cost: Tick, group: GroupId) -> Self {
        Self {
            name: name.into(),
            cost,
            group,
            dependencies: Vec::new(),
        }
    }

    /// Adds a dependency edge. Idempotent: adding the same target twice is
    /// a silent no-op.
    pub fn add_dependency(&mut self, dep: ItemId) {
        if !self.dependencies.contains(&dep) {
            self.dependencies.push(dep);
        }
    }

    /// Returns the stored dependency edges in insertion order.
    pub fn dependencies(&self) -> &[ItemId] {
        &self.dependencies
    }
}

impl PartialEq for WorkItem {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for WorkItem {}

impl std::fmt::Display for WorkItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} (g{})] {} {:?}",
            self.name, self.group, self.cost, self.dependencies
        )
    }
}
