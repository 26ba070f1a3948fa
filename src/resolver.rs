//! Execution line resolution.
//!
//! Given a target component, the resolver computes the full closure of work
//! required to produce it (pulling in every member of every touched group),
//! linearizes the closure so each item follows all of its dependencies, and
//! buckets the result into contiguous group blocks ordered by the registry's
//! group execution order.
//!
//! Resolution is deterministic: ties break in component declaration order,
//! so resolving the same target twice yields identical lines.

use std::collections::VecDeque;

use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::registry::Registry;
use crate::types::{GroupId, ItemId};

/// A contiguous run of items from one group within an execution line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// The group all of this block's items belong to.
    pub group: GroupId,
    /// Items in dependency-respecting order.
    pub items: Vec<ItemId>,
}

/// The fully resolved schedule order for one target.
///
/// Blocks follow the registry's group execution order; within each block,
/// no item precedes any of its dependencies from the same block, and items
/// never depend on anything in a later block. Computed fresh per target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionLine {
    blocks: Vec<Block>,
}

impl ExecutionLine {
    /// Returns the group blocks in execution order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Iterates over all items in schedule order.
    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.blocks.iter().flat_map(|b| b.items.iter().copied())
    }

    /// Returns the total number of items in the line.
    pub fn len(&self) -> usize {
        self.blocks.iter().map(|b| b.items.len()).sum()
    }

    /// Returns true if the line contains no items.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    // Test-only: assemble a line directly, bypassing resolution.
    #[cfg(test)]
    pub(crate) fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

/// Resolves the execution line for a target component.
pub fn resolve(registry: &Registry, target: &str) -> Result<ExecutionLine> {
    let root = registry
        .get(target)
        .ok_or_else(|| PipelineError::UnknownComponent(target.to_string()))?;

    let closure = expand_closure(registry, root);
    let linear = linearize(registry, &closure)?;
    let blocks = bucket_by_group(registry, &linear);

    debug!(
        component = target,
        items = linear.len(),
        blocks = blocks.len(),
        "execution line resolved"
    );
    Ok(ExecutionLine { blocks })
}

/// Computes the closure of required items via worklist expansion.
///
/// For every discovered item, both its dependencies and all other members
/// of its group join the closure (group atomicity), and those are expanded
/// in turn. Each item is expanded at most once.
fn expand_closure(registry: &Registry, root: ItemId) -> Vec<bool> {
    let mut in_closure = vec![false; registry.len()];
    let mut worklist = vec![root];
    in_closure[root] = true;

    while let Some(id) = worklist.pop() {
        let item = registry.item(id);
        for &dep in item.dependencies() {
            if !in_closure[dep] {
                in_closure[dep] = true;
                worklist.push(dep);
            }
        }
        for &mate in registry.group(item.group).members() {
            if !in_closure[mate] {
                in_closure[mate] = true;
                worklist.push(mate);
            }
        }
    }

    in_closure
}

/// Orders the closure so every item follows all of its direct dependencies.
///
/// Kahn's algorithm over the closure subgraph; the ready queue is seeded and
/// fed in declaration order, so the result is deterministic. A stalled
/// elimination (no ready item while unplaced items remain) is a component
/// cycle and fails instead of looping.
fn linearize(registry: &Registry, in_closure: &[bool]) -> Result<Vec<ItemId>> {
    let size = in_closure.iter().filter(|&&x| x).count();
    let mut in_degree = vec![0usize; registry.len()];
    let mut dependents: Vec<Vec<ItemId>> = vec![Vec::new(); registry.len()];

    for id in (0..registry.len()).filter(|&i| in_closure[i]) {
        for &dep in registry.item(id).dependencies() {
            // Dependencies of closure members are always in the closure.
            in_degree[id] += 1;
            dependents[dep].push(id);
        }
    }

    let mut queue: VecDeque<ItemId> = (0..registry.len())
        .filter(|&i| in_closure[i] && in_degree[i] == 0)
        .collect();
    let mut order = Vec::with_capacity(size);
    while let Some(id) = queue.pop_front() {
        order.push(id);
        for &next in &dependents[id] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() != size {
        let unresolved: Vec<String> = (0..registry.len())
            .filter(|&i| in_closure[i] && in_degree[i] > 0)
            .map(|i| registry.item(i).name.clone())
            .collect();
        return Err(PipelineError::CyclicComponentDependency(unresolved));
    }

    Ok(order)
}

/// Re-orders a linearized sequence into contiguous group blocks following
/// the registry's group execution order, preserving relative order inside
/// each block. Groups with no items in the closure are skipped.
fn bucket_by_group(registry: &Registry, linear: &[ItemId]) -> Vec<Block> {
    let mut blocks = Vec::new();
    for &group in registry.group_order() {
        let items: Vec<ItemId> = linear
            .iter()
            .copied()
            .filter(|&id| registry.item(id).group == group)
            .collect();
        if !items.is_empty() {
            blocks.push(Block { group, items });
        }
    }
    blocks
}
