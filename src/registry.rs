//! Component and group registry.
//!
//! The registry owns every work item in a flat arena, maps names to arena
//! indices, tracks group membership in declaration order, and derives the
//! global group execution order once all components are registered.
//!
//! It is built once (from the line-oriented pipeline definition format or
//! programmatically through [`RegistryBuilder`]) and is immutable afterwards,
//! so concurrent target resolutions may share it freely.
//!
//! # Definition format
//!
//! Components are declared as four-line records, terminated by a literal
//! `END` line:
//!
//! ```text
//! load_data
//! 3
//! ingest
//!
//! clean_data
//! 2
//! ingest
//! load_data
//! END
//! ```
//!
//! Line 1 is the unique name, line 2 the integer cost in ticks, line 3 the
//! group name (empty for ungrouped), line 4 a comma-separated list of
//! previously declared dependency names (empty for none).

use std::collections::{HashMap, HashSet, VecDeque};
use std::io::BufRead;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::item::WorkItem;
use crate::types::{GroupId, ItemId, UNGROUPED};

/// A named group and its members, in declaration order.
#[derive(Clone, Debug)]
pub struct Group {
    /// Group name (the sentinel for ungrouped items is a group like any other).
    pub name: String,
    members: Vec<ItemId>,
}

impl Group {
    /// Returns the member items in declaration order.
    pub fn members(&self) -> &[ItemId] {
        &self.members
    }
}

/// The immutable component/group registry.
///
/// Holds the item arena, the name index, the group table, and the derived
/// group execution order.
#[derive(Clone, Debug)]
pub struct Registry {
    items: Vec<WorkItem>,
    by_name: HashMap<String, ItemId>,
    groups: Vec<Group>,
    group_order: Vec<GroupId>,
}

impl Registry {
    /// Starts building a registry programmatically.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Loads a registry from a pipeline definition file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Loads a registry from any buffered line source.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut builder = Self::builder();
        let mut lines = reader.lines();

        let mut next_line = |what: &str| -> Result<String> {
            match lines.next() {
                Some(line) => Ok(line?),
                None => Err(PipelineError::MalformedDefinition(format!(
                    "stream ended while expecting {what}"
                ))),
            }
        };

        loop {
            let name = next_line("a component name or END")?;
            if name == "END" {
                break;
            }
            let cost_line = next_line("a cost")?;
            let cost: u64 = cost_line.parse().map_err(|_| {
                PipelineError::MalformedDefinition(format!(
                    "cost for component {name} is not an integer: {cost_line:?}"
                ))
            })?;
            // Declared costs must be positive; zero-cost aggregates exist
            // only through the builder API.
            if cost < 1 {
                return Err(PipelineError::MalformedDefinition(format!(
                    "cost for component {name} must be at least 1, got {cost}"
                )));
            }
            let group = next_line("a group name")?;
            let deps_line = next_line("a dependency list")?;
            let deps: Vec<&str> = if deps_line.is_empty() {
                Vec::new()
            } else {
                deps_line.split(',').collect()
            };

            builder.add_component(&name, cost, &group, &deps)?;
        }

        builder.build()
    }

    /// Looks up a component by name.
    pub fn get(&self, name: &str) -> Option<ItemId> {
        self.by_name.get(name).copied()
    }

    /// Returns the item stored at an arena index.
    pub fn item(&self, id: ItemId) -> &WorkItem {
        &self.items[id]
    }

    /// Returns all items in declaration order.
    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    /// Returns the group stored at a group index.
    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id]
    }

    /// Returns the derived group execution order.
    ///
    /// A valid topological order over the group-dependency graph: group A
    /// precedes group B whenever some member of B depends on a member of A.
    pub fn group_order(&self) -> &[GroupId] {
        &self.group_order
    }

    /// Returns the number of registered components.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no components are registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of groups (including the ungrouped sentinel, if used).
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns component names in declaration order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|i| i.name.as_str())
    }

    /// Returns group names in declaration order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    /// Renders a component with its group and dependencies by name:
    /// `[name (group)] cost ["dep1", "dep2"]`.
    pub fn describe(&self, id: ItemId) -> String {
        let item = &self.items[id];
        let deps: Vec<&str> = item
            .dependencies()
            .iter()
            .map(|&dep| self.items[dep].name.as_str())
            .collect();
        format!(
            "[{} ({})] {} {:?}",
            item.name, self.groups[item.group].name, item.cost, deps
        )
    }

    // Test-only access for forging malformed graphs.
    #[cfg(test)]
    pub(crate) fn item_mut(&mut self, id: ItemId) -> &mut WorkItem {
        &mut self.items[id]
    }
}

/// Incremental registry builder.
///
/// Components must be added in dependency order: every dependency name has
/// to be registered before the component that references it.
#[derive(Default)]
pub struct RegistryBuilder {
    items: Vec<WorkItem>,
    by_name: HashMap<String, ItemId>,
    groups: Vec<Group>,
    group_index: HashMap<String, GroupId>,
}

impl RegistryBuilder {
    /// Registers one component.
    ///
    /// An empty group name is normalized to the ungrouped sentinel. Fails
    /// with `DuplicateIdentity` if the name is taken and `UnknownDependency`
    /// if any dependency has not been registered yet.
    pub fn add_component(
        &mut self,
        name: &str,
        cost: u64,
        group: &str,
        dependencies: &[&str],
    ) -> Result<()> {
        if self.by_name.contains_key(name) {
            return Err(PipelineError::DuplicateIdentity(name.to_string()));
        }

        let group_name = if group.is_empty() { UNGROUPED } else { group };
        let group_id = match self.group_index.get(group_name) {
            Some(&id) => id,
            None => {
                let id = self.groups.len();
                self.groups.push(Group {
                    name: group_name.to_string(),
                    members: Vec::new(),
                });
                self.group_index.insert(group_name.to_string(), id);
                id
            }
        };

        let item_id = self.items.len();
        let mut item = WorkItem::new(name, cost, group_id);
        for dep in dependencies {
            let dep_id = self.by_name.get(*dep).copied().ok_or_else(|| {
                PipelineError::UnknownDependency {
                    component: name.to_string(),
                    dependency: dep.to_string(),
                }
            })?;
            item.add_dependency(dep_id);
        }

        self.groups[group_id].members.push(item_id);
        self.by_name.insert(name.to_string(), item_id);
        self.items.push(item);
        Ok(())
    }

    /// Finalizes the registry, deriving the group execution order.
    pub fn build(self) -> Result<Registry> {
        let group_order = compute_group_order(&self.items, &self.groups)?;
        info!(
            components = self.items.len(),
            groups = self.groups.len(),
            "registry built"
        );
        Ok(Registry {
            items: self.items,
            by_name: self.by_name,
            groups: self.groups,
            group_order,
        })
    }
}

/// Derives the group execution order via Kahn's algorithm.
///
/// Group A must precede group B when some member of B depends on some member
/// of A. The ready queue is seeded in group declaration order, so ties among
/// simultaneously eligible groups break deterministically.
fn compute_group_order(items: &[WorkItem], groups: &[Group]) -> Result<Vec<GroupId>> {
    let n = groups.len();

    // Cross-group dependency sets, deduplicated per group.
    let mut deps: Vec<HashSet<GroupId>> = vec![HashSet::new(); n];
    for item in items {
        for &dep in item.dependencies() {
            let dep_group = items[dep].group;
            if dep_group != item.group {
                deps[item.group].insert(dep_group);
            }
        }
    }

    let mut dependents: Vec<Vec<GroupId>> = vec![Vec::new(); n];
    let mut in_degree: Vec<usize> = vec![0; n];
    for (group, group_deps) in deps.iter().enumerate() {
        in_degree[group] = group_deps.len();
        for &dep in group_deps {
            dependents[dep].push(group);
        }
    }
    for targets in &mut dependents {
        targets.sort_unstable();
    }

    let mut queue: VecDeque<GroupId> = (0..n).filter(|&g| in_degree[g] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(group) = queue.pop_front() {
        order.push(group);
        for &next in &dependents[group] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() != n {
        let unresolved: Vec<String> = (0..n)
            .filter(|&g| in_degree[g] > 0)
            .map(|g| groups[g].name.clone())
            .collect();
        return Err(PipelineError::CyclicGroupDependency(unresolved));
    }

    debug!(?order, "group execution order resolved");
    Ok(order)
}
