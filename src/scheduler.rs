//! Core-pool scheduling simulator.
//!
//! The simulator replays an [`ExecutionLine`](crate::resolver::ExecutionLine)
//! over a fixed number of simulated cores, one discrete tick at a time. Items
//! admit strictly in line order, gated on dependency completion and pool
//! capacity; each group drains fully before the next group's block begins,
//! so the pool never mixes groups.
//!
//! This is not a real scheduler: nothing executes, and "cores" only cap how
//! many items may occupy the pool concurrently. A simulator owns its pool,
//! tick counter and trace exclusively for the duration of one run.

use tracing::{debug, trace};

use crate::error::{PipelineError, Result};
use crate::registry::Registry;
use crate::resolver::ExecutionLine;
use crate::trace::{Trace, TraceRecord};
use crate::types::{GroupId, ItemId, Tick};

/// Counters collected over one simulation run.
#[derive(Clone, Debug, Default)]
pub struct SimulatorStats {
    /// Total ticks advanced (equals the trace length).
    pub total_ticks: Tick,
    /// Items admitted to the pool (zero-cost items excluded).
    pub admissions: u64,
    /// Items completed and moved to the passed set.
    pub completions: u64,
    /// Group blocks executed.
    pub blocks_executed: u64,
    /// Maximum concurrent pool occupancy observed.
    pub peak_occupancy: usize,
}

/// Discrete-time simulator for one execution line.
#[derive(Debug)]
pub struct Simulator<'a> {
    registry: &'a Registry,
    cores: usize,
    time: Tick,
    pool: Vec<ItemId>,
    started_at: Vec<Tick>,
    passed: Vec<bool>,
    active_group: Option<GroupId>,
    trace: Trace,
    stats: SimulatorStats,
}

impl<'a> Simulator<'a> {
    /// Creates a simulator over `cores` simulated cores.
    ///
    /// Fails with `InvalidConfiguration` if `cores` is zero.
    pub fn new(registry: &'a Registry, cores: usize) -> Result<Self> {
        if cores < 1 {
            return Err(PipelineError::InvalidConfiguration(format!(
                "at least 1 core required to calculate pipeline, got {cores}"
            )));
        }
        Ok(Self {
            registry,
            cores,
            time: 0,
            pool: Vec::new(),
            started_at: vec![0; registry.len()],
            passed: vec![false; registry.len()],
            active_group: None,
            trace: Trace::new(),
            stats: SimulatorStats::default(),
        })
    }

    /// Runs the full simulation for an execution line.
    ///
    /// Returns the total tick count. The trace and stats are available
    /// through [`trace`](Self::trace) and [`stats`](Self::stats) afterwards.
    /// Calling `execute` again resets all run state first.
    pub fn execute(&mut self, line: &ExecutionLine) -> Result<Tick> {
        self.reset();

        for block in line.blocks() {
            for &id in &block.items {
                let cost = self.registry.item(id).cost;
                if cost == 0 {
                    // Aggregate targets finish at admission and never hold
                    // a core; they still wait for their dependencies.
                    self.wait_until(|sim| sim.deps_passed(id), id)?;
                    self.passed[id] = true;
                    self.stats.completions += 1;
                    continue;
                }
                self.wait_until(|sim| sim.can_admit(id), id)?;
                self.admit(id)?;
            }
            // Group exclusivity: the next block cannot start until this
            // group's work has fully left the pool.
            while !self.pool.is_empty() {
                self.cycle();
            }
            self.active_group = None;
            self.stats.blocks_executed += 1;
        }

        self.stats.total_ticks = self.trace.ticks();
        debug!(
            ticks = self.stats.total_ticks,
            completions = self.stats.completions,
            "simulation finished"
        );
        Ok(self.trace.ticks())
    }

    /// Returns the trace of the most recent run.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Takes ownership of the trace, leaving an empty one behind.
    pub fn take_trace(&mut self) -> Trace {
        std::mem::take(&mut self.trace)
    }

    /// Returns the counters of the most recent run.
    pub fn stats(&self) -> &SimulatorStats {
        &self.stats
    }

    /// Exports run counters as JSON.
    pub fn export_stats(&self) -> serde_json::Value {
        serde_json::json!({
            "cores": self.cores,
            "total_ticks": self.stats.total_ticks,
            "admissions": self.stats.admissions,
            "completions": self.stats.completions,
            "blocks_executed": self.stats.blocks_executed,
            "peak_occupancy": self.stats.peak_occupancy,
        })
    }

    fn reset(&mut self) {
        self.time = 0;
        self.pool.clear();
        self.started_at.fill(0);
        self.passed.fill(false);
        self.active_group = None;
        self.trace = Trace::new();
        self.stats = SimulatorStats::default();
    }

    fn deps_passed(&self, id: ItemId) -> bool {
        self.registry
            .item(id)
            .dependencies()
            .iter()
            .all(|&dep| self.passed[dep])
    }

    /// Admission predicate: all dependencies completed, and either the pool
    /// is empty (bootstrapping the group) or a core is free and the item
    /// belongs to the group currently holding the pool.
    fn can_admit(&self, id: ItemId) -> bool {
        let group_matches = self.active_group == Some(self.registry.item(id).group);
        self.deps_passed(id)
            && (self.pool.is_empty() || (self.pool.len() < self.cores && group_matches))
    }

    /// Advances ticks until `ready` holds. An empty pool with an unsatisfied
    /// predicate can never progress; that indicates a mis-bucketed line and
    /// fails rather than spinning forever.
    fn wait_until(&mut self, ready: impl Fn(&Self) -> bool, id: ItemId) -> Result<()> {
        while !ready(self) {
            if self.pool.is_empty() {
                return Err(PipelineError::SchedulingInvariantViolation(format!(
                    "component {} is blocked with an empty pool; its \
                     dependencies can never complete",
                    self.registry.item(id).name
                )));
            }
            self.cycle();
        }
        Ok(())
    }

    fn admit(&mut self, id: ItemId) -> Result<()> {
        if !self.can_admit(id) {
            return Err(PipelineError::SchedulingInvariantViolation(format!(
                "cannot admit component {} (group {:?}, cores {}/{})",
                self.registry.item(id).name,
                self.active_group,
                self.pool.len(),
                self.cores
            )));
        }
        if self.pool.is_empty() {
            self.active_group = Some(self.registry.item(id).group);
        }
        self.started_at[id] = self.time;
        self.pool.push(id);
        self.stats.admissions += 1;
        self.stats.peak_occupancy = self.stats.peak_occupancy.max(self.pool.len());
        trace!(
            component = %self.registry.item(id).name,
            time = self.time,
            "admitted"
        );
        Ok(())
    }

    /// Advances simulated time by one tick: records the pool as one trace
    /// entry, then completes every member whose cost has elapsed. All
    /// completion checks observe the same tick value.
    fn cycle(&mut self) {
        self.time += 1;
        let group = self
            .active_group
            .map(|g| self.registry.group(g).name.clone())
            .unwrap_or_default();
        self.trace.push(TraceRecord {
            tick: self.time,
            running: self
                .pool
                .iter()
                .map(|&id| self.registry.item(id).name.clone())
                .collect(),
            group,
        });

        let time = self.time;
        let finished: Vec<ItemId> = self
            .pool
            .iter()
            .copied()
            .filter(|&id| time - self.started_at[id] >= self.registry.item(id).cost)
            .collect();
        self.pool.retain(|id| !finished.contains(id));
        for &id in &finished {
            self.passed[id] = true;
            trace!(component = %self.registry.item(id).name, time, "completed");
        }
        self.stats.completions += finished.len() as u64;
    }
}
