//! Tick-by-tick simulation trace.
//!
//! A `Trace` is the sole output artifact of a scheduling run: one record per
//! simulated tick, capturing which items occupied the core pool and which
//! group was active. Records are append-only and owned by a single run.

use serde::Serialize;

use crate::types::Tick;

/// One simulated tick of pool occupancy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    /// Tick index, starting at 1 for the first advanced tick.
    pub tick: Tick,
    /// Names of the items occupying the pool during this tick.
    pub running: Vec<String>,
    /// Name of the group currently holding the pool.
    pub group: String,
}

/// The ordered tick records of one simulation run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Trace {
    records: Vec<TraceRecord>,
}

impl Trace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one tick record.
    pub(crate) fn push(&mut self, record: TraceRecord) {
        self.records.push(record);
    }

    /// Returns the recorded ticks in order.
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// Total tick count of the run.
    pub fn ticks(&self) -> Tick {
        self.records.len() as Tick
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, TraceRecord> {
        self.records.iter()
    }
}
