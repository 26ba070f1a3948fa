//! # Pipesim
//!
//! A deterministic pipeline schedule resolver and discrete-time core-pool
//! simulator. Given a dependency graph of work items grouped into named
//! phases, pipesim answers: which components must run to produce a target,
//! in what order, how do they pack onto a fixed number of parallel slots,
//! and how long does the whole run take.
//!
//! ## Design
//!
//! - **Arena graph**: work items live in a flat arena owned by the
//!   [`Registry`]; dependency edges are index lists, so the graph carries no
//!   shared ownership and cycles are detected instead of followed forever.
//! - **Group atomicity**: every reachable member of a touched group is
//!   scheduled, and a group occupies the core pool exclusively until its
//!   block drains.
//! - **Deterministic resolution**: both topological passes (group order and
//!   component linearization) break ties in declaration order, so resolving
//!   the same target twice yields identical schedules.
//! - **Simulated time**: "cores" cap concurrent pool occupancy; nothing
//!   actually executes. The simulator advances discrete ticks and records a
//!   [`Trace`] of pool contents per tick.
//!
//! ## Quick Start
//!
//! ```rust
//! use pipesim::{resolve, Registry, Reporter, Simulator};
//!
//! let mut builder = Registry::builder();
//! builder.add_component("load", 1, "ingest", &[]).unwrap();
//! builder.add_component("train", 3, "model", &["load"]).unwrap();
//! let registry = builder.build().unwrap();
//!
//! let line = resolve(&registry, "train").unwrap();
//! let mut sim = Simulator::new(&registry, 2).unwrap();
//! let total_ticks = sim.execute(&line).unwrap();
//! assert_eq!(total_ticks, 4);
//!
//! let report = Reporter::new(sim.trace()).render();
//! assert!(report.contains("train"));
//! ```

pub mod error;
pub mod item;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod scheduler;
pub mod trace;
pub mod types;

// Re-export commonly used types
pub use error::{PipelineError, Result};
pub use item::WorkItem;
pub use registry::{Group, Registry, RegistryBuilder};
pub use report::{report_file_name, Reporter};
pub use resolver::{resolve, Block, ExecutionLine};
pub use scheduler::{Simulator, SimulatorStats};
pub use trace::{Trace, TraceRecord};
pub use types::{GroupId, ItemId, Tick, UNGROUPED};

/// Initialize the tracing subscriber for logging.
///
/// Call this at the start of your program to enable logging.
pub fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
