//! Core type definitions for the pipeline simulator.
//!
//! This module defines the fundamental types used throughout the resolver
//! and the scheduling simulator.

/// Discrete simulated time unit.
///
/// Every trace record and every completion check uses the same `Tick`
/// representation, giving one timeline across the whole run.
pub type Tick = u64;

/// Index of a work item in the registry's arena.
///
/// Items are stored in a flat arena in declaration order; all dependency
/// edges are stored as `ItemId` lists rather than shared references.
pub type ItemId = usize;

/// Index of a group in the registry's group table.
///
/// Groups are stored in declaration order (first member sighting).
pub type GroupId = usize;

/// Sentinel group name assigned to components declared with an empty group.
///
/// Normalized once at load time; downstream algorithms treat it like any
/// other group.
pub const UNGROUPED: &str = "__NONE__";
