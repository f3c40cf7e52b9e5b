// src/dag/mod.rs

//! Dependency graph: snapshot, cycle check and the validated edge write path.
//!
//! - [`graph`] holds the per-operation adjacency snapshot of one schedule.
//! - [`cycle`] decides whether a proposed edge would close a cycle.
//! - [`dependency`] validates, persists, lists and removes edges.

pub mod cycle;
pub mod dependency;
pub mod graph;

pub use cycle::would_create_cycle;
pub use dependency::{DependencyManager, LinkedEdge, LinkedTask, TaskDependencies};
pub use graph::{EdgeWeight, ScheduleGraph};
