// src/store/mod.rs

//! Narrow store interfaces the engine needs from its persistence collaborators.
//!
//! Production deployments back these with a relational database; the crate
//! ships [`memory::MemoryStore`] for the CLI and for tests.

use std::fmt::Debug;

use crate::errors::StoreError;
use crate::model::{Edge, Location, NewTask, Task, TaskUpdate, Template, TemplateRule};
use crate::types::{LocationId, ScheduleId, TaskId, TemplateId};

pub mod memory;

pub use memory::MemoryStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable record of tasks and the locations that own them.
pub trait TaskStore: Send + Sync + Debug {
    fn get_task(&self, id: &TaskId) -> StoreResult<Option<Task>>;
    fn list_tasks_by_location(&self, location: &LocationId) -> StoreResult<Vec<Task>>;
    fn list_tasks_by_schedule(&self, schedule: &ScheduleId) -> StoreResult<Vec<Task>>;

    /// Apply `update` and return the stored record after the write.
    fn update_task(&self, id: &TaskId, update: &TaskUpdate) -> StoreResult<Task>;

    /// Insert new tasks, assigning ids. Returned in input order.
    fn create_tasks(&self, records: Vec<NewTask>) -> StoreResult<Vec<Task>>;

    fn get_location(&self, id: &LocationId) -> StoreResult<Option<Location>>;
    fn mark_template_applied(&self, location: &LocationId, template: &TemplateId)
    -> StoreResult<()>;
}

/// Durable edge list `{predecessor, successor, type, lag}`.
pub trait GraphStore: Send + Sync + Debug {
    fn list_edges_from(&self, task: &TaskId) -> StoreResult<Vec<Edge>>;
    fn list_edges_to(&self, task: &TaskId) -> StoreResult<Vec<Edge>>;
    fn list_edges_in_schedule(&self, schedule: &ScheduleId) -> StoreResult<Vec<Edge>>;
    fn edge_exists(&self, source: &TaskId, target: &TaskId) -> StoreResult<bool>;

    /// Must reject an existing (source, target) pair with [`StoreError::Duplicate`].
    fn insert_edge(&self, edge: &Edge) -> StoreResult<()>;

    /// Returns `false` if no such edge existed.
    fn remove_edge(&self, source: &TaskId, target: &TaskId) -> StoreResult<bool>;
}

pub trait TemplateStore: Send + Sync + Debug {
    fn get_template(&self, id: &TemplateId) -> StoreResult<Option<Template>>;

    /// Rules ordered by `sort_order`.
    fn list_template_rules(&self, id: &TemplateId) -> StoreResult<Vec<TemplateRule>>;
}

/// Everything the engine facade needs from one backend.
pub trait Store: TaskStore + GraphStore + TemplateStore {}

impl<T: TaskStore + GraphStore + TemplateStore> Store for T {}
