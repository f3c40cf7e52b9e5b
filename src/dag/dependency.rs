// src/dag/dependency.rs

//! Validated creation, listing and removal of dependency edges.

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use crate::dag::cycle::would_create_cycle;
use crate::dag::graph::ScheduleGraph;
use crate::errors::{Result, SiteplanError, StoreError};
use crate::model::{Edge, Task};
use crate::store::{GraphStore, TaskStore};
use crate::types::{DependencyType, ScheduleId, TaskId, TaskStatus};

/// Display-oriented view of the task on the other end of an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedTask {
    pub id: TaskId,
    pub name: String,
    pub status: TaskStatus,
    pub scheduled_start: Option<NaiveDate>,
    pub scheduled_end: Option<NaiveDate>,
}

impl From<&Task> for LinkedTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            status: task.status,
            scheduled_start: task.scheduled_start,
            scheduled_end: task.scheduled_end,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkedEdge {
    pub edge: Edge,
    pub task: LinkedTask,
}

/// Both sides of a task's dependency neighbourhood.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDependencies {
    /// Edges into the task, joined with their source task.
    pub predecessors: Vec<LinkedEdge>,
    /// Edges out of the task, joined with their target task.
    pub successors: Vec<LinkedEdge>,
}

/// Validates and persists edges on top of the cycle checker.
#[derive(Debug)]
pub struct DependencyManager<'a, S> {
    store: &'a S,
    verify_after_insert: bool,
}

impl<'a, S> DependencyManager<'a, S>
where
    S: TaskStore + GraphStore,
{
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            verify_after_insert: true,
        }
    }

    /// Toggle the post-insert acyclicity re-check (on by default).
    pub fn verify_after_insert(mut self, enabled: bool) -> Self {
        self.verify_after_insert = enabled;
        self
    }

    /// Add `source -> target` to the schedule after full validation.
    ///
    /// `dependency_type` is the raw value from the request; an unknown value is
    /// rejected before anything else is looked at.
    pub fn add_dependency(
        &self,
        schedule: &ScheduleId,
        target: &TaskId,
        source: &TaskId,
        dependency_type: &str,
        lag_days: i32,
    ) -> Result<Edge> {
        let dependency_type: DependencyType = dependency_type.parse()?;
        self.add_typed_dependency(schedule, target, source, dependency_type, lag_days)
    }

    /// Same as [`Self::add_dependency`] with an already-parsed type.
    pub fn add_typed_dependency(
        &self,
        schedule: &ScheduleId,
        target: &TaskId,
        source: &TaskId,
        dependency_type: DependencyType,
        lag_days: i32,
    ) -> Result<Edge> {
        if source == target {
            return Err(SiteplanError::validation(format!(
                "A task cannot depend on itself (self-dependency on task '{source}')"
            )));
        }

        self.require_task_in_schedule(schedule, source)?;
        self.require_task_in_schedule(schedule, target)?;

        let edges = self.store.list_edges_in_schedule(schedule)?;
        let graph = ScheduleGraph::from_edges(&edges);

        if would_create_cycle(&graph, source, target) {
            debug!(%schedule, %source, %target, "rejecting edge: would create cycle");
            return Err(SiteplanError::cycle(
                "Adding this dependency would create a circular reference",
            ));
        }

        if self.store.edge_exists(source, target)? {
            return Err(SiteplanError::conflict(format!(
                "Duplicate dependency: task '{target}' already depends on task '{source}'"
            )));
        }

        let edge = Edge {
            schedule_id: schedule.clone(),
            source: source.clone(),
            target: target.clone(),
            dependency_type,
            lag_days,
        };

        match self.store.insert_edge(&edge) {
            Ok(()) => {}
            Err(StoreError::Duplicate { .. }) => {
                warn!(%source, %target, "edge inserted concurrently; store rejected duplicate");
                return Err(SiteplanError::conflict(format!(
                    "Duplicate dependency: task '{target}' already depends on task '{source}'"
                )));
            }
            Err(e) => return Err(e.into()),
        }

        if self.verify_after_insert {
            self.verify_still_acyclic(&edge)?;
        }

        info!(
            %schedule,
            %source,
            %target,
            dependency_type = %edge.dependency_type,
            lag_days,
            "dependency created"
        );
        Ok(edge)
    }

    /// Detect a cycle admitted by two concurrent inserts that each validated
    /// against a stale snapshot, and undo our half of it.
    fn verify_still_acyclic(&self, edge: &Edge) -> Result<()> {
        let edges = self.store.list_edges_in_schedule(&edge.schedule_id)?;
        if ScheduleGraph::from_edges(&edges).is_acyclic() {
            return Ok(());
        }

        error!(
            schedule = %edge.schedule_id,
            source = %edge.source,
            target = %edge.target,
            "cycle detected after insert (concurrent edit); removing edge"
        );
        self.store.remove_edge(&edge.source, &edge.target)?;
        Err(SiteplanError::cycle(
            "Adding this dependency would create a circular reference (conflicting concurrent edit)",
        ))
    }

    fn require_task_in_schedule(&self, schedule: &ScheduleId, id: &TaskId) -> Result<Task> {
        match self.store.get_task(id)? {
            Some(task) if &task.schedule_id == schedule => Ok(task),
            Some(_) => Err(SiteplanError::not_found(format!(
                "Task '{id}' does not belong to schedule '{schedule}'"
            ))),
            None => Err(SiteplanError::not_found(format!("Task '{id}' not found"))),
        }
    }

    /// Remove an existing edge of this schedule.
    pub fn remove_dependency(
        &self,
        schedule: &ScheduleId,
        source: &TaskId,
        target: &TaskId,
    ) -> Result<()> {
        let exists = self
            .store
            .list_edges_from(source)?
            .iter()
            .any(|e| &e.target == target && &e.schedule_id == schedule);

        if !exists || !self.store.remove_edge(source, target)? {
            return Err(SiteplanError::not_found(format!(
                "No dependency from task '{source}' to task '{target}' in schedule '{schedule}'"
            )));
        }

        info!(%schedule, %source, %target, "dependency removed");
        Ok(())
    }

    /// Predecessor and successor edges of a task, joined with the task on
    /// the other end. No validation is re-run.
    pub fn list_dependencies(&self, id: &TaskId) -> Result<TaskDependencies> {
        if self.store.get_task(id)?.is_none() {
            return Err(SiteplanError::not_found(format!("Task '{id}' not found")));
        }

        let predecessors = self.join(self.store.list_edges_to(id)?, |e| &e.source)?;
        let successors = self.join(self.store.list_edges_from(id)?, |e| &e.target)?;

        Ok(TaskDependencies {
            predecessors,
            successors,
        })
    }

    fn join(&self, edges: Vec<Edge>, other: impl Fn(&Edge) -> &TaskId) -> Result<Vec<LinkedEdge>> {
        let mut linked = Vec::with_capacity(edges.len());
        for edge in edges {
            let found = self.store.get_task(other(&edge))?;
            match found {
                Some(task) => linked.push(LinkedEdge {
                    task: LinkedTask::from(&task),
                    edge,
                }),
                None => warn!(
                    source = %edge.source,
                    target = %edge.target,
                    "edge endpoint missing from task store; skipping"
                ),
            }
        }
        Ok(linked)
    }
}
