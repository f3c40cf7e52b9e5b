// src/engine/core.rs

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::ConfigSection;
use crate::dag::{DependencyManager, TaskDependencies};
use crate::engine::TransitionOutcome;
use crate::errors::{Result, SiteplanError};
use crate::lifecycle::{LifecycleMachine, TransitionRequest};
use crate::model::Edge;
use crate::notify::{LogNotifier, Notifier};
use crate::schedule::{AutoScheduler, PropagationReport, RescheduleAnchor};
use crate::store::Store;
use crate::template::{TemplateApplication, TemplateExpander};
use crate::types::{LocationId, ScheduleId, TaskId, TaskStatus, TemplateId};

/// The scheduling engine over one store backend.
#[derive(Debug)]
pub struct Engine<S> {
    store: S,
    clock: Box<dyn Clock>,
    pub(crate) notifier: Box<dyn Notifier>,
    verify_after_insert: bool,
}

impl<S: Store> Engine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Box::new(SystemClock),
            notifier: Box::new(LogNotifier),
            verify_after_insert: true,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Apply the `[config]` section of a project file.
    pub fn with_config(mut self, config: &ConfigSection) -> Self {
        self.verify_after_insert = config.verify_acyclic_after_insert;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn dependencies(&self) -> DependencyManager<'_, S> {
        DependencyManager::new(&self.store).verify_after_insert(self.verify_after_insert)
    }

    pub fn add_dependency(
        &self,
        schedule: &ScheduleId,
        target: &TaskId,
        source: &TaskId,
        dependency_type: &str,
        lag_days: i32,
    ) -> Result<Edge> {
        self.dependencies()
            .add_dependency(schedule, target, source, dependency_type, lag_days)
    }

    pub fn remove_dependency(
        &self,
        schedule: &ScheduleId,
        source: &TaskId,
        target: &TaskId,
    ) -> Result<()> {
        self.dependencies().remove_dependency(schedule, source, target)
    }

    pub fn list_dependencies(&self, task: &TaskId) -> Result<TaskDependencies> {
        self.dependencies().list_dependencies(task)
    }

    /// Validate and commit a status change, then run its post-commit effects.
    ///
    /// Only validation failures are returned as errors. Reschedule or
    /// notification failures after the commit end up in
    /// [`TransitionOutcome::warnings`].
    pub fn transition(&self, request: &TransitionRequest) -> Result<TransitionOutcome> {
        let step = LifecycleMachine::new(&self.store, self.clock()).transition(request)?;

        if step.effects.is_empty() {
            return Ok(TransitionOutcome::without_effects(step));
        }

        let (propagation, warnings) = self.run_post_commit(&step.effects);
        Ok(TransitionOutcome {
            task: step.task,
            changed: step.changed,
            propagation,
            warnings,
        })
    }

    /// Re-run downstream propagation for a task (e.g. after a partial failure).
    ///
    /// A verified task is anchored on its verification date; any other task
    /// is treated like a rework anchored on today.
    pub fn reschedule(&self, task_id: &TaskId) -> Result<PropagationReport> {
        let task = self
            .store
            .get_task(task_id)?
            .ok_or_else(|| SiteplanError::not_found(format!("Task '{task_id}' not found")))?;

        let now = self.clock.now();
        let (reference, anchor) = match task.status {
            TaskStatus::Verified => (task.verified_at.unwrap_or(now), RescheduleAnchor::Verified),
            _ => (now, RescheduleAnchor::Rework),
        };
        debug!(task = %task_id, ?anchor, "manual reschedule requested");

        AutoScheduler::new(&self.store).reschedule_downstream(task_id, reference, anchor)
    }

    pub fn apply_template(
        &self,
        template: &TemplateId,
        locations: &[LocationId],
    ) -> Result<TemplateApplication> {
        TemplateExpander::new(&self.store)
            .verify_after_insert(self.verify_after_insert)
            .apply_template(template, locations)
    }
}
