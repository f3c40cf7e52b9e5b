// src/lifecycle/machine.rs

use tracing::{debug, info};

use crate::clock::Clock;
use crate::errors::{Result, SiteplanError};
use crate::lifecycle::transition::plan_transition;
use crate::lifecycle::{PostCommit, TransitionRequest};
use crate::model::Task;
use crate::store::TaskStore;

/// Result of one accepted status change.
#[derive(Debug, Clone)]
pub struct TransitionStep {
    /// The task as stored after the change (unchanged for a no-op).
    pub task: Task,
    pub changed: bool,
    /// Effects the caller must run after the commit.
    pub effects: Vec<PostCommit>,
}

/// Applies status changes through the task store.
///
/// Every check runs before the single `update_task` call, so a rejected
/// request leaves the stored record untouched.
#[derive(Debug)]
pub struct LifecycleMachine<'a, S: ?Sized> {
    store: &'a S,
    clock: &'a dyn Clock,
}

impl<'a, S> LifecycleMachine<'a, S>
where
    S: TaskStore + ?Sized,
{
    pub fn new(store: &'a S, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    pub fn transition(&self, request: &TransitionRequest) -> Result<TransitionStep> {
        let task = self.store.get_task(&request.task_id)?.ok_or_else(|| {
            SiteplanError::not_found(format!("Task '{}' not found", request.task_id))
        })?;

        let now = self.clock.now();
        let plan = plan_transition(&task, request, now)?;

        let Some(update) = plan.update else {
            debug!(task = %task.id, status = %task.status, "status unchanged; no-op");
            return Ok(TransitionStep {
                task,
                changed: false,
                effects: Vec::new(),
            });
        };

        let updated = self.store.update_task(&task.id, &update)?;
        info!(
            task = %updated.id,
            from = %task.status,
            to = %updated.status,
            actor = %request.actor,
            "task status changed"
        );

        Ok(TransitionStep {
            task: updated,
            changed: true,
            effects: plan.effects,
        })
    }
}
