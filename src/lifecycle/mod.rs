// src/lifecycle/mod.rs

//! Task lifecycle state machine.
//!
//! The pure table and planning live in [`transition`]; [`machine`] loads the
//! stored task, applies the planned write and hands the post-commit effects
//! back to the caller instead of running them inline.

use chrono::{DateTime, Utc};

use crate::schedule::RescheduleAnchor;
use crate::types::{TaskId, TaskStatus};

pub mod machine;
pub mod transition;

pub use machine::{LifecycleMachine, TransitionStep};
pub use transition::{Rule, TransitionPlan, plan_transition, rule_for};

/// A status change request as received from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRequest {
    pub task_id: TaskId,
    pub status: TaskStatus,
    /// Identity stamped into `verified_by`.
    pub actor: String,
    pub photo_url: Option<String>,
    /// Verification notes, or the justification for rework.
    pub notes: Option<String>,
}

impl TransitionRequest {
    pub fn new(task_id: impl Into<TaskId>, status: TaskStatus, actor: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            status,
            actor: actor.into(),
            photo_url: None,
            notes: None,
        }
    }

    pub fn with_photo(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Side effect to run once the status change is committed.
#[derive(Debug, Clone, PartialEq)]
pub enum PostCommit {
    /// Recompute the dates of everything downstream of `task`.
    Reschedule {
        task: TaskId,
        reference: DateTime<Utc>,
        anchor: RescheduleAnchor,
    },
    /// Tell the assigned party that `task` needs rework.
    NotifyRework { task: TaskId, notes: String },
}
