// src/schedule/mod.rs

//! Auto-scheduler: propagate date shifts to everything downstream of a task.
//!
//! - [`span`] derives effective dates and per-edge constraints.
//! - [`propagate`] walks the successor closure and writes changed dates.

use std::fmt;

use chrono::NaiveDate;

use crate::types::TaskId;

pub mod propagate;
pub mod span;

pub use propagate::AutoScheduler;
pub use span::Span;

/// Why a reschedule walk was started; decides the root task's anchor dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescheduleAnchor {
    /// The root was just verified: it actually finished on the reference date.
    Verified,
    /// The root went back to `in_progress`: it cannot finish before the
    /// reference date.
    Rework,
}

/// One downstream task whose dates moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateShift {
    pub task: TaskId,
    pub old_start: Option<NaiveDate>,
    pub old_end: Option<NaiveDate>,
    pub new_start: NaiveDate,
    pub new_end: NaiveDate,
}

/// Non-fatal problem found while propagating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagationWarning {
    pub task: Option<TaskId>,
    pub message: String,
}

impl PropagationWarning {
    pub fn new(task: Option<TaskId>, message: impl Into<String>) -> Self {
        Self {
            task,
            message: message.into(),
        }
    }
}

impl fmt::Display for PropagationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.task {
            Some(task) => write!(f, "task {task}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Outcome of one reschedule walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagationReport {
    pub root: TaskId,
    pub anchor: Span,
    /// Downstream tasks looked at (recomputed or skipped).
    pub visited: usize,
    pub shifted: Vec<DateShift>,
    pub warnings: Vec<PropagationWarning>,
}

impl PropagationReport {
    pub fn shift_for(&self, task: &TaskId) -> Option<&DateShift> {
        self.shifted.iter().find(|s| &s.task == task)
    }
}
