// src/model.rs

//! Records the engine reads from and writes to its store collaborators.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DependencyType, LocationId, ScheduleId, TaskId, TaskStatus, TemplateId};

/// A construction task, owned by one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub schedule_id: ScheduleId,
    pub location_id: LocationId,
    pub name: String,
    pub status: TaskStatus,
    pub scheduled_start: Option<NaiveDate>,
    pub scheduled_end: Option<NaiveDate>,
    pub duration_days: u32,
    /// Position of the template rule this task was materialized from.
    pub sort_order: Option<u32>,
    /// Budgeted cost, carried over from the template rule.
    pub cost: Option<f64>,
    /// Trade or work category (plumbing, electrical, ...).
    pub category: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub verified_by: Option<String>,
    pub verification_photo_url: Option<String>,
    pub verification_notes: Option<String>,
    pub worker_completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn has_photo(&self) -> bool {
        self.verification_photo_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

/// Field-level update applied by `TaskStore::update_task`.
///
/// `None` leaves a field untouched. The doubly optional verification stamps
/// can be cleared with `Some(None)` (rework out of `verified`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub status: Option<TaskStatus>,
    pub scheduled_start: Option<NaiveDate>,
    pub scheduled_end: Option<NaiveDate>,
    pub verified_at: Option<Option<DateTime<Utc>>>,
    pub verified_by: Option<Option<String>>,
    pub verification_photo_url: Option<String>,
    pub verification_notes: Option<String>,
    pub worker_completed_at: Option<DateTime<Utc>>,
}

impl TaskUpdate {
    pub fn dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            scheduled_start: Some(start),
            scheduled_end: Some(end),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, task: &mut Task) {
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(start) = self.scheduled_start {
            task.scheduled_start = Some(start);
        }
        if let Some(end) = self.scheduled_end {
            task.scheduled_end = Some(end);
        }
        if let Some(verified_at) = self.verified_at {
            task.verified_at = verified_at;
        }
        if let Some(ref verified_by) = self.verified_by {
            task.verified_by = verified_by.clone();
        }
        if let Some(ref url) = self.verification_photo_url {
            task.verification_photo_url = Some(url.clone());
        }
        if let Some(ref notes) = self.verification_notes {
            task.verification_notes = Some(notes.clone());
        }
        if let Some(at) = self.worker_completed_at {
            task.worker_completed_at = Some(at);
        }
    }
}

/// Record handed to `TaskStore::create_tasks`; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub schedule_id: ScheduleId,
    pub location_id: LocationId,
    pub name: String,
    pub duration_days: u32,
    pub sort_order: Option<u32>,
    pub cost: Option<f64>,
    pub category: Option<String>,
    pub scheduled_start: Option<NaiveDate>,
    pub scheduled_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub schedule_id: ScheduleId,
    pub name: String,
    #[serde(default)]
    pub templates_applied: Vec<TemplateId>,
}

/// Directed precedence edge: `source` (predecessor) constrains `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub schedule_id: ScheduleId,
    pub source: TaskId,
    pub target: TaskId,
    pub dependency_type: DependencyType,
    pub lag_days: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
}

/// One not-yet-materialized task of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRule {
    pub sort_order: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<u32>,
    #[serde(default = "default_duration_days")]
    pub duration_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

pub fn default_duration_days() -> u32 {
    1
}
