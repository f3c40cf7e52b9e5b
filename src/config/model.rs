// src/config/model.rs

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{TemplateRule, default_duration_days};
use crate::types::{DependencyType, TaskStatus};

/// Project file exactly as read from TOML, before semantic validation.
///
/// ```toml
/// [config]
/// notification_queue_length = 64
///
/// [project]
/// id = "tower-a"
/// name = "Tower A"
///
/// [location.unit-101]
/// name = "Unit 101"
///
/// [task.frame-101]
/// location = "unit-101"
/// name = "Framing"
/// scheduled_start = "2026-03-02"
/// scheduled_end = "2026-03-05"
/// duration_days = 3
///
/// [[dependency]]
/// source = "frame-101"
/// target = "drywall-101"
/// type = "finish_to_start"
/// lag_days = 2
///
/// [template.kitchen]
/// name = "Kitchen fit-out"
///
/// [[template.kitchen.rule]]
/// sort_order = 1
/// name = "Rough plumbing"
/// ```
///
/// Dates are quoted `YYYY-MM-DD` strings; timestamps are RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProjectFile {
    #[serde(default)]
    pub config: ConfigSection,
    pub project: ProjectSection,
    #[serde(default)]
    pub location: BTreeMap<String, LocationConfig>,
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
    #[serde(default)]
    pub dependency: Vec<DependencyConfig>,
    #[serde(default)]
    pub template: BTreeMap<String, TemplateConfig>,
}

/// A validated project file. Build one with `ProjectFile::try_from(raw)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectFile {
    pub config: ConfigSection,
    pub project: ProjectSection,
    pub location: BTreeMap<String, LocationConfig>,
    pub task: BTreeMap<String, TaskConfig>,
    pub dependency: Vec<DependencyConfig>,
    pub template: BTreeMap<String, TemplateConfig>,
}

impl ProjectFile {
    pub(crate) fn new_unchecked(raw: RawProjectFile) -> Self {
        Self {
            config: raw.config,
            project: raw.project,
            location: raw.location,
            task: raw.task,
            dependency: raw.dependency,
            template: raw.template,
        }
    }
}

/// `[config]` section: engine behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSection {
    /// Capacity of the rework notification queue.
    #[serde(default = "default_notification_queue_length")]
    pub notification_queue_length: usize,

    /// Re-check acyclicity after every edge insert and undo the insert if a
    /// concurrent edit closed a cycle.
    #[serde(default = "default_true")]
    pub verify_acyclic_after_insert: bool,
}

fn default_notification_queue_length() -> usize {
    64
}

fn default_true() -> bool {
    true
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            notification_queue_length: default_notification_queue_length(),
            verify_acyclic_after_insert: true,
        }
    }
}

/// `[project]` section: the schedule every location belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSection {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates_applied: Vec<String>,
}

/// `[task.<id>]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub location: String,
    pub name: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_end: Option<NaiveDate>,
    #[serde(default = "default_duration_days")]
    pub duration_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_completed_at: Option<DateTime<Utc>>,
}

/// `[[dependency]]` entry: `source` must reach its point before `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyConfig {
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default)]
    pub dependency_type: DependencyType,
    #[serde(default)]
    pub lag_days: i32,
}

/// `[template.<id>]` section with its `[[template.<id>.rule]]` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub name: String,
    #[serde(default)]
    pub rule: Vec<TemplateRule>,
}
