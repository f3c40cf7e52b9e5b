// src/config/snapshot.rs

//! Conversion between a project file and the in-memory store.

use std::collections::BTreeMap;

use crate::config::model::{
    DependencyConfig, LocationConfig, ProjectFile, TaskConfig, TemplateConfig,
};
use crate::errors::Result;
use crate::model::{Edge, Location, Task, Template};
use crate::store::{GraphStore, MemoryStore};
use crate::types::{LocationId, ScheduleId, TaskId, TemplateId};

/// Seed a fresh [`MemoryStore`] with everything in `project`.
pub fn seed_store(project: &ProjectFile) -> Result<MemoryStore> {
    let store = MemoryStore::new();
    let schedule = ScheduleId::new(project.project.id.clone());

    for (id, loc) in project.location.iter() {
        store.insert_location(Location {
            id: LocationId::new(id.clone()),
            schedule_id: schedule.clone(),
            name: loc.name.clone(),
            templates_applied: loc
                .templates_applied
                .iter()
                .map(|t| TemplateId::new(t.clone()))
                .collect(),
        })?;
    }

    for (id, t) in project.task.iter() {
        store.insert_task(Task {
            id: TaskId::new(id.clone()),
            schedule_id: schedule.clone(),
            location_id: LocationId::new(t.location.clone()),
            name: t.name.clone(),
            status: t.status,
            scheduled_start: t.scheduled_start,
            scheduled_end: t.scheduled_end,
            duration_days: t.duration_days,
            sort_order: t.sort_order,
            cost: t.cost,
            category: t.category.clone(),
            verified_at: t.verified_at,
            verified_by: t.verified_by.clone(),
            verification_photo_url: t.verification_photo_url.clone(),
            verification_notes: t.verification_notes.clone(),
            worker_completed_at: t.worker_completed_at,
        })?;
    }

    for dep in project.dependency.iter() {
        store.insert_edge(&Edge {
            schedule_id: schedule.clone(),
            source: TaskId::new(dep.source.clone()),
            target: TaskId::new(dep.target.clone()),
            dependency_type: dep.dependency_type,
            lag_days: dep.lag_days,
        })?;
    }

    for (id, template) in project.template.iter() {
        store.insert_template(
            Template {
                id: TemplateId::new(id.clone()),
                name: template.name.clone(),
            },
            template.rule.clone(),
        )?;
    }

    Ok(store)
}

/// Capture the current store contents as a project file, keeping the
/// `[config]` and `[project]` sections of `base`.
pub fn project_from_store(store: &MemoryStore, base: &ProjectFile) -> Result<ProjectFile> {
    let location: BTreeMap<String, LocationConfig> = store
        .locations()?
        .into_iter()
        .map(|loc| {
            (
                loc.id.to_string(),
                LocationConfig {
                    name: loc.name,
                    templates_applied: loc
                        .templates_applied
                        .into_iter()
                        .map(|t| t.to_string())
                        .collect(),
                },
            )
        })
        .collect();

    let task: BTreeMap<String, TaskConfig> = store
        .tasks()?
        .into_iter()
        .map(|t| {
            (
                t.id.to_string(),
                TaskConfig {
                    location: t.location_id.to_string(),
                    name: t.name,
                    status: t.status,
                    scheduled_start: t.scheduled_start,
                    scheduled_end: t.scheduled_end,
                    duration_days: t.duration_days,
                    sort_order: t.sort_order,
                    cost: t.cost,
                    category: t.category,
                    verified_at: t.verified_at,
                    verified_by: t.verified_by,
                    verification_photo_url: t.verification_photo_url,
                    verification_notes: t.verification_notes,
                    worker_completed_at: t.worker_completed_at,
                },
            )
        })
        .collect();

    let dependency = store
        .edges()?
        .into_iter()
        .map(|e| DependencyConfig {
            source: e.source.to_string(),
            target: e.target.to_string(),
            dependency_type: e.dependency_type,
            lag_days: e.lag_days,
        })
        .collect();

    let template = store
        .templates()?
        .into_iter()
        .map(|(t, rules)| {
            (
                t.id.to_string(),
                TemplateConfig {
                    name: t.name,
                    rule: rules,
                },
            )
        })
        .collect();

    Ok(ProjectFile {
        config: base.config.clone(),
        project: base.project.clone(),
        location,
        task,
        dependency,
        template,
    })
}
