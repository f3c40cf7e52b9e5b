// src/store/memory.rs

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use super::{GraphStore, StoreResult, TaskStore, TemplateStore};
use crate::errors::StoreError;
use crate::model::{Edge, Location, NewTask, Task, TaskUpdate, Template, TemplateRule};
use crate::types::{LocationId, ScheduleId, TaskId, TaskStatus, TemplateId};

#[derive(Debug, Default)]
struct Inner {
    tasks: BTreeMap<TaskId, Task>,
    locations: BTreeMap<LocationId, Location>,
    /// Insertion order is kept so listings are stable.
    edges: Vec<Edge>,
    templates: BTreeMap<TemplateId, (Template, Vec<TemplateRule>)>,
    /// Task ids whose `update_task` calls fail (test hook).
    failing_updates: HashSet<TaskId>,
}

/// In-process store implementing every collaborator trait.
///
/// Clones share the same underlying data, so a test can keep a handle while
/// the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }

    pub fn insert_location(&self, location: Location) -> StoreResult<()> {
        self.lock()?.locations.insert(location.id.clone(), location);
        Ok(())
    }

    pub fn insert_task(&self, task: Task) -> StoreResult<()> {
        self.lock()?.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    pub fn insert_template(&self, template: Template, mut rules: Vec<TemplateRule>) -> StoreResult<()> {
        rules.sort_by_key(|r| r.sort_order);
        self.lock()?
            .templates
            .insert(template.id.clone(), (template, rules));
        Ok(())
    }

    /// Make every subsequent `update_task` for `task` fail.
    pub fn fail_updates_for(&self, task: &TaskId) -> StoreResult<()> {
        self.lock()?.failing_updates.insert(task.clone());
        Ok(())
    }

    pub fn tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.lock()?.tasks.values().cloned().collect())
    }

    pub fn locations(&self) -> StoreResult<Vec<Location>> {
        Ok(self.lock()?.locations.values().cloned().collect())
    }

    pub fn edges(&self) -> StoreResult<Vec<Edge>> {
        Ok(self.lock()?.edges.clone())
    }

    pub fn templates(&self) -> StoreResult<Vec<(Template, Vec<TemplateRule>)>> {
        Ok(self.lock()?.templates.values().cloned().collect())
    }
}

impl TaskStore for MemoryStore {
    fn get_task(&self, id: &TaskId) -> StoreResult<Option<Task>> {
        Ok(self.lock()?.tasks.get(id).cloned())
    }

    fn list_tasks_by_location(&self, location: &LocationId) -> StoreResult<Vec<Task>> {
        let inner = self.lock()?;
        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|t| &t.location_id == location)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.id.cmp(&b.id)));
        Ok(tasks)
    }

    fn list_tasks_by_schedule(&self, schedule: &ScheduleId) -> StoreResult<Vec<Task>> {
        Ok(self
            .lock()?
            .tasks
            .values()
            .filter(|t| &t.schedule_id == schedule)
            .cloned()
            .collect())
    }

    fn update_task(&self, id: &TaskId, update: &TaskUpdate) -> StoreResult<Task> {
        let mut inner = self.lock()?;
        if inner.failing_updates.contains(id) {
            return Err(StoreError::Backend(format!("write rejected for task {id}")));
        }
        let task = inner
            .tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::Missing(format!("task {id}")))?;
        update.apply_to(task);
        Ok(task.clone())
    }

    fn create_tasks(&self, records: Vec<NewTask>) -> StoreResult<Vec<Task>> {
        let mut inner = self.lock()?;
        let mut created = Vec::with_capacity(records.len());

        for record in records {
            let task = Task {
                id: TaskId::new(Uuid::new_v4().to_string()),
                schedule_id: record.schedule_id,
                location_id: record.location_id,
                name: record.name,
                status: TaskStatus::NotStarted,
                scheduled_start: record.scheduled_start,
                scheduled_end: record.scheduled_end,
                duration_days: record.duration_days,
                sort_order: record.sort_order,
                cost: record.cost,
                category: record.category,
                verified_at: None,
                verified_by: None,
                verification_photo_url: None,
                verification_notes: None,
                worker_completed_at: None,
            };
            inner.tasks.insert(task.id.clone(), task.clone());
            created.push(task);
        }

        Ok(created)
    }

    fn get_location(&self, id: &LocationId) -> StoreResult<Option<Location>> {
        Ok(self.lock()?.locations.get(id).cloned())
    }

    fn mark_template_applied(
        &self,
        location: &LocationId,
        template: &TemplateId,
    ) -> StoreResult<()> {
        let mut inner = self.lock()?;
        let loc = inner
            .locations
            .get_mut(location)
            .ok_or_else(|| StoreError::Missing(format!("location {location}")))?;
        if !loc.templates_applied.contains(template) {
            loc.templates_applied.push(template.clone());
        }
        Ok(())
    }
}

impl GraphStore for MemoryStore {
    fn list_edges_from(&self, task: &TaskId) -> StoreResult<Vec<Edge>> {
        Ok(self
            .lock()?
            .edges
            .iter()
            .filter(|e| &e.source == task)
            .cloned()
            .collect())
    }

    fn list_edges_to(&self, task: &TaskId) -> StoreResult<Vec<Edge>> {
        Ok(self
            .lock()?
            .edges
            .iter()
            .filter(|e| &e.target == task)
            .cloned()
            .collect())
    }

    fn list_edges_in_schedule(&self, schedule: &ScheduleId) -> StoreResult<Vec<Edge>> {
        Ok(self
            .lock()?
            .edges
            .iter()
            .filter(|e| &e.schedule_id == schedule)
            .cloned()
            .collect())
    }

    fn edge_exists(&self, source: &TaskId, target: &TaskId) -> StoreResult<bool> {
        Ok(self
            .lock()?
            .edges
            .iter()
            .any(|e| &e.source == source && &e.target == target))
    }

    fn insert_edge(&self, edge: &Edge) -> StoreResult<()> {
        let mut inner = self.lock()?;
        if inner
            .edges
            .iter()
            .any(|e| e.source == edge.source && e.target == edge.target)
        {
            return Err(StoreError::Duplicate {
                source_id: edge.source.to_string(),
                target_id: edge.target.to_string(),
            });
        }
        inner.edges.push(edge.clone());
        Ok(())
    }

    fn remove_edge(&self, source: &TaskId, target: &TaskId) -> StoreResult<bool> {
        let mut inner = self.lock()?;
        let before = inner.edges.len();
        inner
            .edges
            .retain(|e| !(&e.source == source && &e.target == target));
        Ok(inner.edges.len() != before)
    }
}

impl TemplateStore for MemoryStore {
    fn get_template(&self, id: &TemplateId) -> StoreResult<Option<Template>> {
        Ok(self.lock()?.templates.get(id).map(|(t, _)| t.clone()))
    }

    fn list_template_rules(&self, id: &TemplateId) -> StoreResult<Vec<TemplateRule>> {
        Ok(self
            .lock()?
            .templates
            .get(id)
            .map(|(_, rules)| rules.clone())
            .unwrap_or_default())
    }
}
