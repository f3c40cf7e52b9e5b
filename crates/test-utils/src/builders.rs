#![allow(dead_code)]

use chrono::NaiveDate;
use siteplan::model::{Edge, Location, Task, Template, TemplateRule};
use siteplan::store::{GraphStore, MemoryStore};
use siteplan::types::{DependencyType, LocationId, ScheduleId, TaskId, TaskStatus, TemplateId};

pub const SCHEDULE: &str = "tower-a";

/// Builder for a seeded `MemoryStore` to simplify test setup.
///
/// Everything lands in the schedule [`SCHEDULE`] unless overridden with
/// [`StoreBuilder::schedule`].
pub struct StoreBuilder {
    schedule: ScheduleId,
    locations: Vec<Location>,
    tasks: Vec<Task>,
    edges: Vec<Edge>,
    templates: Vec<(Template, Vec<TemplateRule>)>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            schedule: ScheduleId::new(SCHEDULE),
            locations: Vec::new(),
            tasks: Vec::new(),
            edges: Vec::new(),
            templates: Vec::new(),
        }
    }

    pub fn schedule(mut self, id: &str) -> Self {
        self.schedule = ScheduleId::new(id);
        self
    }

    pub fn location(mut self, id: &str) -> Self {
        self.locations.push(Location {
            id: LocationId::new(id),
            schedule_id: self.schedule.clone(),
            name: format!("Location {id}"),
            templates_applied: Vec::new(),
        });
        self
    }

    /// Add a task; a location it names is created on demand.
    pub fn with_task(mut self, task: TaskBuilder) -> Self {
        let task = task.build(&self.schedule);
        if !self.locations.iter().any(|l| l.id == task.location_id) {
            self = self.location(task.location_id.as_str());
        }
        self.tasks.push(task);
        self
    }

    /// Finish-to-start edge with no lag.
    pub fn edge(self, source: &str, target: &str) -> Self {
        self.typed_edge(source, target, DependencyType::FinishToStart, 0)
    }

    pub fn typed_edge(
        mut self,
        source: &str,
        target: &str,
        dependency_type: DependencyType,
        lag_days: i32,
    ) -> Self {
        self.edges.push(Edge {
            schedule_id: self.schedule.clone(),
            source: TaskId::new(source),
            target: TaskId::new(target),
            dependency_type,
            lag_days,
        });
        self
    }

    pub fn template(mut self, id: &str, rules: Vec<TemplateRule>) -> Self {
        self.templates.push((
            Template {
                id: TemplateId::new(id),
                name: format!("Template {id}"),
            },
            rules,
        ));
        self
    }

    pub fn build(self) -> MemoryStore {
        let store = MemoryStore::new();
        for location in self.locations {
            store.insert_location(location).expect("seed location");
        }
        for task in self.tasks {
            store.insert_task(task).expect("seed task");
        }
        for edge in self.edges {
            store.insert_edge(&edge).expect("seed edge");
        }
        for (template, rules) in self.templates {
            store.insert_template(template, rules).expect("seed template");
        }
        store
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Task`.
pub struct TaskBuilder {
    id: String,
    location: String,
    status: TaskStatus,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    duration_days: u32,
    photo: Option<String>,
}

impl TaskBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            location: "unit-101".to_string(),
            status: TaskStatus::NotStarted,
            start: None,
            end: None,
            duration_days: 1,
            photo: None,
        }
    }

    pub fn location(mut self, id: &str) -> Self {
        self.location = id.to_string();
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets both dates; the duration follows from them.
    pub fn dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self.duration_days = u32::try_from((end - start).num_days()).unwrap_or(0);
        self
    }

    pub fn duration(mut self, days: u32) -> Self {
        self.duration_days = days;
        self
    }

    pub fn photo(mut self, url: &str) -> Self {
        self.photo = Some(url.to_string());
        self
    }

    fn build(self, schedule: &ScheduleId) -> Task {
        Task {
            id: TaskId::new(self.id.clone()),
            schedule_id: schedule.clone(),
            location_id: LocationId::new(self.location),
            name: format!("Task {}", self.id),
            status: self.status,
            scheduled_start: self.start,
            scheduled_end: self.end,
            duration_days: self.duration_days,
            sort_order: None,
            cost: None,
            category: None,
            verified_at: None,
            verified_by: None,
            verification_photo_url: self.photo,
            verification_notes: None,
            worker_completed_at: None,
        }
    }
}

/// Template rule shorthand: one-day task, optional dependency.
pub fn rule(sort_order: u32, name: &str, depends_on: Option<u32>) -> TemplateRule {
    TemplateRule {
        sort_order,
        name: name.to_string(),
        depends_on,
        duration_days: 1,
        cost: None,
        category: None,
    }
}
