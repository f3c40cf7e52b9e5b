// src/template/mod.rs

//! Template expansion: bulk provisioning of task sets per location.
//!
//! Each location gets its own copy of the template's tasks, and every
//! template-relative `depends_on` rule becomes a concrete finish-to-start
//! edge between that location's copies. Locations never share tasks or
//! edges, so one location failing does not affect the others.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::dag::DependencyManager;
use crate::errors::{Result, SiteplanError};
use crate::model::{Location, NewTask, TemplateRule};
use crate::store::{GraphStore, TaskStore, TemplateStore};
use crate::types::{DependencyType, LocationId, TaskId, TemplateId};

/// Something that went wrong for one location; the batch carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFailure {
    pub location: LocationId,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateApplication {
    pub tasks_created: usize,
    pub dependencies_created: usize,
    /// Locations that already had this template and were left alone.
    pub skipped: Vec<LocationId>,
    pub failures: Vec<LocationFailure>,
}

impl TemplateApplication {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, location: &LocationId, message: impl Into<String>) {
        let message = message.into();
        warn!(location = %location, %message, "template expansion problem");
        self.failures.push(LocationFailure {
            location: location.clone(),
            message,
        });
    }
}

#[derive(Debug)]
pub struct TemplateExpander<'a, S> {
    store: &'a S,
    verify_after_insert: bool,
}

impl<'a, S> TemplateExpander<'a, S>
where
    S: TaskStore + GraphStore + TemplateStore,
{
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            verify_after_insert: true,
        }
    }

    pub fn verify_after_insert(mut self, enabled: bool) -> Self {
        self.verify_after_insert = enabled;
        self
    }

    pub fn apply_template(
        &self,
        template_id: &TemplateId,
        locations: &[LocationId],
    ) -> Result<TemplateApplication> {
        let template = self
            .store
            .get_template(template_id)?
            .ok_or_else(|| SiteplanError::not_found(format!("Template '{template_id}' not found")))?;
        let rules = self.store.list_template_rules(template_id)?;

        let mut result = TemplateApplication::default();

        for location_id in locations {
            let location = match self.store.get_location(location_id) {
                Ok(Some(location)) => location,
                Ok(None) => {
                    result.fail(location_id, format!("Location '{location_id}' not found"));
                    continue;
                }
                Err(e) => {
                    result.fail(location_id, format!("could not load location: {e}"));
                    continue;
                }
            };

            if location.templates_applied.contains(template_id) {
                info!(location = %location_id, template = %template_id, "template already applied; skipping");
                result.skipped.push(location_id.clone());
                continue;
            }

            self.expand_location(template_id, &location, &rules, &mut result);
        }

        info!(
            template = %template.id,
            name = %template.name,
            locations = locations.len(),
            tasks_created = result.tasks_created,
            dependencies_created = result.dependencies_created,
            failures = result.failures.len(),
            "template applied"
        );
        Ok(result)
    }

    fn expand_location(
        &self,
        template_id: &TemplateId,
        location: &Location,
        rules: &[TemplateRule],
        result: &mut TemplateApplication,
    ) {
        let records: Vec<NewTask> = rules
            .iter()
            .map(|rule| NewTask {
                schedule_id: location.schedule_id.clone(),
                location_id: location.id.clone(),
                name: rule.name.clone(),
                duration_days: rule.duration_days,
                sort_order: Some(rule.sort_order),
                cost: rule.cost,
                category: rule.category.clone(),
                scheduled_start: None,
                scheduled_end: None,
            })
            .collect();

        let created = match self.store.create_tasks(records) {
            Ok(created) => created,
            Err(e) => {
                result.fail(&location.id, format!("could not create tasks: {e}"));
                return;
            }
        };
        result.tasks_created += created.len();

        let by_sort_order: HashMap<u32, TaskId> = created
            .iter()
            .filter_map(|t| t.sort_order.map(|order| (order, t.id.clone())))
            .collect();

        let manager = DependencyManager::new(self.store).verify_after_insert(self.verify_after_insert);

        for rule in rules {
            let Some(depends_on) = rule.depends_on else {
                continue;
            };

            let (Some(source), Some(target)) = (
                by_sort_order.get(&depends_on),
                by_sort_order.get(&rule.sort_order),
            ) else {
                result.fail(
                    &location.id,
                    format!(
                        "rule {} depends on unknown sort order {depends_on}",
                        rule.sort_order
                    ),
                );
                continue;
            };

            match manager.add_typed_dependency(
                &location.schedule_id,
                target,
                source,
                DependencyType::FinishToStart,
                0,
            ) {
                Ok(_) => result.dependencies_created += 1,
                Err(e) => result.fail(
                    &location.id,
                    format!("rule {} -> {depends_on}: {e}", rule.sort_order),
                ),
            }
        }

        if let Err(e) = self.store.mark_template_applied(&location.id, template_id) {
            result.fail(&location.id, format!("could not mark template applied: {e}"));
        }

        debug!(location = %location.id, tasks = created.len(), "location expanded");
    }
}
