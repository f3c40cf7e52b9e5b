// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ProjectFile, RawProjectFile, TemplateConfig};
use crate::errors::{Result, SiteplanError};

impl TryFrom<RawProjectFile> for ProjectFile {
    type Error = SiteplanError;

    fn try_from(raw: RawProjectFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_project(&raw)?;
        Ok(ProjectFile::new_unchecked(raw))
    }
}

fn config_error(message: impl Into<String>) -> SiteplanError {
    SiteplanError::Config(message.into())
}

fn validate_raw_project(raw: &RawProjectFile) -> Result<()> {
    validate_global_config(raw)?;
    validate_task_locations(raw)?;
    validate_dependencies(raw)?;
    validate_dependency_dag(raw)?;
    for (id, template) in raw.template.iter() {
        validate_template(id, template)?;
    }
    Ok(())
}

fn validate_global_config(raw: &RawProjectFile) -> Result<()> {
    if raw.project.id.trim().is_empty() {
        return Err(config_error("[project].id must not be empty"));
    }
    if raw.config.notification_queue_length == 0 {
        return Err(config_error(
            "[config].notification_queue_length must be >= 1 (got 0)",
        ));
    }
    Ok(())
}

fn validate_task_locations(raw: &RawProjectFile) -> Result<()> {
    for (id, task) in raw.task.iter() {
        if !raw.location.contains_key(&task.location) {
            return Err(config_error(format!(
                "task '{id}' refers to unknown location '{}'",
                task.location
            )));
        }
        if let (Some(start), Some(end)) = (task.scheduled_start, task.scheduled_end) {
            if end < start {
                return Err(config_error(format!(
                    "task '{id}' ends ({end}) before it starts ({start})"
                )));
            }
        }
    }
    Ok(())
}

fn validate_dependencies(raw: &RawProjectFile) -> Result<()> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();

    for dep in raw.dependency.iter() {
        for end in [&dep.source, &dep.target] {
            if !raw.task.contains_key(end) {
                return Err(config_error(format!(
                    "dependency {} -> {} refers to unknown task '{end}'",
                    dep.source, dep.target
                )));
            }
        }
        if dep.source == dep.target {
            return Err(config_error(format!(
                "task '{}' cannot depend on itself",
                dep.source
            )));
        }
        if !seen.insert((dep.source.as_str(), dep.target.as_str())) {
            return Err(config_error(format!(
                "duplicate dependency {} -> {}",
                dep.source, dep.target
            )));
        }
    }
    Ok(())
}

fn validate_dependency_dag(raw: &RawProjectFile) -> Result<()> {
    // Edge direction: source (predecessor) -> target (dependent).
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for id in raw.task.keys() {
        graph.add_node(id.as_str());
    }
    for dep in raw.dependency.iter() {
        graph.add_edge(dep.source.as_str(), dep.target.as_str(), ());
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(SiteplanError::cycle(format!(
            "cycle detected in task dependencies involving task '{}'",
            cycle.node_id()
        ))),
    }
}

fn validate_template(id: &str, template: &TemplateConfig) -> Result<()> {
    let mut orders: HashSet<u32> = HashSet::new();
    for rule in template.rule.iter() {
        if !orders.insert(rule.sort_order) {
            return Err(config_error(format!(
                "template '{id}' has more than one rule with sort_order {}",
                rule.sort_order
            )));
        }
    }

    let mut graph: DiGraphMap<u32, ()> = DiGraphMap::new();
    for rule in template.rule.iter() {
        graph.add_node(rule.sort_order);
        let Some(dep) = rule.depends_on else {
            continue;
        };
        if dep == rule.sort_order {
            return Err(config_error(format!(
                "template '{id}' rule {dep} cannot depend on itself"
            )));
        }
        if !orders.contains(&dep) {
            return Err(config_error(format!(
                "template '{id}' rule {} depends on unknown sort_order {dep}",
                rule.sort_order
            )));
        }
        graph.add_edge(dep, rule.sort_order, ());
    }

    toposort(&graph, None).map(|_| ()).map_err(|cycle| {
        SiteplanError::cycle(format!(
            "cycle detected in template '{id}' involving rule {}",
            cycle.node_id()
        ))
    })
}
