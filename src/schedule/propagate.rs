// src/schedule/propagate.rs

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::dag::ScheduleGraph;
use crate::errors::{Result, SiteplanError};
use crate::model::{Task, TaskUpdate};
use crate::schedule::span::{Span, required_start, shift};
use crate::schedule::{DateShift, PropagationReport, PropagationWarning, RescheduleAnchor};
use crate::store::{GraphStore, TaskStore};
use crate::types::TaskId;

/// Recomputes downstream dates after a task is verified or reworked.
///
/// The walk runs over one schedule snapshot in topological order, so each
/// dependent is computed once, after all of its predecessors, from the max of
/// every incoming constraint. Re-running with the same inputs produces the
/// same writes (none, the second time).
#[derive(Debug)]
pub struct AutoScheduler<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> AutoScheduler<'a, S>
where
    S: TaskStore + GraphStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn reschedule_downstream(
        &self,
        root_id: &TaskId,
        reference: DateTime<Utc>,
        anchor: RescheduleAnchor,
    ) -> Result<PropagationReport> {
        let root = self
            .store
            .get_task(root_id)?
            .ok_or_else(|| SiteplanError::not_found(format!("Task '{root_id}' not found")))?;

        let anchor_span = Span::anchor(&root, reference.date_naive(), anchor);
        let mut report = PropagationReport {
            root: root.id.clone(),
            anchor: anchor_span,
            visited: 0,
            shifted: Vec::new(),
            warnings: Vec::new(),
        };

        self.record_anchor(&root, anchor_span, &mut report);

        let edges = self.store.list_edges_in_schedule(&root.schedule_id)?;
        let graph = ScheduleGraph::from_edges(&edges);

        let order = match graph.downstream_in_topological_order(root_id) {
            Ok(order) => order,
            Err(on_cycle) => {
                warn!(
                    schedule = %root.schedule_id,
                    task = %on_cycle,
                    "dependency graph contains a cycle; propagation skipped"
                );
                report.warnings.push(PropagationWarning::new(
                    Some(on_cycle),
                    "dependency graph contains a cycle; downstream dates were not recomputed",
                ));
                return Ok(report);
            }
        };

        if order.is_empty() {
            debug!(task = %root_id, "no downstream tasks to reschedule");
            return Ok(report);
        }

        let tasks: HashMap<TaskId, Task> = self
            .store
            .list_tasks_by_schedule(&root.schedule_id)?
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();

        let mut spans: HashMap<TaskId, Span> = HashMap::new();
        spans.insert(root.id.clone(), anchor_span);
        let mut changed: HashSet<TaskId> = HashSet::from([root.id.clone()]);

        for id in order {
            report.visited += 1;

            let preds = graph.predecessors(&id);
            if !preds.iter().any(|(p, _)| changed.contains(*p)) {
                continue;
            }

            let Some(task) = tasks.get(&id) else {
                warn!(task = %id, "edge endpoint missing from task store; skipping");
                report
                    .warnings
                    .push(PropagationWarning::new(Some(id.clone()), "task not found"));
                continue;
            };

            let required = preds
                .iter()
                .filter_map(|(pred_id, weight)| {
                    let pred_span = spans
                        .get(*pred_id)
                        .copied()
                        .or_else(|| tasks.get(*pred_id).map(Span::of))?;
                    required_start(pred_span, *weight, task.duration_days)
                })
                .max();

            let Some(new_start) = required else {
                debug!(task = %id, "no predecessor dates known; leaving schedule as is");
                continue;
            };
            let Some(new_end) = shift(new_start, i64::from(task.duration_days)) else {
                report.warnings.push(PropagationWarning::new(
                    Some(id.clone()),
                    "computed end date is out of range",
                ));
                continue;
            };

            if task.scheduled_start == Some(new_start) && task.scheduled_end == Some(new_end) {
                continue;
            }

            match self
                .store
                .update_task(&id, &TaskUpdate::dates(new_start, new_end))
            {
                Ok(_) => {
                    debug!(
                        task = %id,
                        old_start = ?task.scheduled_start,
                        %new_start,
                        %new_end,
                        "rescheduled dependent task"
                    );
                    spans.insert(
                        id.clone(),
                        Span {
                            start: Some(new_start),
                            end: Some(new_end),
                        },
                    );
                    changed.insert(id.clone());
                    report.shifted.push(DateShift {
                        task: id.clone(),
                        old_start: task.scheduled_start,
                        old_end: task.scheduled_end,
                        new_start,
                        new_end,
                    });
                }
                Err(e) => {
                    warn!(task = %id, error = %e, "failed to write rescheduled dates; continuing");
                    report.warnings.push(PropagationWarning::new(
                        Some(id.clone()),
                        format!("could not update schedule: {e}"),
                    ));
                }
            }
        }

        info!(
            task = %root_id,
            ?anchor,
            visited = report.visited,
            shifted = report.shifted.len(),
            warnings = report.warnings.len(),
            "downstream reschedule finished"
        );
        Ok(report)
    }

    /// Persist the root's anchored dates so later walks from other roots
    /// see when it actually finished. A failed write is only a warning.
    fn record_anchor(&self, root: &Task, anchor: Span, report: &mut PropagationReport) {
        let (Some(start), Some(end)) = (anchor.start, anchor.end) else {
            return;
        };
        if root.scheduled_start == Some(start) && root.scheduled_end == Some(end) {
            return;
        }

        match self.store.update_task(&root.id, &TaskUpdate::dates(start, end)) {
            Ok(_) => debug!(task = %root.id, %start, %end, "anchored root dates"),
            Err(e) => {
                warn!(task = %root.id, error = %e, "failed to record anchored root dates");
                report.warnings.push(PropagationWarning::new(
                    Some(root.id.clone()),
                    format!("could not record anchored dates: {e}"),
                ));
            }
        }
    }
}
