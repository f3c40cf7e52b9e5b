// src/engine/hooks.rs

//! Post-commit effect execution.

use tracing::{error, warn};

use crate::engine::Engine;
use crate::lifecycle::PostCommit;
use crate::schedule::{AutoScheduler, PropagationReport, PropagationWarning};
use crate::store::Store;

impl<S: Store> Engine<S> {
    /// Run effects in order. Never fails: every problem is logged and, for
    /// rescheduling, returned as a warning.
    pub(crate) fn run_post_commit(
        &self,
        effects: &[PostCommit],
    ) -> (Option<PropagationReport>, Vec<PropagationWarning>) {
        let mut propagation = None;
        let mut warnings = Vec::new();

        for effect in effects {
            match effect {
                PostCommit::Reschedule {
                    task,
                    reference,
                    anchor,
                } => match AutoScheduler::new(self.store()).reschedule_downstream(
                    task, *reference, *anchor,
                ) {
                    Ok(report) => {
                        warnings.extend(report.warnings.iter().cloned());
                        propagation = Some(report);
                    }
                    Err(e) => {
                        error!(task = %task, error = %e, "downstream reschedule failed; status change kept");
                        warnings.push(PropagationWarning::new(
                            Some(task.clone()),
                            format!("downstream reschedule failed: {e}"),
                        ));
                    }
                },
                PostCommit::NotifyRework { task, notes } => {
                    if let Err(e) = self.notifier.notify_rework(task, notes) {
                        warn!(task = %task, error = %e, "rework notification not sent");
                    }
                }
            }
        }

        (propagation, warnings)
    }
}
