// src/lifecycle/transition.rs

//! Pure transition table and planning.
//!
//! Nothing here touches a store: given the stored task and a request, it
//! decides whether the change is allowed, which fields to write and which
//! post-commit effects to emit.

use chrono::{DateTime, Utc};

use crate::errors::{Result, SiteplanError};
use crate::lifecycle::{PostCommit, TransitionRequest};
use crate::model::{Task, TaskUpdate};
use crate::schedule::RescheduleAnchor;
use crate::types::TaskStatus;

/// What the table says about a `(current, requested)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `requested == current`.
    NoOp,
    /// `not_started -> in_progress`.
    Start,
    /// `in_progress -> worker_complete`.
    Complete,
    /// `worker_complete -> verified`; still needs a photo.
    Verify,
    /// Back to `in_progress`; needs notes.
    Rework { from_verified: bool },
    Reject(Rejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    LeavingVerified,
    NotWorkerComplete,
    Invalid,
}

impl Rejection {
    pub fn into_error(self, current: TaskStatus, requested: TaskStatus) -> SiteplanError {
        match self {
            Rejection::LeavingVerified => SiteplanError::invalid_transition(
                "Cannot change status of a verified task (only rework with notes is allowed)",
            ),
            Rejection::NotWorkerComplete => SiteplanError::invalid_transition(
                "Task must be worker complete before it can be verified",
            ),
            Rejection::Invalid => SiteplanError::invalid_transition(format!(
                "Invalid status transition from {current} to {requested}"
            )),
        }
    }
}

/// Exhaustive transition table.
pub fn rule_for(current: TaskStatus, requested: TaskStatus) -> Rule {
    use TaskStatus::*;

    match (current, requested) {
        (NotStarted, NotStarted)
        | (InProgress, InProgress)
        | (WorkerComplete, WorkerComplete)
        | (Verified, Verified) => Rule::NoOp,

        (NotStarted, InProgress) => Rule::Start,
        (InProgress, WorkerComplete) => Rule::Complete,
        (WorkerComplete, Verified) => Rule::Verify,
        (WorkerComplete, InProgress) => Rule::Rework {
            from_verified: false,
        },
        (Verified, InProgress) => Rule::Rework {
            from_verified: true,
        },

        (Verified, NotStarted) | (Verified, WorkerComplete) => {
            Rule::Reject(Rejection::LeavingVerified)
        }
        (NotStarted, Verified) | (InProgress, Verified) => {
            Rule::Reject(Rejection::NotWorkerComplete)
        }
        (NotStarted, WorkerComplete)
        | (InProgress, NotStarted)
        | (WorkerComplete, NotStarted) => Rule::Reject(Rejection::Invalid),
    }
}

/// Fields to write and effects to run for an accepted request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    /// `None` for a no-op: nothing is written.
    pub update: Option<TaskUpdate>,
    pub effects: Vec<PostCommit>,
}

impl TransitionPlan {
    fn noop() -> Self {
        Self {
            update: None,
            effects: Vec::new(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validate `request` against the stored `task` and plan the write.
pub fn plan_transition(
    task: &Task,
    request: &TransitionRequest,
    now: DateTime<Utc>,
) -> Result<TransitionPlan> {
    let current = task.status;
    let requested = request.status;
    let notes = non_empty(request.notes.as_deref());
    let photo = non_empty(request.photo_url.as_deref());

    match rule_for(current, requested) {
        Rule::NoOp => Ok(TransitionPlan::noop()),

        Rule::Start => Ok(TransitionPlan {
            update: Some(TaskUpdate {
                status: Some(TaskStatus::InProgress),
                ..TaskUpdate::default()
            }),
            effects: Vec::new(),
        }),

        Rule::Complete => Ok(TransitionPlan {
            update: Some(TaskUpdate {
                status: Some(TaskStatus::WorkerComplete),
                worker_completed_at: Some(now),
                ..TaskUpdate::default()
            }),
            effects: Vec::new(),
        }),

        Rule::Verify => {
            if photo.is_none() && !task.has_photo() {
                return Err(SiteplanError::validation(
                    "A verification photo is required to verify a task",
                ));
            }
            Ok(TransitionPlan {
                update: Some(TaskUpdate {
                    status: Some(TaskStatus::Verified),
                    verified_at: Some(Some(now)),
                    verified_by: Some(Some(request.actor.clone())),
                    verification_photo_url: photo,
                    verification_notes: notes,
                    ..TaskUpdate::default()
                }),
                effects: vec![PostCommit::Reschedule {
                    task: task.id.clone(),
                    reference: now,
                    anchor: RescheduleAnchor::Verified,
                }],
            })
        }

        Rule::Rework { from_verified } => {
            let Some(notes) = notes else {
                return Err(if from_verified {
                    Rejection::LeavingVerified.into_error(current, requested)
                } else {
                    SiteplanError::validation("Rework notes are required to send a task back")
                });
            };

            let mut update = TaskUpdate {
                status: Some(TaskStatus::InProgress),
                verification_notes: Some(notes.clone()),
                ..TaskUpdate::default()
            };
            if from_verified {
                update.verified_at = Some(None);
                update.verified_by = Some(None);
            }

            Ok(TransitionPlan {
                update: Some(update),
                effects: vec![
                    PostCommit::NotifyRework {
                        task: task.id.clone(),
                        notes,
                    },
                    PostCommit::Reschedule {
                        task: task.id.clone(),
                        reference: now,
                        anchor: RescheduleAnchor::Rework,
                    },
                ],
            })
        }

        Rule::Reject(rejection) => Err(rejection.into_error(current, requested)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap()
    }

    fn task(status: TaskStatus, photo: Option<&str>) -> Task {
        Task {
            id: "t".into(),
            schedule_id: "s".into(),
            location_id: "l".into(),
            name: "Drywall".into(),
            status,
            scheduled_start: None,
            scheduled_end: None,
            duration_days: 1,
            sort_order: None,
            cost: None,
            category: None,
            verified_at: None,
            verified_by: None,
            verification_photo_url: photo.map(str::to_string),
            verification_notes: None,
            worker_completed_at: None,
        }
    }

    fn request(status: TaskStatus) -> TransitionRequest {
        TransitionRequest::new("t", status, "inspector")
    }

    #[test]
    fn table_has_exactly_one_forward_step_per_state() {
        use TaskStatus::*;
        let allowed: Vec<_> = TaskStatus::ALL
            .iter()
            .flat_map(|c| TaskStatus::ALL.iter().map(move |r| (*c, *r)))
            .filter(|(c, r)| {
                !matches!(rule_for(*c, *r), Rule::Reject(_) | Rule::NoOp)
            })
            .collect();
        assert_eq!(
            allowed,
            vec![
                (NotStarted, InProgress),
                (InProgress, WorkerComplete),
                (WorkerComplete, InProgress),
                (WorkerComplete, Verified),
                (Verified, InProgress),
            ]
        );
    }

    #[test]
    fn complete_stamps_worker_completed_at() {
        let plan = plan_transition(
            &task(TaskStatus::InProgress, None),
            &request(TaskStatus::WorkerComplete),
            now(),
        )
        .unwrap();
        let update = plan.update.unwrap();
        assert_eq!(update.worker_completed_at, Some(now()));
        assert!(plan.effects.is_empty());
    }

    #[test]
    fn verify_uses_stored_photo_and_emits_reschedule() {
        let plan = plan_transition(
            &task(TaskStatus::WorkerComplete, Some("s3://photos/1.jpg")),
            &request(TaskStatus::Verified),
            now(),
        )
        .unwrap();
        let update = plan.update.unwrap();
        assert_eq!(update.verified_by, Some(Some("inspector".to_string())));
        assert_eq!(update.verification_photo_url, None);
        assert!(matches!(
            plan.effects.as_slice(),
            [PostCommit::Reschedule {
                anchor: RescheduleAnchor::Verified,
                ..
            }]
        ));
    }

    #[test]
    fn whitespace_notes_do_not_count_for_rework() {
        let mut req = request(TaskStatus::InProgress);
        req.notes = Some("   ".into());
        let err = plan_transition(&task(TaskStatus::WorkerComplete, None), &req, now()).unwrap_err();
        assert!(matches!(err, SiteplanError::Validation(_)));
    }

    #[test]
    fn rework_from_verified_clears_stamps_and_notifies() {
        let mut req = request(TaskStatus::InProgress);
        req.notes = Some("tape joints visible".into());
        let plan = plan_transition(&task(TaskStatus::Verified, Some("p")), &req, now()).unwrap();
        let update = plan.update.unwrap();
        assert_eq!(update.verified_at, Some(None));
        assert_eq!(update.verified_by, Some(None));
        assert_eq!(plan.effects.len(), 2);
        assert!(matches!(plan.effects[0], PostCommit::NotifyRework { .. }));
    }
}
