// src/schedule/span.rs

use std::fmt;

use chrono::{Duration, NaiveDate};

use crate::dag::EdgeWeight;
use crate::model::Task;
use crate::schedule::RescheduleAnchor;
use crate::types::TaskStatus;

/// Effective start/end of a task as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// `date + days`, `None` on calendar overflow.
pub fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

impl Span {
    /// Effective dates of a task that is not the root of the current walk.
    ///
    /// A verified task finished on its verification date whatever its planned
    /// end says; anything else is taken at its stored dates.
    pub fn of(task: &Task) -> Self {
        match (task.status, task.verified_at) {
            (TaskStatus::Verified, Some(at)) => {
                Self::anchor(task, at.date_naive(), RescheduleAnchor::Verified)
            }
            _ => Self::planned(task),
        }
    }

    /// Stored dates, filling a missing side from the other one and the duration.
    pub fn planned(task: &Task) -> Self {
        let duration = i64::from(task.duration_days);
        match (task.scheduled_start, task.scheduled_end) {
            (Some(start), Some(end)) => Self {
                start: Some(start),
                end: Some(end),
            },
            (Some(start), None) => Self {
                start: Some(start),
                end: shift(start, duration),
            },
            (None, Some(end)) => Self {
                start: shift(end, -duration),
                end: Some(end),
            },
            (None, None) => Self::default(),
        }
    }

    /// Dates of the task a reschedule walk starts from.
    ///
    /// A verified task finished on `reference`. A reworked task cannot finish
    /// before `reference`; with no stored end it restarts on `reference`.
    pub fn anchor(task: &Task, reference: NaiveDate, anchor: RescheduleAnchor) -> Self {
        let duration = i64::from(task.duration_days);
        let stored = Self::planned(task);

        let end = match anchor {
            RescheduleAnchor::Verified => Some(reference),
            RescheduleAnchor::Rework => match stored.end {
                Some(end) => Some(end.max(reference)),
                None => shift(reference, duration),
            },
        };

        let start = match (stored.start, end) {
            (Some(start), Some(end)) if start <= end => Some(start),
            (_, Some(end)) => shift(end, -duration),
            (start, None) => start,
        };

        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (Some(start), Some(end)) => write!(f, "{start} .. {end}"),
            (Some(start), None) => write!(f, "{start} .. ?"),
            (None, Some(end)) => write!(f, "? .. {end}"),
            (None, None) => f.write_str("unscheduled"),
        }
    }
}

/// Earliest start a dependent of `duration_days` may have under one edge
/// from a predecessor spanning `pred`.
///
/// Finish-pinning edges are converted to a start by holding the dependent's
/// duration constant, so constraints of every type compare directly.
pub fn required_start(pred: Span, weight: EdgeWeight, duration_days: u32) -> Option<NaiveDate> {
    let ty = weight.dependency_type;
    let reference = if ty.reads_predecessor_finish() {
        pred.end?
    } else {
        pred.start?
    };
    let pinned = shift(reference, i64::from(weight.lag_days))?;

    if ty.constrains_dependent_finish() {
        shift(pinned, -i64::from(duration_days))
    } else {
        Some(pinned)
    }
}
