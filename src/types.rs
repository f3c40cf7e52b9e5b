// src/types.rs

//! Identifiers and closed enumerations shared by every module.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SiteplanError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Opaque task identifier.
    TaskId
);
string_id!(
    /// Opaque location identifier (a unit, floor, room...).
    LocationId
);
string_id!(
    /// Schedule (project) that owns locations, tasks and edges.
    ScheduleId
);
string_id!(TemplateId);

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    WorkerComplete,
    Verified,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::WorkerComplete,
        TaskStatus::Verified,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not_started",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::WorkerComplete => "worker_complete",
            TaskStatus::Verified => "verified",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::NotStarted
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = SiteplanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "not_started" => Ok(TaskStatus::NotStarted),
            "in_progress" => Ok(TaskStatus::InProgress),
            "worker_complete" => Ok(TaskStatus::WorkerComplete),
            "verified" => Ok(TaskStatus::Verified),
            other => Err(SiteplanError::validation(format!(
                "invalid status: {other} (expected not_started, in_progress, worker_complete or verified)"
            ))),
        }
    }
}

/// Which pair of dates a dependency edge links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
}

impl DependencyType {
    pub const fn as_str(self) -> &'static str {
        match self {
            DependencyType::FinishToStart => "finish_to_start",
            DependencyType::StartToStart => "start_to_start",
            DependencyType::FinishToFinish => "finish_to_finish",
            DependencyType::StartToFinish => "start_to_finish",
        }
    }

    /// Whether the constraint is read from the predecessor's finish date.
    pub const fn reads_predecessor_finish(self) -> bool {
        matches!(
            self,
            DependencyType::FinishToStart | DependencyType::FinishToFinish
        )
    }

    /// Whether the constraint pins the dependent's finish date (rather than its start).
    pub const fn constrains_dependent_finish(self) -> bool {
        matches!(
            self,
            DependencyType::FinishToFinish | DependencyType::StartToFinish
        )
    }
}

impl Default for DependencyType {
    fn default() -> Self {
        DependencyType::FinishToStart
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyType {
    type Err = SiteplanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "finish_to_start" => Ok(DependencyType::FinishToStart),
            "start_to_start" => Ok(DependencyType::StartToStart),
            "finish_to_finish" => Ok(DependencyType::FinishToFinish),
            "start_to_finish" => Ok(DependencyType::StartToFinish),
            other => Err(SiteplanError::validation(format!(
                "invalid dependency type: {other} (expected finish_to_start, start_to_start, finish_to_finish or start_to_finish)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_its_own_names() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().ok(), Some(status));
        }
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let err = "done".parse::<TaskStatus>().unwrap_err();
        assert!(matches!(err, SiteplanError::Validation(_)));
    }

    #[test]
    fn unknown_dependency_type_is_a_validation_error() {
        let err = "finish_to_whenever".parse::<DependencyType>().unwrap_err();
        assert!(matches!(err, SiteplanError::Validation(_)));
        assert_eq!(
            " Start_To_Start ".parse::<DependencyType>().ok(),
            Some(DependencyType::StartToStart)
        );
    }
}
