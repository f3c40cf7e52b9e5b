// src/engine/mod.rs

//! Engine facade tying the components together.
//!
//! [`Engine`] is what request handlers (and the CLI) call. Each operation runs
//! to completion synchronously. Status changes follow a core/shell split: the
//! lifecycle machine commits the change and returns [`PostCommit`] effects,
//! and [`hooks`] runs those effects afterwards, turning their failures into
//! logged warnings instead of request errors.
//!
//! [`PostCommit`]: crate::lifecycle::PostCommit

use crate::lifecycle::TransitionStep;
use crate::model::Task;
use crate::schedule::{PropagationReport, PropagationWarning};

pub mod core;
pub mod hooks;

pub use self::core::Engine;

/// What a caller gets back from a successful status change.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub task: Task,
    pub changed: bool,
    /// Present when the change triggered a downstream reschedule that ran.
    pub propagation: Option<PropagationReport>,
    /// Non-fatal post-commit problems; the status change itself stands.
    pub warnings: Vec<PropagationWarning>,
}

impl TransitionOutcome {
    fn without_effects(step: TransitionStep) -> Self {
        Self {
            task: step.task,
            changed: step.changed,
            propagation: None,
            warnings: Vec::new(),
        }
    }
}
