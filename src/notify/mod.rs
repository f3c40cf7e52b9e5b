// src/notify/mod.rs

//! Rework notifications.
//!
//! The lifecycle never waits on delivery: the engine hands a notice to a
//! [`Notifier`] after the status change is committed and only logs failures.
//!
//! - [`LogNotifier`] just records the notice in the log.
//! - [`channel`] provides a bounded queue drained by a background tokio task
//!   that forwards notices to a pluggable [`channel::ReworkSink`].

use std::fmt::Debug;

use anyhow::Result;
use tracing::info;

use crate::types::TaskId;

pub mod channel;

pub use channel::{ChannelNotifier, LogSink, ReworkNotice, ReworkSink, spawn_notifier};

/// Best-effort rework notification collaborator.
pub trait Notifier: Send + Sync + Debug {
    /// Must not block on delivery.
    fn notify_rework(&self, task: &TaskId, notes: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_rework(&self, task: &TaskId, notes: &str) -> Result<()> {
        info!(task = %task, %notes, "rework requested");
        Ok(())
    }
}
