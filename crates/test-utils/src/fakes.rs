use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use siteplan::notify::Notifier;
use siteplan::types::TaskId;

/// Records every rework notification it is asked to send.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(TaskId, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(TaskId, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_rework(&self, task: &TaskId, notes: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((task.clone(), notes.to_string()));
        Ok(())
    }
}

/// A notifier whose transport is always down.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify_rework(&self, _task: &TaskId, _notes: &str) -> Result<()> {
        Err(anyhow!("sms gateway unavailable"))
    }
}
