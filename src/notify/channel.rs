// src/notify/channel.rs

use std::future::Future;
use std::pin::Pin;

use anyhow::{Result, anyhow};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::Notifier;
use crate::types::TaskId;

/// A queued rework notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReworkNotice {
    pub task: TaskId,
    pub notes: String,
}

/// Where queued notices are finally delivered (SMS gateway, email, ...).
pub trait ReworkSink: Send + 'static {
    fn deliver(
        &mut self,
        notice: ReworkNotice,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Notifier that enqueues onto a bounded channel without waiting.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::Sender<ReworkNotice>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::Sender<ReworkNotice>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify_rework(&self, task: &TaskId, notes: &str) -> Result<()> {
        let notice = ReworkNotice {
            task: task.clone(),
            notes: notes.to_string(),
        };
        match self.tx.try_send(notice) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(anyhow!("notification queue is full")),
            Err(TrySendError::Closed(_)) => Err(anyhow!("notification loop has stopped")),
        }
    }
}

/// Spawn the background delivery loop on the current tokio runtime.
///
/// The loop exits once every [`ChannelNotifier`] clone has been dropped;
/// await the handle to flush pending notices.
pub fn spawn_notifier<K: ReworkSink>(
    capacity: usize,
    mut sink: K,
) -> (ChannelNotifier, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<ReworkNotice>(capacity.max(1));

    let handle = tokio::spawn(async move {
        debug!("notification loop started");
        while let Some(notice) = rx.recv().await {
            let task = notice.task.clone();
            match sink.deliver(notice).await {
                Ok(()) => info!(task = %task, "rework notification delivered"),
                Err(e) => warn!(task = %task, error = %e, "rework notification failed"),
            }
        }
        debug!("notification loop exiting");
    });

    (ChannelNotifier::new(tx), handle)
}

/// Sink that writes notices to the log; used by the CLI.
#[derive(Debug, Default)]
pub struct LogSink;

impl ReworkSink for LogSink {
    fn deliver(
        &mut self,
        notice: ReworkNotice,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            info!(task = %notice.task, notes = %notice.notes, "notify assignee: rework needed");
            Ok(())
        })
    }
}
