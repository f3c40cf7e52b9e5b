// tests/notifications.rs

mod common;

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use common::*;
use siteplan::lifecycle::TransitionRequest;
use siteplan::notify::{ReworkNotice, ReworkSink, spawn_notifier};
use siteplan::types::TaskStatus;
use siteplan_test_utils::with_timeout;

#[derive(Clone, Default)]
struct Outbox(Arc<Mutex<Vec<ReworkNotice>>>);

impl ReworkSink for Outbox {
    fn deliver(
        &mut self,
        notice: ReworkNotice,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + '_>> {
        let outbox = Arc::clone(&self.0);
        Box::pin(async move {
            outbox.lock().unwrap().push(notice);
            Ok(())
        })
    }
}

#[tokio::test]
async fn rework_notice_is_delivered_after_the_engine_is_dropped() {
    let store = StoreBuilder::new()
        .with_task(TaskBuilder::new("tile").status(TaskStatus::WorkerComplete))
        .build();
    let outbox = Outbox::default();
    let (notifier, handle) = spawn_notifier(4, outbox.clone());
    let engine = engine_at(&store, noon(2026, 4, 10)).with_notifier(notifier);

    engine
        .transition(
            &TransitionRequest::new("tile", TaskStatus::InProgress, "inspector")
                .with_notes("lippage over 2mm"),
        )
        .unwrap();
    drop(engine);

    with_timeout(handle).await.unwrap();

    let sent = outbox.0.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].task.as_str(), "tile");
    assert_eq!(sent[0].notes, "lippage over 2mm");
}

#[tokio::test]
async fn full_queue_does_not_fail_the_transition() {
    let store = StoreBuilder::new()
        .with_task(TaskBuilder::new("a").status(TaskStatus::WorkerComplete))
        .with_task(TaskBuilder::new("b").status(TaskStatus::WorkerComplete))
        .build();
    // Capacity 1 and a sink that never gets polled before both sends.
    let (notifier, handle) = spawn_notifier(1, Outbox::default());
    let engine = engine_at(&store, noon(2026, 4, 10)).with_notifier(notifier);

    for id in ["a", "b"] {
        let outcome = engine
            .transition(
                &TransitionRequest::new(id, TaskStatus::InProgress, "inspector").with_notes("redo"),
            )
            .unwrap();
        assert!(outcome.changed);
    }

    drop(engine);
    with_timeout(handle).await.unwrap();
}
