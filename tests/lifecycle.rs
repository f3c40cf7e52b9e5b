// tests/lifecycle.rs

mod common;

use common::*;
use siteplan::errors::SiteplanError;
use siteplan::lifecycle::TransitionRequest;
use siteplan::store::TaskStore;
use siteplan::types::{TaskId, TaskStatus};

fn request(task: &str, status: TaskStatus) -> TransitionRequest {
    TransitionRequest::new(task, status, "inspector-7")
}

#[test]
fn requesting_the_current_status_writes_nothing() {
    let store = StoreBuilder::new()
        .with_task(TaskBuilder::new("a").status(TaskStatus::InProgress))
        .build();
    store.fail_updates_for(&TaskId::from("a")).unwrap();
    let engine = engine_at(&store, noon(2026, 4, 10));

    // Any write would hit the injected failure.
    let outcome = engine
        .transition(&request("a", TaskStatus::InProgress))
        .unwrap();

    assert!(!outcome.changed);
    assert_eq!(outcome.task.status, TaskStatus::InProgress);
    assert!(outcome.propagation.is_none());
}

#[test]
fn forward_path_stamps_completion_and_verification() {
    let store = StoreBuilder::new()
        .with_task(TaskBuilder::new("a"))
        .build();
    let now = noon(2026, 4, 10);
    let engine = engine_at(&store, now);

    engine.transition(&request("a", TaskStatus::InProgress)).unwrap();
    let done = engine
        .transition(&request("a", TaskStatus::WorkerComplete))
        .unwrap();
    assert_eq!(done.task.worker_completed_at, Some(now));

    let verified = engine
        .transition(
            &request("a", TaskStatus::Verified)
                .with_photo("photos/a.jpg")
                .with_notes("looks good"),
        )
        .unwrap();

    let task = verified.task;
    assert_eq!(task.status, TaskStatus::Verified);
    assert_eq!(task.verified_at, Some(now));
    assert_eq!(task.verified_by.as_deref(), Some("inspector-7"));
    assert_eq!(task.verification_photo_url.as_deref(), Some("photos/a.jpg"));
    assert_eq!(task.verification_notes.as_deref(), Some("looks good"));
}

#[test]
fn only_worker_complete_tasks_can_be_verified() {
    for current in [TaskStatus::NotStarted, TaskStatus::InProgress] {
        let store = StoreBuilder::new()
            .with_task(TaskBuilder::new("a").status(current).photo("p.jpg"))
            .build();
        let engine = engine_at(&store, noon(2026, 4, 10));

        let err = engine
            .transition(&request("a", TaskStatus::Verified).with_photo("p.jpg"))
            .unwrap_err();
        assert!(
            matches!(err, SiteplanError::InvalidTransition(_)),
            "from {current}: {err:?}"
        );
        assert_eq!(
            store.get_task(&"a".into()).unwrap().unwrap().status,
            current
        );
    }
}

#[test]
fn verification_needs_a_photo() {
    let store = StoreBuilder::new()
        .with_task(TaskBuilder::new("a").status(TaskStatus::WorkerComplete))
        .build();
    let engine = engine_at(&store, noon(2026, 4, 10));

    let err = engine
        .transition(&request("a", TaskStatus::Verified).with_photo("   "))
        .unwrap_err();
    assert!(matches!(err, SiteplanError::Validation(_)), "{err:?}");
    assert_eq!(err.status_code(), 400);
}

#[test]
fn a_previously_uploaded_photo_satisfies_verification() {
    let store = StoreBuilder::new()
        .with_task(
            TaskBuilder::new("a")
                .status(TaskStatus::WorkerComplete)
                .photo("uploads/a.jpg"),
        )
        .build();
    let engine = engine_at(&store, noon(2026, 4, 10));

    let outcome = engine
        .transition(&request("a", TaskStatus::Verified))
        .unwrap();
    assert_eq!(outcome.task.status, TaskStatus::Verified);
    assert_eq!(
        outcome.task.verification_photo_url.as_deref(),
        Some("uploads/a.jpg")
    );
}

#[test]
fn verified_tasks_only_leave_through_rework() {
    for target in [TaskStatus::NotStarted, TaskStatus::WorkerComplete] {
        let store = StoreBuilder::new()
            .with_task(TaskBuilder::new("a").status(TaskStatus::Verified))
            .build();
        let engine = engine_at(&store, noon(2026, 4, 10));
        let err = engine.transition(&request("a", target)).unwrap_err();
        assert!(matches!(err, SiteplanError::InvalidTransition(_)), "{err:?}");
    }

    let store = StoreBuilder::new()
        .with_task(TaskBuilder::new("a").status(TaskStatus::Verified))
        .build();
    let engine = engine_at(&store, noon(2026, 4, 10));
    let err = engine
        .transition(&request("a", TaskStatus::InProgress))
        .unwrap_err();
    assert!(matches!(err, SiteplanError::InvalidTransition(_)), "{err:?}");
}

#[test]
fn rework_from_worker_complete_requires_notes() {
    let store = StoreBuilder::new()
        .with_task(TaskBuilder::new("a").status(TaskStatus::WorkerComplete))
        .build();
    let engine = engine_at(&store, noon(2026, 4, 10));

    let err = engine
        .transition(&request("a", TaskStatus::InProgress).with_notes(""))
        .unwrap_err();
    assert!(matches!(err, SiteplanError::Validation(_)), "{err:?}");
}

#[test]
fn skipping_ahead_or_back_is_rejected() {
    let cases = [
        (TaskStatus::NotStarted, TaskStatus::WorkerComplete),
        (TaskStatus::InProgress, TaskStatus::NotStarted),
        (TaskStatus::WorkerComplete, TaskStatus::NotStarted),
    ];
    for (current, target) in cases {
        let store = StoreBuilder::new()
            .with_task(TaskBuilder::new("a").status(current))
            .build();
        let engine = engine_at(&store, noon(2026, 4, 10));
        let err = engine.transition(&request("a", target)).unwrap_err();
        assert!(
            matches!(err, SiteplanError::InvalidTransition(_)),
            "{current} -> {target}: {err:?}"
        );
    }
}

#[test]
fn unknown_task_is_not_found() {
    let store = StoreBuilder::new().build();
    let engine = engine_at(&store, noon(2026, 4, 10));
    let err = engine
        .transition(&request("ghost", TaskStatus::InProgress))
        .unwrap_err();
    assert!(matches!(err, SiteplanError::NotFound(_)));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn rework_out_of_verified_clears_stamps_and_notifies() {
    let store = StoreBuilder::new()
        .with_task(
            TaskBuilder::new("a")
                .status(TaskStatus::WorkerComplete)
                .photo("a.jpg")
                .dates(date(2026, 4, 1), date(2026, 4, 4)),
        )
        .build();
    let notifier = RecordingNotifier::new();
    let engine = engine_at(&store, noon(2026, 4, 5)).with_notifier(notifier.clone());

    engine
        .transition(&request("a", TaskStatus::Verified))
        .unwrap();
    let outcome = engine
        .transition(&request("a", TaskStatus::InProgress).with_notes("grout cracked"))
        .unwrap();

    let task = outcome.task;
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(task.verified_at, None);
    assert_eq!(task.verified_by, None);
    assert_eq!(task.verification_notes.as_deref(), Some("grout cracked"));
    assert_eq!(
        notifier.sent(),
        vec![(TaskId::from("a"), "grout cracked".to_string())]
    );
    assert!(outcome.propagation.is_some());
}

#[test]
fn notification_failure_does_not_fail_rework() {
    let store = StoreBuilder::new()
        .with_task(TaskBuilder::new("a").status(TaskStatus::WorkerComplete))
        .build();
    let engine = engine_at(&store, noon(2026, 4, 10)).with_notifier(FailingNotifier);

    let outcome = engine
        .transition(&request("a", TaskStatus::InProgress).with_notes("redo"))
        .unwrap();
    assert!(outcome.changed);
    assert_eq!(
        store.get_task(&"a".into()).unwrap().unwrap().status,
        TaskStatus::InProgress
    );
}

#[test]
fn verification_reschedules_dependents() {
    let store = StoreBuilder::new()
        .with_task(
            TaskBuilder::new("frame")
                .status(TaskStatus::WorkerComplete)
                .photo("frame.jpg")
                .dates(date(2026, 4, 1), date(2026, 4, 4)),
        )
        .with_task(TaskBuilder::new("drywall").dates(date(2026, 4, 5), date(2026, 4, 8)))
        .typed_edge(
            "frame",
            "drywall",
            siteplan::types::DependencyType::FinishToStart,
            2,
        )
        .build();
    let engine = engine_at(&store, noon(2026, 4, 10));

    let outcome = engine
        .transition(&request("frame", TaskStatus::Verified))
        .unwrap();

    let report = outcome.propagation.expect("reschedule ran");
    let shift = report.shift_for(&"drywall".into()).expect("drywall moved");
    assert_eq!(shift.new_start, date(2026, 4, 12));
    assert_eq!(shift.new_end, date(2026, 4, 15));
    assert!(outcome.warnings.is_empty());
}

#[test]
fn propagation_failure_keeps_the_status_change() {
    let store = StoreBuilder::new()
        .with_task(
            TaskBuilder::new("frame")
                .status(TaskStatus::WorkerComplete)
                .photo("frame.jpg")
                .dates(date(2026, 4, 1), date(2026, 4, 4)),
        )
        .with_task(TaskBuilder::new("drywall").dates(date(2026, 4, 5), date(2026, 4, 8)))
        .edge("frame", "drywall")
        .build();
    store.fail_updates_for(&"drywall".into()).unwrap();
    let engine = engine_at(&store, noon(2026, 4, 10));

    let outcome = engine
        .transition(&request("frame", TaskStatus::Verified))
        .unwrap();

    assert_eq!(outcome.task.status, TaskStatus::Verified);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].task, Some(TaskId::from("drywall")));
    let drywall = store.get_task(&"drywall".into()).unwrap().unwrap();
    assert_eq!(drywall.scheduled_start, Some(date(2026, 4, 5)));
}
