// tests/templates.rs

mod common;

use std::collections::HashMap;

use common::*;
use siteplan::errors::SiteplanError;
use siteplan::store::{MemoryStore, TaskStore};
use siteplan::types::{DependencyType, LocationId, TaskId, TaskStatus, TemplateId};

const UNITS: [&str; 5] = ["unit-101", "unit-102", "unit-103", "unit-104", "unit-105"];

fn kitchen_store() -> MemoryStore {
    let mut builder = StoreBuilder::new().template(
        "kitchen",
        vec![
            rule(1, "Rough plumbing", None),
            rule(2, "Cabinets", Some(1)),
            rule(3, "Countertops", Some(2)),
        ],
    );
    for unit in UNITS {
        builder = builder.location(unit);
    }
    builder.build()
}

fn units() -> Vec<LocationId> {
    UNITS.iter().map(|u| LocationId::from(*u)).collect()
}

#[test]
fn each_location_gets_its_own_task_set() {
    let store = kitchen_store();
    let engine = engine_at(&store, noon(2026, 4, 1));

    let result = engine.apply_template(&"kitchen".into(), &units()).unwrap();

    assert!(result.is_clean(), "{:?}", result.failures);
    assert_eq!(result.tasks_created, 15);
    assert_eq!(result.dependencies_created, 10);
    assert_eq!(store.tasks().unwrap().len(), 15);

    let location_of: HashMap<TaskId, LocationId> = store
        .tasks()
        .unwrap()
        .into_iter()
        .map(|t| (t.id, t.location_id))
        .collect();
    let edges = store.edges().unwrap();
    assert_eq!(edges.len(), 10);
    for edge in &edges {
        assert_eq!(location_of[&edge.source], location_of[&edge.target]);
        assert_eq!(edge.dependency_type, DependencyType::FinishToStart);
        assert_eq!(edge.lag_days, 0);
    }

    for unit in units() {
        let tasks = store.list_tasks_by_location(&unit).unwrap();
        let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Rough plumbing", "Cabinets", "Countertops"]);
        assert!(tasks.iter().all(|t| t.status == TaskStatus::NotStarted));

        let location = store.get_location(&unit).unwrap().unwrap();
        assert_eq!(location.templates_applied, vec![TemplateId::from("kitchen")]);
    }
}

#[test]
fn created_edges_follow_the_rules() {
    let store = kitchen_store();
    let engine = engine_at(&store, noon(2026, 4, 1));
    engine
        .apply_template(&"kitchen".into(), &units()[..1])
        .unwrap();

    let tasks = store.list_tasks_by_location(&"unit-101".into()).unwrap();
    let cabinets = &tasks[1];
    let deps = engine.list_dependencies(&cabinets.id).unwrap();

    assert_eq!(deps.predecessors.len(), 1);
    assert_eq!(deps.predecessors[0].task.name, "Rough plumbing");
    assert_eq!(deps.successors.len(), 1);
    assert_eq!(deps.successors[0].task.name, "Countertops");
}

#[test]
fn a_missing_location_does_not_stop_the_batch() {
    let store = kitchen_store();
    let engine = engine_at(&store, noon(2026, 4, 1));

    let locations: Vec<LocationId> = vec!["unit-101".into(), "unit-999".into(), "unit-102".into()];
    let result = engine.apply_template(&"kitchen".into(), &locations).unwrap();

    assert_eq!(result.tasks_created, 6);
    assert_eq!(result.dependencies_created, 4);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].location, LocationId::from("unit-999"));
}

#[test]
fn reapplying_skips_expanded_locations() {
    let store = kitchen_store();
    let engine = engine_at(&store, noon(2026, 4, 1));

    engine
        .apply_template(&"kitchen".into(), &units()[..2])
        .unwrap();
    let again = engine.apply_template(&"kitchen".into(), &units()).unwrap();

    assert_eq!(again.skipped, units()[..2].to_vec());
    assert_eq!(again.tasks_created, 9);
    assert_eq!(store.tasks().unwrap().len(), 15);
    assert_eq!(store.edges().unwrap().len(), 10);
}

#[test]
fn rule_cost_and_category_carry_onto_tasks() {
    let mut plumbing = rule(1, "Rough plumbing", None);
    plumbing.cost = Some(1850.0);
    plumbing.category = Some("plumbing".to_string());
    plumbing.duration_days = 2;
    let store = StoreBuilder::new()
        .location("unit-101")
        .template("bath", vec![plumbing])
        .build();
    let engine = engine_at(&store, noon(2026, 4, 1));

    engine
        .apply_template(&"bath".into(), &[LocationId::from("unit-101")])
        .unwrap();

    let tasks = store.list_tasks_by_location(&"unit-101".into()).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].cost, Some(1850.0));
    assert_eq!(tasks[0].category.as_deref(), Some("plumbing"));
    assert_eq!(tasks[0].duration_days, 2);
    assert_eq!(tasks[0].sort_order, Some(1));
}

#[test]
fn dangling_rule_reference_is_reported_per_location() {
    let store = StoreBuilder::new()
        .location("unit-101")
        .template(
            "bath",
            vec![rule(1, "Waterproofing", None), rule(2, "Tiling", Some(7))],
        )
        .build();
    let engine = engine_at(&store, noon(2026, 4, 1));

    let result = engine
        .apply_template(&"bath".into(), &[LocationId::from("unit-101")])
        .unwrap();

    assert_eq!(result.tasks_created, 2);
    assert_eq!(result.dependencies_created, 0);
    assert_eq!(result.failures.len(), 1);
    assert!(result.failures[0].message.contains('7'));
}

#[test]
fn unknown_template_is_not_found() {
    let store = kitchen_store();
    let engine = engine_at(&store, noon(2026, 4, 1));

    let err = engine
        .apply_template(&"garage".into(), &units())
        .unwrap_err();
    assert!(matches!(err, SiteplanError::NotFound(_)));
    assert!(store.tasks().unwrap().is_empty());
}
