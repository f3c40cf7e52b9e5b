// src/lib.rs

pub mod cli;
pub mod clock;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod lifecycle;
pub mod logging;
pub mod model;
pub mod notify;
pub mod schedule;
pub mod store;
pub mod template;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::{
    ProjectFile, default_project_path, load_and_validate, project_from_store, save_to_path,
    seed_store,
};
use crate::dag::{LinkedEdge, TaskDependencies};
use crate::engine::{Engine, TransitionOutcome};
use crate::lifecycle::TransitionRequest;
use crate::notify::{LogSink, spawn_notifier};
use crate::schedule::{PropagationReport, PropagationWarning};
use crate::store::MemoryStore;
use crate::template::TemplateApplication;
use crate::types::{LocationId, ScheduleId, TaskId, TaskStatus, TemplateId};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - project file loading and validation
/// - an in-memory store seeded from the file
/// - the background rework notification loop
/// - the engine, which runs the requested command
/// - writing the project file back (unless `--dry-run`)
pub async fn run(args: CliArgs) -> Result<()> {
    let project_path = args.project.clone().unwrap_or_else(default_project_path);
    let project = load_and_validate(&project_path)?;

    if let Command::Check = args.command {
        print_check(&project);
        return Ok(());
    }

    let store = seed_store(&project)?;
    let (notifier, notify_handle) =
        spawn_notifier(project.config.notification_queue_length, LogSink);

    let engine = Engine::new(store.clone())
        .with_config(&project.config)
        .with_notifier(notifier);

    let schedule = ScheduleId::new(project.project.id.clone());
    let outcome = execute(&engine, &schedule, &args);

    // Dropping the engine drops the last notifier sender, which lets the
    // notification loop drain and exit.
    drop(engine);
    notify_handle.await?;
    outcome?;

    if !args.command.mutates() {
        return Ok(());
    }
    if args.dry_run {
        info!(path = %project_path.display(), "dry run; project file not written");
        return Ok(());
    }

    let updated = project_from_store(&store, &project)?;
    save_to_path(&project_path, &updated)?;
    info!(path = %project_path.display(), "project file updated");
    Ok(())
}

fn execute(engine: &Engine<MemoryStore>, schedule: &ScheduleId, args: &CliArgs) -> Result<()> {
    match &args.command {
        Command::Check => {}
        Command::Deps { task } => {
            let deps = engine.list_dependencies(&TaskId::from(task.as_str()))?;
            print_dependencies(task, &deps);
        }
        Command::AddDep {
            source,
            target,
            dependency_type,
            lag,
        } => {
            let edge = engine.add_dependency(
                schedule,
                &TaskId::from(target.as_str()),
                &TaskId::from(source.as_str()),
                dependency_type,
                *lag,
            )?;
            println!(
                "added {} -> {} ({}, lag {}d)",
                edge.source, edge.target, edge.dependency_type, edge.lag_days
            );
        }
        Command::RemoveDep { source, target } => {
            engine.remove_dependency(
                schedule,
                &TaskId::from(source.as_str()),
                &TaskId::from(target.as_str()),
            )?;
            println!("removed {source} -> {target}");
        }
        Command::Transition {
            task,
            status,
            photo,
            notes,
        } => {
            let status: TaskStatus = status.parse()?;
            let mut request = TransitionRequest::new(task.as_str(), status, args.actor.as_str());
            if let Some(photo) = photo {
                request = request.with_photo(photo.as_str());
            }
            if let Some(notes) = notes {
                request = request.with_notes(notes.as_str());
            }
            let outcome = engine.transition(&request)?;
            print_transition(&outcome);
        }
        Command::ApplyTemplate {
            template,
            locations,
        } => {
            let locations: Vec<LocationId> =
                locations.iter().map(|l| LocationId::from(l.as_str())).collect();
            let application =
                engine.apply_template(&TemplateId::from(template.as_str()), &locations)?;
            print_application(template, &application);
        }
        Command::Reschedule { task } => {
            let report = engine.reschedule(&TaskId::from(task.as_str()))?;
            print_report(&report);
        }
    }
    debug!(command = ?args.command, "command complete");
    Ok(())
}

/// Summary of a validated project file.
fn print_check(project: &ProjectFile) {
    println!("siteplan check: {} ({})", project.project.name, project.project.id);
    println!(
        "  config.notification_queue_length = {}",
        project.config.notification_queue_length
    );
    println!(
        "  config.verify_acyclic_after_insert = {}",
        project.config.verify_acyclic_after_insert
    );
    println!();

    println!("locations ({}):", project.location.len());
    for (id, loc) in project.location.iter() {
        println!("  - {id}: {}", loc.name);
        if !loc.templates_applied.is_empty() {
            println!("      templates_applied: {:?}", loc.templates_applied);
        }
    }

    println!("tasks ({}):", project.task.len());
    for (id, task) in project.task.iter() {
        println!("  - {id}: {} [{}]", task.name, task.status);
        println!("      location: {}", task.location);
        match (task.scheduled_start, task.scheduled_end) {
            (Some(start), Some(end)) => println!("      dates: {start} .. {end}"),
            (Some(start), None) => println!("      start: {start}"),
            (None, Some(end)) => println!("      end: {end}"),
            (None, None) => {}
        }
        println!("      duration_days: {}", task.duration_days);
    }

    println!("dependencies ({}):", project.dependency.len());
    for dep in project.dependency.iter() {
        println!(
            "  - {} -> {} ({}, lag {}d)",
            dep.source, dep.target, dep.dependency_type, dep.lag_days
        );
    }

    println!("templates ({}):", project.template.len());
    for (id, template) in project.template.iter() {
        println!("  - {id}: {} ({} rules)", template.name, template.rule.len());
    }

    debug!("check complete (nothing modified)");
}

fn print_dependencies(task: &str, deps: &TaskDependencies) {
    println!("{task}");
    println!("  predecessors ({}):", deps.predecessors.len());
    for linked in deps.predecessors.iter() {
        print_linked(linked);
    }
    println!("  successors ({}):", deps.successors.len());
    for linked in deps.successors.iter() {
        print_linked(linked);
    }
}

fn print_linked(linked: &LinkedEdge) {
    let dates = match (linked.task.scheduled_start, linked.task.scheduled_end) {
        (Some(start), Some(end)) => format!(" {start} .. {end}"),
        _ => String::new(),
    };
    println!(
        "    - {} {} [{}]{dates} ({}, lag {}d)",
        linked.task.id,
        linked.task.name,
        linked.task.status,
        linked.edge.dependency_type,
        linked.edge.lag_days
    );
}

fn print_transition(outcome: &TransitionOutcome) {
    if outcome.changed {
        println!("{} is now {}", outcome.task.id, outcome.task.status);
    } else {
        println!("{} already {}; nothing to do", outcome.task.id, outcome.task.status);
    }
    if let Some(report) = &outcome.propagation {
        print_report(report);
    }
    print_warnings(&outcome.warnings);
}

fn print_report(report: &PropagationReport) {
    println!(
        "rescheduled downstream of {} (anchor {}): {} visited, {} shifted",
        report.root,
        report.anchor,
        report.visited,
        report.shifted.len()
    );
    for shift in report.shifted.iter() {
        let old = match (shift.old_start, shift.old_end) {
            (Some(start), Some(end)) => format!("{start} .. {end}"),
            _ => "unscheduled".to_string(),
        };
        println!(
            "  - {}: {old} -> {} .. {}",
            shift.task, shift.new_start, shift.new_end
        );
    }
    print_warnings(&report.warnings);
}

fn print_application(template: &str, application: &TemplateApplication) {
    println!(
        "applied {template}: {} tasks, {} dependencies",
        application.tasks_created, application.dependencies_created
    );
    for location in application.skipped.iter() {
        println!("  skipped {location} (already applied)");
    }
    for failure in application.failures.iter() {
        println!("  failed {}: {}", failure.location, failure.message);
    }
}

fn print_warnings(warnings: &[PropagationWarning]) {
    for warning in warnings {
        println!("  warning: {warning}");
    }
}

