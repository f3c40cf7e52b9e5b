// tests/cli_run.rs

mod common;

use std::io::Write;

use clap::Parser;
use siteplan::cli::CliArgs;
use siteplan::config::load_and_validate;
use siteplan::run;
use siteplan::types::TaskStatus;
use tempfile::NamedTempFile;

const PROJECT: &str = r#"
[project]
id = "tower-a"
name = "Tower A"

[location.unit-101]
name = "Unit 101"

[task.frame]
location = "unit-101"
name = "Framing"
status = "in_progress"

[task.drywall]
location = "unit-101"
name = "Drywall"
"#;

fn project_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{PROJECT}").unwrap();
    file
}

fn args(file: &NamedTempFile, rest: &[&str]) -> CliArgs {
    let path = file.path().to_str().unwrap();
    let mut argv = vec!["siteplan", "--project", path];
    argv.extend_from_slice(rest);
    CliArgs::try_parse_from(argv).unwrap()
}

#[tokio::test]
async fn add_dep_is_written_back() {
    common::init_tracing();
    let file = project_file();

    run(args(
        &file,
        &["add-dep", "--source", "frame", "--target", "drywall", "--lag", "-1"],
    ))
    .await
    .unwrap();

    let project = load_and_validate(file.path()).unwrap();
    assert_eq!(project.dependency.len(), 1);
    assert_eq!(project.dependency[0].source, "frame");
    assert_eq!(project.dependency[0].lag_days, -1);
}

#[tokio::test]
async fn dry_run_leaves_the_file_alone() {
    common::init_tracing();
    let file = project_file();

    run(args(&file, &["--dry-run", "transition", "frame", "worker_complete"]))
        .await
        .unwrap();

    let project = load_and_validate(file.path()).unwrap();
    assert_eq!(project.task["frame"].status, TaskStatus::InProgress);
}

#[tokio::test]
async fn rejected_command_reports_an_error_and_writes_nothing() {
    common::init_tracing();
    let file = project_file();

    let err = run(args(&file, &["transition", "frame", "verified"]))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("worker complete"), "{err}");
    let project = load_and_validate(file.path()).unwrap();
    assert_eq!(project.task["frame"].status, TaskStatus::InProgress);
}
