// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ProjectFile, RawProjectFile};
use crate::errors::Result;

/// Load a project file and return the raw, unvalidated `RawProjectFile`.
///
/// This only performs TOML deserialization. Use [`load_and_validate`] for
/// the semantic checks (unknown references, cycles, ...).
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawProjectFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let project: RawProjectFile = toml::from_str(&contents)?;
    Ok(project)
}

/// Load a project file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProjectFile> {
    let raw = load_from_path(&path)?;
    ProjectFile::try_from(raw)
}

/// Write a project file back to disk as pretty TOML.
pub fn save_to_path(path: impl AsRef<Path>, project: &ProjectFile) -> Result<()> {
    let contents = toml::to_string_pretty(project)?;
    fs::write(path.as_ref(), contents)?;
    Ok(())
}

/// `SITEPLAN_PROJECT` if set, else `Siteplan.toml` in the working directory.
pub fn default_project_path() -> PathBuf {
    std::env::var_os("SITEPLAN_PROJECT")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("Siteplan.toml"))
}
