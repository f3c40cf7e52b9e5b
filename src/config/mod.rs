// src/config/mod.rs

//! Project file loading, validation and write-back.
//!
//! - [`model`] defines the TOML-backed data model.
//! - [`loader`] reads and writes the file.
//! - [`validate`] checks references, duplicates and acyclicity.
//! - [`snapshot`] converts between a project file and a `MemoryStore`.

pub mod loader;
pub mod model;
pub mod snapshot;
pub mod validate;

pub use loader::{default_project_path, load_and_validate, load_from_path, save_to_path};
pub use model::{
    ConfigSection, DependencyConfig, LocationConfig, ProjectFile, ProjectSection,
    RawProjectFile, TaskConfig, TemplateConfig,
};
pub use snapshot::{project_from_store, seed_store};
