//! CLI command implementations
//!
//! - `generate`: emit and write modules
//! - `audit`: normal and schema-only drift reports
//! - `render`: one primitive config to stdout
//! - `schema`: JSON Schema of the file formats

pub mod audit;
pub mod generate;
pub mod render;
pub mod schema;

use sdkforge::project::{self, Project};
use sdkforge::{ModuleSource, Result};

/// How a command finished when it did not error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Ran to completion but found problems (drift, emission failures)
    Failed,
}

impl Outcome {
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            Outcome::Success
        } else {
            Outcome::Failed
        }
    }
}

/// Module glob from the command line, falling back to the project's
pub fn module_glob<'a>(name: &'a Option<String>, project: &'a Project) -> &'a str {
    name.as_deref().unwrap_or(&project.config.module_glob)
}

/// Schema modules of `project` selected by `glob`
pub fn selected_sources(project: &Project, glob: &str) -> Result<Vec<ModuleSource>> {
    let sources = project.sources()?;
    let selected = project::select(&sources, glob)?;
    tracing::debug!(
        "selected {} of {} schema module(s) with '{}'",
        selected.len(),
        sources.len(),
        glob
    );
    Ok(selected)
}
