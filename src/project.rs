//! Project discovery
//!
//! A project is rooted at the nearest ancestor directory holding
//! `sdkforge.yaml`; without one, the starting directory is the root and
//! defaults apply. Schema modules are the subdirectories of the schema
//! directory that contain a `models.yaml`.

use crate::config::{ProjectConfig, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::schema::ModuleSource;
use glob::Pattern;
use std::path::{Path, PathBuf};

/// Find the nearest directory at or above `start_dir` holding `sdkforge.yaml`
pub fn find_root(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current = start_dir.canonicalize().map_err(Error::Io)?;
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Ok(Some(current));
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return Ok(None),
        }
    }
}

/// A resolved project: root directory plus configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub root: PathBuf,
    pub config: ProjectConfig,
}

impl Project {
    /// Discover the project containing `start_dir`
    pub fn discover(start_dir: &Path) -> Result<Self> {
        match find_root(start_dir)? {
            Some(root) => {
                let config = ProjectConfig::load_from_dir(&root)?.unwrap_or_default();
                Ok(Self { root, config })
            }
            None => Ok(Self {
                root: start_dir.to_path_buf(),
                config: ProjectConfig::default(),
            }),
        }
    }

    pub fn schema_dir(&self) -> PathBuf {
        self.root.join(&self.config.schema_dir)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.output_dir)
    }

    /// All schema modules, sorted by name
    pub fn sources(&self) -> Result<Vec<ModuleSource>> {
        discover_modules(&self.schema_dir())
    }
}

/// Schema modules under `schema_dir`, sorted by directory name
pub fn discover_modules(schema_dir: &Path) -> Result<Vec<ModuleSource>> {
    if !schema_dir.is_dir() {
        return Err(Error::Config(format!(
            "Schema directory not found: {}",
            schema_dir.display()
        )));
    }

    let mut sources = Vec::new();
    for entry in std::fs::read_dir(schema_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(source) = ModuleSource::from_dir(&path) {
            sources.push(source);
        }
    }
    sources.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(sources)
}

/// Keep the sources whose module name matches `module_glob`
///
/// A plain module name is a glob that matches only itself.
pub fn select(sources: &[ModuleSource], module_glob: &str) -> Result<Vec<ModuleSource>> {
    let pattern = Pattern::new(module_glob)?;
    Ok(sources
        .iter()
        .filter(|s| pattern.matches(&s.name))
        .cloned()
        .collect())
}
