//! Project configuration (`sdkforge.yaml`)
//!
//! ```yaml
//! version: 1
//! schema_dir: schema
//! output_dir: src/generated
//! module_glob: "*-api"
//! header: true
//! types:
//!   money: string
//!   geopoint: "[number, number]"
//! ```
//!
//! Every key is optional. Paths are relative to the directory holding the
//! file. Command-line flags override these values.

use crate::audit::DEFAULT_MODULE_GLOB;
use crate::emit::EmitConfig;
use crate::error::{Error, Result};
use crate::registry::TypeRegistry;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "sdkforge.yaml";

fn default_version() -> u32 {
    1
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("schema")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}

fn default_module_glob() -> String {
    DEFAULT_MODULE_GLOB.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(title = "sdkforge config", description = "Project configuration")]
pub struct ProjectConfig {
    /// Config format version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory holding one subdirectory per schema module
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// Directory generated modules are written to and audited in
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Modules selected when no name is given
    #[serde(default = "default_module_glob")]
    pub module_glob: String,

    /// Emit the provenance comment at the top of each file
    #[serde(default = "default_true")]
    pub header: bool,

    /// Extra schema type → TypeScript type mappings
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub types: IndexMap<String, String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            schema_dir: default_schema_dir(),
            output_dir: default_output_dir(),
            module_glob: default_module_glob(),
            header: true,
            types: IndexMap::new(),
        }
    }
}

impl ProjectConfig {
    /// Load `sdkforge.yaml` from a directory, if present
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let file = dir.join(CONFIG_FILE);
        if !file.exists() {
            return Ok(None);
        }
        Self::load_file(&file).map(Some)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ProjectConfig = serde_norway::from_str(content)?;
        if config.version != 1 {
            return Err(Error::Config(format!(
                "Unsupported config version: {}",
                config.version
            )));
        }
        Ok(config)
    }

    /// Type registry for this project: built-ins plus `types`
    pub fn registry(&self) -> TypeRegistry {
        TypeRegistry::with(&self.types)
    }

    pub fn emit_config(&self) -> EmitConfig {
        EmitConfig {
            header: self.header,
        }
    }
}
