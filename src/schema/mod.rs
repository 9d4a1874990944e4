//! Schema Loader — declarative module schemas into an immutable model
//!
//! Each module lives in its own directory under the schema root:
//!
//! ```text
//! schema/
//!   users-api/
//!     models.yaml   # entities, fields, relations (required)
//!     api.yaml      # operations (optional)
//! ```
//!
//! Loading is a pure function of file contents. Malformed YAML fails with
//! [`Error::SchemaParse`] carrying the file and location; a module that
//! parses but breaks referential rules fails with [`Error::SchemaIntegrity`]
//! and yields no model at all.

pub mod integrity;
pub mod raw;

pub use integrity::{validate, IntegrityViolation, Rule};
pub use raw::{
    ApiFile, Cardinality, Entity, Field, HttpMethod, ModelsFile, Operation, PathParam,
    RequestShape, ResponseShape, Relation,
};

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const MODELS_FILE: &str = "models.yaml";
pub const API_FILE: &str = "api.yaml";

/// Where one module's schema files live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSource {
    pub name: String,
    pub models: PathBuf,
    pub api: Option<PathBuf>,
}

impl ModuleSource {
    /// Source for `<schema_dir>/<name>/`, picking up `api.yaml` if present
    pub fn from_dir(dir: &Path) -> Option<Self> {
        let name = dir.file_name()?.to_str()?.to_string();
        let models = dir.join(MODELS_FILE);
        if !models.is_file() {
            return None;
        }
        let api = dir.join(API_FILE);
        Some(Self {
            name,
            models,
            api: api.is_file().then_some(api),
        })
    }
}

/// One validated module
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleSchema {
    pub name: String,
    pub entities: IndexMap<String, Entity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    pub operations: IndexMap<String, Operation>,
}

impl ModuleSchema {
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn has_operations(&self) -> bool {
        !self.operations.is_empty()
    }
}

/// All loaded modules, in load order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaModel {
    pub modules: Vec<ModuleSchema>,
}

impl SchemaModel {
    pub fn module(&self, name: &str) -> Option<&ModuleSchema> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Reads and validates schema files
pub struct SchemaLoader;

impl SchemaLoader {
    /// Load every module, failing on the first parse or integrity error
    pub fn load(sources: &[ModuleSource]) -> Result<SchemaModel> {
        let modules = sources
            .iter()
            .map(Self::load_module)
            .collect::<Result<Vec<_>>>()?;
        Ok(SchemaModel { modules })
    }

    /// Load one module from disk
    pub fn load_module(source: &ModuleSource) -> Result<ModuleSchema> {
        let (models, api) = Self::read(source)?;
        Self::build(&source.name, models, api)
    }

    /// Load one module from in-memory YAML
    pub fn load_str(name: &str, models: &str, api: Option<&str>) -> Result<ModuleSchema> {
        let dir = PathBuf::from(name);
        let models = parse_yaml::<ModelsFile>(&dir.join(MODELS_FILE), models)?;
        let api = match api {
            Some(text) => parse_yaml::<ApiFile>(&dir.join(API_FILE), text)?,
            None => ApiFile::default(),
        };
        Self::build(name, models, api)
    }

    /// Parse and validate without building a model
    ///
    /// A parse failure is returned as `Err`; integrity problems are returned
    /// as the (possibly empty) list of violations.
    pub fn check(source: &ModuleSource) -> Result<Vec<IntegrityViolation>> {
        let (models, api) = Self::read(source)?;
        Ok(validate(&models, &api))
    }

    fn read(source: &ModuleSource) -> Result<(ModelsFile, ApiFile)> {
        let models = parse_yaml::<ModelsFile>(&source.models, &fs::read_to_string(&source.models)?)?;
        let api = match &source.api {
            Some(path) => parse_yaml::<ApiFile>(path, &fs::read_to_string(path)?)?,
            None => ApiFile::default(),
        };
        Ok((models, api))
    }

    fn build(name: &str, models: ModelsFile, api: ApiFile) -> Result<ModuleSchema> {
        let violations = validate(&models, &api);
        if !violations.is_empty() {
            return Err(Error::SchemaIntegrity {
                module: name.to_string(),
                violations,
            });
        }
        Ok(ModuleSchema {
            name: name.to_string(),
            entities: models
                .entities
                .into_iter()
                .map(|e| (e.name.clone(), e))
                .collect(),
            base_path: api.base_path,
            operations: api
                .operations
                .into_iter()
                .map(|o| (o.name.clone(), o))
                .collect(),
        })
    }
}

fn parse_yaml<T: DeserializeOwned + Default>(path: &Path, text: &str) -> Result<T> {
    // An empty or comment-only file is an empty document
    if text.trim().lines().all(|l| l.trim().is_empty() || l.trim_start().starts_with('#')) {
        return Ok(T::default());
    }
    serde_norway::from_str(text).map_err(|e| Error::schema_parse(path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const MODELS: &str = r#"
entities:
  - name: User
    fields:
      - { name: id, type: uuid }
      - { name: name, type: string }
  - name: Team
    fields:
      - { name: id, type: uuid }
"#;

    #[test]
    fn test_load_preserves_declaration_order() {
        let module = SchemaLoader::load_str("users-api", MODELS, None).unwrap();
        let names: Vec<_> = module.entities.keys().cloned().collect();
        assert_eq!(names, vec!["User", "Team"]);
        assert!(!module.has_operations());
    }

    #[test]
    fn test_load_is_idempotent() {
        let a = SchemaLoader::load_str("users-api", MODELS, None).unwrap();
        let b = SchemaLoader::load_str("users-api", MODELS, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_integrity_failure_returns_no_model() {
        let models = r#"
entities:
  - name: User
    fields: [{ name: id, type: uuid }]
    relations: [{ name: team, target: Team }]
"#;
        match SchemaLoader::load_str("users-api", models, None) {
            Err(Error::SchemaIntegrity { module, violations }) => {
                assert_eq!(module, "users-api");
                assert_eq!(violations.len(), 1);
            }
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_carries_location() {
        let err = SchemaLoader::load_str("users-api", "entities:\n  - name: [User\n", None)
            .unwrap_err();
        match err {
            Error::SchemaParse { path, line, .. } => {
                assert_eq!(path, PathBuf::from("users-api").join(MODELS_FILE));
                assert!(line.is_some());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_disk() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("users-api");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MODELS_FILE), MODELS).unwrap();
        fs::write(
            dir.join(API_FILE),
            "base_path: /api\noperations:\n  - { name: listUsers, method: GET, path: /users, response: { entity: User, list: true } }\n",
        )
        .unwrap();

        let source = ModuleSource::from_dir(&dir).unwrap();
        assert_eq!(source.name, "users-api");
        assert!(source.api.is_some());

        let model = SchemaLoader::load(&[source.clone()]).unwrap();
        let module = model.module("users-api").unwrap();
        assert_eq!(module.base_path.as_deref(), Some("/api"));
        assert_eq!(module.operations.len(), 1);
        assert_eq!(SchemaLoader::check(&source).unwrap(), vec![]);
    }

    #[test]
    fn test_dir_without_models_is_not_a_module() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(ModuleSource::from_dir(tmp.path()), None);
    }

    #[test]
    fn test_empty_api_file() {
        let module = SchemaLoader::load_str("users-api", MODELS, Some("# nothing yet\n")).unwrap();
        assert!(module.operations.is_empty());
    }
}
