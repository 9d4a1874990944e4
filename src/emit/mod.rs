//! Emitter — schema modules into generated TypeScript files
//!
//! For each module the emitter builds a primitive tree per [`ModuleKind`],
//! renders it through the composer, and returns a [`GeneratedModule`] with
//! a content hash. Output is a pure function of the schema and the type
//! registry: no timestamps, no map iteration in unspecified order.
//!
//! A field type with no registered mapping fails the whole module: none of
//! its files are produced, since a client importing from a types file that
//! was never written would not compile. Failures are collected into
//! [`EmitOutput::failures`] while the remaining modules keep emitting.

mod client;
mod types;

use crate::compose::SourceFile;
use crate::error::{Error, Result};
use crate::logging::{Logger, NullLogger};
use crate::primitive::Render;
use crate::registry::TypeRegistry;
use crate::schema::{ModuleSchema, SchemaModel};
use crate::util::content_hash;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

static NULL_LOGGER: NullLogger = NullLogger;

/// One generated file per module and kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// Entity interfaces, enum aliases, request shapes
    Types,
    /// HTTP client class
    Client,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 2] = [ModuleKind::Types, ModuleKind::Client];

    pub fn file_name(&self) -> &'static str {
        match self {
            ModuleKind::Types => "types.ts",
            ModuleKind::Client => "client.ts",
        }
    }

    /// Relative output path: `<module>/<file>`
    pub fn path_for(&self, module: &str) -> PathBuf {
        PathBuf::from(module).join(self.file_name())
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.file_name() == name)
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKind::Types => f.write_str("types"),
            ModuleKind::Client => f.write_str("client"),
        }
    }
}

/// An emitted artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedModule {
    pub module: String,
    pub kind: ModuleKind,
    /// Relative to the output directory
    pub path: PathBuf,
    #[serde(skip)]
    pub content: String,
    /// `sha256:<hex>` of `content`
    pub hash: String,
}

impl GeneratedModule {
    fn new(module: &str, kind: ModuleKind, content: String) -> Self {
        Self {
            module: module.to_string(),
            kind,
            path: kind.path_for(module),
            hash: content_hash(&content),
            content,
        }
    }
}

/// A module that could not be emitted, with the kind that failed first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmitFailure {
    pub module: String,
    pub kind: ModuleKind,
    pub message: String,
}

impl fmt::Display for EmitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.module, self.kind, self.message)
    }
}

/// Everything one emission run produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmitOutput {
    pub modules: Vec<GeneratedModule>,
    pub failures: Vec<EmitFailure>,
}

impl EmitOutput {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Emission settings
#[derive(Debug, Clone)]
pub struct EmitConfig {
    /// Prepend the provenance comment
    pub header: bool,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self { header: true }
    }
}

/// Builds primitive trees from schema modules and renders them
pub struct Emitter<'a> {
    registry: &'a TypeRegistry,
    config: EmitConfig,
    logger: &'a dyn Logger,
}

impl<'a> Emitter<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            config: EmitConfig::default(),
            logger: &NULL_LOGGER,
        }
    }

    pub fn with_config(mut self, config: EmitConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: &'a dyn Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Emit one kind for every module, collecting per-module failures
    ///
    /// A module only contributes its file when every kind of it builds.
    pub fn emit(&self, schema: &SchemaModel, kind: ModuleKind) -> EmitOutput {
        self.collect(schema, Some(kind))
    }

    /// Emit every kind for every module, module by module
    pub fn emit_all(&self, schema: &SchemaModel) -> EmitOutput {
        self.collect(schema, None)
    }

    fn collect(&self, schema: &SchemaModel, only: Option<ModuleKind>) -> EmitOutput {
        let mut out = EmitOutput::default();
        for module in &schema.modules {
            match self.emit_module_files(module) {
                Ok(files) => out
                    .modules
                    .extend(files.into_iter().filter(|m| only.is_none_or(|k| m.kind == k))),
                Err(failure) => out.failures.push(failure),
            }
        }
        self.log_failures(&out);
        out
    }

    /// Every file of one module, or the first failure and nothing else
    pub fn emit_module_files(
        &self,
        module: &ModuleSchema,
    ) -> std::result::Result<Vec<GeneratedModule>, EmitFailure> {
        let mut files = Vec::with_capacity(ModuleKind::ALL.len());
        for kind in ModuleKind::ALL {
            match self.emit_module(module, kind) {
                Ok(Some(generated)) => files.push(generated),
                Ok(None) => {}
                Err(e) => {
                    return Err(EmitFailure {
                        module: module.name.clone(),
                        kind,
                        message: e.to_string(),
                    })
                }
            }
        }
        Ok(files)
    }

    /// Emit one kind of one module; `None` when the module has nothing of that kind
    pub fn emit_module(
        &self,
        module: &ModuleSchema,
        kind: ModuleKind,
    ) -> Result<Option<GeneratedModule>> {
        let file = match kind {
            ModuleKind::Types => {
                if module.entities.is_empty() {
                    return Ok(None);
                }
                let mut file = self.source_file(module);
                for decl in types::build(module, self.registry)? {
                    file.push(decl);
                }
                file
            }
            ModuleKind::Client => {
                if !module.has_operations() {
                    return Ok(None);
                }
                let (imports, class) = client::build(module, self.registry)?;
                let mut file = self.source_file(module);
                if let Some(import) = imports {
                    file.import(import);
                }
                file.push(class);
                file
            }
        };

        let generated = GeneratedModule::new(&module.name, kind, file.render());
        self.logger.debug(&format!(
            "emitted {} ({} bytes, {})",
            generated.path.display(),
            generated.content.len(),
            generated.hash
        ));
        Ok(Some(generated))
    }

    fn source_file(&self, module: &ModuleSchema) -> SourceFile {
        if !self.config.header {
            return SourceFile::new();
        }
        SourceFile::new().with_header(provenance(module))
    }

    fn log_failures(&self, out: &EmitOutput) {
        for failure in &out.failures {
            self.logger.error(&failure.to_string());
        }
    }
}

/// Fixed provenance comment; depends only on the module's schema
fn provenance(module: &ModuleSchema) -> Vec<String> {
    let schema_hash = serde_json::to_string(module)
        .map(|json| content_hash(&json))
        .unwrap_or_default();
    vec![
        format!("GENERATED FROM: {} schema", module.name),
        format!("SCHEMA HASH: {}", schema_hash),
        "DO NOT EDIT: regenerate with `sdkforge generate`".to_string(),
    ]
}

/// Outcome of writing generated files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
}

/// Write modules under `out_dir`, one atomic replace per file
///
/// Files whose content already matches are left untouched. A failed write
/// never leaves a partial file behind: content goes to a temporary file in
/// the target directory which is then renamed over the destination.
pub fn write_modules(
    out_dir: &Path,
    modules: &[GeneratedModule],
    logger: &dyn Logger,
) -> Result<WriteSummary> {
    let mut summary = WriteSummary::default();
    for module in modules {
        let target = out_dir.join(&module.path);
        if fs::read_to_string(&target).is_ok_and(|existing| existing == module.content) {
            logger.debug(&format!("unchanged {}", target.display()));
            summary.unchanged.push(target);
            continue;
        }
        write_atomic(&target, &module.content)?;
        logger.info(&format!("wrote {}", target.display()));
        summary.written.push(target);
    }
    Ok(summary)
}

fn write_atomic(target: &Path, content: &str) -> Result<()> {
    let dir = target
        .parent()
        .ok_or_else(|| Error::Other(format!("no parent directory for {}", target.display())))?;
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
