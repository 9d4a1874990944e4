//! Error types for sdkforge

use crate::schema::IntegrityViolation;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// sdkforge errors
#[derive(Error, Debug)]
pub enum Error {
    /// A schema file is not well-formed structured data. Fatal to the run.
    #[error("Schema parse error in {}{}: {message}", .path.display(), location_suffix(.line, .column))]
    SchemaParse {
        path: PathBuf,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    /// A schema parses but breaks referential rules. Fatal to the run.
    #[error("Schema integrity error in module '{module}': {}", summarize(.violations))]
    SchemaIntegrity {
        module: String,
        violations: Vec<IntegrityViolation>,
    },

    /// A field or parameter type has no registered mapping. Scoped to one module.
    #[error("Unsupported field type '{type_name}' for {subject} in module '{module}'")]
    UnsupportedFieldType {
        module: String,
        subject: String,
        type_name: String,
    },

    #[error("Unknown primitive kind '{kind}' at {path}")]
    UnknownPrimitive { kind: String, path: String },

    #[error("Invalid primitive config: {0}")]
    PrimitiveConfig(String),

    #[error("Code parse error: {0}")]
    CodeParse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid module pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a `SchemaParse` error from a YAML error, keeping its location.
    pub fn schema_parse(path: impl Into<PathBuf>, err: &serde_norway::Error) -> Self {
        let location = err.location();
        Error::SchemaParse {
            path: path.into(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
            message: err.to_string(),
        }
    }
}

fn location_suffix(line: &Option<usize>, column: &Option<usize>) -> String {
    match (*line, *column) {
        (Some(line), Some(column)) => format!(" (line {}, column {})", line, column),
        (Some(line), None) => format!(" (line {})", line),
        _ => String::new(),
    }
}

fn summarize(violations: &[IntegrityViolation]) -> String {
    match violations {
        [] => "no violations".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}
