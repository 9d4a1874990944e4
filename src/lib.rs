// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # sdkforge — schema-driven TypeScript SDK generation and audit
//!
//! A small compiler backend for API clients. Declarative module schemas
//! (`models.yaml` / `api.yaml`) are loaded into an immutable model, lowered
//! to a tree of typed code primitives, and rendered to TypeScript. The same
//! model drives an audit that diffs on-disk modules against what generation
//! would produce, without touching any file.
//!
//! ## Quick Start
//!
//! ```rust
//! use sdkforge::{Emitter, ModuleKind, SchemaLoader, SchemaModel, TypeRegistry};
//!
//! let module = SchemaLoader::load_str(
//!     "users-api",
//!     r#"
//! entities:
//!   - name: User
//!     fields:
//!       - { name: id, type: uuid }
//!       - { name: name, type: string }
//! "#,
//!     None,
//! )?;
//! let schema = SchemaModel { modules: vec![module] };
//!
//! let registry = TypeRegistry::standard();
//! let out = Emitter::new(&registry).emit(&schema, ModuleKind::Types);
//! assert!(out.modules[0].content.contains("export interface User {"));
//! # Ok::<(), sdkforge::Error>(())
//! ```
//!
//! ## Primitives
//!
//! Every construct of the generated code is a primitive with one capability,
//! [`Render::render`]. Primitives can also be built from tagged YAML:
//!
//! ```rust
//! use sdkforge::{Primitive, Render};
//!
//! let p = Primitive::from_yaml("kind: throw\nexpression: new Error('x')")?;
//! assert_eq!(p.render(), "throw new Error('x');");
//! # Ok::<(), sdkforge::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                             │
//! │  SCHEMA (models.yaml + api.yaml)                            │
//! │       │                                                     │
//! │       └──► SchemaLoader::load ──► SchemaModel               │
//! │                                      │                      │
//! │       ┌──────────────────────────────┤                      │
//! │       │                              │                      │
//! │       ▼                              ▼                      │
//! │  Emitter::emit ──► primitives    Auditor::audit             │
//! │       │              │               │                      │
//! │       │           Composer           ├──► emit (expected)   │
//! │       ▼              │               ├──► parse (on disk)   │
//! │  GeneratedModule ◄───┘               └──► AuditReport       │
//! │       │                                                     │
//! │       └──► write_modules (atomic)                           │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// Core
pub mod error;
pub mod logging;
pub mod util;

// Intermediate representation
pub mod compose;
pub mod primitive;

// Schema
pub mod config;
pub mod project;
pub mod registry;
pub mod schema;

// Operations
pub mod audit;
pub mod emit;
pub mod parse;
pub mod view;

// Re-exports
pub use audit::{
    audit_schema, diff_views, AuditFinding, AuditMode, AuditReport, Auditor, FindingKind,
    Severity,
};
pub use compose::{block, compose, compose_members, indent, SourceFile};
pub use config::ProjectConfig;
pub use emit::{
    write_modules, EmitConfig, EmitFailure, EmitOutput, Emitter, GeneratedModule, ModuleKind,
    WriteSummary,
};
pub use error::{Error, Result};
pub use logging::{Logger, NullLogger, TracingLogger};
pub use parse::parse_typescript;
pub use primitive::{
    ClassMember, Decl, Expr, Primitive, PrimitiveFamily, Property, Render, Stmt, TypeRef,
};
pub use project::Project;
pub use registry::TypeRegistry;
pub use schema::{IntegrityViolation, ModuleSchema, ModuleSource, SchemaLoader, SchemaModel};
pub use view::ModuleView;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
