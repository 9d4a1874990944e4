//! Audit Engine — verify on-disk modules against the schema
//!
//! The audit never writes. In normal mode it re-derives every expected file
//! through the [`Emitter`], reads the file on disk and, when the content
//! hashes differ, compares the two structurally through [`ModuleView`]s.
//! In schema mode it only checks that the schema files parse and satisfy
//! referential integrity, and never looks at the output directory.
//!
//! Module comparisons are independent and run in parallel. Findings are
//! re-ordered by schema declaration order before they are reported.

use crate::emit::{EmitConfig, EmitFailure, Emitter, GeneratedModule, ModuleKind};
use crate::error::{Error, Result};
use crate::logging::{Logger, NullLogger};
use crate::parse::parse_typescript;
use crate::registry::TypeRegistry;
use crate::schema::{IntegrityViolation, ModuleSchema, ModuleSource, Rule, SchemaLoader, SchemaModel};
use crate::util::content_hash;
use crate::view::{DeclView, ModuleView};
use glob::Pattern;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

static NULL_LOGGER: NullLogger = NullLogger;

/// Default module selection for audits
pub const DEFAULT_MODULE_GLOB: &str = "*-api";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditMode {
    /// Compare on-disk modules with emitted output
    Normal,
    /// Validate schema files only
    Schema,
}

impl fmt::Display for AuditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditMode::Normal => f.write_str("normal"),
            AuditMode::Schema => f.write_str("schema"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Missing,
    Mismatched,
    Extra,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Missing => f.write_str("missing"),
            Severity::Mismatched => f.write_str("mismatched"),
            Severity::Extra => f.write_str("extra"),
        }
    }
}

/// What a finding is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    /// A whole generated file or module directory
    File,
    /// A type alias, interface or class
    Type,
    /// An interface property
    Field,
    /// A method signature
    Operation,
    /// A schema parse or integrity problem
    Schema,
}

/// One discrepancy between what the schema implies and what exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditFinding {
    pub module: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// `User`, `User.name`, `UsersApiClient.getUser`
    pub subject: String,
    pub kind: FindingKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.module)?;
        if let Some(file) = &self.file {
            write!(f, " {}", file.display())?;
        }
        write!(f, " {}", self.subject)?;
        if let Some(expected) = &self.expected {
            write!(f, " expected `{}`", expected)?;
        }
        if let Some(actual) = &self.actual {
            write!(f, " found `{}`", actual)?;
        }
        Ok(())
    }
}

/// Result of one audit run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub mode: AuditMode,
    pub findings: Vec<AuditFinding>,
    /// Modules and kinds that could not be emitted or compared
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<EmitFailure>,
}

impl AuditReport {
    pub fn new(mode: AuditMode) -> Self {
        Self {
            mode,
            findings: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Normal mode passes with no missing or mismatched findings and no
    /// failures; schema mode passes with no findings at all.
    pub fn passed(&self) -> bool {
        match self.mode {
            AuditMode::Normal => {
                self.failures.is_empty()
                    && !self
                        .findings
                        .iter()
                        .any(|f| matches!(f.severity, Severity::Missing | Severity::Mismatched))
            }
            AuditMode::Schema => self.findings.is_empty(),
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Format as a human-readable findings table
    pub fn to_report(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("AUDIT REPORT ({} mode)\n", self.mode));
        out.push_str("═══════════════════════════════════════════════════════════════\n\n");

        if self.findings.is_empty() {
            out.push_str("No findings.\n\n");
        } else {
            let header = ["SEVERITY", "MODULE", "FILE", "SUBJECT", "EXPECTED", "ACTUAL"];
            let rows: Vec<[String; 6]> = self
                .findings
                .iter()
                .map(|f| {
                    [
                        f.severity.to_string(),
                        f.module.clone(),
                        f.file
                            .as_ref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| "-".into()),
                        f.subject.clone(),
                        f.expected.clone().unwrap_or_else(|| "-".into()),
                        f.actual.clone().unwrap_or_else(|| "-".into()),
                    ]
                })
                .collect();

            let mut widths = header.map(|h| h.chars().count());
            for row in &rows {
                for (w, cell) in widths.iter_mut().zip(row) {
                    *w = (*w).max(cell.chars().count());
                }
            }

            let line = |cells: &[String]| -> String {
                let padded: Vec<String> = cells
                    .iter()
                    .zip(widths)
                    .map(|(cell, w)| format!("{:<w$}", cell, w = w))
                    .collect();
                format!("{}\n", padded.join("  ").trim_end())
            };
            out.push_str(&line(&header.map(String::from)));
            for row in &rows {
                out.push_str(&line(row));
            }
            out.push('\n');
        }

        if !self.failures.is_empty() {
            out.push_str("Failures:\n");
            for failure in &self.failures {
                out.push_str(&format!("  {}\n", failure));
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "Summary: {} missing, {} mismatched, {} extra, {} failures\n",
            self.count(Severity::Missing),
            self.count(Severity::Mismatched),
            self.count(Severity::Extra),
            self.failures.len()
        ));
        out.push_str(&format!(
            "Status: {}\n",
            if self.passed() { "PASSED" } else { "FAILED" }
        ));
        out
    }
}

/// Findings and failures for one schema module
#[derive(Debug, Default)]
struct ModuleAudit {
    findings: Vec<AuditFinding>,
    failures: Vec<EmitFailure>,
}

/// Compares on-disk modules under an output directory with emitted output
pub struct Auditor<'a> {
    emitter: Emitter<'a>,
    output_dir: PathBuf,
    logger: &'a dyn Logger,
}

impl<'a> Auditor<'a> {
    pub fn new(registry: &'a TypeRegistry, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            emitter: Emitter::new(registry),
            output_dir: output_dir.into(),
            logger: &NULL_LOGGER,
        }
    }

    /// Must match the settings used when the files were generated
    pub fn with_emit_config(mut self, config: EmitConfig) -> Self {
        self.emitter = self.emitter.with_config(config);
        self
    }

    pub fn with_logger(mut self, logger: &'a dyn Logger) -> Self {
        self.logger = logger;
        self.emitter = self.emitter.with_logger(logger);
        self
    }

    /// Audit every schema module whose name matches `module_glob`
    pub fn audit(&self, schema: &SchemaModel, module_glob: &str) -> Result<AuditReport> {
        let pattern = Pattern::new(module_glob)?;
        let selected: Vec<(usize, &ModuleSchema)> = schema
            .modules
            .iter()
            .enumerate()
            .filter(|(_, m)| pattern.matches(&m.name))
            .collect();

        self.logger.info(&format!(
            "auditing {} module(s) matching '{}' in {}",
            selected.len(),
            module_glob,
            self.output_dir.display()
        ));

        // Workers finish in any order; reporting follows declaration order
        let mut results: Vec<(usize, ModuleAudit)> = selected
            .par_iter()
            .map(|(index, module)| (*index, self.audit_module(module)))
            .collect();
        results.sort_by_key(|(index, _)| *index);

        let mut report = AuditReport::new(AuditMode::Normal);
        for (_, module_audit) in results {
            report.findings.extend(module_audit.findings);
            report.failures.extend(module_audit.failures);
        }
        report
            .findings
            .extend(self.orphan_modules(schema, &pattern)?);

        self.logger.info(&format!(
            "audit finished: {} finding(s), {} failure(s)",
            report.findings.len(),
            report.failures.len()
        ));
        Ok(report)
    }

    fn audit_module(&self, module: &ModuleSchema) -> ModuleAudit {
        let mut out = ModuleAudit::default();
        // A module that cannot be emitted in full is not compared at all
        let expected = match self.emitter.emit_module_files(module) {
            Ok(files) => files,
            Err(failure) => {
                self.logger.error(&failure.to_string());
                out.failures.push(failure);
                return out;
            }
        };

        for kind in ModuleKind::ALL {
            let result = match expected.iter().find(|m| m.kind == kind) {
                Some(generated) => self.compare_file(generated),
                None => Ok(self.unexpected_file(module, kind).into_iter().collect()),
            };
            match result {
                Ok(findings) => out.findings.extend(findings),
                Err(e) => {
                    self.logger
                        .error(&format!("{} ({}): {}", module.name, kind, e));
                    out.failures.push(EmitFailure {
                        module: module.name.clone(),
                        kind,
                        message: e.to_string(),
                    });
                }
            }
        }
        self.logger.debug(&format!(
            "{}: {} finding(s)",
            module.name,
            out.findings.len()
        ));
        out
    }

    fn compare_file(&self, expected: &GeneratedModule) -> Result<Vec<AuditFinding>> {
        let path = self.output_dir.join(&expected.path);
        let actual = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(vec![AuditFinding {
                    module: expected.module.clone(),
                    file: Some(expected.path.clone()),
                    subject: expected.path.display().to_string(),
                    kind: FindingKind::File,
                    severity: Severity::Missing,
                    expected: Some(expected.hash.clone()),
                    actual: None,
                }]);
            }
            Err(e) => return Err(e.into()),
        };

        if content_hash(&actual) == expected.hash {
            return Ok(vec![]);
        }

        let expected_view = parse_typescript(&expected.content)?;
        let actual_view = parse_typescript(&actual)?;
        if let Some(err) = actual_view.syntax_errors.first() {
            self.logger.warn(&format!(
                "{} has syntax errors (first at line {}, column {})",
                path.display(),
                err.line,
                err.column
            ));
        }

        let findings = diff_views(
            &expected.module,
            &expected.path,
            &expected_view,
            &actual_view,
        );
        if findings.is_empty() {
            self.logger.debug(&format!(
                "{} differs only in formatting",
                path.display()
            ));
        }
        Ok(findings)
    }

    /// A file on disk for a kind the schema does not produce
    fn unexpected_file(&self, module: &ModuleSchema, kind: ModuleKind) -> Option<AuditFinding> {
        let rel = kind.path_for(&module.name);
        if !self.output_dir.join(&rel).is_file() {
            return None;
        }
        Some(AuditFinding {
            module: module.name.clone(),
            file: Some(rel.clone()),
            subject: rel.display().to_string(),
            kind: FindingKind::File,
            severity: Severity::Extra,
            expected: None,
            actual: Some("present".into()),
        })
    }

    /// Output directories matching the glob with no schema module
    fn orphan_modules(&self, schema: &SchemaModel, pattern: &Pattern) -> Result<Vec<AuditFinding>> {
        let entries = match fs::read_dir(&self.output_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut orphans = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if pattern.matches(&name) && schema.module(&name).is_none() {
                orphans.push(name);
            }
        }
        orphans.sort();

        Ok(orphans
            .into_iter()
            .map(|name| AuditFinding {
                file: Some(PathBuf::from(&name)),
                subject: name.clone(),
                module: name,
                kind: FindingKind::File,
                severity: Severity::Extra,
                expected: None,
                actual: Some("no schema module".into()),
            })
            .collect())
    }
}

/// Structural diff of two module views, in expected declaration order
pub fn diff_views(
    module: &str,
    file: &Path,
    expected: &ModuleView,
    actual: &ModuleView,
) -> Vec<AuditFinding> {
    let finding = |subject: String,
                   kind: FindingKind,
                   severity: Severity,
                   expected: Option<String>,
                   actual: Option<String>| AuditFinding {
        module: module.to_string(),
        file: Some(file.to_path_buf()),
        subject,
        kind,
        severity,
        expected,
        actual,
    };

    let mut findings = Vec::new();
    for want in &expected.declarations {
        let Some(have) = actual.declaration(&want.name) else {
            findings.push(finding(
                want.name.clone(),
                FindingKind::Type,
                Severity::Missing,
                Some(want.describe()),
                None,
            ));
            continue;
        };

        if want.kind != have.kind || want.alias != have.alias {
            findings.push(finding(
                want.name.clone(),
                FindingKind::Type,
                Severity::Mismatched,
                Some(want.describe()),
                Some(have.describe()),
            ));
            if want.kind != have.kind {
                continue;
            }
        }

        diff_members(want, have, &mut |subject, kind, severity, e, a| {
            findings.push(finding(subject, kind, severity, e, a))
        });
    }

    for have in &actual.declarations {
        if expected.declaration(&have.name).is_none() {
            findings.push(finding(
                have.name.clone(),
                FindingKind::Type,
                Severity::Extra,
                None,
                Some(have.describe()),
            ));
        }
    }
    findings
}

type Emit<'f> = dyn FnMut(String, FindingKind, Severity, Option<String>, Option<String>) + 'f;

fn diff_members(want: &DeclView, have: &DeclView, emit: &mut Emit<'_>) {
    let subject = |member: &str| format!("{}.{}", want.name, member);

    for prop in &want.properties {
        match have.property(&prop.name) {
            None => emit(
                subject(&prop.name),
                FindingKind::Field,
                Severity::Missing,
                Some(prop.to_string()),
                None,
            ),
            Some(found) if found != prop => emit(
                subject(&prop.name),
                FindingKind::Field,
                Severity::Mismatched,
                Some(prop.to_string()),
                Some(found.to_string()),
            ),
            Some(_) => {}
        }
    }
    for found in &have.properties {
        if want.property(&found.name).is_none() {
            emit(
                subject(&found.name),
                FindingKind::Field,
                Severity::Extra,
                None,
                Some(found.to_string()),
            );
        }
    }

    for method in &want.methods {
        match have.method(&method.name) {
            None => emit(
                subject(&method.name),
                FindingKind::Operation,
                Severity::Missing,
                Some(method.to_string()),
                None,
            ),
            Some(found) if found != method => {
                let (e, a) = if found.to_string() == method.to_string() {
                    // same signature, different request
                    (method.endpoint.clone(), found.endpoint.clone())
                } else {
                    (Some(method.to_string()), Some(found.to_string()))
                };
                emit(
                    subject(&method.name),
                    FindingKind::Operation,
                    Severity::Mismatched,
                    e,
                    a,
                )
            }
            Some(_) => {}
        }
    }
    for found in &have.methods {
        if want.method(&found.name).is_none() {
            emit(
                subject(&found.name),
                FindingKind::Operation,
                Severity::Extra,
                None,
                Some(found.to_string()),
            );
        }
    }
}

/// Schema-only audit: parse and integrity checks, no output comparison
pub fn audit_schema(
    sources: &[ModuleSource],
    module_glob: &str,
    logger: &dyn Logger,
) -> Result<AuditReport> {
    let pattern = Pattern::new(module_glob)?;
    let mut report = AuditReport::new(AuditMode::Schema);

    for source in sources.iter().filter(|s| pattern.matches(&s.name)) {
        logger.debug(&format!("checking schema for {}", source.name));
        match SchemaLoader::check(source) {
            Ok(violations) => report
                .findings
                .extend(violations.iter().map(|v| violation_finding(source, v))),
            Err(Error::SchemaParse {
                path,
                line,
                column,
                message,
            }) => {
                let location = match (line, column) {
                    (Some(l), Some(c)) => format!("line {}, column {}", l, c),
                    _ => "document".to_string(),
                };
                report.findings.push(AuditFinding {
                    module: source.name.clone(),
                    file: Some(path),
                    subject: location,
                    kind: FindingKind::Schema,
                    severity: Severity::Mismatched,
                    expected: Some("well-formed schema".into()),
                    actual: Some(message),
                });
            }
            Err(Error::Io(e)) => report.findings.push(AuditFinding {
                module: source.name.clone(),
                file: Some(source.models.clone()),
                subject: source.name.clone(),
                kind: FindingKind::Schema,
                severity: Severity::Missing,
                expected: Some("readable schema file".into()),
                actual: Some(e.to_string()),
            }),
            Err(e) => return Err(e),
        }
    }

    if !report.findings.is_empty() {
        logger.warn(&format!("{} schema finding(s)", report.findings.len()));
    }
    Ok(report)
}

fn violation_finding(source: &ModuleSource, violation: &IntegrityViolation) -> AuditFinding {
    let severity = match violation.rule {
        Rule::DuplicateName => Severity::Extra,
        Rule::UndefinedRelationTarget { .. }
        | Rule::UndefinedEntity { .. }
        | Rule::UnknownRequestField { .. } => Severity::Missing,
        _ => Severity::Mismatched,
    };
    AuditFinding {
        module: source.name.clone(),
        file: None,
        subject: violation.subject.clone(),
        kind: FindingKind::Schema,
        severity,
        expected: None,
        actual: Some(violation.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLogger;
    use crate::view::{DeclKind, MethodView, PropertyView};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn interface(name: &str, props: &[(&str, &str, bool)]) -> DeclView {
        DeclView {
            name: name.into(),
            kind: DeclKind::Interface,
            alias: None,
            properties: props
                .iter()
                .map(|(n, t, o)| PropertyView {
                    name: n.to_string(),
                    ty: Some(t.to_string()),
                    optional: *o,
                })
                .collect(),
            methods: vec![],
        }
    }

    fn view(decls: Vec<DeclView>) -> ModuleView {
        ModuleView {
            declarations: decls,
            syntax_errors: vec![],
        }
    }

    #[test]
    fn test_diff_identical_views() {
        let v = view(vec![interface("User", &[("id", "string", false)])]);
        assert!(diff_views("m", Path::new("m/types.ts"), &v, &v).is_empty());
    }

    #[test]
    fn test_diff_member_findings_in_order() {
        let expected = view(vec![interface(
            "User",
            &[("id", "string", false), ("name", "string", false), ("age", "number", true)],
        )]);
        let actual = view(vec![interface(
            "User",
            &[("id", "number", false), ("age", "number", true), ("legacy", "boolean", false)],
        )]);
        let findings = diff_views("m", Path::new("m/types.ts"), &expected, &actual);
        let summary: Vec<_> = findings
            .iter()
            .map(|f| (f.subject.as_str(), f.severity))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("User.id", Severity::Mismatched),
                ("User.name", Severity::Missing),
                ("User.legacy", Severity::Extra),
            ]
        );
        assert_eq!(findings[0].expected.as_deref(), Some("id: string"));
        assert_eq!(findings[0].actual.as_deref(), Some("id: number"));
    }

    #[test]
    fn test_diff_method_request_only() {
        let client = |endpoint: &str| {
            view(vec![DeclView {
                name: "UsersApiClient".into(),
                kind: DeclKind::Class,
                alias: None,
                properties: vec![],
                methods: vec![MethodView {
                    name: "getUser".into(),
                    params: vec![],
                    returns: Some("Promise<User>".into()),
                    endpoint: Some(endpoint.to_string()),
                }],
            }])
        };
        let expected = client("GET ${this.baseUrl}/users");
        let actual = client("DELETE ${this.baseUrl}/users");
        let findings = diff_views("m", Path::new("m/client.ts"), &expected, &actual);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject, "UsersApiClient.getUser");
        assert_eq!(findings[0].kind, FindingKind::Operation);
        assert_eq!(findings[0].severity, Severity::Mismatched);
        assert_eq!(findings[0].expected.as_deref(), Some("GET ${this.baseUrl}/users"));
        assert_eq!(findings[0].actual.as_deref(), Some("DELETE ${this.baseUrl}/users"));
    }

    #[test]
    fn test_diff_declaration_level() {
        let expected = view(vec![
            interface("User", &[]),
            DeclView {
                name: "Client".into(),
                kind: DeclKind::Class,
                alias: None,
                properties: vec![],
                methods: vec![MethodView {
                    name: "getUser".into(),
                    params: vec![],
                    returns: Some("Promise<User>".into()),
                    endpoint: None,
                }],
            },
        ]);
        let actual = view(vec![
            DeclView {
                name: "User".into(),
                kind: DeclKind::Alias,
                alias: Some("unknown".into()),
                properties: vec![],
                methods: vec![],
            },
            interface("Stale", &[]),
        ]);
        let findings = diff_views("m", Path::new("m/types.ts"), &expected, &actual);
        let summary: Vec<_> = findings
            .iter()
            .map(|f| (f.subject.as_str(), f.kind, f.severity))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("User", FindingKind::Type, Severity::Mismatched),
                ("Client", FindingKind::Type, Severity::Missing),
                ("Stale", FindingKind::Type, Severity::Extra),
            ]
        );
    }

    #[test]
    fn test_passed_rules() {
        let extra = AuditFinding {
            module: "m".into(),
            file: None,
            subject: "x".into(),
            kind: FindingKind::File,
            severity: Severity::Extra,
            expected: None,
            actual: None,
        };
        let mut normal = AuditReport::new(AuditMode::Normal);
        normal.findings.push(extra.clone());
        assert!(normal.passed());

        let mut schema = AuditReport::new(AuditMode::Schema);
        schema.findings.push(extra.clone());
        assert!(!schema.passed());

        let mut missing = AuditReport::new(AuditMode::Normal);
        missing.findings.push(AuditFinding {
            severity: Severity::Missing,
            ..extra
        });
        assert!(!missing.passed());
    }

    #[test]
    fn test_report_table() {
        let mut report = AuditReport::new(AuditMode::Normal);
        report.findings.push(AuditFinding {
            module: "users-api".into(),
            file: Some(PathBuf::from("users-api/types.ts")),
            subject: "User.name".into(),
            kind: FindingKind::Field,
            severity: Severity::Missing,
            expected: Some("name: string".into()),
            actual: None,
        });
        let text = report.to_report();
        assert!(text.contains("SEVERITY  MODULE     FILE"));
        assert!(text.contains("missing   users-api  users-api/types.ts  User.name  name: string  -"));
        assert!(text.contains("Summary: 1 missing, 0 mismatched, 0 extra, 0 failures"));
        assert!(text.ends_with("Status: FAILED\n"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["findings"][0]["severity"], "missing");
        assert_eq!(json["findings"][0]["kind"], "field");
    }

    #[test]
    fn test_missing_output_file_and_orphan_dir() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("legacy-api")).unwrap();
        fs::create_dir_all(tmp.path().join("assets")).unwrap();

        let module = SchemaLoader::load_str(
            "users-api",
            "entities:\n  - { name: User, fields: [{ name: id, type: uuid }] }\n",
            None,
        )
        .unwrap();
        let schema = SchemaModel {
            modules: vec![module],
        };
        let registry = TypeRegistry::standard();
        let logger = MemoryLogger::new();
        let report = Auditor::new(&registry, tmp.path())
            .with_logger(&logger)
            .audit(&schema, DEFAULT_MODULE_GLOB)
            .unwrap();

        let summary: Vec<_> = report
            .findings
            .iter()
            .map(|f| (f.module.as_str(), f.kind, f.severity))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("users-api", FindingKind::File, Severity::Missing),
                ("legacy-api", FindingKind::File, Severity::Extra),
            ]
        );
        assert!(!report.passed());
    }

    #[test]
    fn test_bad_glob_is_an_error() {
        let registry = TypeRegistry::standard();
        let auditor = Auditor::new(&registry, "out");
        assert!(matches!(
            auditor.audit(&SchemaModel::default(), "[*-api"),
            Err(Error::Pattern(_))
        ));
    }
}
