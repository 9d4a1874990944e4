//! Schema-only audit mode

use pretty_assertions::assert_eq;
use rstest::rstest;
use sdkforge::project::discover_modules;
use sdkforge::{audit_schema, AuditMode, Error, FindingKind, NullLogger, SchemaLoader, Severity};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_module(schema_dir: &Path, name: &str, models: &str, api: Option<&str>) {
    let dir = schema_dir.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("models.yaml"), models).unwrap();
    if let Some(api) = api {
        fs::write(dir.join("api.yaml"), api).unwrap();
    }
}

const USER: &str = "entities:\n  - name: User\n    fields:\n      - { name: id, type: uuid }\n";

#[rstest]
#[case::undefined_relation_target(
    "entities:\n  - name: User\n    relations:\n      - { name: team, target: Team }\n",
    None,
    Severity::Missing,
    "User.team"
)]
#[case::duplicate_field(
    "entities:\n  - name: User\n    fields:\n      - { name: id, type: uuid }\n      - { name: id, type: string }\n",
    None,
    Severity::Extra,
    "User.id"
)]
#[case::enum_without_values(
    "entities:\n  - name: User\n    fields:\n      - { name: role, type: enum }\n",
    None,
    Severity::Mismatched,
    "User.role"
)]
#[case::undefined_response_entity(
    USER,
    Some("operations:\n  - { name: getTeam, method: GET, path: /teams, response: { entity: Team } }\n"),
    Severity::Missing,
    "getTeam.response"
)]
#[case::unknown_request_field(
    USER,
    Some("operations:\n  - { name: createUser, method: POST, path: /users, request: { entity: User, fields: [email] } }\n"),
    Severity::Missing,
    "createUser.request"
)]
#[case::body_on_get(
    USER,
    Some("operations:\n  - { name: findUser, method: GET, path: /users, request: { entity: User } }\n"),
    Severity::Mismatched,
    "findUser"
)]
#[case::enum_alias_taken_by_entity(
    "entities:\n  - name: User\n    fields:\n      - { name: role, type: enum, values: [admin] }\n  - name: UserRole\n",
    None,
    Severity::Extra,
    "UserRole"
)]
#[case::repeated_path_placeholder(
    USER,
    Some("operations:\n  - { name: getPair, method: GET, path: \"/pairs/{id}/{id}\" }\n"),
    Severity::Extra,
    "getPair.id"
)]
fn test_integrity_violation_becomes_finding(
    #[case] models: &str,
    #[case] api: Option<&str>,
    #[case] severity: Severity,
    #[case] subject: &str,
) {
    let tmp = TempDir::new().unwrap();
    write_module(tmp.path(), "users-api", models, api);
    let sources = discover_modules(tmp.path()).unwrap();

    let report = audit_schema(&sources, "*-api", &NullLogger).unwrap();

    assert_eq!(report.mode, AuditMode::Schema);
    assert_eq!(report.findings.len(), 1, "{:?}", report.findings);
    let finding = &report.findings[0];
    assert_eq!(finding.kind, FindingKind::Schema);
    assert_eq!(finding.severity, severity);
    assert_eq!(finding.subject, subject);
    assert!(!report.passed());

    // The loader refuses the same module outright
    match SchemaLoader::load(&sources).unwrap_err() {
        Error::SchemaIntegrity { module, violations } => {
            assert_eq!(module, "users-api");
            assert_eq!(violations.len(), 1);
        }
        other => panic!("expected integrity error, got {other:?}"),
    }
}

#[test]
fn test_parse_error_is_a_schema_finding() {
    let tmp = TempDir::new().unwrap();
    write_module(
        tmp.path(),
        "users-api",
        "entities:\n  - name: User\n    fields: [\n",
        None,
    );
    let sources = discover_modules(tmp.path()).unwrap();

    let report = audit_schema(&sources, "*-api", &NullLogger).unwrap();
    assert_eq!(report.findings.len(), 1);
    let finding = &report.findings[0];
    assert_eq!(finding.severity, Severity::Mismatched);
    assert_eq!(finding.kind, FindingKind::Schema);
    assert!(finding
        .file
        .as_ref()
        .is_some_and(|p| p.ends_with("users-api/models.yaml")));

    assert!(matches!(
        SchemaLoader::load(&sources).unwrap_err(),
        Error::SchemaParse { .. }
    ));
}

#[test]
fn test_schema_mode_covers_every_selected_module() {
    let tmp = TempDir::new().unwrap();
    write_module(tmp.path(), "billing-api", USER, None);
    write_module(
        tmp.path(),
        "teams-api",
        "entities:\n  - name: Team\n    relations:\n      - { name: owner, target: Person }\n",
        None,
    );
    write_module(
        tmp.path(),
        "users-api",
        "entities:\n  - name: User\n    fields:\n      - { name: kind, type: enum }\n",
        None,
    );
    write_module(tmp.path(), "internal", "entities: [\n", None);
    let sources = discover_modules(tmp.path()).unwrap();

    let report = audit_schema(&sources, "*-api", &NullLogger).unwrap();
    let modules: Vec<_> = report.findings.iter().map(|f| f.module.as_str()).collect();
    // one bad module does not hide the next; `internal` is not selected
    assert_eq!(modules, vec!["teams-api", "users-api"]);
}

#[test]
fn test_schema_mode_never_reads_output() {
    let tmp = TempDir::new().unwrap();
    let schema_dir = tmp.path().join("schema");
    write_module(&schema_dir, "users-api", USER, None);
    // A stale generated tree that a normal audit would flag
    let out = tmp.path().join("generated/users-api");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("types.ts"), "export interface Other {}\n").unwrap();

    let sources = discover_modules(&schema_dir).unwrap();
    let report = audit_schema(&sources, "*-api", &NullLogger).unwrap();

    assert_eq!(report.findings, vec![]);
    assert!(report.passed());
}

#[test]
fn test_bad_glob() {
    assert!(matches!(
        audit_schema(&[], "[", &NullLogger).unwrap_err(),
        Error::Pattern(_)
    ));
}
