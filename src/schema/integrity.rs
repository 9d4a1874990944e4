//! Referential-integrity rules for one schema module
//!
//! Every rule is checked and every violation collected; the loader refuses
//! to build a model when the list is non-empty.

use super::raw::{ApiFile, ModelsFile};
use crate::util::{is_identifier, is_reserved_type_name, is_reserved_word};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Members of the generated client class besides the operations
const CLIENT_MEMBERS: &[&str] = &["constructor", "baseUrl"];

/// Names a generated method body refers to; a parameter must not shadow them
const METHOD_LOCALS: &[&str] = &[
    "response",
    "fetch",
    "encodeURIComponent",
    "String",
    "JSON",
    "Error",
];

/// One broken rule, located by a dotted subject (`User.team`, `getUser`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityViolation {
    pub subject: String,
    pub rule: Rule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    DuplicateName,
    InvalidName,
    ReservedName,
    UndefinedRelationTarget { target: String },
    UndefinedEntity { entity: String },
    UnknownRequestField { entity: String, field: String },
    EnumWithoutValues,
    ValuesWithoutEnum,
    ParamNotInPath { param: String },
    BodyNotAllowed { method: String },
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.subject)?;
        match &self.rule {
            Rule::DuplicateName => write!(f, "duplicate name"),
            Rule::InvalidName => write!(f, "not a valid identifier"),
            Rule::ReservedName => write!(f, "reserved in generated code"),
            Rule::UndefinedRelationTarget { target } => {
                write!(f, "relation target '{}' is not defined", target)
            }
            Rule::UndefinedEntity { entity } => write!(f, "entity '{}' is not defined", entity),
            Rule::UnknownRequestField { entity, field } => {
                write!(f, "'{}' is not a field of '{}'", field, entity)
            }
            Rule::EnumWithoutValues => write!(f, "enum field has no values"),
            Rule::ValuesWithoutEnum => write!(f, "values given for a non-enum field"),
            Rule::ParamNotInPath { param } => {
                write!(f, "param '{}' does not appear in the path", param)
            }
            Rule::BodyNotAllowed { method } => write!(f, "{} cannot carry a request body", method),
        }
    }
}

struct Collector {
    violations: Vec<IntegrityViolation>,
}

impl Collector {
    fn push(&mut self, subject: impl Into<String>, rule: Rule) {
        self.violations.push(IntegrityViolation {
            subject: subject.into(),
            rule,
        });
    }

    /// Report invalid and repeated names, in declaration order
    fn names<'a>(&mut self, prefix: &str, names: impl Iterator<Item = &'a str>) {
        let mut seen = HashSet::new();
        for name in names {
            let subject = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{}.{}", prefix, name)
            };
            if !is_identifier(name) {
                self.push(subject.clone(), Rule::InvalidName);
            }
            if !seen.insert(name) {
                self.push(subject, Rule::DuplicateName);
            }
        }
    }
}

/// Check a parsed module, returning violations in declaration order
pub fn validate(models: &ModelsFile, api: &ApiFile) -> Vec<IntegrityViolation> {
    let mut c = Collector {
        violations: Vec::new(),
    };

    c.names("", models.entities.iter().map(|e| e.name.as_str()));
    let entities: HashSet<&str> = models.entities.iter().map(|e| e.name.as_str()).collect();
    // every declaration of types.ts: entities, enum aliases, request shapes
    let mut type_names: HashSet<String> = entities.iter().map(|e| e.to_string()).collect();

    for entity in &models.entities {
        if is_reserved_type_name(&entity.name) {
            c.push(entity.name.clone(), Rule::ReservedName);
        }

        // fields and relations share one namespace: both become properties
        c.names(
            &entity.name,
            entity
                .fields
                .iter()
                .map(|f| f.name.as_str())
                .chain(entity.relations.iter().map(|r| r.name.as_str())),
        );

        for field in &entity.fields {
            let subject = format!("{}.{}", entity.name, field.name);
            let has_values = field.values.as_ref().is_some_and(|v| !v.is_empty());
            if field.ty == "enum" && !has_values {
                c.push(subject, Rule::EnumWithoutValues);
            } else if field.ty != "enum" && field.values.is_some() {
                c.push(subject, Rule::ValuesWithoutEnum);
            }
            if field.ty == "enum" {
                let alias = entity.enum_alias_name(field);
                if !type_names.insert(alias.clone()) {
                    c.push(alias, Rule::DuplicateName);
                }
            }
        }

        for relation in &entity.relations {
            if !entities.contains(relation.target.as_str()) {
                c.push(
                    format!("{}.{}", entity.name, relation.name),
                    Rule::UndefinedRelationTarget {
                        target: relation.target.clone(),
                    },
                );
            }
        }
    }

    c.names("", api.operations.iter().map(|o| o.name.as_str()));
    let mut operations = HashSet::new();

    for op in &api.operations {
        let first = operations.insert(op.name.as_str());
        if CLIENT_MEMBERS.contains(&op.name.as_str()) {
            c.push(op.name.clone(), Rule::ReservedName);
        }
        c.names(&op.name, op.params.iter().map(|p| p.name.as_str()));

        let in_path = op.path_params();
        for param in &op.params {
            if !in_path.contains(&param.name) {
                c.push(
                    op.name.clone(),
                    Rule::ParamNotInPath {
                        param: param.name.clone(),
                    },
                );
            }
        }
        // placeholders and `body` are parameters of one generated method
        let mut locals = HashSet::new();
        for placeholder in &in_path {
            let subject = format!("{}.{}", op.name, placeholder);
            if !is_identifier(placeholder) {
                c.push(subject.clone(), Rule::InvalidName);
            } else if is_reserved_word(placeholder)
                || METHOD_LOCALS.contains(&placeholder.as_str())
                || (placeholder == "body" && op.request.is_some())
            {
                c.push(subject.clone(), Rule::ReservedName);
            }
            if !locals.insert(placeholder.as_str()) {
                c.push(subject, Rule::DuplicateName);
            }
        }

        if let Some(request) = &op.request {
            let request_type = op.request_type_name();
            if first && !type_names.insert(request_type.clone()) {
                c.push(request_type, Rule::DuplicateName);
            }
            if !op.method.allows_body() {
                c.push(
                    op.name.clone(),
                    Rule::BodyNotAllowed {
                        method: op.method.to_string(),
                    },
                );
            }
            match models.entities.iter().find(|e| e.name == request.entity) {
                None => c.push(
                    format!("{}.request", op.name),
                    Rule::UndefinedEntity {
                        entity: request.entity.clone(),
                    },
                ),
                Some(entity) => {
                    for field in request.fields.iter().flatten() {
                        if entity.field(field).is_none() {
                            c.push(
                                format!("{}.request", op.name),
                                Rule::UnknownRequestField {
                                    entity: entity.name.clone(),
                                    field: field.clone(),
                                },
                            );
                        }
                    }
                }
            }
        }

        if let Some(entity) = op.response.as_ref().and_then(|r| r.entity.as_ref()) {
            if !entities.contains(entity.as_str()) {
                c.push(
                    format!("{}.response", op.name),
                    Rule::UndefinedEntity {
                        entity: entity.clone(),
                    },
                );
            }
        }
    }

    c.violations
}
