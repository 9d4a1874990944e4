//! Primitive hierarchy — the intermediate representation of generated code
//!
//! Every primitive is a closed, tagged variant with a single capability:
//! [`Render::render`], a pure and deterministic function of its config.
//! Composition is associative: a block renders as the concatenation of its
//! statements' renders with separators, regardless of statement kind.
//!
//! Configs are YAML/JSON objects tagged by `kind`. The tag table below is
//! total: every tag maps to exactly one family, and an unknown tag anywhere in
//! a config tree is rejected before any deserialization happens.
//!
//! ```rust
//! use sdkforge::primitive::{Primitive, Render};
//!
//! let stmt = Primitive::from_yaml("kind: expression\nexpression: foo()").unwrap();
//! assert_eq!(stmt.render(), "foo();");
//! ```

pub mod decl;
pub mod expr;
pub mod stmt;
pub mod types;

pub use decl::{ClassMember, Decl, Property, Visibility};
pub use expr::{BinaryOp, Expr, Literal, ObjectProp, Param, TemplatePart, UnaryOp};
pub use stmt::{Binding, Stmt};
pub use types::TypeRef;

use crate::error::{Error, Result};
use serde_json::Value;

/// The single capability shared by every primitive
pub trait Render {
    /// Render to TypeScript source text at indentation level zero
    fn render(&self) -> String;
}

impl<T: Render + ?Sized> Render for &T {
    fn render(&self) -> String {
        (**self).render()
    }
}

impl<T: Render + ?Sized> Render for Box<T> {
    fn render(&self) -> String {
        (**self).render()
    }
}

/// Which primitive family a tag belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveFamily {
    Expression,
    Statement,
    Declaration,
    ClassMember,
    Type,
}

/// Tag table: `kind` value → family
const KINDS: &[(&str, PrimitiveFamily)] = &[
    ("ident", PrimitiveFamily::Expression),
    ("literal", PrimitiveFamily::Expression),
    ("call", PrimitiveFamily::Expression),
    ("new", PrimitiveFamily::Expression),
    ("member", PrimitiveFamily::Expression),
    ("index", PrimitiveFamily::Expression),
    ("binary", PrimitiveFamily::Expression),
    ("unary", PrimitiveFamily::Expression),
    ("await", PrimitiveFamily::Expression),
    ("object", PrimitiveFamily::Expression),
    ("array", PrimitiveFamily::Expression),
    ("template", PrimitiveFamily::Expression),
    ("arrow", PrimitiveFamily::Expression),
    ("cast", PrimitiveFamily::Expression),
    ("conditional", PrimitiveFamily::Expression),
    ("expression", PrimitiveFamily::Statement),
    ("throw", PrimitiveFamily::Statement),
    ("return", PrimitiveFamily::Statement),
    ("declare", PrimitiveFamily::Statement),
    ("if", PrimitiveFamily::Statement),
    ("for_of", PrimitiveFamily::Statement),
    ("comment", PrimitiveFamily::Statement),
    ("import", PrimitiveFamily::Declaration),
    ("interface", PrimitiveFamily::Declaration),
    ("type_alias", PrimitiveFamily::Declaration),
    ("const", PrimitiveFamily::Declaration),
    ("function", PrimitiveFamily::Declaration),
    ("class", PrimitiveFamily::Declaration),
    ("field", PrimitiveFamily::ClassMember),
    ("constructor", PrimitiveFamily::ClassMember),
    ("method", PrimitiveFamily::ClassMember),
    ("array_of", PrimitiveFamily::Type),
    ("union", PrimitiveFamily::Type),
    ("generic", PrimitiveFamily::Type),
    ("literal_type", PrimitiveFamily::Type),
];

/// Look up the family for a `kind` tag
pub fn family_of(kind: &str) -> Option<PrimitiveFamily> {
    KINDS
        .iter()
        .find(|(tag, _)| *tag == kind)
        .map(|(_, family)| *family)
}

/// All known `kind` tags, in table order
pub fn known_kinds() -> impl Iterator<Item = &'static str> {
    KINDS.iter().map(|(tag, _)| *tag)
}

/// Any primitive, dispatched from a tagged config
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Expr(Expr),
    Stmt(Stmt),
    Decl(Decl),
    Member(ClassMember),
    Type(TypeRef),
}

impl Primitive {
    /// Build from a YAML config
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: Value = serde_norway::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Build from a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build from an already-parsed config tree
    ///
    /// Fails closed: every `kind` tag in the tree is checked against the tag
    /// table first, then the tree is deserialized into its family.
    pub fn from_value(value: Value) -> Result<Self> {
        check_kinds(&value, "$")?;

        let family = match &value {
            Value::String(_) => PrimitiveFamily::Expression,
            Value::Object(map) => match map.get("kind") {
                Some(Value::String(kind)) => family_of(kind).ok_or_else(|| {
                    Error::UnknownPrimitive {
                        kind: kind.clone(),
                        path: "$".into(),
                    }
                })?,
                _ => {
                    return Err(Error::PrimitiveConfig(
                        "top-level config needs a 'kind' tag".into(),
                    ))
                }
            },
            other => {
                return Err(Error::PrimitiveConfig(format!(
                    "expected a tagged object or an expression string, got {}",
                    other
                )))
            }
        };

        let config_err = |e: serde_json::Error| Error::PrimitiveConfig(e.to_string());
        Ok(match family {
            PrimitiveFamily::Expression => {
                Primitive::Expr(serde_json::from_value(value).map_err(config_err)?)
            }
            PrimitiveFamily::Statement => {
                Primitive::Stmt(serde_json::from_value(value).map_err(config_err)?)
            }
            PrimitiveFamily::Declaration => {
                Primitive::Decl(serde_json::from_value(value).map_err(config_err)?)
            }
            PrimitiveFamily::ClassMember => {
                Primitive::Member(serde_json::from_value(value).map_err(config_err)?)
            }
            PrimitiveFamily::Type => {
                Primitive::Type(serde_json::from_value(value).map_err(config_err)?)
            }
        })
    }

    pub fn family(&self) -> PrimitiveFamily {
        match self {
            Primitive::Expr(_) => PrimitiveFamily::Expression,
            Primitive::Stmt(_) => PrimitiveFamily::Statement,
            Primitive::Decl(_) => PrimitiveFamily::Declaration,
            Primitive::Member(_) => PrimitiveFamily::ClassMember,
            Primitive::Type(_) => PrimitiveFamily::Type,
        }
    }
}

impl Render for Primitive {
    fn render(&self) -> String {
        match self {
            Primitive::Expr(expr) => expr.render(),
            Primitive::Stmt(stmt) => stmt.render(),
            Primitive::Decl(decl) => decl.render(),
            Primitive::Member(member) => member.render(),
            Primitive::Type(ty) => ty.render(),
        }
    }
}

/// Walk a config tree and reject any `kind` tag missing from the table
fn check_kinds(value: &Value, path: &str) -> Result<()> {
    match value {
        Value::Object(map) => {
            match map.get("kind") {
                Some(Value::String(kind)) if family_of(kind).is_none() => {
                    return Err(Error::UnknownPrimitive {
                        kind: kind.clone(),
                        path: path.to_string(),
                    });
                }
                Some(Value::String(_)) | None => {}
                Some(other) => {
                    return Err(Error::PrimitiveConfig(format!(
                        "'kind' at {} must be a string, got {}",
                        path, other
                    )));
                }
            }
            for (key, child) in map {
                check_kinds(child, &format!("{}.{}", path, key))?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                check_kinds(child, &format!("{}[{}]", path, i))?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Double-quoted TypeScript string literal
pub(crate) fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_expression_statement_from_config() {
        let p = Primitive::from_yaml("kind: expression\nexpression: foo()").unwrap();
        assert_eq!(p.family(), PrimitiveFamily::Statement);
        assert_eq!(p.render(), "foo();");
    }

    #[test]
    fn test_throw_statement_from_config() {
        let p = Primitive::from_json(r#"{"kind": "throw", "expression": "new Error('x')"}"#)
            .unwrap();
        assert_eq!(p.render(), "throw new Error('x');");
    }

    #[test]
    fn test_bare_string_is_raw_expression() {
        let p = Primitive::from_yaml("\"a + b\"").unwrap();
        assert_eq!(p, Primitive::Expr(Expr::raw("a + b")));
    }

    #[test]
    fn test_unknown_top_level_kind_fails_closed() {
        let err = Primitive::from_yaml("kind: goto\nlabel: start").unwrap_err();
        match err {
            Error::UnknownPrimitive { kind, path } => {
                assert_eq!(kind, "goto");
                assert_eq!(path, "$");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_nested_kind_reports_path() {
        let yaml = r#"
kind: if
test: ready
then:
  - kind: expression
    expression: start()
  - kind: yield
    expression: x
"#;
        let err = Primitive::from_yaml(yaml).unwrap_err();
        match err {
            Error::UnknownPrimitive { kind, path } => {
                assert_eq!(kind, "yield");
                assert_eq!(path, "$.then[1]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_kind_is_rejected() {
        let err = Primitive::from_yaml("expression: foo()").unwrap_err();
        assert!(matches!(err, Error::PrimitiveConfig(_)));
    }

    #[test]
    fn test_non_string_kind_is_rejected() {
        let err = Primitive::from_yaml("kind: 3").unwrap_err();
        assert!(matches!(err, Error::PrimitiveConfig(_)));
    }

    #[rstest]
    #[case("kind: return", "return;")]
    #[case("kind: return\nvalue: x", "return x;")]
    #[case("kind: declare\nname: n\ninit: \"1\"", "const n = 1;")]
    #[case("kind: comment\ntext: hi", "// hi")]
    #[case("kind: type_alias\nname: Id\ntype: string", "export type Id = string;")]
    #[case("kind: array_of\nof: User", "User[]")]
    #[case("kind: field\nname: count\ntype: number\nvisibility: private", "private count: number;")]
    #[case(
        "kind: import\nnames: [User]\nfrom: ./types\ntype_only: true",
        "import type { User } from \"./types\";"
    )]
    fn test_render_from_config(#[case] yaml: &str, #[case] expected: &str) {
        assert_eq!(Primitive::from_yaml(yaml).unwrap().render(), expected);
    }

    #[test]
    fn test_tag_table_is_unique() {
        let mut kinds: Vec<_> = known_kinds().collect();
        let total = kinds.len();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), total);
    }

    #[test]
    fn test_serialized_tags_are_in_table() {
        let samples = vec![
            serde_json::to_value(Stmt::expression(Expr::ident("x"))).unwrap(),
            serde_json::to_value(Stmt::comment("c")).unwrap(),
            serde_json::to_value(Expr::not(Expr::ident("x"))).unwrap(),
            serde_json::to_value(TypeRef::promise(TypeRef::named("void"))).unwrap(),
            serde_json::to_value(ClassMember::Constructor {
                params: vec![],
                body: vec![],
            })
            .unwrap(),
        ];
        for sample in samples {
            check_kinds(&sample, "$").unwrap();
            let round = Primitive::from_value(sample.clone()).unwrap();
            let reserialized = match &round {
                Primitive::Expr(e) => serde_json::to_value(e),
                Primitive::Stmt(s) => serde_json::to_value(s),
                Primitive::Decl(d) => serde_json::to_value(d),
                Primitive::Member(m) => serde_json::to_value(m),
                Primitive::Type(t) => serde_json::to_value(t),
            };
            assert_eq!(reserialized.unwrap(), sample);
        }
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("a\"b\\c\n"), r#""a\"b\\c\n""#);
    }
}
