//! Type-signature primitives
//!
//! A bare string in config is a named type (`string`, `User`, `Promise<void>`).
//! Structured forms are tagged with `kind`.

use super::{escape_string, Render};
use serde::{Deserialize, Serialize};

/// TypeScript type reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    /// `T[]`
    ArrayOf { of: Box<TypeRef> },
    /// `A | B | C`
    Union { of: Vec<TypeRef> },
    /// `Name<A, B>`
    Generic { name: String, args: Vec<TypeRef> },
    /// `"value"`
    LiteralType { value: String },
    /// Named or primitive type, rendered verbatim
    #[serde(untagged)]
    Named(String),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn array_of(inner: TypeRef) -> Self {
        TypeRef::ArrayOf {
            of: Box::new(inner),
        }
    }

    pub fn union(members: Vec<TypeRef>) -> Self {
        TypeRef::Union { of: members }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Generic {
            name: name.into(),
            args,
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        TypeRef::LiteralType {
            value: value.into(),
        }
    }

    /// `T | null`
    pub fn nullable(inner: TypeRef) -> Self {
        match inner {
            TypeRef::Union { mut of } => {
                if !of.contains(&TypeRef::named("null")) {
                    of.push(TypeRef::named("null"));
                }
                TypeRef::Union { of }
            }
            other => TypeRef::union(vec![other, TypeRef::named("null")]),
        }
    }

    /// `Promise<T>`
    pub fn promise(inner: TypeRef) -> Self {
        TypeRef::generic("Promise", vec![inner])
    }
}

impl Render for TypeRef {
    fn render(&self) -> String {
        match self {
            TypeRef::Named(name) => name.clone(),
            TypeRef::ArrayOf { of } => match of.as_ref() {
                TypeRef::Union { .. } => format!("({})[]", of.render()),
                _ => format!("{}[]", of.render()),
            },
            TypeRef::Union { of } => of.iter().map(Render::render).collect::<Vec<_>>().join(" | "),
            TypeRef::Generic { name, args } => {
                let args = args.iter().map(Render::render).collect::<Vec<_>>();
                format!("{}<{}>", name, args.join(", "))
            }
            TypeRef::LiteralType { value } => escape_string(value),
        }
    }
}
