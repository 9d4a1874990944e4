//! Type registry — schema field types to TypeScript types
//!
//! Built once per run from the built-in table plus any project mappings and
//! passed to the emitter by reference. There is no process-wide instance.

use crate::primitive::TypeRef;
use indexmap::IndexMap;

const BUILTIN: &[(&str, &str)] = &[
    ("string", "string"),
    ("text", "string"),
    ("uuid", "string"),
    ("email", "string"),
    ("url", "string"),
    ("integer", "number"),
    ("int", "number"),
    ("float", "number"),
    ("number", "number"),
    ("decimal", "number"),
    ("boolean", "boolean"),
    ("bool", "boolean"),
    ("date", "string"),
    ("datetime", "string"),
    ("timestamp", "string"),
    ("json", "unknown"),
];

/// Schema type name → TypeScript type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRegistry {
    mappings: IndexMap<String, TypeRef>,
}

impl TypeRegistry {
    /// Built-in mappings only
    pub fn standard() -> Self {
        Self {
            mappings: BUILTIN
                .iter()
                .map(|(name, ts)| (name.to_string(), TypeRef::named(*ts)))
                .collect(),
        }
    }

    /// Built-ins plus project mappings; project entries win
    pub fn with(extra: &IndexMap<String, String>) -> Self {
        let mut registry = Self::standard();
        for (name, ts) in extra {
            registry.register(name, TypeRef::named(ts.as_str()));
        }
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, ty: TypeRef) {
        self.mappings.insert(name.into(), ty);
    }

    /// Look up a scalar type; `enum` is handled by the emitter
    pub fn resolve(&self, name: &str) -> Option<&TypeRef> {
        self.mappings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.mappings.contains_key(name)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
