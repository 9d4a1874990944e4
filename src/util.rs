//! Shared utility functions
//!
//! Naming conversions, identifier checks and content hashing used by the
//! schema loader, the emitter and the audit engine.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"));

/// Convert snake_case or kebab-case to PascalCase
///
/// # Examples
/// ```
/// use sdkforge::util::to_pascal_case;
/// assert_eq!(to_pascal_case("users-api"), "UsersApi");
/// assert_eq!(to_pascal_case("get_user"), "GetUser");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split(['_', '-'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// True if `s` is a valid TypeScript identifier (ASCII subset)
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

/// Words that cannot name a binding in strict-mode TypeScript
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Predefined type names, not available to interfaces or type aliases
const BUILTIN_TYPES: &[&str] = &[
    "any", "bigint", "boolean", "never", "number", "object", "string", "symbol", "undefined",
    "unknown",
];

pub fn is_reserved_word(s: &str) -> bool {
    RESERVED_WORDS.contains(&s)
}

/// True if `s` cannot name a declared type
pub fn is_reserved_type_name(s: &str) -> bool {
    is_reserved_word(s) || BUILTIN_TYPES.contains(&s)
}

/// Content hash used to detect drift without re-parsing
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}
