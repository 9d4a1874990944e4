//! Structural view of a TypeScript module
//!
//! The audit engine compares modules through this view rather than as text,
//! so formatting, comments and member spacing never count as drift. Both the
//! expected (emitted) text and the on-disk file go through the same
//! extractor, which keeps the normalization symmetric.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declarations found at the top level of a module, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleView {
    pub declarations: Vec<DeclView>,

    /// Syntax errors detected by tree-sitter
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub syntax_errors: Vec<SyntaxError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Alias,
    Interface,
    Class,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKind::Alias => f.write_str("type"),
            DeclKind::Interface => f.write_str("interface"),
            DeclKind::Class => f.write_str("class"),
        }
    }
}

/// One named type-level declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclView {
    pub name: String,
    pub kind: DeclKind,
    /// Right-hand side of a type alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyView {
    pub name: String,
    pub ty: Option<String>,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodView {
    pub name: String,
    pub params: Vec<ParamView>,
    pub returns: Option<String>,
    /// HTTP method and URL template of the `fetch` call in the body,
    /// e.g. ``GET ${this.baseUrl}/users/${id}``
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamView {
    pub name: String,
    pub ty: Option<String>,
    pub optional: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
}

impl ModuleView {
    pub fn declaration(&self, name: &str) -> Option<&DeclView> {
        self.declarations.iter().find(|d| d.name == name)
    }
}

impl DeclView {
    pub fn property(&self, name: &str) -> Option<&PropertyView> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodView> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Short description for reports: `interface User`, `type Role = "a" | "b"`
    pub fn describe(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} {} = {}", self.kind, self.name, alias),
            None => format!("{} {}", self.kind, self.name),
        }
    }
}

impl fmt::Display for PropertyView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, if self.optional { "?" } else { "" })?;
        if let Some(ty) = &self.ty {
            write!(f, ": {}", ty)?;
        }
        Ok(())
    }
}

impl fmt::Display for ParamView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, if self.optional { "?" } else { "" })?;
        if let Some(ty) = &self.ty {
            write!(f, ": {}", ty)?;
        }
        Ok(())
    }
}

impl fmt::Display for MethodView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        write!(f, "{}({})", self.name, params.join(", "))?;
        if let Some(returns) = &self.returns {
            write!(f, ": {}", returns)?;
        }
        Ok(())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | '"' | '\'' | '`')
}

/// Canonical spelling of a type expression
///
/// Whitespace is dropped except between two words, union and intersection
/// operators get one space on each side, separators get one space after,
/// and a leading `|` is removed. String literal contents are kept verbatim.
///
/// ```
/// use sdkforge::view::canonical_type;
/// assert_eq!(canonical_type("string|null"), "string | null");
/// assert_eq!(canonical_type("Promise< User[] >"), "Promise<User[]>");
/// assert_eq!(canonical_type("\n  | \"a b\"\n  | \"c\""), "\"a b\" | \"c\"");
/// ```
pub fn canonical_type(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.trim().chars();
    let mut gap = false;

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => gap = true,
            '"' | '\'' | '`' => {
                if gap && out.ends_with(is_word_char) {
                    out.push(' ');
                }
                out.push(c);
                while let Some(n) = chars.next() {
                    out.push(n);
                    if n == '\\' {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    } else if n == c {
                        break;
                    }
                }
                gap = false;
            }
            '|' | '&' => {
                let keep = out.trim_end().len();
                out.truncate(keep);
                if !out.is_empty() {
                    out.push(' ');
                    out.push(c);
                    out.push(' ');
                }
                gap = false;
            }
            ',' | ':' | ';' => {
                let keep = out.trim_end().len();
                out.truncate(keep);
                out.push(c);
                out.push(' ');
                gap = false;
            }
            c => {
                if out.ends_with(' ') && !is_word_char(c) && !matches!(c, '(' | '{' | '[') {
                    // no space before closing punctuation
                    let keep = out.trim_end().len();
                    out.truncate(keep);
                } else if gap && out.ends_with(is_word_char) && is_word_char(c) {
                    out.push(' ');
                }
                out.push(c);
                gap = false;
            }
        }
    }
    out.trim_end().to_string()
}
