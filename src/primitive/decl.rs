//! Declaration primitives: imports, type declarations, functions, classes

use super::expr::{Expr, Param};
use super::stmt::Stmt;
use super::types::TypeRef;
use super::Render;
use crate::compose::{block, compose, compose_members};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decl {
    /// `import { a, b } from "x";`
    Import {
        #[serde(default)]
        names: Vec<String>,
        from: String,
        #[serde(default, skip_serializing_if = "is_false")]
        type_only: bool,
    },
    /// `export interface Name { ... }`
    Interface {
        name: String,
        #[serde(default = "default_true")]
        export: bool,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        extends: Vec<String>,
        #[serde(default)]
        properties: Vec<Property>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
    },
    /// `export type Name = T;`
    TypeAlias {
        name: String,
        #[serde(default = "default_true")]
        export: bool,
        #[serde(rename = "type")]
        ty: TypeRef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
    },
    /// `export const name: T = init;`
    Const {
        name: String,
        #[serde(default = "default_true")]
        export: bool,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        ty: Option<TypeRef>,
        init: Expr,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
    },
    /// `export async function name(params): T { ... }`
    Function {
        name: String,
        #[serde(default = "default_true")]
        export: bool,
        #[serde(default, skip_serializing_if = "is_false")]
        is_async: bool,
        #[serde(default)]
        params: Vec<Param>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        returns: Option<TypeRef>,
        #[serde(default)]
        body: Vec<Stmt>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
    },
    /// `export class Name extends Base { ... }`
    Class {
        name: String,
        #[serde(default = "default_true")]
        export: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extends: Option<String>,
        #[serde(default)]
        members: Vec<ClassMember>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
    },
}

/// Interface property signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub readonly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// Class body member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassMember {
    /// `private readonly name: T = init;`
    Field {
        name: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        ty: Option<TypeRef>,
        #[serde(default)]
        visibility: Visibility,
        #[serde(default, skip_serializing_if = "is_false")]
        readonly: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        init: Option<Expr>,
    },
    /// `constructor(params) { ... }`
    Constructor {
        #[serde(default)]
        params: Vec<Param>,
        #[serde(default)]
        body: Vec<Stmt>,
    },
    /// `async name(params): T { ... }`
    Method {
        name: String,
        #[serde(default)]
        visibility: Visibility,
        #[serde(default, skip_serializing_if = "is_false")]
        is_async: bool,
        #[serde(default)]
        params: Vec<Param>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        returns: Option<TypeRef>,
        #[serde(default)]
        body: Vec<Stmt>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
    },
}

/// Member visibility; `public` is implicit and never rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
}

impl Visibility {
    fn prefix(&self) -> &'static str {
        match self {
            Visibility::Public => "",
            Visibility::Private => "private ",
            Visibility::Protected => "protected ",
        }
    }
}

/// `/** text */`, or a multi-line block for multi-line text
fn render_doc(doc: &Option<String>) -> String {
    let Some(text) = doc else {
        return String::new();
    };
    let lines: Vec<&str> = text.trim().lines().collect();
    match lines.as_slice() {
        [] => String::new(),
        [one] => format!("/** {} */\n", one.trim()),
        many => {
            let mut out = String::from("/**\n");
            for line in many {
                let line = line.trim();
                if line.is_empty() {
                    out.push_str(" *\n");
                } else {
                    out.push_str(&format!(" * {}\n", line));
                }
            }
            out.push_str(" */\n");
            out
        }
    }
}

fn export_prefix(export: bool) -> &'static str {
    if export {
        "export "
    } else {
        ""
    }
}

fn render_params(params: &[Param]) -> String {
    params
        .iter()
        .map(Render::render)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_returns(returns: &Option<TypeRef>) -> String {
    returns
        .as_ref()
        .map(|t| format!(": {}", t.render()))
        .unwrap_or_default()
}

impl Render for Decl {
    fn render(&self) -> String {
        match self {
            Decl::Import {
                names,
                from,
                type_only,
            } => {
                if names.is_empty() {
                    return format!("import \"{}\";", from);
                }
                let keyword = if *type_only { "import type" } else { "import" };
                format!("{} {{ {} }} from \"{}\";", keyword, names.join(", "), from)
            }
            Decl::Interface {
                name,
                export,
                extends,
                properties,
                doc,
            } => {
                let extends = if extends.is_empty() {
                    String::new()
                } else {
                    format!(" extends {}", extends.join(", "))
                };
                let body = if properties.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{\n{}\n}}", compose(properties, 1))
                };
                format!(
                    "{}{}interface {}{} {}",
                    render_doc(doc),
                    export_prefix(*export),
                    name,
                    extends,
                    body
                )
            }
            Decl::TypeAlias {
                name,
                export,
                ty,
                doc,
            } => format!(
                "{}{}type {} = {};",
                render_doc(doc),
                export_prefix(*export),
                name,
                ty.render()
            ),
            Decl::Const {
                name,
                export,
                ty,
                init,
                doc,
            } => format!(
                "{}{}const {}{} = {};",
                render_doc(doc),
                export_prefix(*export),
                name,
                render_returns(ty),
                init.render()
            ),
            Decl::Function {
                name,
                export,
                is_async,
                params,
                returns,
                body,
                doc,
            } => format!(
                "{}{}{}function {}({}){} {}",
                render_doc(doc),
                export_prefix(*export),
                if *is_async { "async " } else { "" },
                name,
                render_params(params),
                render_returns(returns),
                block(body)
            ),
            Decl::Class {
                name,
                export,
                extends,
                members,
                doc,
            } => {
                let extends = extends
                    .as_ref()
                    .map(|base| format!(" extends {}", base))
                    .unwrap_or_default();
                let body = if members.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{\n{}\n}}", compose_members(members, 1))
                };
                format!(
                    "{}{}class {}{} {}",
                    render_doc(doc),
                    export_prefix(*export),
                    name,
                    extends,
                    body
                )
            }
        }
    }
}

impl Render for Property {
    fn render(&self) -> String {
        format!(
            "{}{}{}{}: {};",
            render_doc(&self.doc),
            if self.readonly { "readonly " } else { "" },
            self.name,
            if self.optional { "?" } else { "" },
            self.ty.render()
        )
    }
}

impl Render for ClassMember {
    fn render(&self) -> String {
        match self {
            ClassMember::Field {
                name,
                ty,
                visibility,
                readonly,
                init,
            } => {
                let mut out = format!(
                    "{}{}{}{}",
                    visibility.prefix(),
                    if *readonly { "readonly " } else { "" },
                    name,
                    render_returns(ty)
                );
                if let Some(init) = init {
                    out.push_str(" = ");
                    out.push_str(&init.render());
                }
                out.push(';');
                out
            }
            ClassMember::Constructor { params, body } => {
                format!("constructor({}) {}", render_params(params), block(body))
            }
            ClassMember::Method {
                name,
                visibility,
                is_async,
                params,
                returns,
                body,
                doc,
            } => format!(
                "{}{}{}{}({}){} {}",
                render_doc(doc),
                visibility.prefix(),
                if *is_async { "async " } else { "" },
                name,
                render_params(params),
                render_returns(returns),
                block(body)
            ),
        }
    }
}

impl Property {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            readonly: false,
            doc: None,
        }
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_doc(mut self, doc: Option<String>) -> Self {
        self.doc = doc;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_import() {
        let import = Decl::Import {
            names: vec!["User".into(), "Team".into()],
            from: "./types".into(),
            type_only: true,
        };
        assert_eq!(import.render(), r#"import type { User, Team } from "./types";"#);
    }

    #[test]
    fn test_interface() {
        let decl = Decl::Interface {
            name: "User".into(),
            export: true,
            extends: vec![],
            properties: vec![
                Property::new("id", TypeRef::named("string")),
                Property::new("email", TypeRef::named("string"))
                    .optional(true)
                    .with_doc(Some("Login address".into())),
            ],
            doc: None,
        };
        assert_eq!(
            decl.render(),
            "export interface User {\n  id: string;\n  /** Login address */\n  email?: string;\n}"
        );
    }

    #[test]
    fn test_empty_interface_and_alias() {
        let decl = Decl::Interface {
            name: "Empty".into(),
            export: false,
            extends: vec!["Base".into()],
            properties: vec![],
            doc: None,
        };
        assert_eq!(decl.render(), "interface Empty extends Base {}");

        let alias = Decl::TypeAlias {
            name: "UserRole".into(),
            export: true,
            ty: TypeRef::union(vec![TypeRef::literal("admin"), TypeRef::literal("member")]),
            doc: None,
        };
        assert_eq!(alias.render(), r#"export type UserRole = "admin" | "member";"#);
    }

    #[test]
    fn test_function() {
        let decl = Decl::Function {
            name: "ping".into(),
            export: true,
            is_async: true,
            params: vec![Param::new("url", TypeRef::named("string"))],
            returns: Some(TypeRef::promise(TypeRef::named("void"))),
            body: vec![Stmt::expression(Expr::raw("await fetch(url)"))],
            doc: None,
        };
        assert_eq!(
            decl.render(),
            "export async function ping(url: string): Promise<void> {\n  await fetch(url);\n}"
        );
    }

    #[test]
    fn test_class_members_separated_by_blank_line() {
        let decl = Decl::Class {
            name: "Client".into(),
            export: true,
            extends: None,
            members: vec![
                ClassMember::Field {
                    name: "baseUrl".into(),
                    ty: Some(TypeRef::named("string")),
                    visibility: Visibility::Private,
                    readonly: true,
                    init: None,
                },
                ClassMember::Constructor {
                    params: vec![Param::new("baseUrl", TypeRef::named("string"))],
                    body: vec![Stmt::expression(Expr::raw("this.baseUrl = baseUrl"))],
                },
                ClassMember::Method {
                    name: "health".into(),
                    visibility: Visibility::Public,
                    is_async: false,
                    params: vec![],
                    returns: Some(TypeRef::named("string")),
                    body: vec![Stmt::return_value(Expr::string("ok"))],
                    doc: None,
                },
            ],
            doc: Some("HTTP client".into()),
        };
        let expected = "/** HTTP client */\n\
export class Client {\n\
\x20 private readonly baseUrl: string;\n\
\n\
\x20 constructor(baseUrl: string) {\n\
\x20   this.baseUrl = baseUrl;\n\
\x20 }\n\
\n\
\x20 health(): string {\n\
\x20   return \"ok\";\n\
\x20 }\n\
}";
        assert_eq!(decl.render(), expected);
    }

    #[test]
    fn test_multiline_doc() {
        let decl = Decl::Const {
            name: "VERSION".into(),
            export: true,
            ty: None,
            init: Expr::string("1"),
            doc: Some("First\n\nSecond".into()),
        };
        assert_eq!(
            decl.render(),
            "/**\n * First\n *\n * Second\n */\nexport const VERSION = \"1\";"
        );
    }
}
