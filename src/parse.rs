//! TypeScript parsing via tree-sitter
//!
//! Extracts the [`ModuleView`] of a source file: type aliases, interfaces
//! with their property and method signatures, and classes with their method
//! signatures. Of a method body only the `fetch` call is kept, as the
//! request method and URL template. Constructors and class fields are not
//! part of the view.

use crate::error::{Error, Result};
use crate::view::{
    canonical_type, DeclKind, DeclView, MethodView, ModuleView, ParamView, PropertyView,
    SyntaxError,
};
use tree_sitter::{Node, Parser};

/// Parse TypeScript source into its structural view
///
/// Syntax errors do not fail the parse; tree-sitter recovers and the error
/// positions are recorded in [`ModuleView::syntax_errors`].
pub fn parse_typescript(source: &str) -> Result<ModuleView> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
        .map_err(|e| Error::CodeParse(format!("Failed to set language: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::CodeParse("Failed to parse source".into()))?;

    let root = tree.root_node();
    let mut view = ModuleView::default();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        let node = if child.kind() == "export_statement" {
            match child.child_by_field_name("declaration") {
                Some(decl) => decl,
                None => continue,
            }
        } else {
            child
        };
        if let Some(decl) = parse_declaration(node, source) {
            view.declarations.push(decl);
        }
    }

    if root.has_error() {
        collect_errors(root, &mut view.syntax_errors);
    }

    Ok(view)
}

fn text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

fn field_text(node: Node, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|n| text(n, source).to_string())
}

/// The type inside a `type_annotation` node (`: T` → `T`)
fn annotation_type(node: Option<Node>, source: &str) -> Option<String> {
    let node = node?;
    let raw = if node.kind() == "type_annotation" {
        text(node, source).trim_start().trim_start_matches(':')
    } else {
        text(node, source)
    };
    Some(canonical_type(raw))
}

fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == token);
    found
}

fn parse_declaration(node: Node, source: &str) -> Option<DeclView> {
    match node.kind() {
        "type_alias_declaration" => Some(DeclView {
            name: field_text(node, "name", source)?,
            kind: DeclKind::Alias,
            alias: node
                .child_by_field_name("value")
                .map(|v| canonical_type(text(v, source))),
            properties: vec![],
            methods: vec![],
        }),
        "interface_declaration" => {
            let mut decl = DeclView {
                name: field_text(node, "name", source)?,
                kind: DeclKind::Interface,
                alias: None,
                properties: vec![],
                methods: vec![],
            };
            if let Some(body) = node.child_by_field_name("body") {
                let mut cursor = body.walk();
                for member in body.named_children(&mut cursor) {
                    match member.kind() {
                        "property_signature" => {
                            if let Some(prop) = parse_property(member, source) {
                                decl.properties.push(prop);
                            }
                        }
                        "method_signature" => {
                            if let Some(method) = parse_method(member, source) {
                                decl.methods.push(method);
                            }
                        }
                        _ => {}
                    }
                }
            }
            Some(decl)
        }
        "class_declaration" | "abstract_class_declaration" => {
            let mut decl = DeclView {
                name: field_text(node, "name", source)?,
                kind: DeclKind::Class,
                alias: None,
                properties: vec![],
                methods: vec![],
            };
            if let Some(body) = node.child_by_field_name("body") {
                let mut cursor = body.walk();
                for member in body.named_children(&mut cursor) {
                    if member.kind() != "method_definition" {
                        continue;
                    }
                    if let Some(method) = parse_method(member, source) {
                        if method.name != "constructor" {
                            decl.methods.push(method);
                        }
                    }
                }
            }
            Some(decl)
        }
        _ => None,
    }
}

fn parse_property(node: Node, source: &str) -> Option<PropertyView> {
    Some(PropertyView {
        name: field_text(node, "name", source)?,
        ty: annotation_type(node.child_by_field_name("type"), source),
        optional: has_token(node, "?"),
    })
}

fn parse_method(node: Node, source: &str) -> Option<MethodView> {
    let name = field_text(node, "name", source)?;
    let mut params = Vec::new();
    if let Some(list) = node.child_by_field_name("parameters") {
        let mut cursor = list.walk();
        for param in list.named_children(&mut cursor) {
            let optional = match param.kind() {
                "required_parameter" => false,
                "optional_parameter" => true,
                _ => continue,
            };
            let Some(pattern) = field_text(param, "pattern", source) else {
                continue;
            };
            params.push(ParamView {
                name: pattern,
                ty: annotation_type(param.child_by_field_name("type"), source),
                optional,
            });
        }
    }
    Some(MethodView {
        name,
        params,
        returns: annotation_type(node.child_by_field_name("return_type"), source),
        endpoint: node
            .child_by_field_name("body")
            .and_then(|body| endpoint(body, source)),
    })
}

/// `<METHOD> <url>` of the first `fetch(url, init)` call in a method body
fn endpoint(body: Node, source: &str) -> Option<String> {
    let call = find_call(body, "fetch", source)?;
    let args = call.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    let mut named = args.named_children(&mut cursor);
    let url = named.next()?;
    // fetch defaults to GET without an init object
    let method = named
        .next()
        .and_then(|init| request_method(init, source))
        .unwrap_or_else(|| "GET".to_string());
    Some(format!("{} {}", method, request_url(url, source)))
}

fn find_call<'t>(node: Node<'t>, callee: &str, source: &str) -> Option<Node<'t>> {
    if node.kind() == "call_expression"
        && node
            .child_by_field_name("function")
            .is_some_and(|f| text(f, source) == callee)
    {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
    children
        .into_iter()
        .find_map(|child| find_call(child, callee, source))
}

/// Value of the `method` property of a fetch init object
fn request_method(init: Node, source: &str) -> Option<String> {
    if init.kind() != "object" {
        return None;
    }
    let mut cursor = init.walk();
    let pair = init.named_children(&mut cursor).find(|p| {
        p.kind() == "pair"
            && p.child_by_field_name("key")
                .is_some_and(|k| text(k, source).trim_matches(['"', '\'']) == "method")
    });
    let value = pair?.child_by_field_name("value")?;
    let raw = text(value, source);
    Some(if value.kind() == "string" {
        raw.trim_matches(['"', '\'']).to_string()
    } else {
        compact(raw)
    })
}

/// URL argument with whitespace dropped inside `${...}` substitutions
fn request_url(url: Node, source: &str) -> String {
    if url.kind() != "template_string" {
        return compact(text(url, source));
    }
    let mut out = String::new();
    let mut last = url.start_byte();
    let mut cursor = url.walk();
    for child in url.named_children(&mut cursor) {
        if child.kind() != "template_substitution" {
            continue;
        }
        out.push_str(&source[last..child.start_byte()]);
        out.push_str(&compact(text(child, source)));
        last = child.end_byte();
    }
    out.push_str(&source[last..url.end_byte()]);
    out.trim_matches('`').to_string()
}

fn compact(code: &str) -> String {
    code.split_whitespace().collect()
}

fn collect_errors(node: Node, errors: &mut Vec<SyntaxError>) {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        errors.push(SyntaxError {
            line: pos.row + 1,
            column: pos.column + 1,
        });
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            collect_errors(child, errors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_interface() {
        let src = r#"
// leading comment
export interface User {
  id: string;
  /** doc */
  nickname?: string | null;
  tags: string[];
}
"#;
        let view = parse_typescript(src).unwrap();
        assert_eq!(view.declarations.len(), 1);
        let user = &view.declarations[0];
        assert_eq!(user.kind, DeclKind::Interface);
        assert_eq!(
            user.properties,
            vec![
                PropertyView {
                    name: "id".into(),
                    ty: Some("string".into()),
                    optional: false
                },
                PropertyView {
                    name: "nickname".into(),
                    ty: Some("string | null".into()),
                    optional: true
                },
                PropertyView {
                    name: "tags".into(),
                    ty: Some("string[]".into()),
                    optional: false
                },
            ]
        );
        assert!(view.syntax_errors.is_empty());
    }

    #[test]
    fn test_parse_alias() {
        let view = parse_typescript("export type Role =\n  | \"admin\"\n  | \"member\";\n").unwrap();
        assert_eq!(view.declarations[0].kind, DeclKind::Alias);
        assert_eq!(
            view.declarations[0].alias.as_deref(),
            Some("\"admin\" | \"member\"")
        );
    }

    #[test]
    fn test_parse_class_methods_skip_constructor_and_fields() {
        let src = r#"
export class UsersApiClient {
  private readonly baseUrl: string;

  constructor(baseUrl: string) {
    this.baseUrl = baseUrl;
  }

  async getUser(id: string, verbose?: boolean): Promise<User> {
    const response = await fetch(`${this.baseUrl}/users/${id}`);
    return (await response.json()) as User;
  }
}
"#;
        let view = parse_typescript(src).unwrap();
        let class = view.declaration("UsersApiClient").unwrap();
        assert_eq!(class.kind, DeclKind::Class);
        assert_eq!(class.methods.len(), 1);
        assert_eq!(
            class.methods[0].to_string(),
            "getUser(id: string, verbose?: boolean): Promise<User>"
        );
        assert_eq!(
            class.methods[0].endpoint.as_deref(),
            Some("GET ${this.baseUrl}/users/${id}")
        );
    }

    #[test]
    fn test_endpoint_survives_reformatting() {
        let compact = r#"
export class C {
  async del(id: string): Promise<void> {
    const response = await fetch(`${this.baseUrl}/users/${encodeURIComponent(String(id))}`, { method: "DELETE" });
  }
}
"#;
        let spread = r#"
export class C {
  async del(id: string): Promise<void> {
    const response = await fetch(
      `${this.baseUrl}/users/${ encodeURIComponent( String(id) ) }`,
      {
        method: 'DELETE',
      },
    );
  }
}
"#;
        let a = parse_typescript(compact).unwrap();
        let b = parse_typescript(spread).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.declarations[0].methods[0].endpoint.as_deref(),
            Some("DELETE ${this.baseUrl}/users/${encodeURIComponent(String(id))}")
        );
    }

    #[test]
    fn test_formatting_does_not_change_view() {
        let a = parse_typescript("export interface A { x: number; y?: string }").unwrap();
        let b = parse_typescript(
            "// comment\nexport interface A {\n    x:number\n    y?:string\n}\n",
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_syntax_errors_are_recorded() {
        let view = parse_typescript("export interface A {\n  x: number;\n").unwrap();
        assert!(!view.syntax_errors.is_empty());
    }

    #[test]
    fn test_unexported_and_other_statements() {
        let view = parse_typescript("interface Hidden { a: string }\nconst x = 1;\nfunction f() {}\n")
            .unwrap();
        assert_eq!(view.declarations.len(), 1);
        assert_eq!(view.declarations[0].name, "Hidden");
    }
}
