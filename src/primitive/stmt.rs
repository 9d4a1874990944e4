//! Statement primitives
//!
//! Each statement kind is a fixed template whose placeholders are filled by
//! nested primitive renders. Nested bodies go through the composer, so a
//! statement always renders at indentation level zero and the enclosing
//! block indents it.

use super::expr::Expr;
use super::types::TypeRef;
use super::Render;
use crate::compose::block;
use serde::{Deserialize, Serialize};

/// TypeScript statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    /// `<expression>;`
    Expression { expression: Expr },
    /// `throw <expression>;`
    Throw { expression: Expr },
    /// `return;` / `return <value>;`
    Return {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Expr>,
    },
    /// `const name: T = init;`
    Declare {
        #[serde(default)]
        binding: Binding,
        name: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        ty: Option<TypeRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        init: Option<Expr>,
    },
    /// `if (test) { ... } else { ... }`
    If {
        test: Expr,
        #[serde(default)]
        then: Vec<Stmt>,
        #[serde(rename = "else", default, skip_serializing_if = "Option::is_none")]
        otherwise: Option<Vec<Stmt>>,
    },
    /// `for (const name of iterable) { ... }`
    ForOf {
        #[serde(default)]
        binding: Binding,
        name: String,
        iterable: Expr,
        #[serde(default)]
        body: Vec<Stmt>,
    },
    /// `// text`
    Comment { text: String },
}

/// Variable binding keyword
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Binding {
    #[default]
    Const,
    Let,
}

impl Binding {
    pub fn keyword(&self) -> &'static str {
        match self {
            Binding::Const => "const",
            Binding::Let => "let",
        }
    }
}

impl Stmt {
    pub fn expression(expression: Expr) -> Self {
        Stmt::Expression { expression }
    }

    pub fn throw(expression: Expr) -> Self {
        Stmt::Throw { expression }
    }

    pub fn return_value(value: Expr) -> Self {
        Stmt::Return { value: Some(value) }
    }

    pub fn const_(name: impl Into<String>, init: Expr) -> Self {
        Stmt::Declare {
            binding: Binding::Const,
            name: name.into(),
            ty: None,
            init: Some(init),
        }
    }

    pub fn if_(test: Expr, then: Vec<Stmt>) -> Self {
        Stmt::If {
            test,
            then,
            otherwise: None,
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Stmt::Comment { text: text.into() }
    }
}

impl Render for Stmt {
    fn render(&self) -> String {
        match self {
            Stmt::Expression { expression } => format!("{};", expression.render()),
            Stmt::Throw { expression } => format!("throw {};", expression.render()),
            Stmt::Return { value: None } => "return;".to_string(),
            Stmt::Return { value: Some(value) } => format!("return {};", value.render()),
            Stmt::Declare {
                binding,
                name,
                ty,
                init,
            } => {
                let mut out = format!("{} {}", binding.keyword(), name);
                if let Some(ty) = ty {
                    out.push_str(": ");
                    out.push_str(&ty.render());
                }
                if let Some(init) = init {
                    out.push_str(" = ");
                    out.push_str(&init.render());
                }
                out.push(';');
                out
            }
            Stmt::If {
                test,
                then,
                otherwise,
            } => {
                let mut out = format!("if ({}) {}", test.render(), block(then));
                match otherwise.as_deref() {
                    None => {}
                    Some([chained @ Stmt::If { .. }]) => {
                        out.push_str(" else ");
                        out.push_str(&chained.render());
                    }
                    Some(stmts) => {
                        out.push_str(" else ");
                        out.push_str(&block(stmts));
                    }
                }
                out
            }
            Stmt::ForOf {
                binding,
                name,
                iterable,
                body,
            } => format!(
                "for ({} {} of {}) {}",
                binding.keyword(),
                name,
                iterable.render(),
                block(body)
            ),
            Stmt::Comment { text } => {
                if text.is_empty() {
                    return "//".to_string();
                }
                text.lines()
                    .map(|line| {
                        if line.is_empty() {
                            "//".to_string()
                        } else {
                            format!("// {}", line)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::expr::BinaryOp;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expression_statement() {
        assert_eq!(Stmt::expression(Expr::raw("foo()")).render(), "foo();");
    }

    #[test]
    fn test_throw_statement() {
        assert_eq!(
            Stmt::throw(Expr::raw("new Error('x')")).render(),
            "throw new Error('x');"
        );
    }

    #[test]
    fn test_return_and_declare() {
        assert_eq!(Stmt::Return { value: None }.render(), "return;");
        assert_eq!(Stmt::return_value(Expr::ident("x")).render(), "return x;");

        let decl = Stmt::Declare {
            binding: Binding::Let,
            name: "count".into(),
            ty: Some(TypeRef::named("number")),
            init: Some(Expr::raw("0")),
        };
        assert_eq!(decl.render(), "let count: number = 0;");
    }

    #[test]
    fn test_if_renders_nested_block() {
        let stmt = Stmt::if_(
            Expr::not(Expr::member(Expr::ident("response"), "ok")),
            vec![Stmt::throw(Expr::raw("new Error(\"failed\")"))],
        );
        assert_eq!(
            stmt.render(),
            "if (!response.ok) {\n  throw new Error(\"failed\");\n}"
        );
    }

    #[test]
    fn test_if_else_if_chain() {
        let inner = Stmt::If {
            test: Expr::binary(Expr::ident("x"), BinaryOp::Gt, Expr::raw("0")),
            then: vec![Stmt::return_value(Expr::raw("1"))],
            otherwise: Some(vec![Stmt::return_value(Expr::raw("0"))]),
        };
        let outer = Stmt::If {
            test: Expr::ident("done"),
            then: vec![Stmt::Return { value: None }],
            otherwise: Some(vec![inner]),
        };
        assert_eq!(
            outer.render(),
            "if (done) {\n  return;\n} else if (x > 0) {\n  return 1;\n} else {\n  return 0;\n}"
        );
    }

    #[test]
    fn test_empty_if_body() {
        assert_eq!(Stmt::if_(Expr::ident("x"), vec![]).render(), "if (x) {}");
    }

    #[test]
    fn test_nested_blocks_indent_one_level_per_depth() {
        let inner = Stmt::if_(Expr::ident("b"), vec![Stmt::expression(Expr::raw("go()"))]);
        let outer = Stmt::ForOf {
            binding: Binding::Const,
            name: "item".into(),
            iterable: Expr::ident("items"),
            body: vec![inner],
        };
        assert_eq!(
            outer.render(),
            "for (const item of items) {\n  if (b) {\n    go();\n  }\n}"
        );
    }

    #[test]
    fn test_comment_lines() {
        assert_eq!(Stmt::comment("one\n\ntwo").render(), "// one\n//\n// two");
    }

    #[test]
    fn test_deserialize_from_config() {
        let stmt: Stmt =
            serde_json::from_str(r#"{"kind": "throw", "expression": "new Error('x')"}"#).unwrap();
        assert_eq!(stmt.render(), "throw new Error('x');");
    }
}
