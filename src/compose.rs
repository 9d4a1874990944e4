//! Composer: sequences primitives and manages indentation
//!
//! The composer never inspects what a primitive renders. It only places
//! renders in order and prefixes each non-empty line with one indentation
//! unit per nesting level, so nested blocks indent exactly one more level
//! than their parent.

use crate::primitive::{Decl, Render};

/// One level of indentation
pub const INDENT: &str = "  ";

/// Indent every non-empty line of `text` by `level` units
pub fn indent(text: &str, level: usize) -> String {
    if level == 0 {
        return text.to_string();
    }
    let prefix = INDENT.repeat(level);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render items in order, one per line, at `level`
///
/// An empty sequence renders as the empty string.
pub fn compose<R: Render>(items: &[R], level: usize) -> String {
    join_rendered(items, level, "\n")
}

/// Like [`compose`], with a blank line between items
pub fn compose_members<R: Render>(items: &[R], level: usize) -> String {
    join_rendered(items, level, "\n\n")
}

/// Braced block: `{}` when empty, else items one level deeper
pub fn block<R: Render>(items: &[R]) -> String {
    if items.is_empty() {
        "{}".to_string()
    } else {
        format!("{{\n{}\n}}", compose(items, 1))
    }
}

fn join_rendered<R: Render>(items: &[R], level: usize, separator: &str) -> String {
    items
        .iter()
        .map(|item| indent(&item.render(), level))
        .collect::<Vec<_>>()
        .join(separator)
}

/// A whole TypeScript file: header comment, imports, then declarations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFile {
    pub header: Vec<String>,
    pub imports: Vec<Decl>,
    pub items: Vec<Decl>,
}

impl SourceFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, lines: Vec<String>) -> Self {
        self.header = lines;
        self
    }

    pub fn import(&mut self, decl: Decl) {
        self.imports.push(decl);
    }

    pub fn push(&mut self, decl: Decl) {
        self.items.push(decl);
    }
}

impl Render for SourceFile {
    fn render(&self) -> String {
        let mut sections = Vec::new();
        if !self.header.is_empty() {
            sections.push(
                self.header
                    .iter()
                    .map(|line| format!("// {}", line))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
        if !self.imports.is_empty() {
            sections.push(compose(&self.imports, 0));
        }
        if !self.items.is_empty() {
            sections.push(compose_members(&self.items, 0));
        }
        let mut out = sections.join("\n\n");
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{Expr, Property, Stmt, TypeRef};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_indent_skips_empty_lines() {
        assert_eq!(indent("a\n\nb", 2), "    a\n\n    b");
        assert_eq!(indent("a", 0), "a");
    }

    #[test]
    fn test_compose_preserves_order() {
        let stmts = vec![
            Stmt::expression(Expr::raw("first()")),
            Stmt::expression(Expr::raw("second()")),
            Stmt::throw(Expr::raw("third")),
        ];
        assert_eq!(compose(&stmts, 0), "first();\nsecond();\nthrow third;");
        assert_eq!(
            compose(&stmts, 1),
            "  first();\n  second();\n  throw third;"
        );
    }

    #[test]
    fn test_empty_sequence() {
        let none: Vec<Stmt> = vec![];
        assert_eq!(compose(&none, 3), "");
        assert_eq!(block(&none), "{}");
    }

    #[test]
    fn test_source_file_layout() {
        let mut file = SourceFile::new().with_header(vec!["Generated".into()]);
        file.import(Decl::Import {
            names: vec!["User".into()],
            from: "./types".into(),
            type_only: true,
        });
        file.push(Decl::TypeAlias {
            name: "Id".into(),
            export: true,
            ty: TypeRef::named("string"),
            doc: None,
        });
        file.push(Decl::Interface {
            name: "Box".into(),
            export: true,
            extends: vec![],
            properties: vec![Property::new("id", TypeRef::named("Id"))],
            doc: None,
        });
        assert_eq!(
            file.render(),
            "// Generated\n\nimport type { User } from \"./types\";\n\nexport type Id = string;\n\nexport interface Box {\n  id: Id;\n}\n"
        );
    }

    #[test]
    fn test_empty_source_file() {
        assert_eq!(SourceFile::new().render(), "\n");
    }

    proptest! {
        #[test]
        fn prop_compose_is_concatenation(names in prop::collection::vec("[a-z]{1,8}", 0..12)) {
            let stmts: Vec<Stmt> = names
                .iter()
                .map(|n| Stmt::expression(Expr::call(Expr::ident(n.as_str()), vec![])))
                .collect();
            let expected: Vec<String> = names.iter().map(|n| format!("{}();", n)).collect();
            prop_assert_eq!(compose(&stmts, 0), expected.join("\n"));
        }

        #[test]
        fn prop_compose_is_associative(
            left in prop::collection::vec("[a-z]{1,6}", 1..6),
            right in prop::collection::vec("[a-z]{1,6}", 1..6),
        ) {
            let to_stmts = |names: &[String]| -> Vec<Stmt> {
                names.iter().map(|n| Stmt::expression(Expr::raw(n.clone()))).collect()
            };
            let l = to_stmts(&left);
            let r = to_stmts(&right);
            let mut all = l.clone();
            all.extend(r.clone());
            let split = format!("{}\n{}", compose(&l, 1), compose(&r, 1));
            prop_assert_eq!(compose(&all, 1), split);
        }

        #[test]
        fn prop_nested_depth_indents_one_level(depth in 1usize..6) {
            let mut stmt = Stmt::expression(Expr::raw("leaf()"));
            for _ in 0..depth {
                stmt = Stmt::if_(Expr::ident("c"), vec![stmt]);
            }
            let rendered = stmt.render();
            let leaf = rendered.lines().find(|l| l.trim() == "leaf();").unwrap();
            prop_assert_eq!(leaf.len() - leaf.trim_start().len(), depth * INDENT.len());
        }
    }
}
