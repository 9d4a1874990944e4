//! Expression primitives
//!
//! Value-producing constructs embedded by statements and declarations.
//! A bare string in config is a raw expression and is emitted verbatim:
//! its grammar is not checked, so a malformed raw expression yields
//! malformed output.

use super::types::TypeRef;
use super::{escape_string, Render};
use crate::util::is_identifier;
use serde::{Deserialize, Serialize};

/// TypeScript expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// `name`
    Ident { name: String },
    /// `"text"`, `42`, `true`, `null`
    Literal { value: Literal },
    /// `callee(args)`
    Call {
        callee: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
    },
    /// `new Callee(args)`
    New {
        callee: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
    },
    /// `object.property` / `object?.property`
    Member {
        object: Box<Expr>,
        property: String,
        #[serde(default, skip_serializing_if = "is_false")]
        optional: bool,
    },
    /// `object[index]`
    Index { object: Box<Expr>, index: Box<Expr> },
    /// `left op right`
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// `op operand`
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `await expr`
    Await { expr: Box<Expr> },
    /// `{ key: value, shorthand }`
    Object {
        #[serde(default)]
        props: Vec<ObjectProp>,
    },
    /// `[a, b]`
    Array {
        #[serde(default)]
        items: Vec<Expr>,
    },
    /// `` `text ${expr}` ``
    Template { parts: Vec<TemplatePart> },
    /// `(params) => body`
    Arrow {
        #[serde(default)]
        params: Vec<Param>,
        body: Box<Expr>,
        #[serde(default, skip_serializing_if = "is_false")]
        is_async: bool,
    },
    /// `expr as Type`
    Cast {
        expr: Box<Expr>,
        #[serde(rename = "type")]
        ty: TypeRef,
    },
    /// `test ? then : else`
    Conditional {
        test: Box<Expr>,
        then: Box<Expr>,
        #[serde(rename = "else")]
        otherwise: Box<Expr>,
    },
    /// Verbatim source text
    #[serde(untagged)]
    Raw(String),
}

/// Literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// Binary and logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "===")]
    StrictEq,
    #[serde(rename = "!==")]
    StrictNe,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Rem,
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
    #[serde(rename = "??")]
    Coalesce,
    #[serde(rename = "instanceof")]
    InstanceOf,
    #[serde(rename = "in")]
    In,
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "-")]
    Neg,
    #[serde(rename = "typeof")]
    TypeOf,
}

/// Object literal property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectProp {
    pub key: String,
    pub value: Expr,
}

/// Template literal part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplatePart {
    Text(String),
    Expr(Expr),
}

/// Function, method or arrow parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Expr>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

// Binding strength, higher binds tighter.
const PREC_PRIMARY: u8 = 20;
const PREC_PREFIX: u8 = 16;
const PREC_CAST: u8 = 11;
const PREC_CONDITIONAL: u8 = 3;
const PREC_ARROW: u8 = 2;

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Coalesce => "??",
            BinaryOp::InstanceOf => "instanceof",
            BinaryOp::In => "in",
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 14,
            BinaryOp::Add | BinaryOp::Sub => 13,
            BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge
            | BinaryOp::InstanceOf
            | BinaryOp::In => 11,
            BinaryOp::StrictEq | BinaryOp::StrictNe | BinaryOp::Eq | BinaryOp::Ne => 10,
            BinaryOp::And => 6,
            BinaryOp::Or => 5,
            BinaryOp::Coalesce => 4,
        }
    }

    fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::TypeOf => "typeof ",
        }
    }
}

impl Expr {
    pub fn raw(code: impl Into<String>) -> Self {
        Expr::Raw(code.into())
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident { name: name.into() }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal {
            value: Literal::String(value.into()),
        }
    }

    pub fn member(object: Expr, property: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(object),
            property: property.into(),
            optional: false,
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn new_instance(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::New {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn not(operand: Expr) -> Self {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        }
    }

    pub fn await_(expr: Expr) -> Self {
        Expr::Await {
            expr: Box::new(expr),
        }
    }

    pub fn cast(expr: Expr, ty: TypeRef) -> Self {
        Expr::Cast {
            expr: Box::new(expr),
            ty,
        }
    }

    pub fn object(props: Vec<(&str, Expr)>) -> Self {
        Expr::Object {
            props: props
                .into_iter()
                .map(|(key, value)| ObjectProp {
                    key: key.to_string(),
                    value,
                })
                .collect(),
        }
    }

    pub fn template(parts: Vec<TemplatePart>) -> Self {
        Expr::Template { parts }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Unary { .. } | Expr::Await { .. } => PREC_PREFIX,
            Expr::Cast { .. } => PREC_CAST,
            Expr::Conditional { .. } => PREC_CONDITIONAL,
            Expr::Arrow { .. } => PREC_ARROW,
            _ => PREC_PRIMARY,
        }
    }

    /// Render, wrapping in parentheses when binding weaker than `min`
    fn render_at(&self, min: u8) -> String {
        if self.precedence() < min {
            format!("({})", self.render())
        } else {
            self.render()
        }
    }

    fn render_binary_operand(&self, op: BinaryOp, right_side: bool) -> String {
        let needs_parens = match self {
            Expr::Binary { op: inner, .. } => {
                let mixes_coalesce = (op == BinaryOp::Coalesce && inner.is_logical())
                    || (inner == &BinaryOp::Coalesce && op.is_logical());
                let weaker = inner.precedence() < op.precedence();
                let same_on_right = right_side && inner.precedence() == op.precedence();
                mixes_coalesce || weaker || same_on_right
            }
            other => other.precedence() < op.precedence(),
        };
        if needs_parens {
            format!("({})", self.render())
        } else {
            self.render()
        }
    }
}

fn render_args(args: &[Expr]) -> String {
    args.iter()
        .map(|a| a.render_at(PREC_ARROW))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_template_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

impl Render for Expr {
    fn render(&self) -> String {
        match self {
            Expr::Raw(code) => code.clone(),
            Expr::Ident { name } => name.clone(),
            Expr::Literal { value } => value.render(),
            Expr::Call { callee, args } => {
                format!("{}({})", callee.render_at(PREC_PRIMARY), render_args(args))
            }
            Expr::New { callee, args } => {
                format!("new {}({})", callee.render_at(PREC_PRIMARY), render_args(args))
            }
            Expr::Member {
                object,
                property,
                optional,
            } => {
                let dot = if *optional { "?." } else { "." };
                format!("{}{}{}", object.render_at(PREC_PRIMARY), dot, property)
            }
            Expr::Index { object, index } => {
                format!("{}[{}]", object.render_at(PREC_PRIMARY), index.render())
            }
            Expr::Binary { left, op, right } => format!(
                "{} {} {}",
                left.render_binary_operand(*op, false),
                op.symbol(),
                right.render_binary_operand(*op, true)
            ),
            Expr::Unary { op, operand } => {
                format!("{}{}", op.symbol(), operand.render_at(PREC_PREFIX))
            }
            Expr::Await { expr } => format!("await {}", expr.render_at(PREC_PREFIX)),
            Expr::Object { props } => {
                if props.is_empty() {
                    return "{}".to_string();
                }
                let parts: Vec<_> = props.iter().map(Render::render).collect();
                format!("{{ {} }}", parts.join(", "))
            }
            Expr::Array { items } => format!("[{}]", render_args(items)),
            Expr::Template { parts } => {
                let content: String = parts
                    .iter()
                    .map(|part| match part {
                        TemplatePart::Text(text) => render_template_text(text),
                        TemplatePart::Expr(expr) => format!("${{{}}}", expr.render()),
                    })
                    .collect();
                format!("`{}`", content)
            }
            Expr::Arrow {
                params,
                body,
                is_async,
            } => {
                let prefix = if *is_async { "async " } else { "" };
                let params = params.iter().map(Render::render).collect::<Vec<_>>();
                let body = match body.as_ref() {
                    Expr::Object { .. } => format!("({})", body.render()),
                    other => other.render_at(PREC_ARROW),
                };
                format!("{}({}) => {}", prefix, params.join(", "), body)
            }
            // Cast operands are parenthesised unless primary, for readability
            Expr::Cast { expr, ty } => {
                format!("{} as {}", expr.render_at(PREC_PRIMARY), ty.render())
            }
            Expr::Conditional {
                test,
                then,
                otherwise,
            } => format!(
                "{} ? {} : {}",
                test.render_at(PREC_CONDITIONAL + 1),
                then.render_at(PREC_CONDITIONAL),
                otherwise.render_at(PREC_CONDITIONAL)
            ),
        }
    }
}

impl Render for Literal {
    fn render(&self) -> String {
        match self {
            Literal::Null => "null".to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Int(i) => i.to_string(),
            Literal::Float(f) if f.is_nan() => "NaN".to_string(),
            Literal::Float(f) if f.is_infinite() => {
                let sign = if f.is_sign_negative() { "-" } else { "" };
                format!("{}Infinity", sign)
            }
            Literal::Float(f) => f.to_string(),
            Literal::String(s) => escape_string(s),
        }
    }
}

impl Render for ObjectProp {
    fn render(&self) -> String {
        if let Expr::Ident { name } = &self.value {
            if name == &self.key {
                return name.clone();
            }
        }
        let key = if is_identifier(&self.key) {
            self.key.clone()
        } else {
            escape_string(&self.key)
        };
        format!("{}: {}", key, self.value.render_at(PREC_ARROW))
    }
}

impl Render for Param {
    fn render(&self) -> String {
        let mut out = self.name.clone();
        if self.optional {
            out.push('?');
        }
        if let Some(ty) = &self.ty {
            out.push_str(": ");
            out.push_str(&ty.render());
        }
        if let Some(default) = &self.default {
            out.push_str(" = ");
            out.push_str(&default.render());
        }
        out
    }
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            optional: false,
            default: None,
        }
    }
}
