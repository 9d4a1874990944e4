//! `client.ts`: one fetch-based client class per module

use crate::error::{Error, Result};
use crate::primitive::{
    ClassMember, Decl, Expr, Param, Stmt, TemplatePart, TypeRef, Visibility,
};
use crate::registry::TypeRegistry;
use crate::schema::{ModuleSchema, Operation};
use crate::util::to_pascal_case;
use indexmap::IndexSet;

const TYPES_IMPORT: &str = "./types";

/// Client class name for a module: `users-api` → `UsersApiClient`
pub(crate) fn class_name(module: &str) -> String {
    format!("{}Client", to_pascal_case(module))
}

fn response_type(op: &Operation) -> TypeRef {
    match op.response.as_ref().and_then(|r| r.entity.as_ref().map(|e| (e, r.list))) {
        Some((entity, false)) => TypeRef::named(entity),
        Some((entity, true)) => TypeRef::array_of(TypeRef::named(entity)),
        None => TypeRef::named("void"),
    }
}

/// `` `${this.baseUrl}/base/users/${encodeURIComponent(String(id))}` ``
fn url_expr(base_path: Option<&str>, path: &str) -> Expr {
    let this_base = Expr::member(Expr::ident("this"), "baseUrl");
    let mut parts = vec![TemplatePart::Expr(this_base)];
    let mut text = base_path.unwrap_or_default().trim_end_matches('/').to_string();

    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        text.push_str(&rest[..open]);
        if !text.is_empty() {
            parts.push(TemplatePart::Text(std::mem::take(&mut text)));
        }
        let param = Expr::ident(&rest[open + 1..close]);
        let as_string = Expr::call(Expr::ident("String"), vec![param]);
        parts.push(TemplatePart::Expr(Expr::call(
            Expr::ident("encodeURIComponent"),
            vec![as_string],
        )));
        rest = &rest[close + 1..];
    }
    text.push_str(rest);
    if !text.is_empty() {
        parts.push(TemplatePart::Text(text));
    }
    Expr::template(parts)
}

fn method_params(
    module: &ModuleSchema,
    op: &Operation,
    registry: &TypeRegistry,
) -> Result<Vec<Param>> {
    let mut params = op
        .path_params()
        .into_iter()
        .map(|name| {
            let type_name = op.param_type(&name);
            let ty = registry
                .resolve(type_name)
                .cloned()
                .ok_or_else(|| Error::UnsupportedFieldType {
                    module: module.name.clone(),
                    subject: format!("{}.{}", op.name, name),
                    type_name: type_name.to_string(),
                })?;
            Ok(Param::new(name, ty))
        })
        .collect::<Result<Vec<_>>>()?;

    if op.request.is_some() {
        params.push(Param::new("body", TypeRef::named(op.request_type_name())));
    }
    Ok(params)
}

fn method_body(module: &ModuleSchema, op: &Operation) -> Vec<Stmt> {
    let mut init = vec![("method", Expr::string(op.method.as_str()))];
    if op.request.is_some() {
        init.push((
            "headers",
            Expr::object(vec![("Content-Type", Expr::string("application/json"))]),
        ));
        init.push((
            "body",
            Expr::call(
                Expr::member(Expr::ident("JSON"), "stringify"),
                vec![Expr::ident("body")],
            ),
        ));
    }

    let fetch = Expr::call(
        Expr::ident("fetch"),
        vec![url_expr(module.base_path.as_deref(), &op.path), Expr::object(init)],
    );
    let response = || Expr::ident("response");
    let failure = Expr::new_instance(
        Expr::ident("Error"),
        vec![Expr::template(vec![
            TemplatePart::Text(format!("{} failed with status ", op.name)),
            TemplatePart::Expr(Expr::member(response(), "status")),
        ])],
    );

    let mut body = vec![
        Stmt::const_("response", Expr::await_(fetch)),
        Stmt::if_(
            Expr::not(Expr::member(response(), "ok")),
            vec![Stmt::throw(failure)],
        ),
    ];

    let returns = response_type(op);
    if returns != TypeRef::named("void") {
        let json = Expr::await_(Expr::call(Expr::member(response(), "json"), vec![]));
        body.push(Stmt::return_value(Expr::cast(json, returns)));
    }
    body
}

fn method(module: &ModuleSchema, op: &Operation, registry: &TypeRegistry) -> Result<ClassMember> {
    let doc = op
        .description
        .clone()
        .unwrap_or_else(|| format!("{} {}", op.method, op.path));
    Ok(ClassMember::Method {
        name: op.name.clone(),
        visibility: Visibility::Public,
        is_async: true,
        params: method_params(module, op, registry)?,
        returns: Some(TypeRef::promise(response_type(op))),
        body: method_body(module, op),
        doc: Some(doc),
    })
}

/// Type names the client refers to, in first-use order
fn imported_types(module: &ModuleSchema) -> Vec<String> {
    let mut names = IndexSet::new();
    for op in module.operations.values() {
        if op.request.is_some() {
            names.insert(op.request_type_name());
        }
        if let Some(entity) = op.response.as_ref().and_then(|r| r.entity.clone()) {
            names.insert(entity);
        }
    }
    names.into_iter().collect()
}

/// Import declaration (if any types are used) and the client class
pub(crate) fn build(module: &ModuleSchema, registry: &TypeRegistry) -> Result<(Option<Decl>, Decl)> {
    let names = imported_types(module);
    let import = (!names.is_empty()).then(|| Decl::Import {
        names,
        from: TYPES_IMPORT.to_string(),
        type_only: true,
    });

    let mut members = vec![
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
    ];
    for op in module.operations.values() {
        members.push(method(module, op, registry)?);
    }

    let class = Decl::Class {
        name: class_name(&module.name),
        export: true,
        extends: None,
        members,
        doc: Some(format!("HTTP client for the {} module", module.name)),
    };
    Ok((import, class))
}
