//! `types.ts`: enum aliases, entity interfaces and request shapes

use crate::error::{Error, Result};
use crate::primitive::{Decl, Property, TypeRef};
use crate::registry::TypeRegistry;
use crate::schema::{Cardinality, Entity, Field, ModuleSchema, Operation};

/// TypeScript type for a field, including list and null wrapping
pub(crate) fn field_type(
    module: &ModuleSchema,
    entity: &Entity,
    field: &Field,
    registry: &TypeRegistry,
) -> Result<TypeRef> {
    let base = if field.ty == "enum" {
        TypeRef::named(entity.enum_alias_name(field))
    } else {
        registry
            .resolve(&field.ty)
            .cloned()
            .ok_or_else(|| Error::UnsupportedFieldType {
                module: module.name.clone(),
                subject: format!("{}.{}", entity.name, field.name),
                type_name: field.ty.clone(),
            })?
    };
    let ty = if field.list {
        TypeRef::array_of(base)
    } else {
        base
    };
    Ok(if field.nullable {
        TypeRef::nullable(ty)
    } else {
        ty
    })
}

fn field_property(
    module: &ModuleSchema,
    entity: &Entity,
    field: &Field,
    registry: &TypeRegistry,
) -> Result<Property> {
    Ok(Property::new(&field.name, field_type(module, entity, field, registry)?)
        .optional(!field.required)
        .with_doc(field.description.clone()))
}

fn enum_alias(entity: &Entity, field: &Field) -> Option<Decl> {
    let values = field.values.as_ref()?;
    Some(Decl::TypeAlias {
        name: entity.enum_alias_name(field),
        export: true,
        ty: TypeRef::union(values.iter().map(TypeRef::literal).collect()),
        doc: None,
    })
}

fn entity_interface(
    module: &ModuleSchema,
    entity: &Entity,
    registry: &TypeRegistry,
) -> Result<Decl> {
    let mut properties = entity
        .fields
        .iter()
        .map(|field| field_property(module, entity, field, registry))
        .collect::<Result<Vec<_>>>()?;

    for relation in &entity.relations {
        let target = TypeRef::named(&relation.target);
        let ty = match relation.cardinality {
            Cardinality::One => target,
            Cardinality::Many => TypeRef::array_of(target),
        };
        properties.push(Property::new(&relation.name, ty).optional(true));
    }

    Ok(Decl::Interface {
        name: entity.name.clone(),
        export: true,
        extends: vec![],
        properties,
        doc: entity.description.clone(),
    })
}

fn request_interface(
    module: &ModuleSchema,
    op: &Operation,
    registry: &TypeRegistry,
) -> Result<Option<Decl>> {
    let Some(request) = &op.request else {
        return Ok(None);
    };
    let entity = module.entity(&request.entity).ok_or_else(|| {
        Error::Other(format!(
            "operation '{}' references unknown entity '{}'",
            op.name, request.entity
        ))
    })?;

    let fields: Vec<&Field> = match &request.fields {
        Some(names) => names.iter().filter_map(|n| entity.field(n)).collect(),
        None => entity.fields.iter().collect(),
    };

    let properties = fields
        .into_iter()
        .map(|field| {
            field_property(module, entity, field, registry)
                .map(|p| p.optional(request.partial || !field.required))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(Decl::Interface {
        name: op.request_type_name(),
        export: true,
        extends: vec![],
        properties,
        doc: Some(format!("Request body for `{}`", op.name)),
    }))
}

/// Declarations of `types.ts`, in schema declaration order
pub(crate) fn build(module: &ModuleSchema, registry: &TypeRegistry) -> Result<Vec<Decl>> {
    let mut decls = Vec::new();
    for entity in module.entities.values() {
        decls.extend(entity.fields.iter().filter_map(|f| enum_alias(entity, f)));
        decls.push(entity_interface(module, entity, registry)?);
    }
    for op in module.operations.values() {
        if let Some(decl) = request_interface(module, op, registry)? {
            decls.push(decl);
        }
    }
    Ok(decls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose_members;
    use crate::schema::SchemaLoader;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_types_file_body() {
        let models = r#"
entities:
  - name: Team
    fields:
      - { name: id, type: uuid }
  - name: User
    description: A person with an account
    fields:
      - { name: id, type: uuid }
      - { name: role, type: enum, values: [admin, member] }
      - { name: nickname, type: string, required: false, nullable: true }
      - { name: tags, type: string, list: true }
    relations:
      - { name: team, target: Team }
      - { name: friends, target: User, cardinality: many }
"#;
        let api = r#"
operations:
  - name: updateUser
    method: PATCH
    path: "/users/{id}"
    request: { entity: User, fields: [role, nickname], partial: true }
"#;
        let module = SchemaLoader::load_str("users-api", models, Some(api)).unwrap();
        let decls = build(&module, &TypeRegistry::standard()).unwrap();

        let expected = r#"export interface Team {
  id: string;
}

export type UserRole = "admin" | "member";

/** A person with an account */
export interface User {
  id: string;
  role: UserRole;
  nickname?: string | null;
  tags: string[];
  team?: Team;
  friends?: User[];
}

/** Request body for `updateUser` */
export interface UpdateUserRequest {
  role?: UserRole;
  nickname?: string | null;
}"#;
        assert_eq!(compose_members(&decls, 0), expected);
    }

    #[test]
    fn test_unsupported_type_names_the_field() {
        let models = "entities:\n  - name: Place\n    fields:\n      - { name: at, type: geopoint }\n";
        let module = SchemaLoader::load_str("places-api", models, None).unwrap();
        match build(&module, &TypeRegistry::standard()).unwrap_err() {
            Error::UnsupportedFieldType {
                module,
                subject,
                type_name,
            } => {
                assert_eq!(module, "places-api");
                assert_eq!(subject, "Place.at");
                assert_eq!(type_name, "geopoint");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
