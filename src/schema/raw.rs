//! Schema file grammar
//!
//! These are the on-disk shapes of `models.yaml` and `api.yaml`. Every
//! collection is a list of named items so declaration order survives parsing.
//!
//! ```yaml
//! entities:
//!   - name: User
//!     fields:
//!       - name: id
//!         type: uuid
//!       - name: role
//!         type: enum
//!         values: [admin, member]
//!     relations:
//!       - name: team
//!         target: Team
//!         cardinality: one
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

static PATH_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("valid path param regex"));

fn default_true() -> bool {
    true
}

fn default_param_type() -> String {
    "string".to_string()
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn is_true(b: &bool) -> bool {
    *b
}

/// `models.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(title = "sdkforge models", description = "Entity, field and relation definitions")]
pub struct ModelsFile {
    /// Entities in declaration order
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// `api.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(title = "sdkforge api", description = "Operation and request/response shapes")]
pub struct ApiFile {
    /// Prefix prepended to every operation path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    /// Operations in declaration order
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// A named record type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Entity {
    /// PascalCase identifier, unique within the module
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub fields: Vec<Field>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<Relation>,
}

/// An entity field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Field {
    pub name: String,

    /// Type name, resolved at emission time
    #[serde(rename = "type")]
    pub ty: String,

    /// Absent from the payload when false
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub list: bool,

    /// Allowed values, only for `enum`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A link to another entity in the same module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Relation {
    pub name: String,
    pub target: String,
    #[serde(default)]
    pub cardinality: Cardinality,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    One,
    Many,
}

/// An HTTP operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Operation {
    /// camelCase identifier, becomes the client method name
    pub name: String,

    pub method: HttpMethod,

    /// Path with `{param}` placeholders
    pub path: String,

    /// Typing for path placeholders; undeclared ones are strings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<PathParam>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestShape>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseShape>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// GET and DELETE carry no request body
    pub fn allows_body(&self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PathParam {
    pub name: String,
    #[serde(rename = "type", default = "default_param_type")]
    pub ty: String,
}

/// Request body shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RequestShape {
    pub entity: String,

    /// Subset of entity fields; all fields when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    /// Every property optional
    #[serde(default, skip_serializing_if = "is_false")]
    pub partial: bool,
}

/// Response body shape; no entity means no body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ResponseShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub list: bool,
}

impl Entity {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Alias name for an enum field: `<Entity><Field>`
    pub fn enum_alias_name(&self, field: &Field) -> String {
        format!("{}{}", self.name, crate::util::to_pascal_case(&field.name))
    }
}

impl Operation {
    /// Placeholders in `path`, in order of appearance
    pub fn path_params(&self) -> Vec<String> {
        PATH_PARAM
            .captures_iter(&self.path)
            .map(|c| c[1].to_string())
            .collect()
    }

    /// Declared type of a path placeholder, `string` if undeclared
    pub fn param_type(&self, name: &str) -> &str {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.ty.as_str())
            .unwrap_or("string")
    }

    /// Name of the generated request-body interface
    pub fn request_type_name(&self) -> String {
        format!("{}Request", crate::util::to_pascal_case(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_defaults() {
        let field: Field = serde_norway::from_str("name: id\ntype: uuid").unwrap();
        assert!(field.required);
        assert!(!field.nullable);
        assert!(!field.list);
        assert_eq!(field.values, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let res: std::result::Result<Field, _> =
            serde_norway::from_str("name: id\ntype: uuid\nrequird: false");
        assert!(res.is_err());
    }

    #[test]
    fn test_path_params_in_order() {
        let op: Operation =
            serde_norway::from_str("name: getMember\nmethod: GET\npath: /teams/{teamId}/members/{id}")
                .unwrap();
        assert_eq!(op.path_params(), vec!["teamId", "id"]);
        assert_eq!(op.param_type("id"), "string");
        assert_eq!(op.request_type_name(), "GetMemberRequest");
    }

    #[test]
    fn test_method_parsing() {
        let m: HttpMethod = serde_norway::from_str("PATCH").unwrap();
        assert_eq!(m, HttpMethod::Patch);
        assert!(m.allows_body());
        assert!(!HttpMethod::Delete.allows_body());
    }
}
