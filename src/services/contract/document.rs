//! OpenAPI 3 contract document (the subset the gateway enforces).
//!
//! Only request-side fields are modelled; responses, examples and the rest of
//! the document are ignored by serde.
use std::collections::BTreeMap;
use std::path::Path;

use axum::http::Method;
use serde::Deserialize;
use serde_json::Value;

use super::ContractError;

/// `[{ schemeName: [scopes] }, ...]`: alternatives, each a set of schemes.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Deserialize)]
pub struct ContractDocument {
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
    #[serde(default)]
    pub security: Option<Vec<SecurityRequirement>>,
    #[serde(default)]
    pub components: Components,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    #[serde(default, rename = "securitySchemes")]
    pub security_schemes: BTreeMap<String, SecurityScheme>,
    #[serde(default)]
    pub schemas: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub scheme: Option<String>,
}

impl SecurityScheme {
    pub fn is_http_bearer(&self) -> bool {
        self.kind.eq_ignore_ascii_case("http")
            && self
                .scheme
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("bearer"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub patch: Option<Operation>,
}

impl PathItem {
    pub fn operations(&self) -> impl Iterator<Item = (Method, &Operation)> {
        [
            (Method::GET, self.get.as_ref()),
            (Method::PUT, self.put.as_ref()),
            (Method::POST, self.post.as_ref()),
            (Method::DELETE, self.delete.as_ref()),
            (Method::OPTIONS, self.options.as_ref()),
            (Method::HEAD, self.head.as_ref()),
            (Method::PATCH, self.patch.as_ref()),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.map(|op| (method, op)))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Operation {
    #[serde(default, rename = "operationId")]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// `None` inherits the document-level requirement; `Some([])` disables it.
    #[serde(default)]
    pub security: Option<Vec<SecurityRequirement>>,
    #[serde(default, rename = "requestBody")]
    pub request_body: Option<RequestBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: BTreeMap<String, MediaType>,
}

impl RequestBody {
    pub fn json_schema(&self) -> Option<&Value> {
        self.content
            .iter()
            .find(|(media_type, _)| media_type.starts_with("application/json"))
            .and_then(|(_, media)| media.schema.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<Value>,
}

impl ContractDocument {
    pub fn from_yaml_str(raw: &str) -> Result<Self, ContractError> {
        serde_yaml::from_str(raw).map_err(|e| ContractError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ContractError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ContractError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml_str(&raw)
    }
}
