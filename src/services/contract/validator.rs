//! Request validation against a compiled contract.
//!
//! The document is compiled once at startup (path templates, security, JSON
//! schemas); per-request checks only walk the compiled form.
use std::path::Path;

use axum::http::{HeaderMap, HeaderName, Method, header};
use jsonschema::Validator;
use serde_json::Value;

use super::ContractError;
use super::document::{
    Components, ContractDocument, Operation, Parameter, ParameterLocation, SecurityRequirement,
};

/// Header parameters OpenAPI says must be ignored (described elsewhere in the document).
const RESERVED_HEADER_PARAMS: [&str; 3] = ["accept", "content-type", "authorization"];

pub struct ContractValidator {
    routes: Vec<Route>,
}

struct Route {
    segments: Vec<Segment>,
    operations: Vec<(Method, OperationRules)>,
}

enum Segment {
    Literal(String),
    Param,
}

/// What one declared operation requires from a request.
pub struct OperationRules {
    label: String,
    bearer_required: bool,
    required_headers: Vec<HeaderName>,
    required_query: Vec<String>,
    body: Option<BodyRules>,
}

struct BodyRules {
    required: bool,
    schema: Option<Validator>,
}

impl ContractValidator {
    pub fn load(path: &Path) -> Result<Self, ContractError> {
        Self::compile(&ContractDocument::load(path)?)
    }

    pub fn compile(doc: &ContractDocument) -> Result<Self, ContractError> {
        let mut routes = Vec::with_capacity(doc.paths.len());

        for (template, item) in &doc.paths {
            let mut operations = Vec::new();
            for (method, op) in item.operations() {
                let label = op
                    .operation_id
                    .clone()
                    .unwrap_or_else(|| format!("{method} {template}"));
                let security = op.security.as_deref().or(doc.security.as_deref());
                let rules = OperationRules::compile(
                    label,
                    op,
                    &item.parameters,
                    security,
                    &doc.components,
                )?;
                operations.push((method, rules));
            }

            routes.push(Route {
                segments: split_path(template)
                    .into_iter()
                    .map(|s| {
                        if s.starts_with('{') && s.ends_with('}') {
                            Segment::Param
                        } else {
                            Segment::Literal(s.to_string())
                        }
                    })
                    .collect(),
                operations,
            });
        }

        Ok(Self { routes })
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Resolves the declared operation for `method` + `path`.
    ///
    /// Literal segments win over `{param}` segments when several templates match.
    pub fn match_operation(
        &self,
        method: &Method,
        path: &str,
    ) -> Result<&OperationRules, ContractError> {
        let segments = split_path(path);

        let route = self
            .routes
            .iter()
            .filter(|r| r.matches(&segments))
            .max_by_key(|r| r.literal_count())
            .ok_or_else(|| ContractError::NotFound {
                path: path.to_string(),
            })?;

        route
            .operation(method)
            .or_else(|| {
                // HEAD is served by GET handlers
                (*method == Method::HEAD)
                    .then(|| route.operation(&Method::GET))
                    .flatten()
            })
            .ok_or_else(|| ContractError::MethodNotAllowed {
                method: method.clone(),
                path: path.to_string(),
            })
    }
}

impl Route {
    fn matches(&self, segments: &[&str]) -> bool {
        self.segments.len() == segments.len()
            && self.segments.iter().zip(segments).all(|(tpl, s)| match tpl {
                Segment::Literal(lit) => lit == s,
                Segment::Param => !s.is_empty(),
            })
    }

    fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    fn operation(&self, method: &Method) -> Option<&OperationRules> {
        self.operations
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, rules)| rules)
    }
}

impl OperationRules {
    fn compile(
        label: String,
        op: &Operation,
        path_params: &[Parameter],
        security: Option<&[SecurityRequirement]>,
        components: &Components,
    ) -> Result<Self, ContractError> {
        // operation-level parameters override path-level ones with the same name + location
        let mut params: Vec<&Parameter> = path_params
            .iter()
            .filter(|p| {
                !op.parameters
                    .iter()
                    .any(|o| o.name == p.name && o.location == p.location)
            })
            .collect();
        params.extend(op.parameters.iter());

        let mut required_headers = Vec::new();
        let mut required_query = Vec::new();
        for param in params.into_iter().filter(|p| p.required) {
            match param.location {
                ParameterLocation::Header => {
                    let name = param.name.to_ascii_lowercase();
                    if RESERVED_HEADER_PARAMS.contains(&name.as_str()) {
                        continue;
                    }
                    let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                        ContractError::Invalid(format!("{label}: bad header name '{}'", param.name))
                    })?;
                    required_headers.push(name);
                }
                ParameterLocation::Query => required_query.push(param.name.clone()),
                // path params are enforced by template matching; cookies are not checked
                ParameterLocation::Path | ParameterLocation::Cookie => {}
            }
        }

        let bearer_required = match security {
            Some(requirements) => bearer_required(&label, requirements, components)?,
            None => false,
        };

        let body = match &op.request_body {
            Some(rb) => {
                let schema = rb
                    .json_schema()
                    .map(|schema| compile_schema(&label, schema, components))
                    .transpose()?;
                Some(BodyRules {
                    required: rb.required,
                    schema,
                })
            }
            None => None,
        };

        Ok(Self {
            label,
            bearer_required,
            required_headers,
            required_query,
            body,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn check_parameters(
        &self,
        headers: &HeaderMap,
        query: Option<&str>,
    ) -> Result<(), ContractError> {
        if self.bearer_required {
            let has_bearer = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.get(..7))
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("bearer "));
            if !has_bearer {
                return Err(ContractError::Violation(
                    "authorization header with scheme 'Bearer' required".into(),
                ));
            }
        }

        if let Some(missing) = self.required_headers.iter().find(|h| !headers.contains_key(*h)) {
            return Err(ContractError::Violation(format!(
                "missing required header '{missing}'"
            )));
        }

        if !self.required_query.is_empty() {
            let present: Vec<String> = url::form_urlencoded::parse(query.unwrap_or("").as_bytes())
                .map(|(k, _)| k.into_owned())
                .collect();
            if let Some(missing) = self.required_query.iter().find(|q| !present.contains(*q)) {
                return Err(ContractError::Violation(format!(
                    "missing required query parameter '{missing}'"
                )));
            }
        }

        Ok(())
    }

    /// Whether the body has to be buffered for `check_body`.
    pub fn inspects_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn check_body(&self, body: &[u8]) -> Result<(), ContractError> {
        let Some(rules) = &self.body else {
            return Ok(());
        };

        if body.is_empty() {
            if rules.required {
                return Err(ContractError::Violation("request body is required".into()));
            }
            return Ok(());
        }

        let Some(schema) = &rules.schema else {
            return Ok(());
        };

        let instance: Value = serde_json::from_slice(body)
            .map_err(|e| ContractError::Violation(format!("request body is not valid JSON: {e}")))?;

        let violations: Vec<String> = schema
            .iter_errors(&instance)
            .map(|e| format!("{}: {}", e.instance_path, e))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ContractError::Violation(format!(
                "request body violates schema: {}",
                violations.join("; ")
            )))
        }
    }
}

/// Every alternative must include an http bearer scheme; `{}` makes auth optional.
fn bearer_required(
    label: &str,
    requirements: &[SecurityRequirement],
    components: &Components,
) -> Result<bool, ContractError> {
    if requirements.is_empty() {
        return Ok(false);
    }

    let mut required = true;
    for alternative in requirements {
        let mut has_bearer = false;
        for name in alternative.keys() {
            let scheme = components.security_schemes.get(name).ok_or_else(|| {
                ContractError::Invalid(format!("{label}: unknown security scheme '{name}'"))
            })?;
            has_bearer |= scheme.is_http_bearer();
        }
        required &= has_bearer;
    }

    Ok(required)
}

/// Compiles a body schema.
///
/// `#/components/schemas/..` refs resolve against the document's components.
fn compile_schema(
    label: &str,
    schema: &Value,
    components: &Components,
) -> Result<Validator, ContractError> {
    let mut root = schema.clone();
    if let Value::Object(map) = &mut root
        && !components.schemas.is_empty()
        && !map.contains_key("components")
    {
        map.insert(
            "components".to_string(),
            serde_json::json!({ "schemas": components.schemas }),
        );
    }

    jsonschema::validator_for(&root)
        .map_err(|e| ContractError::Invalid(format!("{label}: invalid request schema: {e}")))
}

fn split_path(path: &str) -> Vec<&str> {
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}
