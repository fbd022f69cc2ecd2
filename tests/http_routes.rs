use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use line_gateway::app::{build_router, build_state};
use line_gateway::config::Config;
use line_gateway::services::auth::{
    BearerStrategy, FixedTokenVerifier, Identity, TokenVerifier, VerifierError,
};
use line_gateway::services::contract::{ContractDocument, ContractValidator};
use line_gateway::services::example::{ExampleService, ServiceError};
use line_gateway::state::AppState;

/// Counts invocations; optionally fails.
#[derive(Default)]
struct CountingService {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl ExampleService for CountingService {
    async fn run(&self, _identity: &Identity) -> Result<(), ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ServiceError::Downstream("upstream exploded".into()));
        }
        Ok(())
    }
}

struct BrokenVerifier;

#[async_trait]
impl TokenVerifier for BrokenVerifier {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn verify(&self, _token: &str) -> Result<Option<Identity>, VerifierError> {
        Err(VerifierError::UnexpectedStatus(503))
    }
}

fn shipped_contract() -> Arc<ContractValidator> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("openapi.yaml");
    Arc::new(ContractValidator::load(&path).unwrap())
}

fn app_with(
    contract: Arc<ContractValidator>,
    verifier: Arc<dyn TokenVerifier>,
    service: Arc<CountingService>,
) -> Router {
    let auth = Arc::new(BearerStrategy::new(verifier));
    let state = AppState::new(contract, auth, service);
    build_router(state)
}

fn test_app() -> (Router, Arc<CountingService>) {
    let service = Arc::new(CountingService::default());
    let app = app_with(
        shipped_contract(),
        Arc::new(FixedTokenVerifier::new("HogeHogeHoge")),
        service.clone(),
    );
    (app, service)
}

fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_is_ok_regardless_of_headers() {
    let (app, _) = test_app();

    for auth in [None, Some("Bearer abc"), Some("garbage")] {
        let (status, body) = send(app.clone(), get("/health", auth)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "ok"}));
    }
}

#[tokio::test]
async fn missing_authorization_is_401() {
    let (app, service) = test_app();

    let (status, body) = send(app, get("/v1/test", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"message": "Unauthorized"}));
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn short_token_is_unauthenticated() {
    let (app, service) = test_app();

    let (status, body) = send(app, get("/v1/test", Some("Bearer abc"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"message": "Unauthorized"}));
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn accepted_token_returns_line_id() {
    let (app, service) = test_app();

    let (status, body) = send(app, get("/v1/test", Some("Bearer abcd1234"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Your LINE ID is 'HogeHogeHoge'"}));
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn non_bearer_scheme_is_401() {
    let (app, service) = test_app();

    let (status, body) = send(app, get("/v1/test", Some("Basic dXNlcjpwYXNz"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"message": "Unauthorized"}));
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn lowercase_bearer_passes_contract_but_not_strategy() {
    // contract accepts the scheme case-insensitively; the strategy requires the literal prefix
    let (app, service) = test_app();

    let (status, _) = send(app, get("/v1/test", Some("bearer abcd1234"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_routes_are_404() {
    let (app, _) = test_app();

    for uri in ["/nope", "/v1/nope", "/v1/test/extra"] {
        let (status, body) = send(app.clone(), get(uri, Some("Bearer abcd1234"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({"message": "Not Found"}));
    }
}

#[tokio::test]
async fn undeclared_method_is_405() {
    let (app, service) = test_app();

    let req = Request::builder()
        .method("POST")
        .uri("/v1/test")
        .header("authorization", "Bearer abcd1234")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"message": "Method Not Allowed"}));
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wrong_method_on_health_is_405_json() {
    let (app, _) = test_app();

    for method in ["POST", "DELETE"] {
        let req = Request::builder()
            .method(method)
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app.clone(), req).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(body, json!({"message": "Method Not Allowed"}));
    }
}

#[tokio::test]
async fn verifier_failure_is_500() {
    let service = Arc::new(CountingService::default());
    let app = app_with(
        shipped_contract(),
        Arc::new(BrokenVerifier),
        service.clone(),
    );

    let (status, body) = send(app, get("/v1/test", Some("Bearer abcd1234"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "Internal Server Error"}));
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn service_failure_is_500() {
    let service = Arc::new(CountingService {
        fail: true,
        ..Default::default()
    });
    let app = app_with(
        shipped_contract(),
        Arc::new(FixedTokenVerifier::new("HogeHogeHoge")),
        service.clone(),
    );

    let (status, body) = send(app, get("/v1/test", Some("Bearer abcd1234"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "Internal Server Error"}));
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn contract_violation_is_rejected_before_handler() {
    let doc = ContractDocument::from_yaml_str(
        r#"
openapi: 3.0.3
info: { title: t, version: "1" }
paths:
  /v1/test:
    get:
      parameters:
        - { name: X-Channel, in: header, required: true }
      responses: { "200": { description: ok } }
"#,
    )
    .unwrap();
    let contract = Arc::new(ContractValidator::compile(&doc).unwrap());
    let service = Arc::new(CountingService::default());
    let app = app_with(
        contract,
        Arc::new(FixedTokenVerifier::new("HogeHogeHoge")),
        service.clone(),
    );

    let (status, body) = send(app.clone(), get("/v1/test", Some("Bearer abcd1234"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"message": "Unauthorized"}));
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);

    let req = Request::builder()
        .uri("/v1/test")
        .header("authorization", "Bearer abcd1234")
        .header("x-channel", "web")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn repeated_requests_yield_identical_responses() {
    let (app, _) = test_app();

    for auth in [None, Some("Bearer abc"), Some("Bearer abcd1234")] {
        let first = send(app.clone(), get("/v1/test", auth)).await;
        let second = send(app.clone(), get("/v1/test", auth)).await;
        assert_eq!(first, second);
    }
}

#[tokio::test]
async fn request_id_is_propagated() {
    let (app, _) = test_app();

    let req = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn bootstrap_builds_state_from_config() {
    let contract = Path::new(env!("CARGO_MANIFEST_DIR")).join("openapi.yaml");
    let contract = contract.to_string_lossy().into_owned();
    let config = Config::from_lookup(|key| match key {
        "OPENAPI_SPEC_PATH" => Some(contract.clone()),
        "FIXED_USER_ID" => Some("U-bootstrap".to_string()),
        _ => None,
    })
    .unwrap();

    let app = build_router(build_state(&config).unwrap());
    let (status, body) = send(app, get("/v1/test", Some("Bearer abcd1234"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Your LINE ID is 'U-bootstrap'"}));
}

#[tokio::test]
async fn bootstrap_fails_on_missing_contract() {
    let config = Config::from_lookup(|key| match key {
        "OPENAPI_SPEC_PATH" => Some("/definitely/not/here.yaml".to_string()),
        _ => None,
    })
    .unwrap();

    assert!(build_state(&config).is_err());
}
