//! Router builder for the bookstore HTTP server
//!
//! Layers wrap everything added before them, so callers add routes and the
//! fallback first and layers last, innermost first.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer, extract::Request, http::HeaderValue, middleware,
    routing::get, Router,
};
use bookstore_authz::BasicAuthenticator;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::{NoContext, Timestamp, Uuid};

use bookstore_kernel::ModuleRegistry;

use crate::{auth, fallback};

const API_TITLE: &str = "Bookstore API";
const API_VERSION: &str = "1.0.0";

/// Builder for constructing the main HTTP router
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a route to the router
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router under `/api/{module_name}`
    pub fn mount_module(mut self, module_name: &str, module_router: Router) -> Self {
        let api_path = format!("/api/{}", module_name);
        let module_router = module_router.method_not_allowed_fallback(fallback::method_not_allowed);
        self.router = self.router.nest(&api_path, module_router);
        self
    }

    /// Answer unmatched paths and methods with the error envelope
    pub fn with_fallback(mut self) -> Self {
        self.router = self
            .router
            .method_not_allowed_fallback(fallback::method_not_allowed)
            .fallback(fallback::not_found);
        self
    }

    /// Require HTTP Basic credentials outside the public allowlist
    pub fn with_authentication(mut self, authenticator: Arc<BasicAuthenticator>) -> Self {
        self.router = self.router.layer(middleware::from_fn_with_state(
            authenticator,
            auth::require_authentication,
        ));
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add CORS middleware
    pub fn with_cors(mut self) -> Self {
        self.router = self.router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
        self
    }

    /// Add request ID middleware; the id is echoed back on the response
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        self
    }

    /// Add timeout middleware; an elapsed request answers 408 with the error envelope
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self.router.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(fallback::timed_out))
                .layer(TimeoutLayer::new(Duration::from_millis(timeout_ms))),
        );
        self
    }

    /// Serve the merged OpenAPI document and Swagger UI
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let openapi_spec = openapi_document(registry);

        // Swagger UI needs a typed document; fall back to an empty one rather
        // than refusing to start when a module fragment does not deserialize.
        let openapi_obj: utoipa::openapi::OpenApi = serde_json::from_value(openapi_spec.clone())
            .unwrap_or_else(|error| {
                tracing::warn!(%error, "merged OpenAPI document is not valid; serving a bare one");
                utoipa::openapi::OpenApiBuilder::new()
                    .info(
                        utoipa::openapi::InfoBuilder::new()
                            .title(API_TITLE)
                            .version(API_VERSION)
                            .build(),
                    )
                    .build()
            });

        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi_obj),
        );

        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(openapi_spec.clone()) }),
        );

        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge every module's OpenAPI fragment under its `/api/{module}` prefix.
pub fn openapi_document(registry: &ModuleRegistry) -> serde_json::Value {
    let mut openapi_spec = serde_json::json!({
        "openapi": "3.1.0",
        "info": {
            "title": API_TITLE,
            "version": API_VERSION,
            "description": "Authors, books and reviews of the bookstore catalog"
        },
        "paths": {},
        "components": {
            "schemas": {},
            "securitySchemes": {
                "basicAuth": { "type": "http", "scheme": "basic" }
            }
        },
        "security": [{ "basicAuth": [] }]
    });

    openapi_spec["components"]["schemas"]["ErrorResponse"] = serde_json::json!({
        "type": "object",
        "properties": {
            "statusCode": { "type": "integer", "format": "int32" },
            "message": { "type": "string" },
            "details": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["statusCode", "message", "details"]
    });
    openapi_spec["components"]["responses"]["Error"] = serde_json::json!({
        "description": "Error envelope",
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    });

    openapi_spec["paths"]["/healthz"] = serde_json::json!({
        "get": {
            "summary": "Health check",
            "security": [],
            "responses": {
                "200": {
                    "description": "OK",
                    "content": { "text/plain": { "schema": { "type": "string" } } }
                }
            }
        }
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        if let Some(paths) = module_spec.get("paths").and_then(|p| p.as_object()) {
            for (path, path_item) in paths {
                // "/" is the module root itself
                let suffix = if path == "/" { "" } else { path.as_str() };
                let prefixed_path = format!("/api/{}{}", module.name(), suffix);
                openapi_spec["paths"][prefixed_path] = path_item.clone();
            }
        }

        if let Some(schemas) = module_spec
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(|s| s.as_object())
        {
            for (schema_name, schema_def) in schemas {
                openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    openapi_spec
}

/// Time-ordered request ids
#[derive(Clone, Copy)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let request_id = Uuid::new_v7(Timestamp::now(NoContext))
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorBody;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, StatusCode};
    use bookstore_kernel::settings::AuthSettings;
    use bookstore_kernel::Module;
    use tower::ServiceExt;

    struct ShelfModule;

    #[async_trait]
    impl Module for ShelfModule {
        fn name(&self) -> &'static str {
            "shelves"
        }

        fn routes(&self) -> Router {
            Router::new().route("/", get(|| async { "shelves" }))
        }

        fn openapi(&self) -> Option<serde_json::Value> {
            Some(serde_json::json!({
                "paths": { "/": { "get": { "responses": {} } }, "/{id}": { "get": { "responses": {} } } },
                "components": { "schemas": { "Shelf": { "type": "object" } } }
            }))
        }
    }

    fn registry() -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(ShelfModule)).unwrap();
        registry
    }

    fn app(auth: AuthSettings) -> Router {
        let registry = registry();
        let mut builder = RouterBuilder::new().route("/healthz", get(|| async { "ok" }));
        for module in registry.modules() {
            builder = builder.mount_module(module.name(), module.routes());
        }
        builder
            .with_openapi(&registry)
            .with_fallback()
            .with_authentication(Arc::new(BasicAuthenticator::from_settings(&auth)))
            .with_timeout(5000)
            .with_tracing()
            .with_request_id()
            .with_cors()
            .build()
    }

    async fn error_body(response: axum::response::Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn openapi_paths_are_prefixed_per_module() {
        let spec = openapi_document(&registry());
        assert!(spec["paths"].get("/api/shelves").is_some());
        assert!(spec["paths"].get("/api/shelves/{id}").is_some());
        assert!(spec["paths"].get("/healthz").is_some());
        assert!(spec["components"]["schemas"].get("Shelf").is_some());
        assert!(spec["components"]["schemas"].get("ErrorResponse").is_some());
    }

    #[tokio::test]
    async fn health_is_public_and_carries_request_id() {
        let response = app(AuthSettings::default())
            .oneshot(request(Method::GET, "/healthz"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn protected_route_without_credentials_gets_401_envelope() {
        let response = app(AuthSettings::default())
            .oneshot(request(Method::GET, "/api/shelves"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()["www-authenticate"],
            "Basic realm=\"bookstore\""
        );

        let body = error_body(response).await;
        assert_eq!(body.message, "UNAUTHORIZED");
        assert_eq!(
            body.details,
            vec![bookstore_authz::AUTHENTICATION_REQUIRED.to_string()]
        );
    }

    #[tokio::test]
    async fn unsupported_method_gets_405_envelope() {
        let auth = AuthSettings {
            enabled: false,
            ..AuthSettings::default()
        };
        let response = app(auth)
            .oneshot(request(Method::PATCH, "/api/shelves"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let body = error_body(response).await;
        assert_eq!(body.message, "METHOD_NOT_ALLOWED");
        assert_eq!(body.details, vec!["Request method 'PATCH' is not supported"]);
    }

    #[tokio::test]
    async fn unknown_route_gets_404_envelope() {
        let auth = AuthSettings {
            enabled: false,
            ..AuthSettings::default()
        };
        let response = app(auth)
            .oneshot(request(Method::GET, "/nowhere"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_body(response).await.details, vec!["No endpoint GET /nowhere."]);
    }

    #[tokio::test]
    async fn slow_handler_gets_408_envelope() {
        let app = RouterBuilder::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .with_fallback()
            .with_timeout(20)
            .build();

        let response = app.oneshot(request(Method::GET, "/slow")).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let body = error_body(response).await;
        assert_eq!(body.status_code, 408);
        assert_eq!(body.message, "REQUEST_TIMEOUT");
        assert_eq!(body.details, vec!["Request timed out"]);
    }

    #[tokio::test]
    async fn openapi_json_is_public() {
        let response = app(AuthSettings::default())
            .oneshot(request(Method::GET, "/docs/openapi.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
