//! Router builder for the BiblioTech HTTP server

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use bibliotech_kernel::settings::OpenApiSettings;
use bibliotech_kernel::ModuleRegistry;

use crate::MakeRequestUuid;

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

    /// Mount a module's router under `base_path`
    pub fn mount_module(mut self, base_path: &str, module_router: Router) -> Self {
        self.router = self.router.nest(base_path, module_router);
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add CORS middleware. Every origin, method and header is allowed;
    /// the service performs no authentication of its own.
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
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        self
    }

    /// Add timeout middleware
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self
            .router
            .layer(TimeoutLayer::new(Duration::from_millis(timeout_ms)));
        self
    }

    /// Cap request bodies, which bounds multipart uploads
    pub fn with_body_limit(mut self, max_bytes: usize) -> Self {
        self.router = self.router.layer(DefaultBodyLimit::max(max_bytes));
        self
    }

    /// Add OpenAPI documentation by collecting specs from all modules
    pub fn with_openapi(mut self, registry: &ModuleRegistry, settings: &OpenApiSettings) -> Self {
        let openapi_spec = openapi_document(registry, settings);

        // SwaggerUI needs a typed document; fall back to a bare one if a
        // module fragment does not fit the schema.
        let openapi_obj: utoipa::openapi::OpenApi = serde_json::from_value(openapi_spec.clone())
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "merged OpenAPI document is not valid; serving a bare one to Swagger UI");
                utoipa::openapi::OpenApiBuilder::new()
                    .info(
                        utoipa::openapi::InfoBuilder::new()
                            .title(settings.title.clone())
                            .version(settings.version.clone())
                            .build(),
                    )
                    .build()
            });

        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi_obj),
        );

        // Also serve the raw JSON spec for external consumers
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

/// Merge the base document with every module's OpenAPI fragment.
///
/// Module paths are prefixed with the module's base path.
pub fn openapi_document(registry: &ModuleRegistry, settings: &OpenApiSettings) -> serde_json::Value {
    let mut openapi_spec = serde_json::json!({
        "openapi": "3.0.3",
        "info": {
            "title": settings.title,
            "version": settings.version,
            "description": settings.description
        },
        "paths": {},
        "components": {
            "schemas": {}
        }
    });

    openapi_spec["components"]["schemas"]["ErrorResponse"] = serde_json::json!({
        "type": "object",
        "properties": {
            "error": {
                "type": "object",
                "properties": {
                    "code": { "type": "string" },
                    "message": { "type": "string" },
                    "details": { "type": "array", "items": {} },
                    "trace_id": { "type": "string" },
                    "timestamp": { "type": "string" }
                },
                "required": ["code", "message", "trace_id", "timestamp"]
            }
        },
        "required": ["error"]
    });

    openapi_spec["paths"]["/healthz"] = serde_json::json!({
        "get": {
            "summary": "Health check",
            "tags": ["Health"],
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
        let base_path = module.base_path();

        if let Some(paths) = module_spec.get("paths").and_then(|p| p.as_object()) {
            for (path, path_item) in paths {
                openapi_spec["paths"][join_path(&base_path, path)] = path_item.clone();
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

fn join_path(base_path: &str, path: &str) -> String {
    match path {
        "" | "/" => base_path.to_string(),
        _ => format!("{}{}", base_path.trim_end_matches('/'), path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use bibliotech_kernel::Module;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct ShelfModule;

    #[async_trait]
    impl Module for ShelfModule {
        fn name(&self) -> &'static str {
            "shelf"
        }

        fn base_path(&self) -> String {
            "/estantes".to_string()
        }

        fn openapi(&self) -> Option<serde_json::Value> {
            Some(serde_json::json!({
                "paths": {
                    "/": { "get": { "responses": { "200": { "description": "OK" } } } },
                    "/{id}": { "get": { "responses": { "200": { "description": "OK" } } } }
                },
                "components": { "schemas": { "Shelf": { "type": "object" } } }
            }))
        }
    }

    fn registry() -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry.register_custom(Arc::new(ShelfModule));
        registry
    }

    #[test]
    fn join_path_avoids_trailing_slash() {
        assert_eq!(join_path("/libros", "/"), "/libros");
        assert_eq!(join_path("/libros", "/{id}"), "/libros/{id}");
        assert_eq!(join_path("/libros/", "/stock"), "/libros/stock");
    }

    #[test]
    fn openapi_document_merges_module_fragments() {
        let doc = openapi_document(&registry(), &OpenApiSettings::default());

        assert!(doc["paths"]["/healthz"].is_object());
        assert!(doc["paths"]["/estantes"].is_object());
        assert!(doc["paths"]["/estantes/{id}"].is_object());
        assert!(doc["components"]["schemas"]["Shelf"].is_object());
        assert!(doc["components"]["schemas"]["ErrorResponse"].is_object());
        assert_eq!(doc["info"]["version"], "1.0.0");
    }

    #[tokio::test]
    async fn mounted_module_routes_are_reachable() {
        let module_router = Router::new().route("/", get(|| async { "module" }));

        let router = RouterBuilder::new()
            .mount_module("/estantes", module_router)
            .with_request_id()
            .build();

        let response = router
            .oneshot(Request::get("/estantes").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn openapi_json_is_served() {
        let router = RouterBuilder::new()
            .with_openapi(&registry(), &OpenApiSettings::default())
            .build();

        let response = router
            .oneshot(
                Request::get("/docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["paths"]["/estantes/{id}"].is_object());
    }
}
