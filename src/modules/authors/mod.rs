pub mod models;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Module};
use serde_json::json;

use service::AuthorService;

/// Read-only author lookups under `/api/authors`.
pub struct AuthorsModule {
    service: AuthorService,
}

impl AuthorsModule {
    pub fn new(service: AuthorService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            cache = ctx.settings.cache.enabled,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/{id}": {
                    "get": {
                        "summary": "Get an author by id",
                        "tags": ["Authors"],
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "schema": { "type": "integer", "format": "int64" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "Author",
                                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Author" } } }
                            },
                            "400": { "$ref": "#/components/responses/Error" },
                            "401": { "$ref": "#/components/responses/Error" },
                            "404": { "$ref": "#/components/responses/Error" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "name": { "type": "string" }
                        },
                        "required": ["id", "name"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

pub fn create_module(service: AuthorService) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(service))
}
