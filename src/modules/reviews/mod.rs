pub mod models;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::Module;
use serde_json::json;

use service::ReviewService;

pub struct ReviewsModule {
    service: ReviewService,
}

impl ReviewsModule {
    pub fn new(service: ReviewService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for ReviewsModule {
    fn name(&self) -> &'static str {
        "reviews"
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({ "$ref": "#/components/responses/Error" });
        let isbn = json!({ "name": "isbn", "in": "path", "required": true, "schema": { "type": "string" } });
        let body = json!({
            "required": true,
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ReviewRequest" } } }
        });
        let review = json!({ "application/json": { "schema": { "$ref": "#/components/schemas/Review" } } });

        Some(json!({
            "paths": {
                "/{isbn}": {
                    "get": {
                        "summary": "List the reviews of a book",
                        "tags": ["Reviews"],
                        "parameters": [isbn],
                        "responses": {
                            "200": {
                                "description": "Reviews in id order",
                                "content": { "application/json": { "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Review" } } } }
                            },
                            "401": error,
                            "404": error
                        }
                    },
                    "post": {
                        "summary": "Review a book",
                        "tags": ["Reviews"],
                        "parameters": [isbn],
                        "requestBody": body,
                        "responses": {
                            "201": { "description": "Created review", "content": review },
                            "400": error,
                            "401": error,
                            "404": error
                        }
                    }
                },
                "/{isbn}/{review_id}": {
                    "put": {
                        "summary": "Edit a review of a book",
                        "tags": ["Reviews"],
                        "parameters": [
                            isbn,
                            { "name": "review_id", "in": "path", "required": true, "schema": { "type": "integer", "format": "int64" } }
                        ],
                        "requestBody": body,
                        "responses": {
                            "200": { "description": "Updated review", "content": review },
                            "400": error,
                            "401": error,
                            "404": error,
                            "409": error
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Review": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "reviewerName": { "type": "string" },
                            "content": { "type": "string" },
                            "bookIsbn": { "type": "string" }
                        },
                        "required": ["id", "reviewerName", "content", "bookIsbn"]
                    },
                    "ReviewRequest": {
                        "type": "object",
                        "properties": {
                            "reviewerName": { "type": "string" },
                            "content": { "type": "string" }
                        },
                        "required": ["reviewerName", "content"]
                    }
                }
            }
        }))
    }
}

pub fn create_module(service: ReviewService) -> Arc<dyn Module> {
    Arc::new(ReviewsModule::new(service))
}
