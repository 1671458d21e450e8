pub mod models;
pub mod routes;
pub mod search;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Module};
use serde_json::json;

use service::BookService;

/// Book CRUD and search under `/api/books`.
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    pub fn new(service: BookService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            default_page_size = ctx.settings.paging.default_page_size,
            max_page_size = ctx.settings.paging.max_page_size,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let query = |name: &str, description: &str| {
            json!({
                "name": name,
                "in": "query",
                "required": false,
                "description": description,
                "schema": { "type": "string" }
            })
        };
        let isbn_path = json!({
            "name": "isbn", "in": "path", "required": true, "schema": { "type": "string" }
        });
        let error = json!({ "$ref": "#/components/responses/Error" });
        let book_body = |schema: &str| {
            json!({
                "required": true,
                "content": { "application/json": { "schema": { "$ref": format!("#/components/schemas/{}", schema) } } }
            })
        };
        let book_response = |description: &str| {
            json!({
                "description": description,
                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Book" } } }
            })
        };

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "Search books",
                        "tags": ["Books"],
                        "parameters": [
                            query("isbn", "Case-insensitive ISBN substring"),
                            query("author", "Case-insensitive author name substring"),
                            query("title", "Case-insensitive title substring"),
                            query("search", "Accepted, currently ignored"),
                            query("page-no", "Zero-based page index"),
                            query("page-size", "Page size, clamped to the configured maximum"),
                            query("sort", "field,direction such as title,asc")
                        ],
                        "responses": {
                            "200": {
                                "description": "One page of books",
                                "content": { "application/json": { "schema": { "$ref": "#/components/schemas/BookPage" } } }
                            },
                            "400": error,
                            "401": error
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": book_body("CreateBook"),
                        "responses": {
                            "201": book_response("Created book"),
                            "400": error,
                            "401": error,
                            "404": error,
                            "409": error
                        }
                    }
                },
                "/{isbn}": {
                    "get": {
                        "summary": "Get a book by ISBN",
                        "tags": ["Books"],
                        "parameters": [isbn_path],
                        "responses": {
                            "200": book_response("Book"),
                            "400": error,
                            "401": error,
                            "404": error
                        }
                    },
                    "put": {
                        "summary": "Replace a book's title and author",
                        "tags": ["Books"],
                        "parameters": [isbn_path],
                        "requestBody": book_body("UpdateBook"),
                        "responses": {
                            "200": book_response("Updated book"),
                            "400": error,
                            "401": error,
                            "404": error
                        }
                    },
                    "delete": {
                        "summary": "Delete a book and its reviews",
                        "tags": ["Books"],
                        "parameters": [isbn_path],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "401": error,
                            "404": error
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "isbn": { "type": "string" },
                            "title": { "type": "string" },
                            "authorId": { "type": "integer", "format": "int64" },
                            "authorName": { "type": "string" }
                        },
                        "required": ["isbn", "title", "authorId", "authorName"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "isbn": { "type": "string" },
                            "title": { "type": "string" },
                            "authorId": { "type": "integer", "format": "int64", "minimum": 1 }
                        },
                        "required": ["isbn", "title", "authorId"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": {
                            "isbn": { "type": "string", "description": "Ignored; the path ISBN wins" },
                            "title": { "type": "string" },
                            "authorId": { "type": "integer", "format": "int64", "minimum": 1 }
                        },
                        "required": ["title", "authorId"]
                    },
                    "BookPage": {
                        "type": "object",
                        "properties": {
                            "content": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } },
                            "totalElements": { "type": "integer", "format": "int64" },
                            "totalPages": { "type": "integer", "format": "int64" },
                            "number": { "type": "integer", "format": "int32" },
                            "size": { "type": "integer", "format": "int32" },
                            "numberOfElements": { "type": "integer", "format": "int32" },
                            "first": { "type": "boolean" },
                            "last": { "type": "boolean" },
                            "empty": { "type": "boolean" }
                        }
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

pub fn create_module(service: BookService) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(service))
}
