pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{settings::CatalogSettings, InitCtx, Module};

use store::BookStore;

/// Book catalog module serving CRUD routes over an in-memory collection
pub struct BooksModule {
    store: Arc<BookStore>,
}

impl BooksModule {
    pub fn new(store: Arc<BookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    fn mount_path(&self) -> String {
        String::new()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.store.len().await;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            seeded = ctx.settings.catalog.seed,
            books,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": paths(),
            "components": { "schemas": schemas() }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let books = self.store.len().await;
        tracing::info!(
            module = self.name(),
            books,
            "books module stopped"
        );
        Ok(())
    }
}

fn paths() -> serde_json::Value {
    json!({
        "/books": {
            "get": {
                "summary": "List all books",
                "tags": ["Books"],
                "responses": {
                    "200": books_response("All books in insertion order")
                }
            }
        },
        "/books/": {
            "get": {
                "summary": "Filter books by rating",
                "tags": ["Books"],
                "parameters": [{
                    "name": "book_rating",
                    "in": "query",
                    "required": true,
                    "schema": { "type": "integer", "minimum": 1, "maximum": 5 }
                }],
                "responses": {
                    "200": books_response("Books with the given rating"),
                    "422": error_response("Validation error")
                }
            }
        },
        "/books/publish/": {
            "get": {
                "summary": "Filter books by publication year",
                "tags": ["Books"],
                "parameters": [{
                    "name": "published_date",
                    "in": "query",
                    "required": true,
                    "schema": { "type": "integer", "minimum": 2000, "maximum": 2030 }
                }],
                "responses": {
                    "200": books_response("Books published in the given year"),
                    "422": error_response("Validation error")
                }
            }
        },
        "/books/{id}": {
            "parameters": [{
                "name": "id",
                "in": "path",
                "required": true,
                "schema": { "type": "integer", "minimum": 1 }
            }],
            "get": {
                "summary": "Get a book by id",
                "tags": ["Books"],
                "responses": {
                    "200": book_response("The book"),
                    "404": error_response("Item not found"),
                    "422": error_response("Validation error")
                }
            },
            "patch": {
                "summary": "Partially update a book",
                "tags": ["Books"],
                "requestBody": request_body("BookPatch"),
                "responses": {
                    "200": book_response("The updated book"),
                    "404": error_response("Item not found"),
                    "422": error_response("Validation error")
                }
            },
            "delete": {
                "summary": "Delete a book",
                "tags": ["Books"],
                "responses": {
                    "204": { "description": "Book deleted" },
                    "404": error_response("Item not found"),
                    "422": error_response("Validation error")
                }
            }
        },
        "/create-book": {
            "post": {
                "summary": "Create a book",
                "tags": ["Books"],
                "requestBody": request_body("BookRequest"),
                "responses": {
                    "201": { "description": "Book created" },
                    "422": error_response("Validation error")
                }
            }
        },
        "/books/update_book": {
            "put": {
                "summary": "Replace a book",
                "tags": ["Books"],
                "requestBody": request_body("BookRequest"),
                "responses": {
                    "204": { "description": "Book replaced" },
                    "404": error_response("Item not found"),
                    "422": error_response("Validation error")
                }
            }
        }
    })
}

fn schemas() -> serde_json::Value {
    json!({
        "Book": {
            "type": "object",
            "properties": {
                "id": { "type": "integer", "description": "Unique identifier for the book" },
                "title": { "type": "string" },
                "author": { "type": "string" },
                "description": { "type": "string" },
                "rating": { "type": "integer" },
                "published_date": { "type": "integer" }
            },
            "required": ["id", "title", "author", "description", "rating", "published_date"]
        },
        "BookRequest": {
            "type": "object",
            "properties": {
                "id": { "type": "integer", "description": "Ignored on create; selects the book on update" },
                "title": { "type": "string", "minLength": 3 },
                "author": { "type": "string", "minLength": 1 },
                "description": { "type": "string", "minLength": 1, "maxLength": 100 },
                "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                "published_date": { "type": "integer", "minimum": 2000, "maximum": 2030 }
            },
            "required": ["title", "author", "description", "rating", "published_date"],
            "example": {
                "title": "A new book",
                "author": "codingwithroby",
                "description": "A new description of a book",
                "rating": 5,
                "published_date": 2029
            }
        },
        "BookPatch": {
            "type": "object",
            "description": "Fields to overwrite; null, empty and zero values are ignored",
            "properties": {
                "title": { "type": ["string", "null"] },
                "author": { "type": ["string", "null"] },
                "description": { "type": ["string", "null"] },
                "rating": { "type": ["integer", "null"] },
                "published_date": { "type": ["integer", "null"] }
            }
        }
    })
}

fn book_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Book" }
            }
        }
    })
}

fn books_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "array",
                    "items": { "$ref": "#/components/schemas/Book" }
                }
            }
        }
    })
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn request_body(schema: &str) -> serde_json::Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{}", schema) }
            }
        }
    })
}

/// Create the books module, seeded according to `settings`
pub fn create_module(settings: &CatalogSettings) -> Arc<dyn Module> {
    let store = if settings.seed {
        BookStore::seeded()
    } else {
        BookStore::new()
    };
    Arc::new(BooksModule::new(Arc::new(store)))
}
