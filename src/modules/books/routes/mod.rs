//! HTTP handlers for the book catalog.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use shelf_http::{AppResult, ValidatedJson, ValidatedPath, ValidatedQuery};

use super::models::{Book, BookIdPath, BookPatch, BookRequest, PublishedDateQuery, RatingQuery};
use super::store::BookStore;

type Store = State<Arc<BookStore>>;

/// Catalog routes, mounted at the server root.
pub fn router(store: Arc<BookStore>) -> Router {
    Router::new()
        .route("/books", get(read_all_books))
        .route("/books/", get(read_books_by_rating))
        .route("/books/publish/", get(read_books_by_published_date))
        .route("/books/update_book", put(update_book))
        .route(
            "/books/{id}",
            get(read_book).patch(patch_book).delete(delete_book),
        )
        .route("/create-book", post(create_book))
        .with_state(store)
}

async fn read_all_books(State(store): Store) -> Json<Vec<Book>> {
    Json(store.list().await)
}

async fn read_book(
    State(store): Store,
    ValidatedPath(path): ValidatedPath<BookIdPath>,
) -> AppResult<Json<Book>> {
    Ok(Json(store.get(path.id).await?))
}

async fn read_books_by_rating(
    State(store): Store,
    ValidatedQuery(query): ValidatedQuery<RatingQuery>,
) -> Json<Vec<Book>> {
    Json(store.filter_by_rating(query.book_rating).await)
}

async fn read_books_by_published_date(
    State(store): Store,
    ValidatedQuery(query): ValidatedQuery<PublishedDateQuery>,
) -> Json<Vec<Book>> {
    Json(store.filter_by_published_date(query.published_date).await)
}

async fn create_book(
    State(store): Store,
    ValidatedJson(request): ValidatedJson<BookRequest>,
) -> StatusCode {
    store.create(request).await;
    StatusCode::CREATED
}

async fn update_book(
    State(store): Store,
    ValidatedJson(request): ValidatedJson<BookRequest>,
) -> AppResult<StatusCode> {
    store.replace(request).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn patch_book(
    State(store): Store,
    ValidatedPath(path): ValidatedPath<BookIdPath>,
    ValidatedJson(patch): ValidatedJson<BookPatch>,
) -> AppResult<Json<Book>> {
    Ok(Json(store.update(path.id, patch).await?))
}

async fn delete_book(
    State(store): Store,
    ValidatedPath(path): ValidatedPath<BookIdPath>,
) -> AppResult<StatusCode> {
    store.delete(path.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
