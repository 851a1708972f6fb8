//! Book catalog HTTP tests, driven in-process through the full router.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shelf_kernel::settings::Settings;
use tower::ServiceExt;

fn app_with(settings: Settings) -> Router {
    let registry = shelf_app::build_registry(&settings);
    shelf_http::build_router(&registry, &settings)
}

fn app() -> Router {
    app_with(Settings::default())
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn new_book() -> Value {
    json!({
        "title": "New",
        "author": "A",
        "description": "D",
        "rating": 5,
        "published_date": 2025
    })
}

fn ids(books: &Value) -> Vec<i64> {
    books
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn lists_seed_books_in_order() {
    let app = app();
    let (status, books) = call(&app, Method::GET, "/books", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&books), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(books[0]["title"], "Computer Science Pro");
    assert_eq!(books[5]["rating"], 4);
    assert_eq!(books[5]["published_date"], 2026);
}

#[tokio::test]
async fn unseeded_catalog_starts_empty() {
    let mut settings = Settings::default();
    settings.catalog.seed = false;
    let app = app_with(settings);

    let (_, books) = call(&app, Method::GET, "/books", None).await;
    assert_eq!(books, json!([]));

    let (status, _) = call(&app, Method::POST, "/create-book", Some(new_book())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, book) = call(&app, Method::GET, "/books/1", None).await;
    assert_eq!(book["title"], "New");
}

#[tokio::test]
async fn create_get_delete_scenario() {
    let app = app();

    let (status, body) = call(&app, Method::POST, "/create-book", Some(new_book())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, Value::Null);

    let (status, book) = call(&app, Method::GET, "/books/7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["id"], 7);
    assert_eq!(book["title"], "New");
    assert_eq!(book["author"], "A");
    assert_eq!(book["description"], "D");
    assert_eq!(book["rating"], 5);
    assert_eq!(book["published_date"], 2025);

    let (status, _) = call(&app, Method::DELETE, "/books/7", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, Method::GET, "/books/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Item not found");
}

#[tokio::test]
async fn creates_append_in_insertion_order() {
    let app = app();
    for title in ["First", "Second", "Third"] {
        let mut body = new_book();
        body["title"] = json!(title);
        let (status, _) = call(&app, Method::POST, "/create-book", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, books) = call(&app, Method::GET, "/books", None).await;
    assert_eq!(ids(&books), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(books[8]["title"], "Third");
}

#[tokio::test]
async fn create_ignores_client_id() {
    let app = app();
    let mut body = new_book();
    body["id"] = json!(1);

    let (status, _) = call(&app, Method::POST, "/create-book", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, first) = call(&app, Method::GET, "/books/1", None).await;
    assert_eq!(first["title"], "Computer Science Pro");
    let (_, created) = call(&app, Method::GET, "/books/7", None).await;
    assert_eq!(created["title"], "New");
}

#[tokio::test]
async fn create_rejects_out_of_bounds_fields() {
    let app = app();
    let cases = [
        ("title", json!("ab")),
        ("author", json!("")),
        ("description", json!("x".repeat(101))),
        ("rating", json!(0)),
        ("rating", json!(6)),
        ("published_date", json!(1999)),
        ("published_date", json!(2031)),
    ];

    for (field, value) in cases {
        let mut body = new_book();
        body[field] = value;
        let (status, error) = call(&app, Method::POST, "/create-book", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{field}");
        assert_eq!(error["error"]["details"][0]["field"], field);
    }

    let (_, books) = call(&app, Method::GET, "/books", None).await;
    assert_eq!(books.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn create_rejects_malformed_bodies() {
    let app = app();

    let (status, _) = call(
        &app,
        Method::POST,
        "/create-book",
        Some(json!({ "title": "New", "author": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut wrong_type = new_book();
    wrong_type["rating"] = json!("five");
    let (status, _) = call(&app, Method::POST, "/create-book", Some(wrong_type)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_by_id_validates_and_reports_missing() {
    let app = app();

    let (status, _) = call(&app, Method::GET, "/books/0", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = call(&app, Method::GET, "/books/abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = call(&app, Method::GET, "/books/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn filters_by_every_rating() {
    let app = app();
    let (_, all) = call(&app, Method::GET, "/books", None).await;

    for rating in 1..=5 {
        let uri = format!("/books/?book_rating={rating}");
        let (status, books) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let expected: Vec<i64> = all
            .as_array()
            .unwrap()
            .iter()
            .filter(|b| b["rating"] == rating)
            .map(|b| b["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids(&books), expected, "rating {rating}");
    }

    let (_, none) = call(&app, Method::GET, "/books/?book_rating=1", None).await;
    assert_eq!(none, json!([]));

    let (status, _) = call(&app, Method::GET, "/books/?book_rating=6", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn filters_by_published_year() {
    let app = app();

    let (status, books) = call(&app, Method::GET, "/books/publish/?published_date=2030", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&books), vec![1, 2]);

    let (_, books) = call(&app, Method::GET, "/books/publish/?published_date=2000", None).await;
    assert_eq!(books, json!([]));

    let (status, _) = call(&app, Method::GET, "/books/publish/?published_date=1999", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn full_update_replaces_in_place() {
    let app = app();
    let mut body = new_book();
    body["id"] = json!(2);
    body["title"] = json!("Rewritten");

    let (status, _) = call(&app, Method::PUT, "/books/update_book", Some(body)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, books) = call(&app, Method::GET, "/books", None).await;
    assert_eq!(ids(&books), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(books[1]["title"], "Rewritten");
    assert_eq!(books[1]["rating"], 5);
}

#[tokio::test]
async fn full_update_of_unknown_book_is_404() {
    let app = app();

    let mut body = new_book();
    body["id"] = json!(42);
    let (status, _) = call(&app, Method::PUT, "/books/update_book", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::PUT, "/books/update_book", Some(new_book())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_update_validates_fields() {
    let app = app();
    let mut body = new_book();
    body["id"] = json!(2);
    body["rating"] = json!(10);

    let (status, _) = call(&app, Method::PUT, "/books/update_book", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn empty_patch_leaves_book_unchanged() {
    let app = app();
    let (_, before) = call(&app, Method::GET, "/books/4", None).await;

    let (status, after) = call(&app, Method::PATCH, "/books/4", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after, before);
}

#[tokio::test]
async fn patch_changes_only_rating() {
    let app = app();

    let (status, book) = call(&app, Method::PATCH, "/books/6", Some(json!({ "rating": 2 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        book,
        json!({
            "id": 6,
            "title": "HP3",
            "author": "Author 3",
            "description": "Book Description",
            "rating": 2,
            "published_date": 2026
        })
    );

    let (_, stored) = call(&app, Method::GET, "/books/6", None).await;
    assert_eq!(stored, book);
}

#[tokio::test]
async fn patch_ignores_nulls_and_empties() {
    let app = app();
    let (_, before) = call(&app, Method::GET, "/books/1", None).await;

    let (status, after) = call(
        &app,
        Method::PATCH,
        "/books/1",
        Some(json!({ "title": null, "author": "", "rating": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after, before);
}

#[tokio::test]
async fn patch_errors() {
    let app = app();

    let (status, _) = call(&app, Method::PATCH, "/books/99", Some(json!({ "rating": 2 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::PATCH, "/books/1", Some(json!({ "rating": 7 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = call(&app, Method::PATCH, "/books/0", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn patch_out_of_bounds_leaves_book_unchanged() {
    let app = app();
    let (_, before) = call(&app, Method::GET, "/books/1", None).await;

    let cases = [
        ("description", json!("x".repeat(101))),
        ("published_date", json!(2031)),
        ("published_date", json!(1999)),
        ("title", json!("ab")),
        ("rating", json!(6)),
    ];

    for (field, value) in cases {
        let mut body = json!({});
        body[field] = value;
        let (status, error) = call(&app, Method::PATCH, "/books/1", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{field}");
        assert_eq!(error["error"]["details"][0]["field"], field);

        let (_, after) = call(&app, Method::GET, "/books/1", None).await;
        assert_eq!(after, before, "{field}");
    }
}

#[tokio::test]
async fn update_book_path_only_accepts_put() {
    let app = app();

    for method in [Method::GET, Method::PATCH, Method::DELETE] {
        let (status, _) = call(&app, method.clone(), "/books/update_book", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
    }

    let (_, books) = call(&app, Method::GET, "/books", None).await;
    assert_eq!(ids(&books), vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn delete_missing_book_leaves_collection_unchanged() {
    let app = app();
    let (_, before) = call(&app, Method::GET, "/books", None).await;

    let (status, body) = call(&app, Method::DELETE, "/books/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Item not found");

    let (_, after) = call(&app, Method::GET, "/books", None).await;
    assert_eq!(after, before);
}

#[tokio::test]
async fn delete_preserves_order() {
    let app = app();

    let (status, _) = call(&app, Method::DELETE, "/books/2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, books) = call(&app, Method::GET, "/books", None).await;
    assert_eq!(ids(&books), vec![1, 3, 4, 5, 6]);
}

#[tokio::test]
async fn openapi_lists_catalog_routes() {
    let app = app();
    let (status, doc) = call(&app, Method::GET, "/docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    for path in [
        "/books",
        "/books/",
        "/books/{id}",
        "/books/publish/",
        "/create-book",
        "/books/update_book",
    ] {
        assert!(doc["paths"][path].is_object(), "missing {path}");
    }
    assert!(doc["components"]["schemas"]["Book"].is_object());
}
