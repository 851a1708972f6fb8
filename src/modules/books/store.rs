//! In-memory book collection.
//!
//! Books are kept in insertion order behind a `tokio::sync::RwLock`. Reads share
//! the lock; every mutation holds the write lock for its whole scan, so
//! concurrent writers are serialized. Lookups are linear scans.

use shelf_http::AppError;
use thiserror::Error;
use tokio::sync::RwLock;

use super::models::{Book, BookPatch, BookRequest};

/// Message returned to clients for every missing book.
pub const NOT_FOUND_MESSAGE: &str = "Item not found";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("book {0} not found")]
    NotFound(i64),

    #[error("update request carries no book id")]
    MissingId,
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        tracing::debug!(error = %err, "catalog lookup failed");
        match err {
            CatalogError::NotFound(_) | CatalogError::MissingId => {
                AppError::not_found(NOT_FOUND_MESSAGE)
            }
        }
    }
}

/// The demonstration books loaded when seeding is enabled.
pub fn seed_books() -> Vec<Book> {
    vec![
        Book::new(1, "Computer Science Pro", "codingwithcoby", "A very nice book!", 5, 2030),
        Book::new(2, "Be Fast with FastAPI", "codingwithcoby", "A great book!", 3, 2030),
        Book::new(3, "Master Endpoints", "codingwithroby", "A awesome book!", 3, 2029),
        Book::new(4, "HP1", "Author 1", "Book Description", 4, 2028),
        Book::new(5, "HP2", "Author 2", "Book Description", 5, 2027),
        Book::new(6, "HP3", "Author 3", "Book Description", 4, 2026),
    ]
}

#[derive(Debug, Default)]
pub struct BookStore {
    books: RwLock<Vec<Book>>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `books` as given; ids are trusted to be unique.
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: RwLock::new(books),
        }
    }

    pub fn seeded() -> Self {
        Self::with_books(seed_books())
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }

    pub async fn list(&self) -> Vec<Book> {
        self.books.read().await.clone()
    }

    pub async fn get(&self, id: i64) -> Result<Book, CatalogError> {
        self.books
            .read()
            .await
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    pub async fn filter_by_rating(&self, rating: i32) -> Vec<Book> {
        self.filter(|book| book.rating == rating).await
    }

    pub async fn filter_by_published_date(&self, published_date: i32) -> Vec<Book> {
        self.filter(|book| book.published_date == published_date)
            .await
    }

    async fn filter<F>(&self, predicate: F) -> Vec<Book>
    where
        F: Fn(&Book) -> bool,
    {
        self.books
            .read()
            .await
            .iter()
            .filter(|book| predicate(book))
            .cloned()
            .collect()
    }

    /// Append a new book and return it with its assigned id.
    pub async fn create(&self, request: BookRequest) -> Book {
        let mut books = self.books.write().await;
        let book = request.into_book(next_id(&books));
        books.push(book.clone());

        tracing::info!(book_id = book.id, total = books.len(), "book created");
        book
    }

    /// Replace the book named by `request.id`, keeping its position.
    pub async fn replace(&self, request: BookRequest) -> Result<Book, CatalogError> {
        let id = request.id.ok_or(CatalogError::MissingId)?;
        let mut books = self.books.write().await;
        let slot = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        *slot = request.into_book(id);

        tracing::info!(book_id = id, "book replaced");
        Ok(slot.clone())
    }

    /// Apply `patch` to the book with `id` and return the result.
    pub async fn update(&self, id: i64, patch: BookPatch) -> Result<Book, CatalogError> {
        let mut books = self.books.write().await;
        let book = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        if patch.is_empty() {
            tracing::debug!(book_id = id, "empty patch, book unchanged");
        } else {
            patch.apply(book);
            tracing::info!(book_id = id, "book patched");
        }

        Ok(book.clone())
    }

    /// Remove the book with `id`; the remaining books keep their order.
    pub async fn delete(&self, id: i64) -> Result<Book, CatalogError> {
        let mut books = self.books.write().await;
        let index = books
            .iter()
            .position(|book| book.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        let removed = books.remove(index);

        tracing::info!(book_id = id, total = books.len(), "book deleted");
        Ok(removed)
    }
}

/// One past the largest id in use, or 1 for an empty collection.
fn next_id(books: &[Book]) -> i64 {
    books.iter().map(|book| book.id).max().map_or(1, |max| max + 1)
}
