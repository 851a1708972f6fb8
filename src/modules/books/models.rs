use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier, assigned by the catalog
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Quality score from 1 to 5
    pub rating: i32,
    /// Year of publication
    pub published_date: i32,
}

impl Book {
    pub fn new(
        id: i64,
        title: &str,
        author: &str,
        description: &str,
        rating: i32,
        published_date: i32,
    ) -> Self {
        Self {
            id,
            title: title.to_string(),
            author: author.to_string(),
            description: description.to_string(),
            rating,
            published_date,
        }
    }
}

/// Body for creating a book or replacing one in full.
///
/// `id` is ignored on create and selects the target on update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, max = 100, message = "Description must be 1-100 characters"))]
    pub description: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(range(
        min = 2000,
        max = 2030,
        message = "Published date must be between 2000 and 2030"
    ))]
    pub published_date: i32,
}

impl BookRequest {
    /// Build the stored record under `id`, discarding any client-supplied id.
    pub fn into_book(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            description: self.description,
            rating: self.rating,
            published_date: self.published_date,
        }
    }
}

/// Partial update. Absent, `null`, empty-string and zero values leave the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BookPatch {
    #[serde(default, deserialize_with = "non_empty_string")]
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    #[validate(length(max = 100, message = "Description must be 1-100 characters"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "non_zero")]
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    #[serde(default, deserialize_with = "non_zero")]
    #[validate(range(
        min = 2000,
        max = 2030,
        message = "Published date must be between 2000 and 2030"
    ))]
    pub published_date: Option<i32>,
}

impl BookPatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.description.is_none()
            && self.rating.is_none()
            && self.published_date.is_none()
    }

    /// Overwrite the fields present in the patch; `id` is never touched.
    pub fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(description) = self.description {
            book.description = description;
        }
        if let Some(rating) = self.rating {
            book.rating = rating;
        }
        if let Some(published_date) = self.published_date {
            book.published_date = published_date;
        }
    }
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn non_zero<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<i32>::deserialize(deserializer)?;
    Ok(value.filter(|v| *v != 0))
}

/// `/books/{id}` path parameter.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookIdPath {
    #[validate(range(min = 1, message = "Book id must be greater than 0"))]
    pub id: i64,
}

/// `?book_rating=` query.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RatingQuery {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub book_rating: i32,
}

/// `?published_date=` query.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PublishedDateQuery {
    #[validate(range(
        min = 2000,
        max = 2030,
        message = "Published date must be between 2000 and 2030"
    ))]
    pub published_date: i32,
}
