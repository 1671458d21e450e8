use bookstore_db::AuthorId;
use bookstore_kernel::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};

/// Book joined with its author's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    pub isbn: String,
    pub title: String,
    pub author_id: AuthorId,
    pub author_name: String,
}

/// Body of `POST /api/books`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author_id: Option<AuthorId>,
}

/// Body of `PUT /api/books/{isbn}`. A body `isbn` is accepted and ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author_id: Option<AuthorId>,
}

/// Validated input for creating a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub author_id: AuthorId,
}

/// Validated replacement values for an existing book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookChanges {
    pub title: String,
    pub author_id: AuthorId,
}

fn positive_author(author_id: Option<AuthorId>, errors: &mut Vec<String>) -> AuthorId {
    match author_id {
        Some(id) if id > 0 => id,
        _ => {
            errors.push("Author ID must be positive".to_string());
            0
        }
    }
}

impl CreateBookRequest {
    pub fn validate(self) -> CatalogResult<NewBook> {
        let mut errors = Vec::new();
        if self.isbn.is_none() {
            errors.push("ISBN cannot be null".to_string());
        }
        if self.title.is_none() {
            errors.push("Title cannot be null".to_string());
        }
        let author_id = positive_author(self.author_id, &mut errors);

        if !errors.is_empty() {
            return Err(CatalogError::InvalidInput(errors));
        }
        Ok(NewBook {
            isbn: self.isbn.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            author_id,
        })
    }
}

impl UpdateBookRequest {
    pub fn validate(self) -> CatalogResult<BookChanges> {
        let mut errors = Vec::new();
        if self.title.is_none() {
            errors.push("Title cannot be null".to_string());
        }
        let author_id = positive_author(self.author_id, &mut errors);

        if !errors.is_empty() {
            return Err(CatalogError::InvalidInput(errors));
        }
        Ok(BookChanges {
            title: self.title.unwrap_or_default(),
            author_id,
        })
    }
}
