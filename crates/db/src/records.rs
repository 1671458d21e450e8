//! Persistent catalog records.

use serde::{Deserialize, Serialize};

/// Store-assigned author identifier.
pub type AuthorId = i64;

/// Store-assigned review identifier.
pub type ReviewId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
}

/// A book keyed by its ISBN. The ISBN never changes once the record exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author_id: AuthorId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub book_isbn: String,
    pub reviewer_name: String,
    pub content: String,
}

/// A review that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub book_isbn: String,
    pub reviewer_name: String,
    pub content: String,
}

impl NewReview {
    pub(crate) fn with_id(self, id: ReviewId) -> Review {
        Review {
            id,
            book_isbn: self.book_isbn,
            reviewer_name: self.reviewer_name,
            content: self.content,
        }
    }
}
