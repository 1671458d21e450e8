use bookstore_db::{Review, ReviewId};
use bookstore_kernel::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};

use crate::utils::is_blank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub id: ReviewId,
    pub reviewer_name: String,
    pub content: String,
    pub book_isbn: String,
}

impl From<Review> for ReviewView {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            reviewer_name: review.reviewer_name,
            content: review.content,
            book_isbn: review.book_isbn,
        }
    }
}

/// Body of review submit and update requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub reviewer_name: Option<String>,
    pub content: Option<String>,
}

/// Validated review text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewText {
    pub reviewer_name: String,
    pub content: String,
}

impl ReviewRequest {
    pub fn validate(self) -> CatalogResult<ReviewText> {
        let mut errors = Vec::new();
        if is_blank(self.reviewer_name.as_deref()) {
            errors.push("Reviewer name cannot be blank".to_string());
        }
        if is_blank(self.content.as_deref()) {
            errors.push("Content cannot be blank".to_string());
        }
        if !errors.is_empty() {
            return Err(CatalogError::InvalidInput(errors));
        }
        Ok(ReviewText {
            reviewer_name: self.reviewer_name.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_all_reported() {
        let request = ReviewRequest {
            reviewer_name: Some("  ".into()),
            content: None,
        };
        assert_eq!(
            request.validate().unwrap_err().messages(),
            vec!["Reviewer name cannot be blank", "Content cannot be blank"]
        );
    }

    #[test]
    fn view_uses_wire_names() {
        let view = ReviewView {
            id: 7,
            reviewer_name: "Ana".into(),
            content: "Great".into(),
            book_isbn: "978".into(),
        };
        let json = serde_json::to_value(view).unwrap();
        assert_eq!(json["reviewerName"], "Ana");
        assert_eq!(json["bookIsbn"], "978");
    }
}
