use std::sync::Arc;

use bookstore_db::{Catalog, NewReview, Review, ReviewId};
use bookstore_kernel::{CatalogError, CatalogResult};

use super::models::{ReviewText, ReviewView};
use crate::modules::CatalogCaches;

#[derive(Clone)]
pub struct ReviewService {
    catalog: Catalog,
    caches: Arc<CatalogCaches>,
}

impl ReviewService {
    pub fn new(catalog: Catalog, caches: Arc<CatalogCaches>) -> Self {
        Self { catalog, caches }
    }

    pub async fn submit_review(&self, isbn: &str, text: ReviewText) -> CatalogResult<ReviewView> {
        self.require_book(isbn).await?;

        let review = self
            .catalog
            .reviews
            .insert(NewReview {
                book_isbn: isbn.to_string(),
                reviewer_name: text.reviewer_name,
                content: text.content,
            })
            .await?;

        self.caches.reviews.invalidate(isbn);
        tracing::info!(isbn = %isbn, review_id = review.id, "review submitted");
        Ok(review.into())
    }

    /// Reviews of one book in id order.
    pub async fn list_reviews(&self, isbn: &str) -> CatalogResult<Vec<ReviewView>> {
        if let Some(views) = self.caches.reviews.get(isbn) {
            return Ok(views);
        }

        let ticket = self.caches.reviews.ticket();
        self.require_book(isbn).await?;
        let views: Vec<ReviewView> = self
            .catalog
            .reviews
            .find_all_by_book(isbn)
            .await?
            .into_iter()
            .map(ReviewView::from)
            .collect();
        self.caches.reviews.fill(ticket, isbn.to_string(), views.clone());
        Ok(views)
    }

    pub async fn update_review(
        &self,
        isbn: &str,
        review_id: ReviewId,
        text: ReviewText,
    ) -> CatalogResult<ReviewView> {
        let existing = self
            .catalog
            .reviews
            .find_by_id(&review_id)
            .await?
            .ok_or_else(|| {
                CatalogError::not_found(format!("Review not found for ID: {}", review_id))
            })?;
        if existing.book_isbn != isbn {
            return Err(CatalogError::conflict(
                "Review does not belong to the specified book",
            ));
        }

        let review = self
            .catalog
            .reviews
            .save(Review {
                reviewer_name: text.reviewer_name,
                content: text.content,
                ..existing
            })
            .await?;

        self.caches.reviews.invalidate(isbn);
        tracing::info!(isbn = %isbn, review_id, "review updated");
        Ok(review.into())
    }

    async fn require_book(&self, isbn: &str) -> CatalogResult<()> {
        if self.catalog.books.exists_by_id(isbn).await? {
            Ok(())
        } else {
            Err(CatalogError::not_found(format!(
                "Book with the given ISBN - {} not found",
                isbn
            )))
        }
    }
}
