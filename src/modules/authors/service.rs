use std::sync::Arc;

use bookstore_db::{Author, AuthorId, Catalog};
use bookstore_kernel::{CatalogError, CatalogResult};

use super::models::AuthorView;
use crate::modules::CatalogCaches;

#[derive(Clone)]
pub struct AuthorService {
    catalog: Catalog,
    caches: Arc<CatalogCaches>,
}

impl AuthorService {
    pub fn new(catalog: Catalog, caches: Arc<CatalogCaches>) -> Self {
        Self { catalog, caches }
    }

    pub async fn get_author_by_id(&self, id: AuthorId) -> CatalogResult<AuthorView> {
        if let Some(view) = self.caches.authors.get(&id) {
            return Ok(view);
        }

        let ticket = self.caches.authors.ticket();
        let view = AuthorView::from(self.fetch_author(id).await?);
        self.caches.authors.fill(ticket, id, view.clone());
        Ok(view)
    }

    /// Load the author record, mapping absence to `NotFound`.
    pub async fn fetch_author(&self, id: AuthorId) -> CatalogResult<Author> {
        self.catalog
            .authors
            .find_by_id(&id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("Author not found for ID: {}", id)))
    }

    /// Author lookup used while mapping an already stored book.
    pub(crate) async fn author_name(&self, id: AuthorId) -> CatalogResult<String> {
        if let Some(view) = self.caches.authors.get(&id) {
            return Ok(view.name);
        }
        match self.catalog.authors.find_by_id(&id).await? {
            Some(author) => Ok(author.name),
            None => Err(CatalogError::InconsistentData(format!(
                "book references missing author {}",
                id
            ))),
        }
    }
}
