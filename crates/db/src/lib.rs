//! Catalog records, query value objects, and the record store behind the
//! bookstore services.

use std::sync::Arc;

use bookstore_kernel::settings::DatabaseSettings;

pub mod error;
pub mod memory;
pub mod query;
pub mod records;
pub mod repository;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use query::{Clause, Page, PageRequest, Predicate, SortDirection, SortField, SortSpec};
pub use records::{Author, AuthorId, Book, NewReview, Review, ReviewId};
pub use repository::{AuthorRepository, BookRepository, Repository, ReviewRepository};

/// Handles to every repository the catalog services need.
#[derive(Clone)]
pub struct Catalog {
    pub authors: Arc<dyn AuthorRepository>,
    pub books: Arc<dyn BookRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
}

impl Catalog {
    /// Serve all three repositories from one in-memory store.
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            authors: store.clone(),
            books: store.clone(),
            reviews: store,
        }
    }
}

/// Open the record store and insert the configured seed authors.
pub async fn init(settings: &DatabaseSettings) -> anyhow::Result<Catalog> {
    let catalog = Catalog::in_memory(Arc::new(MemoryStore::new()));

    for name in &settings.seed_authors {
        let author = catalog.authors.insert(name.clone()).await?;
        tracing::debug!(target: "bookstore-db", id = author.id, name = %author.name, "seeded author");
    }

    tracing::info!(
        target: "bookstore-db",
        authors = settings.seed_authors.len(),
        "record store ready"
    );
    Ok(catalog)
}
