pub mod authors;
pub mod books;
pub mod reviews;

use std::sync::Arc;

use bookstore_db::{AuthorId, Catalog};
use bookstore_kernel::{settings::Settings, ModuleRegistry};

use crate::utils::cache::ReadCache;

/// Memoized views shared by the catalog services.
pub struct CatalogCaches {
    pub books: ReadCache<String, books::models::BookView>,
    pub authors: ReadCache<AuthorId, authors::models::AuthorView>,
    pub reviews: ReadCache<String, Vec<reviews::models::ReviewView>>,
}

impl CatalogCaches {
    pub fn new(enabled: bool) -> Self {
        Self {
            books: ReadCache::new(enabled),
            authors: ReadCache::new(enabled),
            reviews: ReadCache::new(enabled),
        }
    }
}

/// Register the authors, books and reviews modules with the registry.
pub fn register_all(
    registry: &mut ModuleRegistry,
    catalog: Catalog,
    settings: &Settings,
) -> anyhow::Result<()> {
    let caches = Arc::new(CatalogCaches::new(settings.cache.enabled));

    let authors = authors::service::AuthorService::new(catalog.clone(), caches.clone());
    let books = books::service::BookService::new(
        catalog.clone(),
        caches.clone(),
        authors.clone(),
        settings.paging.clone(),
    );
    let reviews = reviews::service::ReviewService::new(catalog, caches);

    registry.register(authors::create_module(authors))?;
    registry.register(books::create_module(books))?;
    registry.register(reviews::create_module(reviews))?;
    Ok(())
}
