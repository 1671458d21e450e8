use std::collections::HashMap;
use std::sync::Arc;

use bookstore_db::{AuthorId, Book, Catalog, Page, StoreError};
use bookstore_kernel::{settings::PagingSettings, CatalogError, CatalogResult};

use super::models::{BookChanges, BookView, NewBook};
use super::search::{self, SearchFilter};
use crate::modules::authors::service::AuthorService;
use crate::modules::CatalogCaches;
use crate::utils::is_blank;

#[derive(Clone)]
pub struct BookService {
    catalog: Catalog,
    caches: Arc<CatalogCaches>,
    authors: AuthorService,
    paging: PagingSettings,
}

impl BookService {
    pub fn new(
        catalog: Catalog,
        caches: Arc<CatalogCaches>,
        authors: AuthorService,
        paging: PagingSettings,
    ) -> Self {
        Self {
            catalog,
            caches,
            authors,
            paging,
        }
    }

    /// Validate the query, then fetch one page of matching books.
    pub async fn list_books(&self, filter: &SearchFilter) -> CatalogResult<Page<BookView>> {
        search::validate_parameter_names(filter.keys())?;
        let sort = search::validate_sort_syntax(filter.get(search::SORT))?;
        let predicate = search::build_predicate(filter);

        let page_no = search::parse_page_param(search::PAGE_NO, filter.get(search::PAGE_NO))?;
        let page_size = search::parse_page_param(search::PAGE_SIZE, filter.get(search::PAGE_SIZE))?;
        let request = search::resolve_page_request(page_no, page_size, sort, &self.paging)?;

        tracing::debug!(
            clauses = predicate.clauses().len(),
            page = request.page_number,
            size = request.page_size,
            sort = ?request.sort,
            "listing books"
        );

        let page = self.catalog.books.find_page(&predicate, &request).await?;

        let mut names: HashMap<AuthorId, String> = HashMap::new();
        for book in &page.content {
            if !names.contains_key(&book.author_id) {
                let name = self.authors.author_name(book.author_id).await?;
                names.insert(book.author_id, name);
            }
        }

        Ok(page.map(|book| {
            let author_name = names.get(&book.author_id).cloned().unwrap_or_default();
            view_of(book, author_name)
        }))
    }

    pub async fn get_book(&self, isbn: &str) -> CatalogResult<BookView> {
        require_isbn(isbn)?;
        if let Some(view) = self.caches.books.get(isbn) {
            return Ok(view);
        }

        let ticket = self.caches.books.ticket();
        let book = self
            .find_book(isbn)
            .await?
            .ok_or_else(|| CatalogError::not_found("Book not found for the given ISBN"))?;
        let view = self.to_view(book).await?;
        self.caches.books.fill(ticket, isbn.to_string(), view.clone());
        Ok(view)
    }

    pub async fn find_book(&self, isbn: &str) -> CatalogResult<Option<Book>> {
        Ok(self.catalog.books.find_by_id(isbn).await?)
    }

    pub async fn create_book(&self, new_book: NewBook) -> CatalogResult<BookView> {
        require_isbn(&new_book.isbn)?;
        if self.catalog.books.exists_by_id(&new_book.isbn).await? {
            return Err(book_exists());
        }
        let author_name = self.resolve_author(new_book.author_id).await?;

        let book = self
            .catalog
            .books
            .insert_new(Book {
                isbn: new_book.isbn,
                title: new_book.title,
                author_id: new_book.author_id,
            })
            .await
            .map_err(|error| match error {
                StoreError::DuplicateRecord { .. } => book_exists(),
                other => other.into(),
            })?;

        let view = view_of(book, author_name);
        self.caches.books.refresh(view.isbn.clone(), view.clone());
        tracing::info!(isbn = %view.isbn, author_id = view.author_id, "book created");
        Ok(view)
    }

    pub async fn update_book(&self, isbn: &str, changes: BookChanges) -> CatalogResult<BookView> {
        require_isbn(isbn)?;
        if !self.catalog.books.exists_by_id(isbn).await? {
            return Err(book_missing(isbn));
        }
        let author_name = self.resolve_author(changes.author_id).await?;

        let book = self
            .catalog
            .books
            .update_existing(Book {
                isbn: isbn.to_string(),
                title: changes.title,
                author_id: changes.author_id,
            })
            .await
            .map_err(|error| match error {
                StoreError::MissingRecord { .. } => book_missing(isbn),
                other => other.into(),
            })?;

        let view = view_of(book, author_name);
        self.caches.books.refresh(view.isbn.clone(), view.clone());
        tracing::info!(isbn = %view.isbn, "book updated");
        Ok(view)
    }

    /// Delete a book together with its reviews.
    pub async fn delete_book(&self, isbn: &str) -> CatalogResult<()> {
        require_isbn(isbn)?;
        if !self.catalog.books.exists_by_id(isbn).await? {
            return Err(book_missing(isbn));
        }
        self.catalog.books.delete_by_id(isbn).await?;

        self.caches.books.invalidate(isbn);
        self.caches.reviews.invalidate(isbn);
        tracing::info!(isbn = %isbn, "book deleted");
        Ok(())
    }

    async fn resolve_author(&self, id: AuthorId) -> CatalogResult<String> {
        match self.authors.fetch_author(id).await {
            Ok(author) => Ok(author.name),
            Err(CatalogError::NotFound(_)) => Err(CatalogError::not_found(format!(
                "Author not found for the given ID: {}",
                id
            ))),
            Err(other) => Err(other),
        }
    }

    async fn to_view(&self, book: Book) -> CatalogResult<BookView> {
        let author_name = self.authors.author_name(book.author_id).await?;
        Ok(view_of(book, author_name))
    }
}

fn require_isbn(isbn: &str) -> CatalogResult<()> {
    if is_blank(Some(isbn)) {
        Err(CatalogError::invalid_input("ISBN cannot be null or empty"))
    } else {
        Ok(())
    }
}

fn book_exists() -> CatalogError {
    CatalogError::conflict("Book with ISBN already exists")
}

fn book_missing(isbn: &str) -> CatalogError {
    CatalogError::not_found(format!("Book with the given ISBN - {} not found", isbn))
}

fn view_of(book: Book, author_name: String) -> BookView {
    BookView {
        isbn: book.isbn,
        title: book.title,
        author_id: book.author_id,
        author_name,
    }
}
