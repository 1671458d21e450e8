//! Narrow record-store interface the catalog services call through.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::query::{Page, PageRequest, Predicate};
use crate::records::{Author, AuthorId, Book, NewReview, Review, ReviewId};

/// Keyed CRUD access to one record type.
#[async_trait]
pub trait Repository<Id, Record>: Send + Sync
where
    Id: Send + Sync + ?Sized,
    Record: Send,
{
    async fn find_by_id(&self, id: &Id) -> StoreResult<Option<Record>>;

    async fn exists_by_id(&self, id: &Id) -> StoreResult<bool>;

    /// Insert or replace the record under its own key.
    async fn save(&self, record: Record) -> StoreResult<Record>;

    /// Removing an absent key is not an error.
    async fn delete_by_id(&self, id: &Id) -> StoreResult<()>;
}

#[async_trait]
pub trait AuthorRepository: Repository<AuthorId, Author> {
    /// Store a new author under the next id.
    async fn insert(&self, name: String) -> StoreResult<Author>;
}

#[async_trait]
pub trait BookRepository: Repository<str, Book> {
    /// Store a book under an unused ISBN; `DuplicateRecord` otherwise.
    async fn insert_new(&self, book: Book) -> StoreResult<Book>;

    /// Replace a stored book; `MissingRecord` when the ISBN is absent.
    async fn update_existing(&self, book: Book) -> StoreResult<Book>;

    /// Books satisfying `predicate`, ordered and sliced by `request`.
    async fn find_page(
        &self,
        predicate: &Predicate,
        request: &PageRequest,
    ) -> StoreResult<Page<Book>>;
}

#[async_trait]
pub trait ReviewRepository: Repository<ReviewId, Review> {
    /// Store a new review under the next id.
    async fn insert(&self, review: NewReview) -> StoreResult<Review>;

    /// Every review owned by `isbn`, in id order.
    async fn find_all_by_book(&self, isbn: &str) -> StoreResult<Vec<Review>>;
}
