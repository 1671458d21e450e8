//! In-process record store.
//!
//! All three tables sit behind one lock so that cross-table rules (a book's
//! author exists, deleting a book removes its reviews) hold at every instant.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::query::{Page, PageRequest, Predicate, SortDirection, SortField};
use crate::records::{Author, AuthorId, Book, NewReview, Review, ReviewId};
use crate::repository::{AuthorRepository, BookRepository, Repository, ReviewRepository};

#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<AuthorId, Author>,
    books: BTreeMap<String, Book>,
    reviews: BTreeMap<ReviewId, Review>,
    last_author_id: AuthorId,
    last_review_id: ReviewId,
}

impl Tables {
    fn author_name(&self, book: &Book) -> Option<&str> {
        self.authors.get(&book.author_id).map(|a| a.name.as_str())
    }

    fn require_author(&self, book: &Book) -> StoreResult<()> {
        if self.authors.contains_key(&book.author_id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference {
                entity: "book",
                parent: "author",
                key: book.author_id.to_string(),
            })
        }
    }

    fn compare(&self, a: &Book, b: &Book, field: SortField) -> Ordering {
        match field {
            SortField::Isbn => a.isbn.cmp(&b.isbn),
            SortField::Title => a.title.cmp(&b.title),
            SortField::AuthorName => self.author_name(a).cmp(&self.author_name(b)),
        }
    }
}

/// Record store holding authors, books and reviews in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn book_count(&self) -> usize {
        self.tables.read().books.len()
    }

    #[cfg(test)]
    fn review_count(&self) -> usize {
        self.tables.read().reviews.len()
    }
}

#[async_trait]
impl Repository<AuthorId, Author> for MemoryStore {
    async fn find_by_id(&self, id: &AuthorId) -> StoreResult<Option<Author>> {
        Ok(self.tables.read().authors.get(id).cloned())
    }

    async fn exists_by_id(&self, id: &AuthorId) -> StoreResult<bool> {
        Ok(self.tables.read().authors.contains_key(id))
    }

    async fn save(&self, author: Author) -> StoreResult<Author> {
        let mut tables = self.tables.write();
        tables.last_author_id = tables.last_author_id.max(author.id);
        tables.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn delete_by_id(&self, id: &AuthorId) -> StoreResult<()> {
        let mut tables = self.tables.write();
        if tables.books.values().any(|book| book.author_id == *id) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "author '{}' is still referenced by books",
                id
            )));
        }
        tables.authors.remove(id);
        Ok(())
    }
}

#[async_trait]
impl AuthorRepository for MemoryStore {
    async fn insert(&self, name: String) -> StoreResult<Author> {
        let mut tables = self.tables.write();
        tables.last_author_id += 1;
        let author = Author {
            id: tables.last_author_id,
            name,
        };
        tables.authors.insert(author.id, author.clone());
        Ok(author)
    }
}

#[async_trait]
impl Repository<str, Book> for MemoryStore {
    async fn find_by_id(&self, isbn: &str) -> StoreResult<Option<Book>> {
        Ok(self.tables.read().books.get(isbn).cloned())
    }

    async fn exists_by_id(&self, isbn: &str) -> StoreResult<bool> {
        Ok(self.tables.read().books.contains_key(isbn))
    }

    async fn save(&self, book: Book) -> StoreResult<Book> {
        let mut tables = self.tables.write();
        tables.require_author(&book)?;
        tables.books.insert(book.isbn.clone(), book.clone());
        Ok(book)
    }

    async fn delete_by_id(&self, isbn: &str) -> StoreResult<()> {
        let mut tables = self.tables.write();
        if tables.books.remove(isbn).is_some() {
            tables.reviews.retain(|_, review| review.book_isbn != isbn);
        }
        Ok(())
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn insert_new(&self, book: Book) -> StoreResult<Book> {
        let mut tables = self.tables.write();
        if tables.books.contains_key(&book.isbn) {
            return Err(StoreError::DuplicateRecord {
                entity: "book",
                key: book.isbn,
            });
        }
        tables.require_author(&book)?;
        tables.books.insert(book.isbn.clone(), book.clone());
        Ok(book)
    }

    async fn update_existing(&self, book: Book) -> StoreResult<Book> {
        let mut tables = self.tables.write();
        if !tables.books.contains_key(&book.isbn) {
            return Err(StoreError::MissingRecord {
                entity: "book",
                key: book.isbn,
            });
        }
        tables.require_author(&book)?;
        tables.books.insert(book.isbn.clone(), book.clone());
        Ok(book)
    }

    async fn find_page(
        &self,
        predicate: &Predicate,
        request: &PageRequest,
    ) -> StoreResult<Page<Book>> {
        let tables = self.tables.read();

        let mut matching: Vec<&Book> = tables
            .books
            .values()
            .filter(|book| predicate.matches(book, tables.author_name(book)))
            .collect();

        let sort = request.sort;
        matching.sort_by(|a, b| {
            let ordering = tables.compare(a, b, sort.field);
            let ordering = match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            // isbn keeps ties stable across pages
            ordering.then_with(|| a.isbn.cmp(&b.isbn))
        });

        let total = matching.len() as u64;
        let content = matching
            .into_iter()
            .skip(request.offset())
            .take(request.page_size as usize)
            .cloned()
            .collect();

        tracing::debug!(
            clauses = predicate.clauses().len(),
            page = request.page_number,
            size = request.page_size,
            total,
            "book page query"
        );

        Ok(Page::new(content, request, total))
    }
}

#[async_trait]
impl Repository<ReviewId, Review> for MemoryStore {
    async fn find_by_id(&self, id: &ReviewId) -> StoreResult<Option<Review>> {
        Ok(self.tables.read().reviews.get(id).cloned())
    }

    async fn exists_by_id(&self, id: &ReviewId) -> StoreResult<bool> {
        Ok(self.tables.read().reviews.contains_key(id))
    }

    async fn save(&self, review: Review) -> StoreResult<Review> {
        let mut tables = self.tables.write();
        if !tables.books.contains_key(&review.book_isbn) {
            return Err(StoreError::MissingReference {
                entity: "review",
                parent: "book",
                key: review.book_isbn.clone(),
            });
        }
        if !tables.reviews.contains_key(&review.id) {
            return Err(StoreError::MissingRecord {
                entity: "review",
                key: review.id.to_string(),
            });
        }
        tables.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn delete_by_id(&self, id: &ReviewId) -> StoreResult<()> {
        self.tables.write().reviews.remove(id);
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn insert(&self, review: NewReview) -> StoreResult<Review> {
        let mut tables = self.tables.write();
        if !tables.books.contains_key(&review.book_isbn) {
            return Err(StoreError::MissingReference {
                entity: "review",
                parent: "book",
                key: review.book_isbn,
            });
        }
        tables.last_review_id += 1;
        let review = review.with_id(tables.last_review_id);
        tables.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn find_all_by_book(&self, isbn: &str) -> StoreResult<Vec<Review>> {
        Ok(self
            .tables
            .read()
            .reviews
            .values()
            .filter(|review| review.book_isbn == isbn)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Clause, SortSpec};
    use crate::Catalog;
    use std::sync::Arc;

    async fn seeded() -> (Arc<MemoryStore>, Catalog) {
        let store = Arc::new(MemoryStore::new());
        let catalog = Catalog::in_memory(store.clone());
        catalog.authors.insert("Author One".into()).await.unwrap();
        catalog.authors.insert("Author Two".into()).await.unwrap();

        for (isbn, title, author_id) in [
            ("9783161484111", "The Dream", 2),
            ("9783161484112", "A Dream Within", 1),
            ("9780000000003", "Night Train", 2),
            ("9780000000004", "Beach Read", 1),
        ] {
            catalog
                .books
                .save(Book {
                    isbn: isbn.into(),
                    title: title.into(),
                    author_id,
                })
                .await
                .unwrap();
        }
        (store, catalog)
    }

    fn titles(page: &Page<Book>) -> Vec<&str> {
        page.content.iter().map(|b| b.title.as_str()).collect()
    }

    #[tokio::test]
    async fn author_ids_are_monotonic() {
        let (_, catalog) = seeded().await;
        let third = catalog.authors.insert("Author Three".into()).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn find_page_sorts_by_title_by_default() {
        let (_, catalog) = seeded().await;
        let request = PageRequest::new(0, 20, SortSpec::default());
        let page = catalog
            .books
            .find_page(&Predicate::all(), &request)
            .await
            .unwrap();

        assert_eq!(
            titles(&page),
            vec!["A Dream Within", "Beach Read", "Night Train", "The Dream"]
        );
        assert_eq!(page.total_elements, 4);
    }

    #[tokio::test]
    async fn find_page_filters_by_author_name_and_title() {
        let (_, catalog) = seeded().await;
        let predicate = Predicate::all()
            .and(Clause::author_name_contains("TWO"))
            .and(Clause::title_contains("dream"));
        let request = PageRequest::new(0, 20, SortSpec::default());
        let page = catalog.books.find_page(&predicate, &request).await.unwrap();

        assert_eq!(titles(&page), vec!["The Dream"]);
    }

    #[tokio::test]
    async fn find_page_orders_descending_and_slices() {
        let (_, catalog) = seeded().await;
        let sort = SortSpec::new(SortField::Isbn, SortDirection::Desc);
        let request = PageRequest::new(1, 2, sort);
        let page = catalog
            .books
            .find_page(&Predicate::all(), &request)
            .await
            .unwrap();

        let isbns: Vec<_> = page.content.iter().map(|b| b.isbn.as_str()).collect();
        assert_eq!(isbns, vec!["9780000000004", "9780000000003"]);
        assert!(page.last);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn find_page_orders_by_author_name_with_isbn_tiebreak() {
        let (_, catalog) = seeded().await;
        let sort = SortSpec::new(SortField::AuthorName, SortDirection::Asc);
        let request = PageRequest::new(0, 20, sort);
        let page = catalog
            .books
            .find_page(&Predicate::all(), &request)
            .await
            .unwrap();

        let isbns: Vec<_> = page.content.iter().map(|b| b.isbn.as_str()).collect();
        assert_eq!(
            isbns,
            vec![
                "9780000000004",
                "9783161484112",
                "9780000000003",
                "9783161484111"
            ]
        );
    }

    #[tokio::test]
    async fn saving_a_book_with_unknown_author_is_rejected() {
        let (store, catalog) = seeded().await;
        let err = catalog
            .books
            .save(Book {
                isbn: "1".into(),
                title: "Orphan".into(),
                author_id: 99,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::MissingReference { .. }));
        assert_eq!(store.book_count(), 4);
    }

    fn book(isbn: &str, title: &str, author_id: AuthorId) -> Book {
        Book {
            isbn: isbn.into(),
            title: title.into(),
            author_id,
        }
    }

    #[tokio::test]
    async fn insert_new_refuses_a_taken_isbn() {
        let (store, catalog) = seeded().await;
        let err = catalog
            .books
            .insert_new(book("9783161484111", "Impostor", 1))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateRecord { .. }));
        let original = catalog.books.find_by_id("9783161484111").await.unwrap().unwrap();
        assert_eq!(original.title, "The Dream");
        assert_eq!(store.book_count(), 4);
    }

    #[tokio::test]
    async fn concurrent_inserts_of_one_isbn_admit_exactly_one() {
        let (_, catalog) = seeded().await;
        let tasks: Vec<_> = (0..8)
            .map(|n| {
                let catalog = catalog.clone();
                tokio::spawn(async move {
                    catalog
                        .books
                        .insert_new(book("9790000000009", &format!("Copy {n}"), 1))
                        .await
                })
            })
            .collect();

        let mut stored = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => stored += 1,
                Err(err) => assert!(matches!(err, StoreError::DuplicateRecord { .. })),
            }
        }
        assert_eq!(stored, 1);
    }

    #[tokio::test]
    async fn update_existing_never_resurrects_a_deleted_book() {
        let (store, catalog) = seeded().await;
        catalog.books.delete_by_id("9780000000003").await.unwrap();

        let err = catalog
            .books
            .update_existing(book("9780000000003", "Night Bus", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingRecord { .. }));
        assert_eq!(store.book_count(), 3);

        let updated = catalog
            .books
            .update_existing(book("9780000000004", "Beach Read II", 2))
            .await
            .unwrap();
        assert_eq!(updated.author_id, 2);
    }

    #[tokio::test]
    async fn deleting_a_book_removes_its_reviews() {
        let (store, catalog) = seeded().await;
        for isbn in ["9783161484111", "9783161484111", "9780000000003"] {
            catalog
                .reviews
                .insert(NewReview {
                    book_isbn: isbn.into(),
                    reviewer_name: "Reader".into(),
                    content: "Fine".into(),
                })
                .await
                .unwrap();
        }

        catalog.books.delete_by_id("9783161484111").await.unwrap();

        assert_eq!(store.review_count(), 1);
        assert!(catalog
            .reviews
            .find_all_by_book("9783161484111")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn reviews_are_listed_in_id_order() {
        let (_, catalog) = seeded().await;
        for name in ["first", "second", "third"] {
            catalog
                .reviews
                .insert(NewReview {
                    book_isbn: "9780000000004".into(),
                    reviewer_name: name.into(),
                    content: "ok".into(),
                })
                .await
                .unwrap();
        }

        let reviews = catalog
            .reviews
            .find_all_by_book("9780000000004")
            .await
            .unwrap();
        let names: Vec<_> = reviews.iter().map(|r| r.reviewer_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert!(reviews.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn review_for_missing_book_is_rejected() {
        let (store, catalog) = seeded().await;
        let err = catalog
            .reviews
            .insert(NewReview {
                book_isbn: "missing".into(),
                reviewer_name: "Reader".into(),
                content: "Where is it?".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::MissingReference { .. }));
        assert_eq!(store.review_count(), 0);
    }
}
