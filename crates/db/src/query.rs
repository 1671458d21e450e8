//! Query value objects passed to the record store: predicates, sort and page
//! requests, and the page of results coming back.
//!
//! A [`Predicate`] is a flat list of [`Clause`]s that must all hold. Builders
//! never touch the store; the store decides how to evaluate each clause.

use std::fmt;

use serde::Serialize;

use crate::records::Book;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a direction case-insensitively; only `asc` and `desc` are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "ASC"),
            Self::Desc => write!(f, "DESC"),
        }
    }
}

/// Book properties the store knows how to order by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Isbn,
    #[default]
    Title,
    AuthorName,
}

impl SortField {
    /// Resolve a property path as a client would write it.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "isbn" => Some(Self::Isbn),
            "title" => Some(Self::Title),
            "author" | "author.name" | "authorName" => Some(Self::AuthorName),
            _ => None,
        }
    }
}

/// Ordering applied to a paged query. Defaults to `(title, ASC)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Normalized pagination and ordering for a paged query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index
    pub page_number: u32,
    /// Always positive
    pub page_size: u32,
    pub sort: SortSpec,
}

impl PageRequest {
    pub const fn new(page_number: u32, page_size: u32, sort: SortSpec) -> Self {
        Self {
            page_number,
            page_size,
            sort,
        }
    }

    /// Number of records skipped before this page starts.
    pub fn offset(&self) -> usize {
        self.page_number as usize * self.page_size as usize
    }
}

/// One case-insensitive substring condition over a book.
///
/// Needles are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    IsbnContains(String),
    TitleContains(String),
    AuthorNameContains(String),
}

impl Clause {
    pub fn isbn_contains(needle: &str) -> Self {
        Self::IsbnContains(needle.to_lowercase())
    }

    pub fn title_contains(needle: &str) -> Self {
        Self::TitleContains(needle.to_lowercase())
    }

    pub fn author_name_contains(needle: &str) -> Self {
        Self::AuthorNameContains(needle.to_lowercase())
    }

    fn matches(&self, book: &Book, author_name: Option<&str>) -> bool {
        match self {
            Self::IsbnContains(needle) => contains_ignore_case(&book.isbn, needle),
            Self::TitleContains(needle) => contains_ignore_case(&book.title, needle),
            Self::AuthorNameContains(needle) => {
                author_name.is_some_and(|name| contains_ignore_case(name, needle))
            }
        }
    }
}

fn contains_ignore_case(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

/// Conjunction of clauses. An empty predicate matches every book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate against a book joined with its author's name.
    ///
    /// A book without a resolvable author never satisfies an author clause.
    pub fn matches(&self, book: &Book, author_name: Option<&str>) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.matches(book, author_name))
    }
}

/// One page of query results plus the metadata clients need to walk pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u32,
    pub size: u32,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = request.page_size;
        let total_pages = if size == 0 {
            0
        } else {
            total_elements.div_ceil(u64::from(size))
        };
        let number = request.page_number;

        Self {
            number_of_elements: content.len(),
            empty: content.is_empty(),
            first: number == 0,
            last: u64::from(number) + 1 >= total_pages,
            content,
            total_elements,
            total_pages,
            number,
            size,
        }
    }

    /// Replace the content while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        let content: Vec<U> = self.content.into_iter().map(f).collect();
        Page {
            number_of_elements: content.len(),
            empty: content.is_empty(),
            content,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            first: self.first,
            last: self.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(isbn: &str, title: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author_id: 1,
        }
    }

    #[test]
    fn sort_direction_is_case_insensitive() {
        assert_eq!(SortDirection::parse("ASC"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("Desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("ascending"), None);
    }

    #[test]
    fn sort_field_accepts_author_aliases() {
        assert_eq!(SortField::parse("author"), Some(SortField::AuthorName));
        assert_eq!(SortField::parse("author.name"), Some(SortField::AuthorName));
        assert_eq!(SortField::parse("name"), None);
    }

    #[test]
    fn default_sort_is_title_ascending() {
        let sort = SortSpec::default();
        assert_eq!(sort.field, SortField::Title);
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn empty_predicate_matches_everything() {
        let predicate = Predicate::all();
        assert!(predicate.matches(&book("1", "Anything"), None));
    }

    #[test]
    fn clauses_are_anded_and_case_insensitive() {
        let predicate = Predicate::all()
            .and(Clause::title_contains("DREAM"))
            .and(Clause::author_name_contains("two"));
        let dream = book("9783161484111", "The Dream");

        assert!(predicate.matches(&dream, Some("Author Two")));
        assert!(!predicate.matches(&dream, Some("Author One")));
        assert!(!predicate.matches(&dream, None));
        assert!(!predicate.matches(&book("1", "Nightmare"), Some("Author Two")));
    }

    #[test]
    fn page_metadata_tracks_position() {
        let request = PageRequest::new(1, 2, SortSpec::default());
        let page = Page::new(vec!["c", "d"], &request, 5);

        assert_eq!(page.total_pages, 3);
        assert_eq!(page.number_of_elements, 2);
        assert!(!page.first);
        assert!(!page.last);
        assert!(!page.empty);
        assert_eq!(request.offset(), 2);
    }

    #[test]
    fn page_past_the_end_is_empty_and_last() {
        let request = PageRequest::new(7, 20, SortSpec::default());
        let page: Page<&str> = Page::new(Vec::new(), &request, 3);

        assert!(page.empty);
        assert!(page.last);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn page_serializes_camel_case() {
        let request = PageRequest::new(0, 20, SortSpec::default());
        let page = Page::new(vec![1, 2], &request, 2).map(|n| n * 10);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["content"], serde_json::json!([10, 20]));
        assert_eq!(json["totalElements"], 2);
        assert_eq!(json["numberOfElements"], 2);
        assert_eq!(json["first"], true);
        assert_eq!(json["last"], true);
    }
}
