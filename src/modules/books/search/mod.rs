//! Query-string handling for book listing.
//!
//! Listing runs these steps in order and stops at the first failure:
//! parameter names, sort syntax, predicate, page request.

mod paging;
mod predicate;
mod validation;

pub use paging::{parse_page_param, resolve_page_request};
pub use predicate::build_predicate;
pub use validation::{validate_parameter_names, validate_sort_syntax, SortCriteria};

pub const PAGE_NO: &str = "page-no";
pub const PAGE_SIZE: &str = "page-size";
pub const SORT: &str = "sort";
pub const SEARCH: &str = "search";
pub const AUTHOR: &str = "author";
pub const ISBN: &str = "isbn";
pub const TITLE: &str = "title";

/// Every key a listing request may carry.
pub const RECOGNIZED_KEYS: [&str; 7] = [PAGE_NO, PAGE_SIZE, SORT, SEARCH, AUTHOR, ISBN, TITLE];

/// Query parameters of one listing request.
///
/// Keys keep first-seen order; a repeated key keeps its first value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    params: Vec<(String, String)>,
}

impl SearchFilter {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params: Vec<(String, String)> = Vec::new();
        for (key, value) in pairs {
            let key = key.into();
            if params.iter().all(|(existing, _)| *existing != key) {
                params.push((key, value.into()));
            }
        }
        Self { params }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }
}
