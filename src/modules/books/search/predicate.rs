use bookstore_db::{Clause, Predicate};

use super::{SearchFilter, AUTHOR, ISBN, TITLE};
use crate::utils::is_blank;

/// AND together one clause per non-blank `isbn`, `author` and `title` value.
///
/// Values are matched as given, surrounding whitespace included. `search` is
/// accepted upstream but never narrows the result.
pub fn build_predicate(filter: &SearchFilter) -> Predicate {
    let non_blank = |key: &str| filter.get(key).filter(|value| !is_blank(Some(*value)));

    let mut predicate = Predicate::all();
    if let Some(isbn) = non_blank(ISBN) {
        predicate = predicate.and(Clause::isbn_contains(isbn));
    }
    if let Some(author) = non_blank(AUTHOR) {
        predicate = predicate.and(Clause::author_name_contains(author));
    }
    if let Some(title) = non_blank(TITLE) {
        predicate = predicate.and(Clause::title_contains(title));
    }
    predicate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_qualifying_key_matches_everything() {
        let filter = SearchFilter::from_pairs([("page-no", "1"), ("search", "rust"), ("title", " ")]);
        assert!(build_predicate(&filter).is_empty());
    }

    #[test]
    fn surrounding_whitespace_is_part_of_the_needle() {
        let filter = SearchFilter::from_pairs([("title", " Dream"), ("author", "two ")]);
        assert_eq!(
            build_predicate(&filter).clauses(),
            &[
                Clause::AuthorNameContains("two ".into()),
                Clause::TitleContains(" dream".into()),
            ]
        );
    }

    #[test]
    fn clauses_are_lowercased_and_combined() {
        let filter = SearchFilter::from_pairs([("title", "DREAM"), ("author", "One"), ("isbn", "978")]);
        let predicate = build_predicate(&filter);
        assert_eq!(
            predicate.clauses(),
            &[
                Clause::IsbnContains("978".into()),
                Clause::AuthorNameContains("one".into()),
                Clause::TitleContains("dream".into()),
            ]
        );
    }
}
