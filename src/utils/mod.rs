//! Project-specific utilities live here.

pub mod cache;

/// True for absent, empty, or whitespace-only values.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_covers_none_empty_and_whitespace() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some(" \t")));
        assert!(!is_blank(Some(" a ")));
    }
}
