use bookstore_db::SortDirection;
use bookstore_kernel::{CatalogError, CatalogResult};

use super::RECOGNIZED_KEYS;

/// Syntactically valid `field,direction` pair. The field is not resolved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCriteria {
    pub field: String,
    pub direction: SortDirection,
}

/// Reject any key outside the listing vocabulary, naming every offender.
pub fn validate_parameter_names<'a>(keys: impl IntoIterator<Item = &'a str>) -> CatalogResult<()> {
    let unknown: Vec<String> = keys
        .into_iter()
        .filter(|key| !RECOGNIZED_KEYS.contains(key))
        .map(str::to_string)
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::InvalidParameter(unknown))
    }
}

/// Check `field,direction` syntax. Absent or blank criteria are valid and
/// yield `None`; the default order is applied later.
pub fn validate_sort_syntax(raw: Option<&str>) -> CatalogResult<Option<SortCriteria>> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(None);
    };

    let malformed = || {
        CatalogError::InvalidSort(format!(
            "Invalid sort criteria '{}'. Should be something like 'name,ASC' or 'name,asc'",
            raw
        ))
    };

    let (field, order) = raw.split_once(',').ok_or_else(malformed)?;
    let field = field.trim();
    let order = order.trim().to_lowercase();
    if field.is_empty() || order.is_empty() {
        return Err(malformed());
    }

    let direction = SortDirection::parse(&order).ok_or_else(|| {
        CatalogError::InvalidSort(format!(
            "Invalid sort-order [{}] for sort-by [{}]",
            order, field
        ))
    })?;

    Ok(Some(SortCriteria {
        field: field.to_string(),
        direction,
    }))
}
