use bookstore_db::{PageRequest, SortField, SortSpec};
use bookstore_kernel::{settings::PagingSettings, CatalogError, CatalogResult};

use super::SortCriteria;

/// Parse one paging value. Blank counts as absent.
pub fn parse_page_param(name: &str, raw: Option<&str>) -> CatalogResult<Option<i64>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse::<i64>().map(Some).map_err(|_| {
            CatalogError::InvalidPagination(format!(
                "Invalid value '{}' for {}: must be an integer",
                value, name
            ))
        }),
    }
}

/// Combine page number, page size and sort into a normalized request.
///
/// Page size above `paging.max_page_size` is clamped.
pub fn resolve_page_request(
    page_no: Option<i64>,
    page_size: Option<i64>,
    sort: Option<SortCriteria>,
    paging: &PagingSettings,
) -> CatalogResult<PageRequest> {
    let page_number = match page_no {
        None => 0,
        Some(n) if n < 0 => {
            return Err(CatalogError::InvalidPagination(format!(
                "Page index must not be less than zero, got {}",
                n
            )))
        }
        Some(n) => u32::try_from(n).map_err(|_| {
            CatalogError::InvalidPagination(format!("Page index {} is too large", n))
        })?,
    };

    let page_size = match page_size {
        None => paging.default_page_size,
        Some(n) if n < 1 => {
            return Err(CatalogError::InvalidPagination(format!(
                "Page size must not be less than one, got {}",
                n
            )))
        }
        Some(n) => u32::try_from(n)
            .unwrap_or(u32::MAX)
            .min(paging.max_page_size),
    };

    let sort = match sort {
        None => SortSpec::default(),
        Some(criteria) => {
            let field = SortField::parse(&criteria.field).ok_or_else(|| {
                CatalogError::InvalidSort(format!(
                    "No property '{}' found for type 'Book'",
                    criteria.field
                ))
            })?;
            SortSpec::new(field, criteria.direction)
        }
    };

    Ok(PageRequest::new(page_number, page_size, sort))
}
