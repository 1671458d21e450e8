//! Record store failures.

use bookstore_kernel::CatalogError;
use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A write referenced a parent record that does not exist.
    #[error("{entity} references missing {parent} '{key}'")]
    MissingReference {
        entity: &'static str,
        parent: &'static str,
        key: String,
    },

    /// An insert addressed a key that is already taken.
    #[error("{entity} '{key}' already exists")]
    DuplicateRecord { entity: &'static str, key: String },

    /// An update addressed a record that is not stored.
    #[error("{entity} '{key}' does not exist")]
    MissingRecord { entity: &'static str, key: String },

    #[error("store backend failure: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Services handle the failures they expect at the call site; anything that
/// reaches this conversion means the catalog no longer agrees with itself.
impl From<StoreError> for CatalogError {
    fn from(error: StoreError) -> Self {
        CatalogError::InconsistentData(error.to_string())
    }
}
