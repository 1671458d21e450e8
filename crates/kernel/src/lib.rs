//! Core traits, settings, failure taxonomy, and module registry for the
//! bookstore service.

pub mod error;
pub mod module;
pub mod registry;
pub mod settings;

pub use error::{CatalogError, CatalogResult};
pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
