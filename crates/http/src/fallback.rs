//! Envelopes for requests no handler accepted.

use axum::{
    http::{Method, StatusCode, Uri},
    BoxError,
};
use bookstore_kernel::CatalogError;

use crate::error::ApiError;

/// Path matched but the method did not.
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError(CatalogError::transport(
        StatusCode::METHOD_NOT_ALLOWED.as_u16(),
        format!("Request method '{}' is not supported", method),
    ))
}

/// No route matched at all.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError(CatalogError::transport(
        StatusCode::NOT_FOUND.as_u16(),
        format!("No endpoint {} {}.", method, uri.path()),
    ))
}

/// Errors surfaced by the timeout layer.
pub async fn timed_out(error: BoxError) -> ApiError {
    if error.is::<tower::timeout::error::Elapsed>() {
        ApiError(CatalogError::transport(
            StatusCode::REQUEST_TIMEOUT.as_u16(),
            "Request timed out",
        ))
    } else {
        ApiError(CatalogError::InconsistentData(format!(
            "unhandled middleware error: {}",
            error
        )))
    }
}
