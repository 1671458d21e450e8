//! Error handling for the bookstore HTTP layer.
//!
//! [`normalize`] is the only place a failure becomes a wire payload; it is
//! called from [`ApiError`]'s `IntoResponse` impl and nowhere else.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bookstore_kernel::CatalogError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::{NoContext, Timestamp, Uuid};

/// Detail used for every 5xx; the cause is only logged.
const INTERNAL_DETAIL: &str = "An internal error occurred";

/// Standard error response format for all HTTP errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
    pub details: Vec<String>,
}

/// A catalog failure on its way out of a handler.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub CatalogError);

/// Map any failure to its status and envelope.
pub fn normalize(error: &CatalogError) -> (StatusCode, ErrorBody) {
    let status = match error {
        CatalogError::InvalidParameter(_)
        | CatalogError::InvalidSort(_)
        | CatalogError::InvalidPagination(_)
        | CatalogError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Conflict(_) => StatusCode::CONFLICT,
        CatalogError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        CatalogError::Transport { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
        }
        CatalogError::InconsistentData(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let details = if status.is_server_error() {
        vec![INTERNAL_DETAIL.to_string()]
    } else {
        error.messages()
    };

    let body = ErrorBody {
        status_code: status.as_u16(),
        message: status_name(status),
        details,
    };
    (status, body)
}

/// `404` → `NOT_FOUND`, `405` → `METHOD_NOT_ALLOWED`; 500 is reported as `INTERNAL`.
pub fn status_name(status: StatusCode) -> String {
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        return "INTERNAL".to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("UNKNOWN")
        .to_ascii_uppercase()
        .replace([' ', '-'], "_")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v7(Timestamp::now(NoContext));
        let (status, body) = normalize(&self.0);

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                cause = %self.0,
                "request failed"
            );
        } else {
            tracing::info!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                details = ?body.details,
                "request rejected"
            );
        }

        let mut response = (status, Json(body)).into_response();
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        );
        response
    }
}

/// Keep only the text before the first `:` of a framework message, which is
/// where the library starts quoting parser internals.
fn summary(text: &str) -> String {
    text.split(':').next().unwrap_or(text).trim().to_string()
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            other => other.status(),
        };
        Self(CatalogError::transport(
            status.as_u16(),
            summary(&rejection.body_text()),
        ))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        let status = match rejection.status() {
            status if status.is_server_error() => status,
            _ => StatusCode::BAD_REQUEST,
        };
        Self(CatalogError::transport(
            status.as_u16(),
            summary(&rejection.body_text()),
        ))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(CatalogError::transport(
            StatusCode::BAD_REQUEST.as_u16(),
            summary(&rejection.body_text()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn bad_input_kinds_map_to_400() {
        for error in [
            CatalogError::InvalidParameter(vec!["foo".into()]),
            CatalogError::InvalidSort("Invalid sort-order [ascending] for sort-by [name]".into()),
            CatalogError::InvalidPagination("page-size must be positive".into()),
            CatalogError::invalid_input("ISBN cannot be null or empty"),
        ] {
            let (status, body) = normalize(&error);
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body.status_code, 400);
            assert_eq!(body.message, "BAD_REQUEST");
            assert_eq!(body.details.len(), 1);
        }
    }

    #[test]
    fn domain_kinds_map_to_their_status() {
        let cases = [
            (CatalogError::not_found("x"), 404, "NOT_FOUND"),
            (CatalogError::conflict("x"), 409, "CONFLICT"),
            (CatalogError::Unauthorized("x".into()), 401, "UNAUTHORIZED"),
            (
                CatalogError::transport(405, "Request method 'PATCH' is not supported"),
                405,
                "METHOD_NOT_ALLOWED",
            ),
            (
                CatalogError::transport(415, "x"),
                415,
                "UNSUPPORTED_MEDIA_TYPE",
            ),
        ];
        for (error, code, name) in cases {
            let (status, body) = normalize(&error);
            assert_eq!(status.as_u16(), code);
            assert_eq!(body.message, name);
        }
    }

    #[test]
    fn field_validation_lists_every_message_in_order() {
        let error = CatalogError::InvalidInput(vec![
            "ISBN cannot be null".into(),
            "Title cannot be null".into(),
            "Author ID must be positive".into(),
        ]);
        let (_, body) = normalize(&error);
        assert_eq!(
            body.details,
            vec![
                "ISBN cannot be null",
                "Title cannot be null",
                "Author ID must be positive"
            ]
        );
    }

    #[test]
    fn inconsistent_data_hides_the_cause() {
        let error = CatalogError::InconsistentData("book 42 references missing author 7".into());
        let (status, body) = normalize(&error);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "INTERNAL");
        assert_eq!(body.details, vec![INTERNAL_DETAIL]);
    }

    #[test]
    fn summary_drops_parser_internals() {
        assert_eq!(
            summary("Failed to parse the request body as JSON: expected value at line 1"),
            "Failed to parse the request body as JSON"
        );
        assert_eq!(summary("no colon here"), "no colon here");
    }

    #[tokio::test]
    async fn test_error_response_format() {
        let response =
            ApiError(CatalogError::not_found("Book not found for the given ISBN")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_of(response).await;
        assert_eq!(
            body,
            ErrorBody {
                status_code: 404,
                message: "NOT_FOUND".into(),
                details: vec!["Book not found for the given ISBN".into()],
            }
        );
    }

    #[tokio::test]
    async fn test_sort_order_scenario_body() {
        let error = CatalogError::InvalidSort("Invalid sort-order [ascending] for sort-by [name]".into());
        let bytes = axum::body::to_bytes(ApiError(error).into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "statusCode": 400,
                "message": "BAD_REQUEST",
                "details": ["Invalid sort-order [ascending] for sort-by [name]"]
            })
        );
    }
}
