//! Basic-auth gate in front of every non-public route.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bookstore_authz::BasicAuthenticator;

use crate::error::ApiError;

/// Reject unauthenticated requests with the standard envelope and a Basic challenge.
pub async fn require_authentication(
    State(authenticator): State<Arc<BasicAuthenticator>>,
    mut request: Request,
    next: Next,
) -> Response {
    if authenticator.is_public(request.uri().path()) {
        return next.run(request).await;
    }

    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match authenticator.authenticate(header_value) {
        Ok(principal) => {
            tracing::debug!(user = %principal.username, "authenticated request");
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(error) => {
            let mut response = ApiError(error).into_response();
            if let Ok(challenge) = HeaderValue::from_str(&authenticator.challenge()) {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, challenge);
            }
            response
        }
    }
}
