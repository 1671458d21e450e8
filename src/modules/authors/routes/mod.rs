use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use bookstore_db::AuthorId;
use bookstore_http::ApiError;

use super::{models::AuthorView, service::AuthorService};

pub fn router(service: AuthorService) -> Router {
    Router::new()
        .route("/{id}", get(get_author))
        .with_state(service)
}

async fn get_author(
    State(service): State<AuthorService>,
    id: Result<Path<AuthorId>, PathRejection>,
) -> Result<Json<AuthorView>, ApiError> {
    let Path(id) = id?;
    Ok(Json(service.get_author_by_id(id).await?))
}
