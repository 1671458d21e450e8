use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use bookstore_db::ReviewId;
use bookstore_http::ApiError;

use super::models::{ReviewRequest, ReviewView};
use super::service::ReviewService;

pub fn router(service: ReviewService) -> Router {
    Router::new()
        .route("/{isbn}", get(list_reviews).post(submit_review))
        .route("/{isbn}/{review_id}", put(update_review))
        .with_state(service)
}

async fn submit_review(
    State(service): State<ReviewService>,
    isbn: Result<Path<String>, PathRejection>,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReviewView>), ApiError> {
    let Path(isbn) = isbn?;
    let Json(request) = body?;
    let view = service.submit_review(&isbn, request.validate()?).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn list_reviews(
    State(service): State<ReviewService>,
    isbn: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<ReviewView>>, ApiError> {
    let Path(isbn) = isbn?;
    Ok(Json(service.list_reviews(&isbn).await?))
}

async fn update_review(
    State(service): State<ReviewService>,
    params: Result<Path<(String, ReviewId)>, PathRejection>,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<ReviewView>, ApiError> {
    let Path((isbn, review_id)) = params?;
    let Json(request) = body?;
    Ok(Json(
        service
            .update_review(&isbn, review_id, request.validate()?)
            .await?,
    ))
}
