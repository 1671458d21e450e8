use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookstore_db::Page;
use bookstore_http::ApiError;

use super::models::{BookView, CreateBookRequest, UpdateBookRequest};
use super::search::SearchFilter;
use super::service::BookService;

pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{isbn}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(service)
}

async fn list_books(
    State(service): State<BookService>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Page<BookView>>, ApiError> {
    let Query(pairs) = query?;
    let filter = SearchFilter::from_pairs(pairs);
    Ok(Json(service.list_books(&filter).await?))
}

async fn create_book(
    State(service): State<BookService>,
    body: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookView>), ApiError> {
    let Json(request) = body?;
    let view = service.create_book(request.validate()?).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_book(
    State(service): State<BookService>,
    isbn: Result<Path<String>, PathRejection>,
) -> Result<Json<BookView>, ApiError> {
    let Path(isbn) = isbn?;
    Ok(Json(service.get_book(&isbn).await?))
}

async fn update_book(
    State(service): State<BookService>,
    isbn: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdateBookRequest>, JsonRejection>,
) -> Result<Json<BookView>, ApiError> {
    let Path(isbn) = isbn?;
    let Json(request) = body?;
    Ok(Json(service.update_book(&isbn, request.validate()?).await?))
}

async fn delete_book(
    State(service): State<BookService>,
    isbn: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(isbn) = isbn?;
    service.delete_book(&isbn).await?;
    Ok(StatusCode::NO_CONTENT)
}
