use axum::{extract::{Path, State}, http::StatusCode, Json};
use tracing::info;

use models::book::{Book, BookInput};

use crate::{errors::JsonApiError, routes::AppState};

#[utoipa::path(
    post, path = "/book", tag = "book",
    request_body = crate::openapi::BookInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::BookDoc),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(State(state): State<AppState>, Json(input): Json<BookInput>) -> Result<(StatusCode, Json<Book>), JsonApiError> {
    let created = state.books.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/book", tag = "book",
    responses((status = 200, description = "List OK", body = [crate::openapi::BookDoc]))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Book>>, JsonApiError> {
    let all = state.books.find_all().await?;
    info!(count = all.len(), "list books");
    Ok(Json(all))
}

#[utoipa::path(
    get, path = "/book/{id}", tag = "book",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::BookDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Book>, JsonApiError> {
    Ok(Json(state.books.find_by_id(id).await?))
}

#[utoipa::path(
    put, path = "/book/{id}", tag = "book",
    params(("id" = i32, Path, description = "Book id")),
    request_body = crate::openapi::BookInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::BookDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(State(state): State<AppState>, Path(id): Path<i32>, Json(input): Json<BookInput>) -> Result<Json<Book>, JsonApiError> {
    Ok(Json(state.books.update(id, input).await?))
}

/// Plain-text `ok` on success.
#[utoipa::path(
    delete, path = "/book/{id}", tag = "book",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Deleted", body = String),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> Result<&'static str, JsonApiError> {
    Ok(state.books.delete_by_id(id).await?)
}
