//! Book endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::{
    error::AppResult,
    models::book::{Book, CreateBook, DeleteBook, UpdateBook},
};

use super::{QueryFilter, RecordId, Submitted, ValidatedJson};

/// List books matching the query filter
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(
        ("genre" = Option<String>, Query, description = "Any book field; dotted keys reach nested fields (publication.publisher)")
    ),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 400, description = "Malformed filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    QueryFilter(filter): QueryFilter,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books(&filter).await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 400, description = "Malformed ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    RecordId(id): RecordId,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a book; the server assigns its `_id`
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    ValidatedJson(data): ValidatedJson<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.catalog.create_book(data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Set the given fields on the book identified by `_id`
#[utoipa::path(
    put,
    path = "/books",
    tag = "books",
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Submitted payload", body = UpdateBook),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Submitted { data, raw }: Submitted<UpdateBook>,
) -> AppResult<Json<Value>> {
    state.services.catalog.update_book(data).await?;
    Ok(Json(raw))
}

/// Delete the book identified by `_id`
#[utoipa::path(
    delete,
    path = "/books",
    tag = "books",
    request_body = DeleteBook,
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Missing or non-integer _id", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    ValidatedJson(data): ValidatedJson<DeleteBook>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(data.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
