//! HTML pages under `/library`

use axum::{
    extract::State,
    response::Html,
};

use crate::{error::AppResult, views};

use super::{QueryFilter, RecordId};

pub async fn index() -> Html<String> {
    Html(views::index_page())
}

pub async fn list_books(
    State(state): State<crate::AppState>,
    QueryFilter(filter): QueryFilter,
) -> AppResult<Html<String>> {
    let books = state.services.catalog.list_books(&filter).await?;
    Ok(Html(views::books_page(&books)))
}

pub async fn show_book(
    State(state): State<crate::AppState>,
    RecordId(id): RecordId,
) -> AppResult<Html<String>> {
    let details = state.services.catalog.get_book_details(id).await?;
    Ok(Html(views::book_page(&details)))
}
