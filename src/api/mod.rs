//! API handlers for the catalog REST endpoints and library pages

pub mod books;
pub mod health;
pub mod library;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{collections::HashMap, path::PathBuf};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::validate_payload,
    repository::Filter,
    AppState,
};

/// JSON body extractor that runs schema validation before the handler sees it
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        validate_payload(payload).map(ValidatedJson)
    }
}

/// Validated body kept alongside the JSON document it was decoded from
pub struct Submitted<T> {
    pub data: T,
    pub raw: Value,
}

#[async_trait]
impl<T, S> FromRequest<S> for Submitted<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let data = validate_payload(raw.clone())?;
        Ok(Submitted { data, raw })
    }
}

/// Query-string filter extractor
pub struct QueryFilter(pub Filter);

#[async_trait]
impl<S> FromRequestParts<S> for QueryFilter
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        Filter::from_query(&params).map(QueryFilter)
    }
}

/// Integer record id from the `:id` path segment
pub struct RecordId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        Ok(RecordId(id))
    }
}

/// API root
pub async fn api_root() -> &'static str {
    "Library API"
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let assets = PathBuf::from(&state.config.assets.dir);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(api_root))
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books))
        .route("/books", post(books::create_book))
        .route("/books", put(books::update_book))
        .route("/books", delete(books::delete_book))
        .route("/books/:id", get(books::get_book))
        // Users
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users", put(users::update_user))
        .route("/users/late-fees", get(users::late_fees))
        .route("/users/:id", get(users::get_user))
        // Library pages
        .route("/library", get(library::index))
        .route("/library/books", get(library::list_books))
        .route("/library/books/:id", get(library::show_book))
        // Stylesheets and images
        .route_service("/library/styles.css", ServeFile::new(assets.join("css/styles.css")))
        .route_service("/library/fluid_grid.css", ServeFile::new(assets.join("css/fluid_grid.css")))
        .nest_service("/library/images", ServeDir::new(assets.join("images")))
        .with_state(state);

    app.merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
