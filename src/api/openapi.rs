//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Catalog API",
        version = "0.1.0",
        description = "Books with per-copy availability, and library users with loan history"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::late_fees,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookCopy,
            crate::models::book::Checked,
            crate::models::book::Reservation,
            crate::models::book::Publication,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::DeleteBook,
            // Users
            crate::models::user::User,
            crate::models::user::Borrowed,
            crate::models::user::Reserved,
            crate::models::user::Fee,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalog book management"),
        (name = "users", description = "Library user management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
