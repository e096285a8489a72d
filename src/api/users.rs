//! User management endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::{
    error::AppResult,
    models::user::{CreateUser, UpdateUser, User},
};

use super::{QueryFilter, RecordId, Submitted, ValidatedJson};

/// List users matching the query filter
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(
        ("name" = Option<String>, Query, description = "Any user field; dotted keys reach nested fields")
    ),
    responses(
        (status = 200, description = "Matching users", body = Vec<User>),
        (status = 400, description = "Malformed filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    QueryFilter(filter): QueryFilter,
) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.list_users(&filter).await?;
    Ok(Json(users))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 400, description = "Malformed ID", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    RecordId(id): RecordId,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_user(id).await?;
    Ok(Json(user))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    ValidatedJson(data): ValidatedJson<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let created = state.services.users.create_user(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Set the given fields on the user identified by `_id`
#[utoipa::path(
    put,
    path = "/users",
    tag = "users",
    request_body = UpdateUser,
    responses(
        (status = 200, description = "Submitted payload", body = UpdateUser),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    Submitted { data, raw }: Submitted<UpdateUser>,
) -> AppResult<Json<Value>> {
    state.services.users.update_user(data).await?;
    Ok(Json(raw))
}

/// Users with outstanding late fees
#[utoipa::path(
    get,
    path = "/users/late-fees",
    tag = "users",
    responses(
        (status = 200, description = "Users whose fee list is not empty", body = Vec<User>)
    )
)]
pub async fn late_fees(
    State(state): State<crate::AppState>,
    QueryFilter(filter): QueryFilter,
) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.late_fees(&filter).await?;
    Ok(Json(users))
}
