//! 用户接口

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use shop_common::UserId;
use shop_errors::AppError;
use tracing::info;

use crate::api::http::dto::{self, MessageResponse, UserResponse};
use crate::api::http::error::ApiError;
use crate::api::http::schema::load;
use crate::api::http::state::AppState;
use crate::domain::NewUser;

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.list_all().await?;
    Ok(Json(dto::collect(users)))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user.into()))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let new_user: NewUser = load(&body)?;
    let user = state.users.create(new_user).await?;

    info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /users/{id}
///
/// 先确认用户存在，再校验请求体，最后整体覆盖。
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    body: Bytes,
) -> Result<Json<UserResponse>, ApiError> {
    if state.users.find_by_id(id).await?.is_none() {
        return Err(AppError::validation("Invalid user id").into());
    }

    let new_user: NewUser = load(&body)?;
    let user = state
        .users
        .update(id, new_user)
        .await?
        .ok_or_else(|| AppError::validation("Invalid user id"))?;

    info!(user_id = %id, "User updated");
    Ok(Json(user.into()))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.users.delete(id).await? {
        return Err(AppError::validation("Invalid user id").into());
    }

    info!(user_id = %id, "User deleted");
    Ok(Json(MessageResponse::new(format!("User {} deleted successfully", id))))
}
