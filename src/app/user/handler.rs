//! 用户处理器

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};

use super::model::{User, UserPayload};
use crate::{app::AppState, web::error::CoreError};

/// 路径中的 id 必须是十进制无符号整数
pub fn parse_id(raw: &str) -> Result<u64, CoreError> {
    raw.parse::<u64>()
        .map_err(|_| CoreError::BadRequest("invalid user id".to_string()))
}

// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), CoreError> {
    let Json(payload) = payload?;
    let user = state.user_service.create_user(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, CoreError> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users))
}

// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, CoreError> {
    let id = parse_id(&id)?;
    let user = state.user_service.get_user(id).await?;
    Ok(Json(user))
}

// PUT /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<User>, CoreError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let user = state.user_service.update_user(id, payload).await?;
    Ok(Json(user))
}

// DELETE /users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, CoreError> {
    let id = parse_id(&id)?;
    state.user_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
