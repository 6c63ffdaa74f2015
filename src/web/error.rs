//! 错误处理模块
//!
//! 所有处理器都返回 [`CoreError`]，状态码与响应体只在 `into_response` 中决定。

use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error};

use crate::app::user::repository::StoreError;

/// 核心错误类型
#[derive(Debug)]
pub enum CoreError {
    /// 请求格式错误（JSON 无法解析、id 不是整数）
    BadRequest(String),
    /// 字段校验失败
    ValidationError(String),
    NotFound(String),
    InternalServerError(String),
}

/// 错误响应结构
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

/// 触发存储层调用的用户操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOperation {
    Create,
    List,
    Get(u64),
    Update(u64),
    Delete(u64),
}

impl UserOperation {
    /// 返回给客户端的通用失败信息
    pub fn failure_message(self) -> &'static str {
        match self {
            UserOperation::Create => "failed to create user",
            UserOperation::List => "failed to list users",
            UserOperation::Get(_) => "failed to get user",
            UserOperation::Update(_) => "failed to update user",
            UserOperation::Delete(_) => "failed to delete user",
        }
    }
}

impl fmt::Display for UserOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserOperation::Create => write!(f, "create"),
            UserOperation::List => write!(f, "list"),
            UserOperation::Get(id) => write!(f, "get (id={id})"),
            UserOperation::Update(id) => write!(f, "update (id={id})"),
            UserOperation::Delete(id) => write!(f, "delete (id={id})"),
        }
    }
}

impl CoreError {
    /// 记录存储层错误详情，只向客户端返回通用信息
    pub fn store(operation: UserOperation, err: StoreError) -> Self {
        error!(%operation, error = %err, "user store operation failed");
        CoreError::InternalServerError(operation.failure_message().to_string())
    }

    pub fn user_not_found() -> Self {
        CoreError::NotFound("user not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) | CoreError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CoreError::BadRequest(msg)
            | CoreError::ValidationError(msg)
            | CoreError::NotFound(msg)
            | CoreError::InternalServerError(msg) => msg,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            CoreError::BadRequest(_) => "BAD_REQUEST",
            CoreError::ValidationError(_) => "VALIDATION_ERROR",
            CoreError::NotFound(_) => "NOT_FOUND",
            CoreError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

impl std::error::Error for CoreError {}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_response = ErrorResponse {
            error: self.kind().to_string(),
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            message: match self {
                CoreError::BadRequest(msg)
                | CoreError::ValidationError(msg)
                | CoreError::NotFound(msg)
                | CoreError::InternalServerError(msg) => msg,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(reason = %rejection.body_text(), "rejected request body");
        CoreError::BadRequest("invalid request body".to_string())
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        let message = err
            .field_errors()
            .into_values()
            .flat_map(|errors| errors.iter())
            .find_map(|error| error.message.as_ref().map(|msg| msg.to_string()))
            .unwrap_or_else(|| "validation error".to_string());

        CoreError::ValidationError(message)
    }
}
