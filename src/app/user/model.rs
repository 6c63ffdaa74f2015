//! 用户数据模型

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 持久化的用户记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub age: u64,
}

/// 创建、更新共用的请求体
///
/// 缺失字段取零值，`id` 等未知字段被忽略。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[validate(schema(function = "validate_user_fields"))]
pub struct UserPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub age: u64,
}

impl UserPayload {
    pub fn into_user(self, id: u64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            age: self.age,
        }
    }
}

/// 按顺序检查，只报告第一个失败的规则
fn validate_user_fields(payload: &UserPayload) -> Result<(), ValidationError> {
    if payload.name.trim().is_empty() {
        return Err(rule_error("name_required", "name is required"));
    }
    if payload.email.trim().is_empty() {
        return Err(rule_error("email_required", "email is required"));
    }
    if !payload.email.contains('@') {
        return Err(rule_error("email_format", "email format is invalid"));
    }
    Ok(())
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}
