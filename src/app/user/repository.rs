//! 用户数据访问
//!
//! [`UserRepository`] 是处理器依赖的唯一接口，生产环境使用
//! [`MySqlUserRepository`]，测试使用 [`super::memory::InMemoryUserRepository`]。

use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::FromRow;
use thiserror::Error;
use tracing::warn;

use super::model::{User, UserPayload};
use crate::infrastructure::database::DatabaseManager;

/// 存储层错误，内容只写日志，不返回给客户端
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable")]
    Unavailable,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    /// 返回新分配的 id
    async fn insert(&self, user: &UserPayload) -> Result<u64, StoreError>;

    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn find(&self, id: u64) -> Result<Option<User>, StoreError>;

    /// 返回影响行数，0 表示没有匹配的记录
    async fn update(&self, id: u64, user: &UserPayload) -> Result<u64, StoreError>;

    /// 返回影响行数，0 表示没有匹配的记录
    async fn delete(&self, id: u64) -> Result<u64, StoreError>;
}

const INSERT_USER: &str = "INSERT INTO users (name, email, age) VALUES (?, ?, ?)";
const SELECT_USERS: &str = "SELECT id, name, email, age FROM users";
const SELECT_USER: &str = "SELECT id, name, email, age FROM users WHERE id = ?";
const UPDATE_USER: &str = "UPDATE users SET name = ?, email = ?, age = ? WHERE id = ?";
const DELETE_USER: &str = "DELETE FROM users WHERE id = ?";

pub struct MySqlUserRepository {
    db: DatabaseManager,
}

impl MySqlUserRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(self.db.ping().await?)
    }

    async fn insert(&self, user: &UserPayload) -> Result<u64, StoreError> {
        let outcome = self
            .db
            .exec(
                sqlx::query(INSERT_USER)
                    .bind(&user.name)
                    .bind(&user.email)
                    .bind(user.age),
            )
            .await?;
        Ok(outcome.last_insert_id)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        // rows 离开作用域时（包括 ? 提前返回）连接即归还连接池
        let mut rows = self.db.fetch(sqlx::query(SELECT_USERS));
        let mut users = Vec::new();

        while let Some(row) = rows.try_next().await? {
            match User::from_row(&row) {
                Ok(user) => users.push(user),
                Err(err) => warn!(error = %err, "skipping user row that failed to decode"),
            }
        }

        Ok(users)
    }

    async fn find(&self, id: u64) -> Result<Option<User>, StoreError> {
        let row = self
            .db
            .fetch_optional(sqlx::query(SELECT_USER).bind(id))
            .await?;
        match row {
            Some(row) => Ok(Some(User::from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, id: u64, user: &UserPayload) -> Result<u64, StoreError> {
        let outcome = self
            .db
            .exec(
                sqlx::query(UPDATE_USER)
                    .bind(&user.name)
                    .bind(&user.email)
                    .bind(user.age)
                    .bind(id),
            )
            .await?;
        Ok(outcome.rows_affected)
    }

    async fn delete(&self, id: u64) -> Result<u64, StoreError> {
        let outcome = self.db.exec(sqlx::query(DELETE_USER).bind(id)).await?;
        Ok(outcome.rows_affected)
    }
}
