//! 用户业务服务

use std::sync::Arc;

use validator::Validate;

use super::{
    model::{User, UserPayload},
    repository::UserRepository,
};
use crate::web::error::{CoreError, UserOperation};

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// 数据库是否可达
    pub async fn store_available(&self) -> bool {
        match self.repository.ping().await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "health check ping failed");
                false
            }
        }
    }

    pub async fn create_user(&self, payload: UserPayload) -> Result<User, CoreError> {
        payload.validate()?;

        let id = self
            .repository
            .insert(&payload)
            .await
            .map_err(|err| CoreError::store(UserOperation::Create, err))?;

        Ok(payload.into_user(id))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        self.repository
            .list()
            .await
            .map_err(|err| CoreError::store(UserOperation::List, err))
    }

    pub async fn get_user(&self, id: u64) -> Result<User, CoreError> {
        self.repository
            .find(id)
            .await
            .map_err(|err| CoreError::store(UserOperation::Get(id), err))?
            .ok_or_else(CoreError::user_not_found)
    }

    /// id 以路径为准，请求体中的 id 被忽略
    pub async fn update_user(&self, id: u64, payload: UserPayload) -> Result<User, CoreError> {
        payload.validate()?;

        let affected = self
            .repository
            .update(id, &payload)
            .await
            .map_err(|err| CoreError::store(UserOperation::Update(id), err))?;
        if affected == 0 {
            return Err(CoreError::user_not_found());
        }

        Ok(payload.into_user(id))
    }

    pub async fn delete_user(&self, id: u64) -> Result<(), CoreError> {
        let affected = self
            .repository
            .delete(id)
            .await
            .map_err(|err| CoreError::store(UserOperation::Delete(id), err))?;
        if affected == 0 {
            return Err(CoreError::user_not_found());
        }

        Ok(())
    }
}
