//! 内存实现的用户仓库，用于测试和本地调试

use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    model::{User, UserPayload},
    repository::{StoreError, UserRepository},
};

#[derive(Default)]
struct Table {
    last_id: u64,
    rows: BTreeMap<u64, User>,
}

/// 行为与 `users` 表一致：id 从 1 开始自增且不复用
pub struct InMemoryUserRepository {
    table: RwLock<Table>,
    available: AtomicBool,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self {
            table: RwLock::new(Table::default()),
            available: AtomicBool::new(true),
        }
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟数据库断开或恢复
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn insert(&self, user: &UserPayload) -> Result<u64, StoreError> {
        self.check()?;
        let mut table = self.table.write().await;
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(id, user.clone().into_user(id));
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.check()?;
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find(&self, id: u64) -> Result<Option<User>, StoreError> {
        self.check()?;
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, id: u64, user: &UserPayload) -> Result<u64, StoreError> {
        self.check()?;
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = user.clone().into_user(id);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: u64) -> Result<u64, StoreError> {
        self.check()?;
        let removed = self.table.write().await.rows.remove(&id);
        Ok(u64::from(removed.is_some()))
    }
}
