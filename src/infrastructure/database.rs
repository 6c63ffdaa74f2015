//! 数据库基础设施
//!
//! [`DatabaseManager`] 持有唯一的 MySQL 连接池，对上层只暴露
//! ping、exec 和 query 三类原语。所有参数都通过 `bind` 按位置传入。

use futures_util::stream::BoxStream;
use sqlx::{
    mysql::{MySql, MySqlArguments, MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow},
    query::Query,
    Connection, Error,
};
use tracing::info;

use crate::config::DatabaseConfig;

/// 写操作的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    /// 仅 INSERT 有意义
    pub last_insert_id: u64,
}

pub type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

#[derive(Clone)]
pub struct DatabaseManager {
    pool: MySqlPool,
}

impl DatabaseManager {
    /// 建立连接池并立即 ping 一次，数据库不可达时直接返回错误
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, Error> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect_with(options)
            .await?;

        let manager = Self { pool };
        manager.ping().await?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            max_connections = config.max_connections,
            "database connected"
        );
        Ok(manager)
    }

    /// 基于已有连接池构建，供测试使用
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn ping(&self) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await
    }

    /// 执行写语句，返回影响行数和自增 id
    pub async fn exec(&self, query: MySqlQuery<'_>) -> Result<ExecOutcome, Error> {
        let result = query.execute(&self.pool).await?;
        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        })
    }

    pub async fn fetch_optional(&self, query: MySqlQuery<'_>) -> Result<Option<MySqlRow>, Error> {
        query.fetch_optional(&self.pool).await
    }

    /// 返回行流。连接在流被 drop 时归还连接池
    pub fn fetch<'a>(&'a self, query: MySqlQuery<'a>) -> BoxStream<'a, Result<MySqlRow, Error>> {
        query.fetch(&self.pool)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
