//! 服务配置
//!
//! 启动时从环境变量构建一次 [`AppConfig`]，之后作为普通值向下传递。

use std::time::Duration;

use thiserror::Error;

/// 配置错误，出现即终止启动
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// 服务配置结构
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// HTTP 服务配置
    pub http: HttpConfig,
}

/// 数据库配置
#[derive(Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// 最大并发连接数，空闲连接同样受此上限约束
    pub max_connections: u32,
    /// 单个连接的最长存活时间
    pub max_lifetime: Duration,
    /// 空闲超过该时长的连接被回收
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

// 手写 Debug，避免把密码打进日志
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("max_lifetime", &self.max_lifetime)
            .field("idle_timeout", &self.idle_timeout)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// HTTP 服务配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl AppConfig {
    /// 从进程环境变量读取配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源读取配置，空字符串视为未设置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        // 五个数据库变量先全部检查是否存在，再校验格式
        let user = require("DB_USER")?;
        let password = require("DB_PASS")?;
        let host = require("DB_HOST")?;
        let port = require("DB_PORT")?;
        let name = require("DB_NAME")?;

        let database = DatabaseConfig {
            user,
            password,
            host,
            port: parse_port("DB_PORT", port)?,
            name,
            ..DatabaseConfig::pool_defaults()
        };

        let mut http = HttpConfig::default();
        if let Some(host) = get("HTTP_HOST") {
            http.bind_address = host;
        }
        if let Some(port) = get("HTTP_PORT") {
            http.port = parse_port("HTTP_PORT", port)?;
        }

        Ok(Self { database, http })
    }
}

impl LoggingConfig {
    /// 日志在其余配置之前初始化，以便记录配置错误，因此单独读取
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup("LOG_LEVEL").filter(|value| !value.trim().is_empty());
        Self {
            level: level.unwrap_or_else(|| Self::default().level),
        }
    }
}

impl DatabaseConfig {
    fn pool_defaults() -> Self {
        Self {
            user: String::new(),
            password: String::new(),
            host: String::new(),
            port: 3306,
            name: String::new(),
            max_connections: 25,
            max_lifetime: Duration::from_secs(5 * 60),
            idle_timeout: Duration::from_secs(10 * 60),
            acquire_timeout: Duration::from_secs(8),
        }
    }
}

fn parse_port(name: &'static str, value: String) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
