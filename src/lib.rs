//! # 用户记录管理服务
//!
//! 通过 HTTP/JSON 对 `users` 表提供增删改查和健康检查：
//! - `app`: 路由、处理器、业务服务和用户仓库
//! - `web`: 错误映射和中间件
//! - `infrastructure`: MySQL 连接池与日志
//! - `config`: 启动配置

pub mod app;
pub mod config;
pub mod infrastructure;
pub mod web;

pub use app::{router, AppState};
pub use config::{AppConfig, ConfigError};
