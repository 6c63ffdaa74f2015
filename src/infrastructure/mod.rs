//! 基础设施

pub mod database;
pub mod logger;
