//! HTTP 层公共部分

pub mod error;
pub mod middleware;
