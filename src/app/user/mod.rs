//! 用户模块

pub mod handler;
pub mod memory;
pub mod model;
pub mod repository;
pub mod service;

pub use model::{User, UserPayload};
pub use service::UserService;
