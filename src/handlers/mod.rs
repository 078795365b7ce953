//! HTTP 处理器模块

pub mod auth;
pub mod health;
pub mod tables;

use crate::error::AppError;

/// 未匹配的路由统一返回 404 错误体
pub async fn not_found() -> AppError {
    AppError::NotFound
}
