//! 单口令认证服务库
//! 令牌认证器、通用 SQL 助手与 HTTP 胶水层

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod params;
pub mod routes;
pub mod telemetry;
