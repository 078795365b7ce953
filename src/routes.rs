//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use crate::{
    auth::{secure, TokenGate},
    handlers,
    middleware::AppState,
};

/// 登录请求体上限
const LOGIN_BODY_LIMIT: usize = 16 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    let gate = TokenGate::new(state.authenticator.clone(), state.token_header.clone());

    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 登录（无需认证）
    let auth_routes = Router::new()
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .layer(RequestBodyLimitLayer::new(LOGIN_BODY_LIMIT));

    // 需要认证的路由
    let authenticated_routes = Router::new()
        .route("/api/v1/session", get(handlers::auth::session))
        .route("/api/v1/tables", get(handlers::tables::list_tables))
        .layer(axum::middleware::from_fn_with_state(gate, secure));

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(authenticated_routes)
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}
