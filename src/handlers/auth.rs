//! 认证相关的 HTTP 处理器

use crate::{
    auth::middleware::Authenticated,
    error::AppError,
    middleware::AppState,
    models::auth::{LoginRequest, LoginResponse, SessionResponse},
};
use axum::{extract::State, Json};
use std::sync::Arc;

/// 登录：口令正确时签发令牌
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let token = state.authenticator.authenticate(&req.password);
    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }

    Ok(Json(LoginResponse {
        token,
        token_header: state.token_header.to_string(),
        max_login_time: state.config.auth.max_login_time,
    }))
}

/// 当前会话（令牌已由中间件校验并续期）
pub async fn session(auth: Authenticated) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: true,
        checked_at: auth.checked_at,
    })
}
