//! 令牌认证中间件

use crate::{auth::Authenticator, error::AppError};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// 中间件状态：认证器与令牌所在的请求头
#[derive(Clone)]
pub struct TokenGate {
    pub authenticator: Arc<dyn Authenticator>,
    pub header: HeaderName,
}

impl TokenGate {
    pub fn new(authenticator: Arc<dyn Authenticator>, header: HeaderName) -> Self {
        Self {
            authenticator,
            header,
        }
    }
}

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub checked_at: DateTime<Utc>,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 Authenticated
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Authenticated>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 从指定请求头提取令牌，缺失或为空时返回 Unauthorized
pub fn extract_token(headers: &HeaderMap, header: &HeaderName) -> Result<String, AppError> {
    headers
        .get(header)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or(AppError::Unauthorized)
}

/// 令牌认证中间件 - 必须认证
pub async fn secure(
    State(gate): State<TokenGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(req.headers(), &gate.header)?;

    if !gate.authenticator.use_token(&token) {
        tracing::debug!(header = %gate.header, "Rejected request with invalid or expired token");
        return Err(AppError::Unauthorized);
    }

    req.extensions_mut().insert(Authenticated {
        checked_at: Utc::now(),
    });

    Ok(next.run(req).await)
}
