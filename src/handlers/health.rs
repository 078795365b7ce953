//! 健康检查处理器
//! 提供 /health 和 /ready 端点

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use crate::{db::HealthStatus, middleware::AppState};

/// 存活探针响应
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// 就绪探针响应
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: Vec<HealthCheck>,
    pub auth: AuthSummary,
}

/// 客户端登录所需的认证参数
#[derive(Serialize)]
pub struct AuthSummary {
    pub token_header: String,
    pub max_login_time: u64,
}

/// 健康检查项
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

static APP_START_TIME: OnceLock<Instant> = OnceLock::new();

/// 设置应用启动时间（只有第一次调用生效）
pub fn set_start_time() {
    APP_START_TIME.get_or_init(Instant::now);
}

/// 获取应用运行时间（秒）
pub fn get_uptime() -> u64 {
    APP_START_TIME.get().map_or(0, |start| start.elapsed().as_secs())
}

/// 存活探针
/// 快速响应，不检查依赖
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: get_uptime(),
    })
}

impl From<(&str, HealthStatus)> for HealthCheck {
    fn from((name, health): (&str, HealthStatus)) -> Self {
        let (status, message) = match health {
            HealthStatus::Healthy => ("healthy", None),
            HealthStatus::Unhealthy(msg) => ("unhealthy", Some(msg)),
        };
        Self {
            name: name.to_string(),
            status: status.to_string(),
            message,
        }
    }
}

/// 就绪探针
/// 检查数据库，并返回客户端需要的令牌参数
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> Json<ReadinessResponse> {
    let checks: Vec<HealthCheck> = vec![("database", state.db.health_check().await).into()];
    let ready = checks.iter().all(|c| c.status == "healthy");

    Json(ReadinessResponse {
        ready,
        checks,
        auth: AuthSummary {
            token_header: state.token_header.as_str().to_string(),
            max_login_time: state.config.auth.max_login_time,
        },
    })
}
