//! 测试公共模块
//! 提供测试辅助函数和测试工具
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use thirantos::{
    auth::{Authenticator, ManualClock, SinglePassAuth},
    config::{AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig},
    db::Database,
    middleware::AppState,
};
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "TestPass123";
pub const TEST_TTL: u64 = 300;

/// 创建测试配置
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(), // 使用随机端口
            graceful_shutdown_timeout_secs: 5,
        },
        auth: AuthConfig {
            password: Secret::new(TEST_PASSWORD.to_string()),
            max_login_time: TEST_TTL,
            sweep_interval_secs: 1,
            token_header: "token".to_string(),
            constant_time_compare: false,
        },
        database: DatabaseConfig {
            url: Secret::new("sqlite::memory:".to_string()),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 5,
            echo: true,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
    }
}

/// 初始化内存测试数据库
pub async fn setup_test_db() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");

    Database::from_pool(pool, true)
}

/// 测试环境：应用状态 + 可控时钟
pub struct TestApp {
    pub state: Arc<AppState>,
    pub auth: Arc<SinglePassAuth>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        thirantos::routes::create_router(self.state.clone())
    }
}

/// 创建测试应用状态
pub async fn create_test_app() -> TestApp {
    create_test_app_with_config(create_test_config()).await
}

pub async fn create_test_app_with_config(config: AppConfig) -> TestApp {
    let clock = Arc::new(ManualClock::at_epoch());
    let auth = Arc::new(
        SinglePassAuth::with_clock(config.auth.max_login_time, TEST_PASSWORD, clock.clone())
            .expect("Failed to create authenticator"),
    );
    let authenticator: Arc<dyn Authenticator> = auth.clone();
    let db = setup_test_db().await;

    let state = Arc::new(AppState::new(config, db, authenticator).expect("Failed to build state"));

    TestApp { state, auth, clock }
}

/// 发送登录请求
pub async fn login(app: Router, password: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "password": password }).to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// 登录并返回令牌
pub async fn login_token(app: Router) -> String {
    let response = login(app, TEST_PASSWORD).await;
    let json = body_json(response).await;
    json["token"].as_str().expect("token missing").to_string()
}

/// 携带令牌发送 GET 请求
pub async fn get_with_token(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("token", token);
    }

    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// 读取 JSON 响应体
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
