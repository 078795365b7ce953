//! 错误处理单元测试
//!
//! 测试应用错误类型的各种行为

use axum::{http::StatusCode, response::IntoResponse};
use http_body_util::BodyExt;
use thirantos::{db::DbError, error::AppError};

// ==================== 错误状态码测试 ====================

#[test]
fn test_error_status_codes() {
    assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        AppError::InvalidParameter("limit".to_string()).status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
}

#[test]
fn test_server_error_status_codes() {
    let db_error = AppError::Database(DbError::ConnectionFailed("refused".to_string()));
    assert_eq!(db_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let config_error = AppError::Config("bad".to_string());
    assert_eq!(config_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ==================== 用户消息测试 ====================

#[test]
fn test_user_messages_no_sensitive_info() {
    let db_error = AppError::Database(DbError::ConnectionFailed(
        "sqlite://secret-path.db unreachable".to_string(),
    ));
    let message = db_error.user_message();
    assert_eq!(message, "Database error occurred");
    assert!(!message.contains("secret-path"));
}

#[test]
fn test_config_error_hides_detail() {
    let error = AppError::Config("missing auth.password".to_string());
    assert_eq!(error.user_message(), "Configuration error");
}

// ==================== 响应格式测试 ====================

#[tokio::test]
async fn test_error_response_shape() {
    let response = AppError::InvalidParameter("offset".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["error"]["code"], 400);
    assert_eq!(json["error"]["message"], "Invalid parameter offset");
    assert!(json["error"]["request_id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_unauthorized_response_does_not_explain_cause() {
    let response = AppError::Unauthorized.into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"]["message"], "Unauthorized");
}
