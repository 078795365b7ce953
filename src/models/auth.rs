//! Authentication-related models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Header the token must be sent in
    pub token_header: String,
    /// Idle seconds before the token expires
    pub max_login_time: u64,
}

/// Current session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub checked_at: DateTime<Utc>,
}
