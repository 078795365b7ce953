//! Authentication module
//!
//! `Authenticator` 是令牌生命周期的统一契约：
//! - `authenticate`: 校验口令，成功时签发令牌（失败返回空字符串）
//! - `use_token`: 校验并续期令牌（滑动过期）
//! - `update_tokens`: 清理过期令牌
//!
//! 不同的凭据策略共享同一契约，目前只有单口令实现 `SinglePassAuth`。

pub mod clock;
pub mod middleware;
pub mod single_pass;
pub mod sweeper;
pub mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use middleware::{extract_token, secure, TokenGate};
pub use single_pass::{SecretComparison, SinglePassAuth};
pub use sweeper::spawn_token_sweeper;
pub use token::generate_token;

/// 认证器契约
///
/// 三个操作都是同步、无 I/O 的，实现必须保证并发调用下令牌注册表的一致性。
pub trait Authenticator: Send + Sync {
    /// 校验口令，成功返回非空令牌，失败返回空字符串
    fn authenticate(&self, password: &str) -> String;

    /// 令牌有效时续期并返回 true；不存在或已过期返回 false（两者不可区分）
    fn use_token(&self, token: &str) -> bool;

    /// 移除所有过期令牌
    fn update_tokens(&self);
}

/// 认证器构造错误
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("max_login_time must be a positive number of seconds")]
    InvalidMaxLoginTime,
}
