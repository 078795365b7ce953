//! 单口令认证器
//!
//! 所有调用方共享同一个口令，登录成功后签发不透明令牌。
//! 令牌采用滑动过期：每次成功使用都会把 last_seen 刷新为当前时间，
//! 超过 `max_login_time` 未使用的令牌视为失效。

use super::{
    clock::{Clock, SystemClock},
    token::generate_token,
    AuthError, Authenticator,
};
use chrono::{DateTime, Duration, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use secrecy::{ExposeSecret, Secret};
use std::fmt;
use std::sync::Arc;

/// 口令比较方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretComparison {
    /// 普通字节比较
    #[default]
    Plain,
    /// 耗时与内容无关的比较（长度不同时仍会立即失败）
    ConstantTime,
}

impl SecretComparison {
    fn matches(self, candidate: &str, secret: &str) -> bool {
        match self {
            SecretComparison::Plain => candidate == secret,
            SecretComparison::ConstantTime => {
                constant_time_eq(candidate.as_bytes(), secret.as_bytes())
            }
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    // black_box 阻止编译器在累加值非零后提前退出循环
    let diff = a
        .iter()
        .zip(b)
        .fold(0u8, |acc, (x, y)| std::hint::black_box(acc | (x ^ y)));
    std::hint::black_box(diff) == 0
}

/// 单口令认证器
pub struct SinglePassAuth {
    secret: Secret<String>,
    max_login_time: Duration,
    comparison: SecretComparison,
    clock: Arc<dyn Clock>,
    /// token -> last_seen
    tokens: DashMap<String, DateTime<Utc>>,
}

impl SinglePassAuth {
    /// 使用系统时钟创建认证器
    pub fn new(max_login_time: u64, password: impl Into<String>) -> Result<Self, AuthError> {
        Self::with_clock(max_login_time, password, Arc::new(SystemClock))
    }

    /// 使用指定时钟创建认证器
    pub fn with_clock(
        max_login_time: u64,
        password: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        if max_login_time == 0 {
            return Err(AuthError::InvalidMaxLoginTime);
        }
        let secs = i64::try_from(max_login_time).map_err(|_| AuthError::InvalidMaxLoginTime)?;
        let max_login_time = Duration::try_seconds(secs).ok_or(AuthError::InvalidMaxLoginTime)?;

        Ok(Self {
            secret: Secret::new(password.into()),
            max_login_time,
            comparison: SecretComparison::default(),
            clock,
            tokens: DashMap::new(),
        })
    }

    /// 设置口令比较方式
    pub fn with_comparison(mut self, comparison: SecretComparison) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn max_login_time(&self) -> Duration {
        self.max_login_time
    }

    pub fn comparison(&self) -> SecretComparison {
        self.comparison
    }

    /// 当前注册表中的令牌数量（包含尚未清理的过期令牌）
    pub fn active_tokens(&self) -> usize {
        self.tokens.len()
    }

    /// 过期判断严格使用大于：间隔恰好等于 max_login_time 仍然有效
    fn is_stale(&self, last_seen: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(last_seen) > self.max_login_time
    }

    fn record_active_gauge(&self) {
        metrics::gauge!("auth_tokens_active").set(self.tokens.len() as f64);
    }
}

impl Authenticator for SinglePassAuth {
    fn authenticate(&self, password: &str) -> String {
        if !self.comparison.matches(password, self.secret.expose_secret()) {
            tracing::warn!("Authentication rejected: password mismatch");
            metrics::counter!("auth_login_total", "result" => "rejected").increment(1);
            return String::new();
        }

        let now = self.clock.now();
        let token = loop {
            let candidate = generate_token();
            match self.tokens.entry(candidate.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(now);
                    break candidate;
                }
                Entry::Occupied(_) => {
                    tracing::warn!("Generated token collided with a live token, regenerating");
                }
            }
        };

        metrics::counter!("auth_login_total", "result" => "success").increment(1);
        self.record_active_gauge();
        tracing::info!(active_tokens = self.tokens.len(), "Session token issued");

        token
    }

    fn use_token(&self, token: &str) -> bool {
        let now = self.clock.now();

        // entry 持有分片写锁，存在性检查、过期检查与续期/删除在同一把锁内完成
        let valid = match self.tokens.entry(token.to_owned()) {
            Entry::Vacant(_) => false,
            Entry::Occupied(mut entry) => {
                if self.is_stale(*entry.get(), now) {
                    entry.remove();
                    metrics::counter!("auth_tokens_evicted_total").increment(1);
                    tracing::debug!("Expired session token evicted on use");
                    false
                } else {
                    let last_seen = entry.get_mut();
                    // last_seen 只增不减
                    if now > *last_seen {
                        *last_seen = now;
                    }
                    true
                }
            }
        };

        let result = if valid { "valid" } else { "invalid" };
        metrics::counter!("auth_token_checks_total", "result" => result).increment(1);

        valid
    }

    fn update_tokens(&self) {
        let now = self.clock.now();
        let mut evicted = 0usize;

        self.tokens.retain(|_, last_seen| {
            let keep = !self.is_stale(*last_seen, now);
            if !keep {
                evicted += 1;
            }
            keep
        });

        if evicted > 0 {
            metrics::counter!("auth_tokens_evicted_total").increment(evicted as u64);
        }
        self.record_active_gauge();

        tracing::debug!(
            evicted,
            active_tokens = self.tokens.len(),
            "Token sweep completed"
        );
    }
}

impl fmt::Debug for SinglePassAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinglePassAuth")
            .field("secret", &self.secret)
            .field("max_login_time", &self.max_login_time)
            .field("comparison", &self.comparison)
            .field("active_tokens", &self.tokens.len())
            .finish()
    }
}
