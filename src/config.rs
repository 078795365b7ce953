//! 配置系统
//! 从环境变量加载所有配置，使用 Secret 包装敏感信息

use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址，例如 "0.0.0.0:3000"
    pub addr: String,
    /// 优雅关闭超时时间（秒）
    pub graceful_shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// 共享口令（使用 Secret 包装，防止日志泄露）
    pub password: Secret<String>,
    /// 令牌最大空闲时间（秒），超过后令牌失效
    pub max_login_time: u64,
    /// 过期令牌清理间隔（秒）
    pub sweep_interval_secs: u64,
    /// 携带令牌的请求头
    pub token_header: String,
    /// 使用与内容无关耗时的口令比较
    pub constant_time_compare: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库连接 URL（使用 Secret 包装，防止日志泄露）
    pub url: Secret<String>,
    /// 最大连接数
    pub max_connections: u32,
    /// 最小连接数
    pub min_connections: u32,
    /// 获取连接超时时间（秒）
    pub acquire_timeout_secs: u64,
    /// 是否在 debug 日志中输出执行的语句
    pub echo: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("server.addr", "0.0.0.0:3000")?
            .set_default("server.graceful_shutdown_timeout_secs", 30)?
            .set_default("auth.max_login_time", 3600)?
            .set_default("auth.sweep_interval_secs", 60)?
            .set_default("auth.token_header", "token")?
            .set_default("auth.constant_time_compare", false)?
            .set_default("database.url", "sqlite://database.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.echo", false)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?;

        // 从环境变量加载配置（前缀为 THIRANTOS_）
        settings = settings.add_source(
            Environment::with_prefix("THIRANTOS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.password.expose_secret().is_empty() {
            return Err(ConfigError::Message(
                "auth.password must not be empty".to_string(),
            ));
        }

        if self.auth.max_login_time == 0 {
            return Err(ConfigError::Message(
                "auth.max_login_time must be a positive number of seconds".to_string(),
            ));
        }

        if self.auth.sweep_interval_secs == 0 {
            return Err(ConfigError::Message(
                "auth.sweep_interval_secs must be a positive number of seconds".to_string(),
            ));
        }

        if axum::http::HeaderName::try_from(self.auth.token_header.as_str()).is_err() {
            return Err(ConfigError::Message(format!(
                "Invalid token header name: {:?}",
                self.auth.token_header
            )));
        }

        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        // 验证日志格式
        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        // 验证数据库连接池配置
        if self.database.max_connections < self.database.min_connections {
            return Err(ConfigError::Message(
                "max_connections must be >= min_connections".to_string(),
            ));
        }

        Ok(())
    }
}
