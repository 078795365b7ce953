//! 日志初始化
//! 根据 logging 配置安装 tracing 订阅者

use crate::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 未设置 RUST_LOG 时使用的过滤指令
///
/// 关闭 `database.echo` 时压低 sqlx 自带的逐条语句日志，
/// 开启时语句由数据库助手以 debug 级别输出。
pub fn default_directives(config: &AppConfig) -> String {
    let level = config.logging.level.to_lowercase();
    if config.database.echo {
        level
    } else {
        format!("{level},sqlx::query=warn")
    }
}

/// 安装全局订阅者，只能调用一次
pub fn init_telemetry(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let log_layer = if config.logging.format.eq_ignore_ascii_case("pretty") {
        fmt_layer.pretty().boxed()
    } else {
        fmt_layer.json().with_current_span(true).boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(log_layer)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        directives = %default_directives(config),
        format = %config.logging.format,
        "Logging initialized"
    );
}
