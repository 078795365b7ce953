//! 单口令认证服务主入口

use std::sync::Arc;
use std::time::Duration;
use thirantos::{
    auth::{spawn_token_sweeper, Authenticator, SecretComparison, SinglePassAuth},
    config::AppConfig,
    db::Database,
    handlers::health,
    middleware::AppState,
    routes, telemetry,
};
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("thirantos {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境）
    // 按优先级加载：.env.local > .env.development > .env
    if let Ok(path) = std::env::var("THIRANTOS_ENV") {
        dotenv::from_filename(format!(".env.{}", path)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::from_filename(".env.development").ok();
        dotenv::dotenv().ok();
    }

    health::set_start_time();

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "thirantos starting...");

    // 3. 数据库连接池
    let db = Database::connect(&config.database).await?;

    tracing::info!("Database initialized");

    // 4. 认证器与过期令牌清理
    let comparison = if config.auth.constant_time_compare {
        SecretComparison::ConstantTime
    } else {
        SecretComparison::Plain
    };
    let authenticator: Arc<dyn Authenticator> = Arc::new(
        SinglePassAuth::new(
            config.auth.max_login_time,
            config.auth.password.expose_secret().clone(),
        )?
        .with_comparison(comparison),
    );

    tracing::info!(
        max_login_time = config.auth.max_login_time,
        token_header = %config.auth.token_header,
        ?comparison,
        "Authenticator initialized"
    );

    let sweeper = spawn_token_sweeper(
        authenticator.clone(),
        Duration::from_secs(config.auth.sweep_interval_secs),
    );

    // 5. 构建路由
    let app_state = Arc::new(AppState::new(config.clone(), db, authenticator)?);
    let app = routes::create_router(app_state);

    // 6. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    // 7. 优雅关闭
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.graceful_shutdown_timeout_secs))
        .await?;

    sweeper.abort();
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    // 超时后强制退出
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(timeout_secs)).await;
        tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        std::process::exit(1);
    });
}

/// 打印帮助信息
fn print_help() {
    println!("thirantos {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: thirantos [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量（前缀 THIRANTOS_，层级用 __ 分隔）:");
    println!("  THIRANTOS_AUTH__PASSWORD              共享口令（必填）");
    println!("  THIRANTOS_AUTH__MAX_LOGIN_TIME        令牌最大空闲秒数（默认 3600）");
    println!("  THIRANTOS_AUTH__SWEEP_INTERVAL_SECS   过期令牌清理间隔（默认 60）");
    println!("  THIRANTOS_AUTH__TOKEN_HEADER          令牌请求头（默认 token）");
    println!("  THIRANTOS_AUTH__CONSTANT_TIME_COMPARE 口令比较耗时与内容无关（默认 false）");
    println!("  THIRANTOS_DATABASE__URL               数据库 URL");
    println!("  THIRANTOS_SERVER__ADDR                监听地址（默认 0.0.0.0:3000）");
    println!("  THIRANTOS_LOGGING__LEVEL / FORMAT     日志级别与格式");
}
