//! 过期令牌定时清理

use super::Authenticator;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// 启动后台清理任务，按固定间隔调用 `update_tokens`
///
/// 令牌过期在 `use_token` 中也会被检查，清理任务只负责回收内存。
/// 返回的 JoinHandle 可用于在关闭时 abort。
pub fn spawn_token_sweeper(auth: Arc<dyn Authenticator>, every: Duration) -> JoinHandle<()> {
    tracing::info!(interval_secs = every.as_secs(), "Token sweeper started");

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // 第一次 tick 立即返回，跳过
        interval.tick().await;

        loop {
            interval.tick().await;
            auth.update_tokens();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ManualClock, SinglePassAuth};

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_stale_tokens() {
        let clock = Arc::new(ManualClock::at_epoch());
        let auth = Arc::new(SinglePassAuth::with_clock(10, "secret", clock.clone()).unwrap());

        auth.authenticate("secret");
        auth.authenticate("secret");
        assert_eq!(auth.active_tokens(), 2);

        let handle = spawn_token_sweeper(auth.clone(), Duration::from_secs(5));

        clock.advance_secs(11);
        tokio::time::sleep(Duration::from_secs(6)).await;

        assert_eq!(auth.active_tokens(), 0);
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_keeps_fresh_tokens() {
        let clock = Arc::new(ManualClock::at_epoch());
        let auth = Arc::new(SinglePassAuth::with_clock(10, "secret", clock.clone()).unwrap());
        let token = auth.authenticate("secret");

        let handle = spawn_token_sweeper(auth.clone(), Duration::from_secs(1));
        clock.advance_secs(5);
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(auth.active_tokens(), 1);
        assert!(auth.use_token(&token));
        handle.abort();
    }
}
