//! Background scheduled tasks for the application.
//!
//! Currently only the inactive-session sweep. Call `spawn_all` once during startup.

use crate::config::SessionConfig;
use crate::services::LotteryService;

/// Spawn all background tasks.
///
/// Detaches via `tokio::spawn`; it does not block.
pub fn spawn_all(lottery_service: LotteryService, session_config: &SessionConfig) {
    // 定期清理闲置会话（默认每 10 分钟，闲置超过 1 小时）
    {
        let svc = lottery_service.clone();
        let interval = session_config.sweep_interval();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                match svc.sweep_inactive() {
                    n if n > 0 => log::info!(
                        "Removed {n} inactive sessions, {} remaining",
                        svc.session_count()
                    ),
                    _ => log::debug!("Performed cleanup of inactive sessions"),
                }
            }
        });
    }
}
