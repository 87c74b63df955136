use std::time::Duration;

use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::audit::AuditLogger;

/// 审计队列清空的最长等待时间（秒）
const FLUSH_TIMEOUT_SECS: u64 = 10;

/// 等待 Ctrl+C
pub async fn wait_for_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, flushing audit queue..."),
        Err(e) => warn!(
            "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
            e
        ),
    }
}

/// 写出队列中剩余的审计记录
pub async fn flush_audit(audit: &AuditLogger) {
    if !audit.is_enabled() {
        return;
    }

    match timeout(Duration::from_secs(FLUSH_TIMEOUT_SECS), audit.flush()).await {
        Ok(n) => info!("Audit queue drained ({} records)", n),
        Err(_) => error!(
            "Audit flush timed out after {} seconds, {} records lost",
            FLUSH_TIMEOUT_SECS,
            audit.pending()
        ),
    }
}
