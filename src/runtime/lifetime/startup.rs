use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::services::AppState;
use crate::audit::{AuditLogger, AuditSink, NullSink};
use crate::config::{AuditConfig, StaticConfig};
use crate::storage::{SeaOrmStorage, StorageFactory, ensure_schema};

pub struct StartupContext {
    pub state: AppState,
}

/// 建立审计日志记录器并启动后台写入任务
pub fn start_audit_logger(config: &AuditConfig, storage: Option<&Arc<SeaOrmStorage>>) -> AuditLogger {
    if !config.enabled {
        info!("Audit logging disabled");
        return AuditLogger::disabled();
    }

    let sink: Arc<dyn AuditSink> = match storage {
        Some(storage) => storage.as_audit_sink(),
        None => Arc::new(NullSink),
    };
    info!("Audit logging to {} sink", sink.name());

    let logger = AuditLogger::new(
        sink,
        config.queue_capacity,
        config.batch_size,
        Duration::from_millis(config.flush_interval_ms.max(1)),
    );

    let background = logger.clone();
    tokio::spawn(async move {
        background.start_background_task().await;
    });

    logger
}

/// 准备服务器启动的上下文
///
/// 存储 → schema 检查 → 审计日志。数据库不可用不会阻止启动。
pub async fn prepare_server_startup(config: &StaticConfig) -> StartupContext {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database).await;

    match &storage {
        Some(storage) => {
            info!("Using storage backend: {}", storage.backend_name());
            let report = ensure_schema(storage.get_db()).await;
            if report.is_clean() {
                debug!(
                    "Schema verified: {} columns present, {} added",
                    report.present.len(),
                    report.added.len()
                );
            } else {
                warn!(
                    "Schema reconciliation finished with {} failed columns",
                    report.failed.len()
                );
            }
        }
        None => warn!("Running without storage, generation attempts will only be logged"),
    }

    let audit = start_audit_logger(&config.audit, storage.as_ref());

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    StartupContext {
        state: AppState::new(audit, storage),
    }
}
