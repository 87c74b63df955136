use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::audit::AuditLogger;
use crate::storage::SeaOrmStorage;

/// 启动时构建一次，通过 `web::Data` 注入到各个 handler
#[derive(Clone)]
pub struct AppState {
    pub audit: AuditLogger,
    /// 没有可用数据库时为 None
    pub storage: Option<Arc<SeaOrmStorage>>,
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(audit: AuditLogger, storage: Option<Arc<SeaOrmStorage>>) -> Self {
        Self {
            audit,
            storage,
            start_time: Utc::now(),
        }
    }

    /// 不连接数据库、不记录审计日志的状态，测试和降级模式使用
    pub fn detached() -> Self {
        Self::new(AuditLogger::disabled(), None)
    }

    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.start_time).num_seconds().max(0) as u64
    }
}
