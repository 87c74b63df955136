use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::DatabaseConfig;

pub mod backend;

pub use backend::{ReconcileReport, SeaOrmStorage, ensure_schema, redact_url};

pub struct StorageFactory;

impl StorageFactory {
    /// 建立存储连接
    ///
    /// 先尝试 `database_url`（连接后立即 ping），失败或未配置时退回
    /// `fallback_url` 指向的 SQLite 文件。两者都不可用时返回 None，
    /// 服务仍然可以生成图片，只是不再记录审计日志。
    pub async fn create(config: &DatabaseConfig) -> Option<Arc<SeaOrmStorage>> {
        let primary = config.database_url.trim();
        if !primary.is_empty() {
            match SeaOrmStorage::connect(primary, config).await {
                Ok(storage) => match storage.ping().await {
                    Ok(()) => return Some(Arc::new(storage)),
                    Err(e) => warn!("Primary database failed health check: {}", e),
                },
                Err(e) => warn!("Primary database unavailable: {}", e),
            }
            warn!(
                "Falling back to {}",
                redact_url(&config.fallback_url)
            );
        }

        match SeaOrmStorage::connect(&config.fallback_url, config).await {
            Ok(storage) => {
                info!("Using fallback storage: {}", redact_url(&config.fallback_url));
                Some(Arc::new(storage))
            }
            Err(e) => {
                error!(
                    "No storage available, generation logs will not be persisted: {}",
                    e
                );
                None
            }
        }
    }
}
