//! SeaORM storage backend
//!
//! Persists generation logs to SQLite, MySQL/MariaDB or PostgreSQL.

mod audit_sink;
mod connection;
pub mod retry;
pub mod schema;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::audit::AuditSink;
use crate::config::DatabaseConfig;
use crate::errors::{CodemintError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use retry::RetryPolicy;
pub use schema::{ColumnState, ReconcileReport, ensure_schema};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(CodemintError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            redact_url(database_url)
        )))
    }
}

/// 隐藏 URL 中的密码，用于日志输出
pub fn redact_url(database_url: &str) -> String {
    match url::Url::parse(database_url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            let _ = parsed.set_password(Some("***"));
            parsed.to_string()
        }
        _ => database_url.to_string(),
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry: RetryPolicy,
}

impl SeaOrmStorage {
    /// 建立连接（不执行迁移，迁移由 [`ensure_schema`] 负责）
    pub async fn connect(database_url: &str, config: &DatabaseConfig) -> Result<Self> {
        if database_url.trim().is_empty() {
            return Err(CodemintError::database_config("database URL is empty"));
        }

        let backend_name = infer_backend_from_url(database_url)?;
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, &backend_name, config).await?
        };

        info!(
            "{} storage connected ({})",
            backend_name.to_uppercase(),
            redact_url(database_url)
        );

        Ok(Self {
            db,
            backend_name,
            retry: RetryPolicy::from(config),
        })
    }

    /// 连通性检查
    pub async fn ping(&self) -> Result<()> {
        self.db.ping().await.map_err(|e| {
            CodemintError::database_connection(format!(
                "{} ping failed: {}",
                self.backend_name.to_uppercase(),
                e
            ))
        })
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn as_audit_sink(self: &Arc<Self>) -> Arc<dyn AuditSink> {
        Arc::clone(self) as Arc<dyn AuditSink>
    }
}
