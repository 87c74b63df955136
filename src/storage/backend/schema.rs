//! 启动时的表结构校正
//!
//! 先执行版本化迁移，然后无论迁移成功与否，逐列探测审计诊断列，
//! 缺失则补列并回填。每一列独立处理，失败只记录日志。

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::{debug, info, warn};

use migration::{AUDIT_COLUMNS, AdditiveColumn, SchemaManager};

use super::connection::run_migrations;

/// 单列的探测结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnState {
    Present,
    Added,
}

/// 校正结果汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub migrations_applied: bool,
    pub present: Vec<&'static str>,
    pub added: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.migrations_applied && self.failed.is_empty()
    }
}

/// 错误信息是否表示列不存在（SQLite / PostgreSQL / MySQL）
pub fn is_missing_column_error(message: &str) -> bool {
    let text = message.to_lowercase();
    if text.contains("no such column") || text.contains("unknown column") {
        return true;
    }
    // PostgreSQL: column "x" does not exist；表不存在时是 relation "x" does not exist
    text.contains("column") && text.contains("does not exist")
}

/// 幂等的启动校正，不会返回错误
pub async fn ensure_schema(db: &DatabaseConnection) -> ReconcileReport {
    let mut report = ReconcileReport {
        migrations_applied: true,
        ..Default::default()
    };

    if let Err(e) = run_migrations(db).await {
        warn!("Migration step failed, continuing with column checks: {}", e);
        report.migrations_applied = false;
    }

    for column in AUDIT_COLUMNS.iter() {
        match reconcile_column(db, column).await {
            Ok(ColumnState::Present) => {
                debug!("Column generation_logs.{} present", column.name);
                report.present.push(column.name);
            }
            Ok(ColumnState::Added) => {
                info!("Added missing column generation_logs.{}", column.name);
                report.added.push(column.name);
            }
            Err(e) => {
                warn!(
                    "Failed to reconcile column generation_logs.{}: {}",
                    column.name, e
                );
                report.failed.push((column.name, e.to_string()));
            }
        }
    }

    report
}

async fn reconcile_column(
    db: &DatabaseConnection,
    column: &AdditiveColumn,
) -> Result<ColumnState, DbErr> {
    match db.query_one(&column.probe_statement()).await {
        Ok(_) => return Ok(ColumnState::Present),
        Err(e) if is_missing_column_error(&e.to_string()) => {
            debug!("Probe for {} reported missing column: {}", column.name, e);
        }
        Err(e) => return Err(e),
    }

    let manager = SchemaManager::new(db);
    manager.alter_table(column.add_statement()).await?;
    if let Some(backfill) = column.backfill_statement() {
        manager.exec_stmt(backfill).await?;
    }
    Ok(ColumnState::Added)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_detection() {
        assert!(is_missing_column_error(
            "Query Error: error returned from database: (code: 1) no such column: success"
        ));
        assert!(is_missing_column_error(
            "error returned from database: column \"debug_headers\" does not exist"
        ));
        assert!(is_missing_column_error(
            "Unknown column 'error_message' in 'field list'"
        ));
    }

    #[test]
    fn test_missing_table_is_not_missing_column() {
        assert!(!is_missing_column_error("no such table: generation_logs"));
        assert!(!is_missing_column_error(
            "relation \"generation_logs\" does not exist"
        ));
        assert!(!is_missing_column_error("database is locked"));
    }
}
