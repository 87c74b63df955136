//! 诊断字段迁移
//!
//! 为早期部署创建的 generation_logs 表补齐：
//! - debug_headers: 原始请求头快照
//! - success: 是否生成成功（默认 true，旧数据回填）
//! - error_message: 失败原因

use sea_orm_migration::prelude::*;

use crate::schema::{AUDIT_COLUMNS, GenerationLogs};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in AUDIT_COLUMNS {
            // 新建的表已经包含这些列
            if manager.has_column("generation_logs", column.name).await? {
                continue;
            }

            manager.alter_table(column.add_statement()).await?;

            if let Some(backfill) = column.backfill_statement() {
                manager.exec_stmt(backfill).await?;
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in AUDIT_COLUMNS.iter().rev() {
            manager
                .alter_table(
                    Table::alter()
                        .table(GenerationLogs::Table)
                        .drop_column(Alias::new(column.name))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}
