//! 生成日志表迁移
//!
//! 每次条码 / 二维码生成请求（无论成功与否）写入一行。

use sea_orm_migration::prelude::*;

use crate::schema::GenerationLogs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 generation_logs 表（旧部署中已存在时跳过）
        manager
            .create_table(
                Table::create()
                    .table(GenerationLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GenerationLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GenerationLogs::IpAddress)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GenerationLogs::CodeType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GenerationLogs::BarcodeType)
                            .string_len(32)
                            .null(),
                    )
                    .col(ColumnDef::new(GenerationLogs::CodeValue).text().not_null())
                    .col(
                        ColumnDef::new(GenerationLogs::ImageFormat)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(GenerationLogs::QrOptions).text().null())
                    .col(
                        ColumnDef::new(GenerationLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GenerationLogs::UserAgent).text().null())
                    .col(ColumnDef::new(GenerationLogs::DebugHeaders).text().null())
                    .col(
                        ColumnDef::new(GenerationLogs::Success)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(GenerationLogs::ErrorMessage).text().null())
                    .to_owned(),
            )
            .await?;

        // 创建时间索引（按时间范围排查问题）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_generation_logs_created_at")
                    .table(GenerationLogs::Table)
                    .col(GenerationLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_generation_logs_created_at")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(GenerationLogs::Table).to_owned())
            .await
    }
}
