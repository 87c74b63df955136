//! generation_logs 表结构定义
//!
//! 迁移脚本和启动时的列校验共用这里的列清单。

use sea_orm_migration::prelude::*;

#[derive(DeriveIden, Clone, Copy)]
pub enum GenerationLogs {
    #[sea_orm(iden = "generation_logs")]
    Table,
    Id,
    IpAddress,
    CodeType,
    BarcodeType,
    CodeValue,
    ImageFormat,
    QrOptions,
    CreatedAt,
    UserAgent,
    DebugHeaders,
    Success,
    ErrorMessage,
}

/// 追加列的默认值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    /// 可空文本列，无默认值
    NullText,
    /// 布尔列，带默认值，旧数据需要回填
    Bool(bool),
}

/// 只增不改的可空列
#[derive(Debug, Clone, Copy)]
pub struct AdditiveColumn {
    pub name: &'static str,
    pub default: ColumnDefault,
}

/// 在初始表之后追加的诊断列（按添加顺序）
pub const AUDIT_COLUMNS: [AdditiveColumn; 3] = [
    AdditiveColumn {
        name: "debug_headers",
        default: ColumnDefault::NullText,
    },
    AdditiveColumn {
        name: "success",
        default: ColumnDefault::Bool(true),
    },
    AdditiveColumn {
        name: "error_message",
        default: ColumnDefault::NullText,
    },
];

impl AdditiveColumn {
    /// ALTER TABLE ... ADD COLUMN 语句
    ///
    /// 默认值语法由 sea-query 按数据库方言生成。
    pub fn add_statement(&self) -> TableAlterStatement {
        let mut def = ColumnDef::new(Alias::new(self.name));
        match self.default {
            ColumnDefault::NullText => {
                def.text().null();
            }
            ColumnDefault::Bool(value) => {
                def.boolean().null().default(value);
            }
        }

        Table::alter()
            .table(GenerationLogs::Table)
            .add_column(&mut def)
            .to_owned()
    }

    /// 把旧行的 NULL 回填为默认值，无默认值的列返回 None
    pub fn backfill_statement(&self) -> Option<UpdateStatement> {
        match self.default {
            ColumnDefault::NullText => None,
            ColumnDefault::Bool(value) => Some(
                Query::update()
                    .table(GenerationLogs::Table)
                    .value(Alias::new(self.name), value)
                    .and_where(Expr::col(Alias::new(self.name)).is_null())
                    .to_owned(),
            ),
        }
    }

    /// 用于探测列是否存在的试读语句
    pub fn probe_statement(&self) -> SelectStatement {
        Query::select()
            .column(Alias::new(self.name))
            .from(GenerationLogs::Table)
            .limit(1)
            .to_owned()
    }
}
