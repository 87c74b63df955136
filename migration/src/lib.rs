pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20251104_000001_generation_logs;
mod m20251118_000001_audit_diagnostics;
pub mod schema;

pub use schema::{AUDIT_COLUMNS, AdditiveColumn, ColumnDefault, GenerationLogs};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251104_000001_generation_logs::Migration),
            Box::new(m20251118_000001_audit_diagnostics::Migration),
        ]
    }
}
