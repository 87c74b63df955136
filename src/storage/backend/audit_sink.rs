//! AuditSink implementation for SeaOrmStorage

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, EntityTrait};
use tracing::debug;

use super::SeaOrmStorage;
use super::retry;
use crate::audit::{AuditSink, GenerationAttempt};

use migration::entities::generation_log;

fn to_active_model(attempt: GenerationAttempt) -> generation_log::ActiveModel {
    generation_log::ActiveModel {
        ip_address: Set(attempt.ip_address),
        code_type: Set(attempt.code_type.as_ref().to_string()),
        barcode_type: Set(attempt.barcode_type),
        code_value: Set(attempt.code_value),
        image_format: Set(attempt.image_format),
        qr_options: Set(attempt.qr_options),
        created_at: Set(attempt.created_at),
        user_agent: Set(attempt.user_agent),
        debug_headers: Set(attempt.debug_headers),
        success: Set(attempt.success),
        error_message: Set(attempt.error_message),
        ..Default::default()
    }
}

#[async_trait]
impl AuditSink for SeaOrmStorage {
    async fn write_batch(&self, attempts: Vec<GenerationAttempt>) -> anyhow::Result<()> {
        if attempts.is_empty() {
            return Ok(());
        }

        let total = attempts.len();
        let models: Vec<generation_log::ActiveModel> =
            attempts.into_iter().map(to_active_model).collect();

        let db = &self.db;
        retry::with_retry("insert_generation_logs", self.retry, || async {
            generation_log::Entity::insert_many(models.clone())
                .exec(db)
                .await
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to insert generation logs: {}", e))?;

        debug!(
            "Generation logs written to {} database ({} records)",
            self.backend_name.to_uppercase(),
            total
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "database"
    }
}
