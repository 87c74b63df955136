use tracing::debug;

use super::GenerationAttempt;

/// 审计日志写入端
#[async_trait::async_trait]
pub trait AuditSink: Send + Sync {
    /// 批量写入生成记录
    async fn write_batch(&self, attempts: Vec<GenerationAttempt>) -> anyhow::Result<()>;

    /// 写入端名称，用于日志
    fn name(&self) -> &'static str;
}

/// 没有可用存储时使用，只输出 debug 日志
pub struct NullSink;

#[async_trait::async_trait]
impl AuditSink for NullSink {
    async fn write_batch(&self, attempts: Vec<GenerationAttempt>) -> anyhow::Result<()> {
        for attempt in &attempts {
            debug!(
                "Audit (no storage): {} {} success={} ip={}",
                attempt.code_type.as_ref(),
                attempt.image_format,
                attempt.success,
                attempt.ip_address
            );
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
