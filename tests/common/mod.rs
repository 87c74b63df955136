//! Shared fixtures for HTTP integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use codemint::api::services::AppState;
use codemint::audit::{AuditLogger, AuditSink, GenerationAttempt};

/// 记录所有写入的 sink，可切换为总是失败
pub struct CaptureSink {
    pub records: Mutex<Vec<GenerationAttempt>>,
    pub fail: bool,
}

impl CaptureSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn records(&self) -> Vec<GenerationAttempt> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for CaptureSink {
    async fn write_batch(&self, attempts: Vec<GenerationAttempt>) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("database unreachable");
        }
        self.records.lock().unwrap().extend(attempts);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "capture"
    }
}

/// 审计写入 `sink` 的状态；没有后台任务，测试里手动 flush
pub fn state_with_sink(sink: Arc<CaptureSink>) -> AppState {
    let logger = AuditLogger::new(sink, 64, 16, Duration::from_secs(3600));
    AppState::new(logger, None)
}

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
