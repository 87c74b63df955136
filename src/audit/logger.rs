//! 审计日志记录器
//!
//! 请求处理线程只负责把记录放进有界队列，由后台任务批量写入存储：
//! - 队列满时丢弃并告警，不阻塞响应
//! - 达到批量大小或定时触发写入
//! - 写入失败只记录日志，不重试
//! - 关闭时 `flush()` 清空队列

use std::sync::Arc;

use tokio::sync::{Mutex, Notify, mpsc};
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{debug, trace, warn};

use super::{AuditSink, GenerationAttempt};

/// 队列接收端和写入端，后台任务与 flush 共享
struct AuditQueue {
    rx: Mutex<mpsc::Receiver<GenerationAttempt>>,
    sink: Arc<dyn AuditSink>,
    batch_size: usize,
    /// 队列积压达到批量大小时唤醒后台任务
    wake: Notify,
}

impl AuditQueue {
    /// 取出最多一个批次并写入，返回取出的条数
    async fn drain_batch(&self) -> usize {
        let batch = {
            let mut rx = self.rx.lock().await;
            let mut batch = Vec::with_capacity(self.batch_size);
            while batch.len() < self.batch_size {
                match rx.try_recv() {
                    Ok(attempt) => batch.push(attempt),
                    Err(_) => break,
                }
            }
            batch
        };

        let count = batch.len();
        if count == 0 {
            trace!("AuditLogger: queue empty");
            return 0;
        }

        match self.sink.write_batch(batch).await {
            Ok(()) => debug!(
                "AuditLogger: wrote {} records to {} sink",
                count,
                self.sink.name()
            ),
            Err(e) => warn!(
                "AuditLogger: {} sink write failed, {} records discarded: {}",
                self.sink.name(),
                count,
                e
            ),
        }
        count
    }

    async fn drain_all(&self) -> usize {
        let mut total = 0;
        loop {
            let n = self.drain_batch().await;
            if n == 0 {
                return total;
            }
            total += n;
        }
    }
}

/// 审计日志记录器，可廉价克隆
#[derive(Clone)]
pub struct AuditLogger {
    tx: Option<mpsc::Sender<GenerationAttempt>>,
    queue: Option<Arc<AuditQueue>>,
    flush_interval: Duration,
}

impl AuditLogger {
    pub fn new(
        sink: Arc<dyn AuditSink>,
        queue_capacity: usize,
        batch_size: usize,
        flush_interval: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let queue = AuditQueue {
            rx: Mutex::new(rx),
            sink,
            batch_size: batch_size.max(1),
            wake: Notify::new(),
        };
        Self {
            tx: Some(tx),
            queue: Some(Arc::new(queue)),
            flush_interval,
        }
    }

    /// 关闭审计（audit.enabled = false）
    pub fn disabled() -> Self {
        Self {
            tx: None,
            queue: None,
            flush_interval: Duration::from_secs(1),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// 当前队列中的记录数
    pub fn pending(&self) -> usize {
        self.tx
            .as_ref()
            .map(|tx| tx.max_capacity() - tx.capacity())
            .unwrap_or(0)
    }

    /// 记录一次生成尝试，永不失败
    pub fn log(&self, attempt: GenerationAttempt) {
        let (Some(tx), Some(queue)) = (&self.tx, &self.queue) else {
            return;
        };

        match tx.try_send(attempt) {
            Ok(()) => {
                if self.pending() >= queue.batch_size {
                    queue.wake.notify_one();
                }
            }
            Err(mpsc::error::TrySendError::Full(attempt)) => {
                warn!(
                    "AuditLogger: queue full, dropping {} record from {}",
                    attempt.code_type.as_ref(),
                    attempt.ip_address
                );
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("AuditLogger: queue closed, dropping record");
            }
        }
    }

    /// 后台写入循环（作为异步方法运行）
    pub async fn start_background_task(&self) {
        let Some(queue) = &self.queue else {
            return;
        };

        let mut ticker = interval(self.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = queue.wake.notified() => {
                    trace!("AuditLogger: batch threshold reached");
                }
            }
            queue.drain_all().await;
        }
    }

    /// 立即写入队列中全部记录，返回写入条数
    pub async fn flush(&self) -> usize {
        match &self.queue {
            Some(queue) => {
                let n = queue.drain_all().await;
                debug!("AuditLogger: flushed {} records", n);
                n
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::RequestMeta;
    use crate::services::{BarcodeParams, CodeRequest, ImageFormat, Symbology};
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct MockSink {
        written: StdMutex<Vec<GenerationAttempt>>,
        batches: StdMutex<Vec<usize>>,
        fail: AtomicBool,
    }

    impl MockSink {
        fn new() -> Self {
            Self {
                written: StdMutex::new(Vec::new()),
                batches: StdMutex::new(Vec::new()),
                fail: AtomicBool::new(false),
            }
        }

        fn written(&self) -> usize {
            self.written.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl AuditSink for MockSink {
        async fn write_batch(&self, attempts: Vec<GenerationAttempt>) -> anyhow::Result<()> {
            self.batches.lock().unwrap().push(attempts.len());
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("database unavailable");
            }
            self.written.lock().unwrap().extend(attempts);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    fn attempt(text: &str) -> GenerationAttempt {
        let request = CodeRequest::Barcode(BarcodeParams {
            text: text.to_string(),
            symbology: Symbology::Code128,
            format: ImageFormat::Png,
        });
        GenerationAttempt::from_request(&RequestMeta::unknown(), &request)
    }

    fn logger(sink: &Arc<MockSink>, capacity: usize, batch: usize) -> AuditLogger {
        AuditLogger::new(
            Arc::clone(sink) as Arc<dyn AuditSink>,
            capacity,
            batch,
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn test_flush_writes_in_batches() {
        let sink = Arc::new(MockSink::new());
        let logger = logger(&sink, 100, 4);

        for i in 0..10 {
            logger.log(attempt(&format!("item{}", i)));
        }
        assert_eq!(logger.pending(), 10);

        assert_eq!(logger.flush().await, 10);
        assert_eq!(sink.written(), 10);
        assert_eq!(*sink.batches.lock().unwrap(), vec![4, 4, 2]);
        assert_eq!(logger.pending(), 0);
    }

    #[tokio::test]
    async fn test_full_queue_drops_records() {
        let sink = Arc::new(MockSink::new());
        let logger = logger(&sink, 2, 10);

        logger.log(attempt("a"));
        logger.log(attempt("b"));
        logger.log(attempt("c"));

        assert_eq!(logger.flush().await, 2);
        let written = sink.written.lock().unwrap();
        assert_eq!(written[0].code_value, "a");
        assert_eq!(written[1].code_value, "b");
    }

    #[tokio::test]
    async fn test_sink_failure_is_swallowed() {
        let sink = Arc::new(MockSink::new());
        sink.fail.store(true, Ordering::SeqCst);
        let logger = logger(&sink, 10, 10);

        logger.log(attempt("a"));
        assert_eq!(logger.flush().await, 1);
        assert_eq!(sink.written(), 0);
        assert_eq!(logger.pending(), 0);
    }

    #[tokio::test]
    async fn test_disabled_logger_is_noop() {
        let logger = AuditLogger::disabled();
        assert!(!logger.is_enabled());
        logger.log(attempt("a"));
        assert_eq!(logger.pending(), 0);
        assert_eq!(logger.flush().await, 0);
    }

    #[tokio::test]
    async fn test_background_task_drains_on_threshold() {
        let sink = Arc::new(MockSink::new());
        let logger = logger(&sink, 100, 3);

        let background = logger.clone();
        let handle = tokio::spawn(async move { background.start_background_task().await });

        for i in 0..3 {
            logger.log(attempt(&format!("item{}", i)));
        }

        // 最多等待 2 秒
        for _ in 0..200 {
            if sink.written() == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();
        assert_eq!(sink.written(), 3);
    }
}
