//! 生成记录审计
//!
//! 每次生成尝试（成功、编码失败、校验失败）都会记录一条，
//! 写入失败不会影响 HTTP 响应。

pub mod attempt;
pub mod logger;
pub mod sink;

pub use attempt::{GenerationAttempt, RequestMeta};
pub use logger::AuditLogger;
pub use sink::{AuditSink, NullSink};
