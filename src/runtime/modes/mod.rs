//! Mode routing
//!
//! - `serve`（默认）：HTTP 服务器
//! - `migrate`：只执行 schema 检查
//! - `config generate`：生成示例配置

pub mod cli;
pub mod server;

pub use cli::{run_config_generate, run_migrate};
pub use server::run_server;
