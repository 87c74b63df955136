use std::sync::{Arc, OnceLock};

use super::StaticConfig;

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// 获取全局配置
///
/// 未初始化时按默认路径加载一次。
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| Arc::new(StaticConfig::load(None)))
        .clone()
}

/// 初始化全局配置（只有第一次调用生效）
///
/// `path` 为 `-c/--config` 指定的文件，未指定时读取当前目录下的 config.toml。
pub fn init_config(path: Option<&str>) -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| Arc::new(StaticConfig::load(path)))
        .clone()
}
