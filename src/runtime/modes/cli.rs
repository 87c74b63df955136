//! 一次性命令：`migrate`、`config generate`

use std::path::Path;

use anyhow::{Result, bail};
use colored::Colorize;

use crate::config::StaticConfig;
use crate::storage::{StorageFactory, ensure_schema, redact_url};

/// 生成示例配置；未给出路径时打印到 stdout
pub fn run_config_generate(output_path: Option<&str>, force: bool) -> Result<()> {
    let Some(path) = output_path else {
        print!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    };

    if !force && Path::new(path).exists() {
        bail!("{} already exists, use --force to overwrite", path);
    }

    StaticConfig::default()
        .save_to_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
    println!(
        "{} {}",
        "Configuration file generated:".green(),
        path.blue()
    );
    Ok(())
}

/// 执行迁移和逐列检查并打印结果，有失败列时返回错误
pub async fn run_migrate(config: &StaticConfig) -> Result<()> {
    let Some(storage) = StorageFactory::create(&config.database).await else {
        bail!("No database available");
    };

    println!(
        "{} {} ({})",
        "Reconciling schema on".yellow(),
        storage.backend_name().blue(),
        redact_url(if config.database.database_url.is_empty() {
            &config.database.fallback_url
        } else {
            &config.database.database_url
        })
    );

    let report = ensure_schema(storage.get_db()).await;

    println!(
        "  migrations: {}",
        if report.migrations_applied {
            "ok".green()
        } else {
            "failed".red()
        }
    );
    for column in &report.present {
        println!("  {} {}", "present".dimmed(), column);
    }
    for column in &report.added {
        println!("  {} {}", "added".green(), column);
    }
    for (column, error) in &report.failed {
        println!("  {} {}: {}", "failed".red(), column, error);
    }

    if !report.is_clean() {
        bail!("{} columns could not be repaired", report.failed.len());
    }
    Ok(())
}
