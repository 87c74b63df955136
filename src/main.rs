use clap::Parser;
use colored::Colorize;

use codemint::cli::{Cli, Commands, ConfigCommands};
use codemint::config::init_config;
use codemint::runtime::modes;
use codemint::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // config generate 不需要加载配置和日志
    if let Some(Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    }) = &cli.command
    {
        return modes::run_config_generate(output_path.as_deref(), *force).map_err(|e| {
            eprintln!("{} {}", "Error:".red().bold(), e);
            e
        });
    }

    let config = init_config(cli.config.as_deref());
    let _guard = init_logging(&config.logging)?;

    match cli.command {
        None | Some(Commands::Serve) => modes::run_server(config).await,
        Some(Commands::Migrate) => modes::run_migrate(&config).await,
        Some(Commands::Config { .. }) => Ok(()),
    }
}
