//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// codemint - barcode and QR code generator service
#[derive(Parser, Debug)]
#[command(name = "codemint")]
#[command(version)]
#[command(about = "Turns text into barcode and QR code images", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Apply migrations and repair audit columns, then exit
    Migrate,

    /// Configuration file helpers
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate a sample configuration file (prints to stdout without a path)
    Generate {
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
