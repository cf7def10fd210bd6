pub mod toml_config;

pub use toml_config::ShelterConfig;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "shelter")]
#[command(about = "Visit slots and adoption ledger for an animal shelter")]
pub struct CliConfig {
    /// Path to the TOML configuration file; defaults apply when absent
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Print results as JSON")]
    pub json: bool,

    #[arg(long, help = "Write logs as JSON lines to stderr")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the next open visit slots starting tomorrow
    Slots {
        #[arg(long, default_value = "5")]
        count: usize,

        /// Days ahead to scan; falls back to booking.max_days_ahead
        #[arg(long)]
        days: Option<u32>,
    },
    /// Summarise the loaded adoptable pool and authorized donors
    Roster,
    /// Validate configuration and roster files without doing anything else
    Check,
}
