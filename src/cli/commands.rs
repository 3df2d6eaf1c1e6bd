//! CLI command definitions using clap.
//!
//! - run: poll and print batches (default)
//! - show-config: print the resolved configuration

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use telepoll::config::PollingOverrides;

/// Telepoll - long-poll a Telegram bot and print update batches as JSON lines
#[derive(Parser, Debug)]
#[command(name = "telepoll")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll for updates until Ctrl-C
    Run(RunArgs),

    /// Print the resolved configuration (token redacted)
    ShowConfig,
}

/// Overrides for the polling section of the config file
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// First update id to request; negative reads from the end of the queue
    #[arg(long, allow_hyphen_values = true)]
    pub offset: Option<i64>,

    /// Max updates per request (1-100)
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Long-poll timeout in seconds (0 = short polling)
    #[arg(short, long)]
    pub timeout: Option<u32>,

    /// Update types to forward, comma separated ('*' for all)
    #[arg(short, long, value_delimiter = ',')]
    pub updates: Option<Vec<String>>,

    /// Bot API origin
    #[arg(long)]
    pub base_url: Option<String>,
}

impl RunArgs {
    pub fn overrides(&self) -> PollingOverrides {
        PollingOverrides {
            offset: self.offset,
            limit: self.limit,
            timeout: self.timeout,
            updates: self.updates.clone(),
            base_url: self.base_url.clone(),
        }
    }
}
