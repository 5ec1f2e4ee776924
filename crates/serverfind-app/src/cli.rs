use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// serverfind: find and highlight servers in a chat client's sidebar.
#[derive(Parser, Debug)]
#[command(name = "serverfind", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter directive override (e.g. `debug`, `serverfind=trace`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search a sidebar fixture once and print the matches.
    Find {
        query: String,

        /// Match names containing every query letter, in any order.
        #[arg(short, long)]
        advanced: bool,

        /// TOML file with `servers = [...]`.
        #[arg(short, long)]
        fixture: Option<PathBuf>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Interactive session against an in-process tab.
    Run {
        /// TOML file with `servers = [...]`.
        #[arg(short, long)]
        fixture: Option<PathBuf>,

        /// URL of the simulated tab.
        #[arg(long, default_value = "https://discord.com/channels/@me")]
        url: String,

        /// Delay before the server list appears after each page load.
        #[arg(long, default_value_t = 0)]
        render_delay_ms: u64,

        /// Keep preferences in memory instead of the data directory.
        #[arg(long)]
        ephemeral: bool,
    },

    /// Print the effective configuration as JSON.
    Config {
        /// Also write the effective configuration as TOML to this path.
        #[arg(long, value_name = "PATH")]
        save: Option<PathBuf>,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
