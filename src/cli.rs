use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "zbx-telegram",
    version,
    about = "Zabbix alert script that posts anomaly reports to Telegram",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Format the alert and send it to Telegram (prints OK on success)
    Send {
        #[command(flatten)]
        input: ParamsInput,

        /// Settings file with deployment defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the request body that would be sent, without sending it
    Preview {
        #[command(flatten)]
        input: ParamsInput,
    },

    /// Validate parameters and settings without contacting Telegram
    Check {
        #[command(flatten)]
        input: ParamsInput,

        /// Settings file with deployment defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Where the alert parameter JSON comes from.
#[derive(Args, Debug, Clone)]
pub struct ParamsInput {
    /// Parameter JSON as substituted by Zabbix ("-" or omitted reads stdin)
    #[arg(conflicts_with = "params_file")]
    pub params: Option<String>,

    /// Read the parameter JSON from a file
    #[arg(long)]
    pub params_file: Option<PathBuf>,
}
