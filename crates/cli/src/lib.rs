use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pharos-sim")]
#[command(about = "PHAROS virtual laser - the device REST API without the hardware")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the virtual laser
    Start {
        /// Path to the configuration file; built-in defaults when omitted
        #[arg(short, long, env = "PHAROS_SIM_CONFIG")]
        config: Option<PathBuf>,

        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the HTTP port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the log format
        #[arg(long, value_enum)]
        log_format: Option<LogFormatArg>,
    },

    /// Validate a configuration file without starting the laser
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "pharos.yaml")]
        config: PathBuf,
    },

    /// Write a configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "pharos.yaml")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    /// Human-readable multi-line output
    Pretty,

    /// One JSON object per line
    Json,

    /// Single-line output
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
