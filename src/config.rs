use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::store::JsonFileStorage;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "investo",
    about = "Personal finance projections: budget split, compound growth, passive income and saved scenarios"
)]
pub struct Cli {
    #[arg(
        long,
        env = "INVESTO_DATA_DIR",
        default_value = ".investo",
        global = true,
        help = "Directory holding the persisted state"
    )]
    pub data_dir: PathBuf,
    #[arg(
        long,
        env = "INVESTO_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text,
        global = true
    )]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Serve the HTTP API.
    Serve {
        #[arg(long, env = "INVESTO_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Print the derived metrics for the persisted state.
    Show,
    /// Monthly contribution needed to reach a target.
    Reverse {
        #[arg(long, help = "Target amount")]
        target: f64,
        #[arg(long, help = "Years to reach the target")]
        years: f64,
        #[arg(long, default_value_t = 0.0, help = "Savings already invested")]
        current_savings: f64,
        #[arg(
            long,
            help = "Annual rate in percent; defaults to the manual or market rate, else 8"
        )]
        rate: Option<f64>,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            data_dir: cli.data_dir.clone(),
            log_format: cli.log_format,
        }
    }

    pub fn storage(&self) -> JsonFileStorage {
        JsonFileStorage::new(&self.data_dir)
    }
}

pub fn validate_reverse_args(target: f64, years: f64, current_savings: f64) -> Result<(), String> {
    if !target.is_finite() || target <= 0.0 {
        return Err("--target must be > 0".to_string());
    }
    if !years.is_finite() || years <= 0.0 {
        return Err("--years must be > 0".to_string());
    }
    if !current_savings.is_finite() || current_savings < 0.0 {
        return Err("--current-savings must be >= 0".to_string());
    }
    Ok(())
}
