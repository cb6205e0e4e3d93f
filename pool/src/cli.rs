use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jio-pool")]
#[command(about = "JIO mining pool server", long_about = None)]
pub struct Args {
    /// Path to configuration file (optional, uses defaults if not provided)
    #[arg(short, long)]
    pub config_path: Option<PathBuf>,

    /// Stratum listen address override, e.g. "0.0.0.0:5555"
    #[arg(short, long)]
    pub listen_address: Option<String>,

    /// Pool pay-to address override
    #[arg(long)]
    pub pay_address: Option<String>,

    /// Node RPC endpoint override
    #[arg(long)]
    pub node_endpoint: Option<String>,

    /// Data directory override
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// HTTP status API port override
    #[arg(long)]
    pub http_port: Option<u16>,

    /// Disable the HTTP status API
    #[arg(long)]
    pub no_http: bool,

    /// Network (mainnet, testnet, devnet)
    #[arg(short, long)]
    pub network: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

pub fn parse_args() -> Args {
    Args::parse()
}
