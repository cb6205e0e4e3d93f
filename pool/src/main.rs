use jio_pool::{cli, ui, Daemon, PoolConfig, PoolError};
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = cli::parse_args();

    init_logging(&args);

    let network = args.network.as_deref().unwrap_or("mainnet");
    ui::print_banner(env!("CARGO_PKG_VERSION"), network);

    let mut config = match &args.config_path {
        Some(path) => match PoolConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                ui::print_status("x", &format!("failed to load config: {}", e), ui::StatusType::Error);
                error!("failed to load config: {}", e);
                process::exit(1);
            }
        },
        None => PoolConfig::default(),
    };
    config.apply_cli_overrides(&args);

    ui::print_config_summary(&config);

    let daemon = match Daemon::new(config).await {
        Ok(d) => d,
        Err(e) => {
            ui::print_status("x", &format!("failed to initialize daemon: {}", e), ui::StatusType::Error);
            error!("failed to initialize daemon: {}", e);
            let exit_code = if matches!(e, PoolError::NodeUnreachable(_)) { 2 } else { 1 };
            process::exit(exit_code);
        }
    };

    if let Err(e) = daemon.run().await {
        ui::print_status("x", &format!("daemon error: {}", e), ui::StatusType::Error);
        error!("daemon error: {}", e);
        process::exit(1);
    }

    ui::print_status("ok", "jio-pool daemon stopped gracefully", ui::StatusType::Success);
    info!("jio-pool daemon stopped gracefully");
}

fn init_logging(args: &cli::Args) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt().with_env_filter(filter).with_target(true).with_thread_ids(true).init();
}
