mod cli;
mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("error: {err}");
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match cli.global.config {
        Some(ref path) => thinqlink_config::BridgeConfig::load_from(path)?,
        None => thinqlink_config::BridgeConfig::load()?,
    };

    match cli.command {
        cli::Command::Devices => commands::devices::handle(&config).await,
        cli::Command::Watch(args) => commands::watch::handle(&config, &args).await,
        cli::Command::Get(args) => commands::control::get(&config, &args).await,
        cli::Command::Set(args) => commands::control::set(&config, &args).await,
    }
}
