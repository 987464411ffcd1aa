//! Plexo: plugin composition and messaging kernel.
//!
//! Demo host entry point: wires the kernel, the bridge, and the arithmetic
//! plugin family together behind a small CLI.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use plexo_core::KernelError;
use plexo_core::config::PlexoConfig;

mod commands;
mod output;

use commands::Cli;

fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = cli.execute(&config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration for the given environment, merged with `PLEXO_`
/// environment variables.
fn load_configuration(env: &str) -> Result<PlexoConfig, KernelError> {
    PlexoConfig::load(env)
}

/// Initialize tracing/logging
fn init_logging(config: &PlexoConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
