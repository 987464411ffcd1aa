//! CLI command definitions and dispatch.

pub mod fire;
pub mod list;
pub mod run;
pub mod send;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use plexo_bridge::MemoryBridge;
use plexo_core::KernelError;
use plexo_core::config::PlexoConfig;
use plexo_core::traits::Bridge;
use plexo_kernel::hub::PluginHub;

use crate::output::OutputFormat;

/// Plexo: plugin composition and messaging kernel
#[derive(Debug, Parser)]
#[command(name = "plexo", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment overlay to load
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List registered plugins
    List(list::ListArgs),
    /// Run one plugin through the invocation pipeline
    Run(run::RunArgs),
    /// Run every registered plugin with the same parameters
    RunAll(run::RunAllArgs),
    /// Send a message between plugins
    Send(send::SendArgs),
    /// Fire an event through the bridge
    Fire(fire::FireArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self, config: &PlexoConfig) -> anyhow::Result<()> {
        match &self.command {
            Commands::List(args) => list::execute(args, config, self.format),
            Commands::Run(args) => run::execute(args, config, self.format),
            Commands::RunAll(args) => run::execute_all(args, config, self.format),
            Commands::Send(args) => send::execute(args, config, self.format),
            Commands::Fire(args) => fire::execute(args, config, self.format),
        }
    }
}

/// Helper: build a hub over the configured bridge driver with the demo
/// plugins installed.
pub fn build_hub(config: &PlexoConfig) -> Result<PluginHub, KernelError> {
    let bridge: Arc<dyn Bridge> = match config.bridge.driver.as_str() {
        "memory" => Arc::new(MemoryBridge::new()),
        other => {
            return Err(KernelError::configuration(format!(
                "Unknown bridge driver '{other}'"
            )));
        }
    };
    let hub = PluginHub::with_config(bridge, &config.plugins);
    debug!(driver = %config.bridge.driver, "Bridge initialized");
    plugin_math::install(&hub)?;
    Ok(hub)
}

/// Helper: parse a JSON value handed in on the command line.
pub fn parse_json(label: &str, raw: &str) -> anyhow::Result<serde_json::Value> {
    serde_json::from_str(raw).with_context(|| format!("{label} is not valid JSON"))
}
