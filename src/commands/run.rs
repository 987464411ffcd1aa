//! Plugin run CLI commands.

use clap::Args;

use plexo_core::config::PlexoConfig;

use crate::output::{self, OutputFormat};

/// Arguments for the run command
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Plugin id to run
    pub id: String,

    /// Run parameters as a JSON object
    #[arg(short, long, default_value = "{}")]
    pub params: String,

    /// Event name to run under
    #[arg(long)]
    pub event: Option<String>,
}

/// Arguments for the run-all command
#[derive(Debug, Args)]
pub struct RunAllArgs {
    /// Run parameters as a JSON object
    #[arg(short, long, default_value = "{}")]
    pub params: String,

    /// Event name to run under
    #[arg(long)]
    pub event: Option<String>,
}

/// Execute the run command
pub fn execute(args: &RunArgs, config: &PlexoConfig, format: OutputFormat) -> anyhow::Result<()> {
    let hub = super::build_hub(config)?;
    let params = super::parse_json("params", &args.params)?;

    let result = hub.run(&args.id, &params, args.event.as_deref())?;
    output::print_item(&result, format);
    Ok(())
}

/// Execute the run-all command
pub fn execute_all(
    args: &RunAllArgs,
    config: &PlexoConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let hub = super::build_hub(config)?;
    let params = super::parse_json("params", &args.params)?;

    let results = hub.run_all(&params, args.event.as_deref());
    output::print_item(&results, format);
    Ok(())
}
