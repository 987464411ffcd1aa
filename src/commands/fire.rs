//! Event firing CLI command.

use clap::Args;

use plexo_core::config::PlexoConfig;

use crate::output::{self, OutputFormat};

/// Arguments for the fire command
#[derive(Debug, Args)]
pub struct FireArgs {
    /// Event name to fire
    pub event_name: String,

    /// Event payload as a JSON object
    #[arg(short, long, default_value = "{}")]
    pub params: String,
}

/// Execute the fire command
pub fn execute(args: &FireArgs, config: &PlexoConfig, format: OutputFormat) -> anyhow::Result<()> {
    let hub = super::build_hub(config)?;
    let params = super::parse_json("params", &args.params)?;

    let envelope = hub.fire(&args.event_name, &params);
    output::print_item(&envelope, format);
    Ok(())
}
