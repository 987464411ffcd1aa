//! Plugin listing CLI command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use plexo_core::config::PlexoConfig;

use crate::output::{self, OutputFormat};

/// Arguments for the list command
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Compose every plugin before listing
    #[arg(long)]
    pub resolve: bool,
}

/// One row of plugin listing output
#[derive(Debug, Serialize, Tabled)]
struct PluginRow {
    /// Plugin id
    id: String,
    /// Display name
    name: String,
    /// Extends list, flattened once composed
    extends: String,
    /// Defined members
    capabilities: String,
    /// Whether composition has run
    composed: bool,
}

/// Execute the list command
pub fn execute(args: &ListArgs, config: &PlexoConfig, format: OutputFormat) -> anyhow::Result<()> {
    let hub = super::build_hub(config)?;

    if args.resolve {
        for id in hub.registry().ids() {
            hub.context(&id)?;
        }
    }

    let rows: Vec<PluginRow> = hub
        .list()
        .into_iter()
        .map(|info| PluginRow {
            id: info.id,
            name: info.name,
            extends: info.extends.join(", "),
            capabilities: info.capabilities.join(", "),
            composed: info.composed,
        })
        .collect();

    output::print_list(&rows, format);
    Ok(())
}
