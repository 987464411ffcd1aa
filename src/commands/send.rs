//! Message sending CLI command.

use clap::Args;
use serde_json::json;

use plexo_core::config::PlexoConfig;

use crate::output::{self, OutputFormat};

/// Arguments for the send command
#[derive(Debug, Args)]
pub struct SendArgs {
    /// Message body as JSON
    #[arg(short, long)]
    pub message: String,

    /// Recipient plugin ids; omit for the host's default routing
    #[arg(short, long)]
    pub to: Vec<String>,

    /// Sender id to stamp on the message
    #[arg(long, default_value = "host")]
    pub from: String,
}

/// Execute the send command
pub fn execute(args: &SendArgs, config: &PlexoConfig, format: OutputFormat) -> anyhow::Result<()> {
    let hub = super::build_hub(config)?;
    let message = super::parse_json("message", &args.message)?;

    let envelope = hub.send_message(&args.from, &json!({ "message": message }), &args.to);
    output::print_item(&envelope, format);
    Ok(())
}
