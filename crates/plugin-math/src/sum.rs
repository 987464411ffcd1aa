//! Summing plugin: adds operands and fans them out to the other plugins.

use serde_json::{Value, json};
use tracing::debug;

use plexo_core::KernelError;
use plexo_core::error::codes;
use plexo_kernel::definition::PluginDefinition;

use crate::{base, multiplication, operands, square};

/// Plugin id.
pub const ID: &str = "math.sum";

/// The summing plugin. Extends [`base`] for its `format` capability and
/// configuration, sums the `values` array on run, and asks the square and
/// multiplication plugins for their take on the same operands.
pub fn definition() -> PluginDefinition {
    PluginDefinition::builder(ID)
        .name("Sum")
        .extends([base::ID])
        .run_fn(|ctx, params, event_name| {
            let values = operands(params);
            if values.is_empty() {
                return Err(KernelError::validation("Expected a non-empty values array"));
            }
            let sum: i64 = values.iter().sum();
            let formatted = ctx.call("format", &json!({ "value": sum }))?;

            let related = ctx.send_message(
                &json!({ "message": { "values": values } }),
                &[square::ID.to_string(), multiplication::ID.to_string()],
            );

            let mut result = json!({ "sum": sum, "formatted": formatted });
            if let Some(payload) = related.payload() {
                result["related"] = payload.get("data").cloned().unwrap_or(Value::Null);
            }
            if let Some(event_name) = event_name {
                result["event"] = json!(event_name);
            }
            Ok(result)
        })
        .on_message_fn(|_ctx, message, from_id| {
            let values = operands(message);
            if values.is_empty() {
                return Ok(json!({
                    "error": codes::MALFORMED_PARAMETERS,
                    "error_description": "Expected a non-empty values array.",
                }));
            }
            debug!(from_id = %from_id, count = values.len(), "Summing messaged operands");
            Ok(json!({ "sum": values.iter().sum::<i64>() }))
        })
        .build()
}
