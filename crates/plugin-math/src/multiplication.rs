//! Multiplication plugin: message-driven products, no run entry point.

use serde_json::json;

use plexo_core::error::codes;
use plexo_kernel::definition::PluginDefinition;

use crate::operands;

/// Plugin id.
pub const ID: &str = "math.multiplication";

/// The multiplication plugin. Purely message-driven: answers a `values`
/// array with its product and carries no run entry point, so batch runs
/// skip it.
pub fn definition() -> PluginDefinition {
    PluginDefinition::builder(ID)
        .name("Multiplication")
        .on_message_fn(|_ctx, message, _from_id| {
            let values = operands(message);
            if values.is_empty() {
                return Ok(json!({
                    "error": codes::MALFORMED_PARAMETERS,
                    "error_description": "Expected a non-empty values array.",
                }));
            }
            Ok(json!({ "product": values.iter().product::<i64>() }))
        })
        .build()
}
