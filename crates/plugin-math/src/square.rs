//! Squaring plugin: element-wise squares over messaged operands.

use serde_json::{Value, json};

use plexo_core::KernelError;
use plexo_core::error::codes;
use plexo_kernel::definition::PluginDefinition;

use crate::operands;

/// Plugin id.
pub const ID: &str = "math.square";

/// The squaring plugin. Runs over a single `value`, answers messages with
/// element-wise squares of a `values` array.
pub fn definition() -> PluginDefinition {
    PluginDefinition::builder(ID)
        .name("Square")
        .run_fn(|_ctx, params, _event_name| {
            match params.get("value").and_then(Value::as_i64) {
                Some(value) => Ok(json!({ "square": value * value })),
                None => Err(KernelError::validation("Expected a numeric value")),
            }
        })
        .on_message_fn(|_ctx, message, _from_id| {
            let values = operands(message);
            if values.is_empty() {
                return Ok(json!({
                    "error": codes::MALFORMED_PARAMETERS,
                    "error_description": "Expected a non-empty values array.",
                }));
            }
            let squares: Vec<i64> = values.iter().map(|value| value * value).collect();
            Ok(json!({ "squares": squares }))
        })
        .build()
}
