//! Arithmetic plugin family for the Plexo kernel.
//!
//! Four cooperating plugins exercising the whole kernel surface: a shared
//! base with configuration and a formatting capability, a summing plugin
//! that extends it and fans work out over messages, and two message-driven
//! responders.

use serde_json::Value;

use plexo_core::KernelResult;
use plexo_kernel::hub::PluginHub;

pub mod base;
pub mod multiplication;
pub mod square;
pub mod sum;

/// Register the whole arithmetic family on a hub.
pub fn install(hub: &PluginHub) -> KernelResult<()> {
    hub.register(base::definition())?;
    hub.register(sum::definition())?;
    hub.register(square::definition())?;
    hub.register(multiplication::definition())?;
    Ok(())
}

/// Integer operands from a `values` array, ignoring non-numeric entries.
pub(crate) fn operands(input: &Value) -> Vec<i64> {
    input
        .get("values")
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default()
}
