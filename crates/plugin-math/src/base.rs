//! Shared base plugin: formatting capability and configuration defaults.

use serde_json::{Map, Value, json};

use plexo_kernel::definition::PluginDefinition;

/// Plugin id.
pub const ID: &str = "math.base";

/// The base the arithmetic plugins extend.
///
/// Carries the configuration defaults (`digits`, `prefix`) and a `format`
/// capability rendering a number with them. No entry points of its own.
pub fn definition() -> PluginDefinition {
    let mut configuration = Map::new();
    configuration.insert("digits".to_string(), json!(2));
    configuration.insert("prefix".to_string(), json!("="));

    PluginDefinition::builder(ID)
        .name("Math Base")
        .configuration(configuration)
        .capability_fn("format", |ctx, params| {
            let digits = ctx
                .configuration_value("digits")
                .and_then(|value| value.as_u64())
                .unwrap_or(2) as usize;
            let prefix = ctx
                .configuration_value("prefix")
                .and_then(|value| value.as_str().map(str::to_string))
                .unwrap_or_default();
            let value = params.get("value").and_then(Value::as_f64).unwrap_or(0.0);
            Ok(json!(format!("{prefix} {value:.digits$}")))
        })
        .build()
}
