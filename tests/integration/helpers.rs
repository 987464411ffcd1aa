//! Shared test helpers for integration tests.

use serde_json::{Map, Value};

use plexo_plugin_sdk::prelude::TestHub;

/// A hub with the whole arithmetic plugin family installed.
pub fn demo_hub() -> TestHub {
    let harness = TestHub::new();
    plugin_math::install(harness.hub()).expect("Failed to install demo plugins");
    harness
}

/// A hub with the arithmetic family and a baseline configuration template.
pub fn demo_hub_with_baseline(baseline: Map<String, Value>) -> TestHub {
    let harness = TestHub::with_baseline(baseline);
    plugin_math::install(harness.hub()).expect("Failed to install demo plugins");
    harness
}
