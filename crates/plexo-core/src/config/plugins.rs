//! Plugin system configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Plugin system configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Baseline configuration seeded into plugins that declare none of
    /// their own. Keys already present on a plugin are never overwritten.
    #[serde(default)]
    pub baseline: Map<String, Value>,
}
