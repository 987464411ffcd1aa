//! Host bridge configuration.

use serde::{Deserialize, Serialize};

/// Host bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Bridge driver: `"memory"` is the only driver shipped here; embedders
    /// supply their own [`crate::traits::Bridge`] implementation instead.
    #[serde(default = "default_driver")]
    pub driver: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
        }
    }
}

fn default_driver() -> String {
    "memory".to_string()
}
