//! Kernel configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod bridge;
pub mod logging;
pub mod plugins;

use serde::{Deserialize, Serialize};

pub use self::bridge::BridgeConfig;
pub use self::logging::LoggingConfig;
pub use self::plugins::PluginsConfig;

use crate::error::KernelError;

/// Root kernel configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlexoConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Plugin system settings.
    #[serde(default)]
    pub plugins: PluginsConfig,
    /// Host bridge settings.
    #[serde(default)]
    pub bridge: BridgeConfig,
}

impl PlexoConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `PLEXO_`.
    pub fn load(env: &str) -> Result<Self, KernelError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("PLEXO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| KernelError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| KernelError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
