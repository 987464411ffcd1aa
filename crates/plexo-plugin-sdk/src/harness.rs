//! Test harness: a hub wired to an in-memory bridge.

use std::sync::Arc;

use serde_json::{Map, Value};

use plexo_bridge::MemoryBridge;
use plexo_core::KernelResult;
use plexo_core::config::PluginsConfig;
use plexo_core::types::Envelope;
use plexo_kernel::definition::PluginDefinition;
use plexo_kernel::hub::PluginHub;

/// A kernel instance over an in-memory bridge, for plugin tests and demos.
///
/// The bridge is kept alongside the hub so assertions can inspect exactly
/// what crossed the boundary: call counts, recorded requests, stored values.
pub struct TestHub {
    hub: PluginHub,
    bridge: Arc<MemoryBridge>,
}

impl TestHub {
    /// A hub with an empty baseline configuration template.
    pub fn new() -> Self {
        let bridge = Arc::new(MemoryBridge::new());
        let hub = PluginHub::new(bridge.clone());
        Self { hub, bridge }
    }

    /// A hub whose baseline template seeds plugins that declare no
    /// configuration.
    pub fn with_baseline(baseline: Map<String, Value>) -> Self {
        let bridge = Arc::new(MemoryBridge::new());
        let config = PluginsConfig { baseline };
        let hub = PluginHub::with_config(bridge.clone(), &config);
        Self { hub, bridge }
    }

    /// The kernel instance under test.
    pub fn hub(&self) -> &PluginHub {
        &self.hub
    }

    /// The bridge behind the hub, for boundary assertions.
    pub fn bridge(&self) -> &MemoryBridge {
        &self.bridge
    }

    /// Register a definition, panicking on conflicts. Test convenience.
    pub fn install(&self, definition: PluginDefinition) {
        if let Err(err) = self.hub.register(definition) {
            panic!("plugin registration failed: {err}");
        }
    }

    /// Run a plugin through the full pipeline.
    pub fn run(&self, plugin_id: &str, params: &Value) -> KernelResult<Value> {
        self.hub.run(plugin_id, params, None)
    }

    /// Send a message from the given plugin id.
    pub fn send(&self, from_id: &str, parameters: &Value, to_ids: &[String]) -> Envelope {
        self.hub.send_message(from_id, parameters, to_ids)
    }
}

impl Default for TestHub {
    fn default() -> Self {
        Self::new()
    }
}
