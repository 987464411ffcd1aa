//! The plugin hub: one kernel instance.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use plexo_core::KernelResult;
use plexo_core::config::PluginsConfig;
use plexo_core::protocol::{RemoveRequest, ScopeRequest};
use plexo_core::traits::Bridge;
use plexo_core::types::{Envelope, HandlerId, Message};

use crate::context::PluginContext;
use crate::definition::PluginDefinition;
use crate::pipeline;
use crate::registry::{PluginInfo, PluginRegistry};
use crate::router;

/// Owner of the registry, the bridge handle, and the kernel identity.
///
/// One hub is one kernel instance. Everything a host embeds goes through it:
/// registration, runs, message delivery, and the bridge-backed plugin
/// surface. The hub holds no lock across plugin or bridge calls, so plugin
/// code is free to call back into it.
#[derive(Debug)]
pub struct PluginHub {
    /// The host boundary.
    bridge: Arc<dyn Bridge>,
    /// Process-wide plugin store.
    registry: PluginRegistry,
    /// Identity stamped into every bridge request.
    handler_id: HandlerId,
    /// Configuration template for plugins that declare none.
    baseline: Map<String, Value>,
}

impl PluginHub {
    /// Create a hub over the given bridge with an empty baseline template.
    pub fn new(bridge: Arc<dyn Bridge>) -> Self {
        Self {
            bridge,
            registry: PluginRegistry::new(),
            handler_id: HandlerId::new(),
            baseline: Map::new(),
        }
    }

    /// Create a hub carrying the configured baseline template.
    pub fn with_config(bridge: Arc<dyn Bridge>, config: &PluginsConfig) -> Self {
        Self {
            baseline: config.baseline.clone(),
            ..Self::new(bridge)
        }
    }

    /// Identity of this kernel instance.
    pub fn handler_id(&self) -> HandlerId {
        self.handler_id
    }

    /// The plugin store.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub(crate) fn bridge(&self) -> &dyn Bridge {
        self.bridge.as_ref()
    }

    pub(crate) fn baseline(&self) -> &Map<String, Value> {
        &self.baseline
    }

    /// Seed a definition's runtime configuration if it has not been yet.
    pub(crate) fn ensure_configuration(&self, definition: &PluginDefinition) {
        let _ = definition.configuration_cell(&self.baseline);
    }

    /// Register a plugin definition.
    pub fn register(&self, definition: PluginDefinition) -> KernelResult<()> {
        self.registry.register(definition)
    }

    /// Registry views of every plugin, in listing order.
    pub fn list(&self) -> Vec<PluginInfo> {
        self.registry.list()
    }

    /// Context acting as the given plugin, composing it on first use.
    pub fn context(&self, plugin_id: &str) -> KernelResult<PluginContext<'_>> {
        let definition = self.registry.resolve(plugin_id, &self.baseline)?;
        self.ensure_configuration(&definition);
        Ok(PluginContext::new(self, definition))
    }

    /// Run one plugin through the before / in-process / after pipeline.
    pub fn run(
        &self,
        plugin_id: &str,
        params: &Value,
        event_name: Option<&str>,
    ) -> KernelResult<Value> {
        pipeline::run(self, plugin_id, params, event_name)
    }

    /// Run every registered plugin; failures are omitted from the result.
    pub fn run_all(&self, params: &Value, event_name: Option<&str>) -> BTreeMap<String, Value> {
        pipeline::run_all(self, params, event_name)
    }

    /// Deliver a message to one registered plugin.
    pub fn on_message(&self, to_id: &str, message: &Value, from_id: &str) -> Envelope {
        pipeline::on_message(self, to_id, message, from_id)
    }

    /// Deliver a message to every registered plugin with a handler.
    pub fn deliver_all(&self, message: &Value, from_id: &str) -> BTreeMap<String, Value> {
        pipeline::deliver_all(self, message, from_id)
    }

    /// Route a message from the given sender. Local recipients are handled
    /// in-process; the rest go through the bridge in one batched call.
    pub fn send_message(&self, from_id: &str, parameters: &Value, to_ids: &[String]) -> Envelope {
        let message = Message::new(from_id, parameters.clone(), to_ids.to_vec());
        router::send(self, &message)
    }

    /// Fire an event under the kernel's own identity.
    pub fn fire(&self, event_name: &str, parameters: &Value) -> Envelope {
        router::fire(self, "", event_name, parameters)
    }

    /// Ask the host to run a plugin by id, wherever it lives.
    pub fn run_remote(&self, id: &str, parameters: &Value) -> Envelope {
        router::run_remote(self, "", id, parameters)
    }

    /// Notify the host that a plugin should be removed. The local registry
    /// is append-only; nothing is unregistered here.
    pub fn remove(&self, id: &str) {
        let request = RemoveRequest {
            id: id.to_string(),
            handler_id: self.handler_id,
        };
        if let Ok(body) = serde_json::to_string(&request) {
            debug!(plugin_id = %id, "Forwarding remove to the host");
            self.bridge.remove(&body);
        }
    }

    /// Notify the host to drop a plugin's event listeners.
    pub fn remove_events(&self, plugin_id: &str) {
        let request = ScopeRequest {
            plugin_id: plugin_id.to_string(),
            handler_id: self.handler_id,
        };
        if let Ok(body) = serde_json::to_string(&request) {
            self.bridge.remove_events(&body);
        }
    }
}
