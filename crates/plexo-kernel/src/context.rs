//! Execution context handed to every capability invocation.

use std::fmt;

use serde_json::{Map, Value};

use plexo_core::types::Envelope;
use plexo_core::{KernelError, KernelResult};

use crate::definition::PluginDefinition;
use crate::hub::PluginHub;
use crate::{router, values};

use std::sync::Arc;

/// The identity and kernel handle a capability runs with.
///
/// A context names one active plugin; every value, configuration, and
/// messaging helper is scoped to it. Nested dispatches build nested contexts,
/// so plugin code reached from plugin code always sees its own identity and
/// the caller's is restored for free when the inner call returns.
#[derive(Clone)]
pub struct PluginContext<'k> {
    hub: &'k PluginHub,
    plugin: Arc<PluginDefinition>,
}

impl fmt::Debug for PluginContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginContext")
            .field("plugin_id", &self.plugin.id())
            .finish()
    }
}

impl<'k> PluginContext<'k> {
    pub(crate) fn new(hub: &'k PluginHub, plugin: Arc<PluginDefinition>) -> Self {
        Self { hub, plugin }
    }

    /// Id of the active plugin.
    pub fn plugin_id(&self) -> &str {
        self.plugin.id()
    }

    /// The definition of the active plugin.
    pub fn definition(&self) -> &PluginDefinition {
        &self.plugin
    }

    /// The hub this context runs inside, for re-entrant kernel calls.
    pub fn hub(&self) -> &PluginHub {
        self.hub
    }

    /// Snapshot of the active plugin's configuration, seeding it on first
    /// access.
    pub fn configuration(&self) -> Map<String, Value> {
        let cell = self.plugin.configuration_cell(self.hub.baseline());
        cell.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// One configuration entry, if present.
    pub fn configuration_value(&self, key: &str) -> Option<Value> {
        let cell = self.plugin.configuration_cell(self.hub.baseline());
        cell.read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Upsert one configuration entry. Edits live for the process lifetime
    /// and are visible to every later invocation of this plugin.
    pub fn update_configuration(&self, key: impl Into<String>, value: Value) {
        let cell = self.plugin.configuration_cell(self.hub.baseline());
        cell.write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.into(), value);
    }

    /// Store a value under the active plugin's scope. Empty keys and empty
    /// values are rejected locally without reaching the bridge.
    pub fn set_value(&self, key: &str, value: &str) -> bool {
        values::set_value(self.hub, self.plugin.id(), key, value)
    }

    /// Read a value from the active plugin's scope. Any failure reads as the
    /// empty string.
    pub fn get_value(&self, key: &str) -> String {
        values::get_value(self.hub, self.plugin.id(), key)
    }

    /// Delete one value from the active plugin's scope.
    pub fn destroy_value(&self, key: &str) {
        values::destroy_value(self.hub, self.plugin.id(), key);
    }

    /// Delete every value in the active plugin's scope.
    pub fn clear_values(&self) {
        values::clear_values(self.hub, self.plugin.id());
    }

    /// Send a message to the given recipients, or to every reachable plugin
    /// when `to_ids` is empty. Locally registered recipients are delivered
    /// in-process; the rest go through the bridge in one batched call.
    pub fn send_message(&self, parameters: &Value, to_ids: &[String]) -> Envelope {
        self.hub
            .send_message(self.plugin.id(), parameters, to_ids)
    }

    /// Fire an event under the active plugin's identity.
    pub fn fire(&self, event_name: &str, parameters: &Value) -> Envelope {
        router::fire(self.hub, self.plugin.id(), event_name, parameters)
    }

    /// Ask the host to run another plugin, wherever it lives.
    pub fn run_plugin(&self, id: &str, parameters: &Value) -> Envelope {
        router::run_remote(self.hub, self.plugin.id(), id, parameters)
    }

    /// Notify the host that a plugin should be removed. Fire and forget; the
    /// local registry is append-only.
    pub fn remove(&self, plugin_id: &str) {
        self.hub.remove(plugin_id);
    }

    /// Notify the host to drop the active plugin's event listeners.
    pub fn remove_events(&self) {
        self.hub.remove_events(self.plugin.id());
    }

    /// Invoke a named capability on the active plugin and return its result.
    pub fn call(&self, name: &str, params: &Value) -> KernelResult<Value> {
        let Some(capability) = self.plugin.capabilities().named.get(name).cloned() else {
            return Err(KernelError::capability(format!(
                "Plugin '{}' has no capability named '{name}'",
                self.plugin.id()
            )));
        };
        capability.invoke(self, params)
    }
}
